pub mod coordinates;

use tracing::{debug, warn};

use crate::error::{NavError, Result};
use crate::ingestion::raw::RawRecord;
use crate::layout::identifier::{normalize_bin_id, normalize_rack_ref};
use crate::types::{Anchor, AxisConvention, Geometry, RecordKind, SpatialRecord};

use coordinates::{anchored_center, degenerate_axis, to_render_axes};

/// Normalize one source record into render axes and center anchoring.
///
/// Storage-convention input has its second and third axes swapped, corner
/// positions are shifted by half the size, and identifier fields are
/// brought to canonical form. Degenerate sizes are rejected.
pub fn normalize(raw: &RawRecord, axes: AxisConvention) -> Result<SpatialRecord> {
    if raw.id.trim().is_empty() {
        return Err(NavError::malformed("<unnamed>", "record id is empty"));
    }

    let size = to_render_axes(raw.dimensions, axes);
    if let Some(axis) = degenerate_axis(size) {
        return Err(NavError::malformed(
            &raw.id,
            format!("size.{axis} must be positive and finite, got {size}"),
        ));
    }

    let position = to_render_axes(raw.position, axes);
    if !position.is_finite() {
        return Err(NavError::malformed(&raw.id, format!("non-finite position {position}")));
    }

    Ok(SpatialRecord {
        id: raw.id.clone(),
        kind: normalize_kind(&raw.kind),
        geometry: Geometry {
            position: anchored_center(position, size, raw.anchor),
            size,
        },
    })
}

fn normalize_kind(kind: &RecordKind) -> RecordKind {
    match kind {
        RecordKind::Rack {
            rack_ref,
            sections,
            levels,
            slots_per_section,
            facing,
        } => RecordKind::Rack {
            rack_ref: normalize_rack_ref(rack_ref),
            sections: sections.clone(),
            levels: *levels,
            slots_per_section: *slots_per_section,
            facing: *facing,
        },
        RecordKind::Slot {
            rack_ref,
            section,
            level,
            slot_index,
            bin_id,
        } => RecordKind::Slot {
            rack_ref: normalize_rack_ref(rack_ref),
            section: section.trim().to_string(),
            level: *level,
            slot_index: slot_index.clone(),
            bin_id: bin_id.as_deref().map(normalize_bin_id),
        },
        RecordKind::RackHitbox {
            rack_ref,
            interactive,
        } => RecordKind::RackHitbox {
            rack_ref: normalize_rack_ref(rack_ref),
            interactive: *interactive,
        },
        other => other.clone(),
    }
}

/// Source form of an already-normalized record (render axes, center anchor).
///
/// `normalize(&to_raw(r), AxisConvention::Render)` returns `r` unchanged.
pub fn to_raw(record: &SpatialRecord) -> RawRecord {
    RawRecord {
        id: record.id.clone(),
        position: record.geometry.position,
        dimensions: record.geometry.size,
        anchor: Anchor::Center,
        kind: record.kind.clone(),
    }
}

/// Outcome of normalizing a batch.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<SpatialRecord>,
    pub rejected: Vec<NavError>,
}

/// Normalize every record, skipping malformed ones with a warning.
pub fn normalize_all<'a>(
    raws: impl IntoIterator<Item = &'a RawRecord>,
    axes: AxisConvention,
) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for raw in raws {
        match normalize(raw, axes) {
            Ok(record) => {
                debug!(id = %record.id, kind = record.kind.type_name(), "Normalized record");
                batch.records.push(record);
            }
            Err(e) => {
                warn!(%e, "Skipping malformed record");
                batch.rejected.push(e);
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn raw_container(position: DVec3, dimensions: DVec3) -> RawRecord {
        RawRecord {
            id: "3W18A2".into(),
            position,
            dimensions,
            anchor: Anchor::Corner,
            kind: RecordKind::Slot {
                rack_ref: "R18".into(),
                section: "A".into(),
                level: 2,
                slot_index: Some("1".into()),
                bin_id: Some("3w18a02".into()),
            },
        }
    }

    #[test]
    fn storage_corner_record_normalizes() {
        // Storage: corner (10, 20, 0), width 4, depth 2, height 6
        let raw = raw_container(DVec3::new(10.0, 20.0, 0.0), DVec3::new(4.0, 2.0, 6.0));
        let rec = normalize(&raw, AxisConvention::Storage).unwrap();

        assert_eq!(rec.geometry.size, DVec3::new(4.0, 6.0, 2.0));
        assert_eq!(rec.geometry.position, DVec3::new(12.0, 3.0, 21.0));
    }

    #[test]
    fn identifiers_are_canonicalized() {
        let raw = raw_container(DVec3::ZERO, DVec3::ONE);
        let rec = normalize(&raw, AxisConvention::Render).unwrap();
        match rec.kind {
            RecordKind::Slot { rack_ref, bin_id, .. } => {
                assert_eq!(rack_ref, "18");
                assert_eq!(bin_id.as_deref(), Some("3W18A2"));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn non_positive_size_rejected() {
        let raw = raw_container(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0));
        let err = normalize(&raw, AxisConvention::Render).unwrap_err();
        assert!(matches!(err, NavError::MalformedRecord { ref id, .. } if id == "3W18A2"));
        assert!(err.to_string().contains("size.y"));

        let raw = raw_container(DVec3::ZERO, DVec3::new(-1.0, 1.0, 1.0));
        assert!(normalize(&raw, AxisConvention::Render).is_err());
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = raw_container(DVec3::new(3.5, 1.0, -7.25), DVec3::new(2.0, 8.0, 1.5));
        for axes in [AxisConvention::Storage, AxisConvention::Render] {
            let once = normalize(&raw, axes).unwrap();
            let twice = normalize(&to_raw(&once), AxisConvention::Render).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn normalize_all_skips_bad_records() {
        let good = raw_container(DVec3::ZERO, DVec3::ONE);
        let mut bad = raw_container(DVec3::ZERO, DVec3::ZERO);
        bad.id = "broken".into();

        let batch = normalize_all([&good, &bad, &good], AxisConvention::Render);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.rejected.len(), 1);
        assert!(batch.rejected[0].to_string().contains("broken"));
    }

    #[test]
    fn empty_id_rejected() {
        let mut raw = raw_container(DVec3::ZERO, DVec3::ONE);
        raw.id = "  ".into();
        assert!(normalize(&raw, AxisConvention::Render).is_err());
    }
}
