//! Rack geometry derived from slot placements.

use std::collections::{BTreeMap, HashMap};

use glam::DVec3;
use tracing::debug;

use super::identifier::normalize_rack_ref;
use crate::types::{
    BoundingBox, Facing, RackHitbox, RackKey, RackRecord, RecordKind, SlotRecord, SpatialRecord,
};

/// Horizontal axis of a rack box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HorizontalAxis {
    X,
    Z,
}

impl HorizontalAxis {
    /// The axis with the larger extent; x on ties.
    fn long_of(size: DVec3) -> Self {
        if size.z > size.x {
            HorizontalAxis::Z
        } else {
            HorizontalAxis::X
        }
    }

    fn other(self) -> Self {
        match self {
            HorizontalAxis::X => HorizontalAxis::Z,
            HorizontalAxis::Z => HorizontalAxis::X,
        }
    }

    fn component(self, v: DVec3) -> f64 {
        match self {
            HorizontalAxis::X => v.x,
            HorizontalAxis::Z => v.z,
        }
    }

    fn unit(self) -> DVec3 {
        match self {
            HorizontalAxis::X => DVec3::X,
            HorizontalAxis::Z => DVec3::Z,
        }
    }
}

/// Group slots by bay and normalized rack ref and derive each rack's box,
/// sections, level count and facing.
///
/// Slots are center-anchored, so each contributes `position ± size/2` to
/// its rack box.
pub fn compute_bounds(slots: &[SlotRecord]) -> BTreeMap<RackKey, RackRecord> {
    let mut groups: BTreeMap<RackKey, Vec<&SlotRecord>> = BTreeMap::new();
    for slot in slots {
        groups
            .entry(RackKey::new(&slot.bay_id, &slot.rack_ref))
            .or_default()
            .push(slot);
    }

    groups
        .into_iter()
        .filter_map(|(key, members)| {
            let rack = rack_from_slots(&key, &members)?;
            debug!(
                rack = %key,
                sections = rack.sections.len(),
                levels = rack.levels,
                facing = ?rack.facing,
                "Derived rack bounds"
            );
            Some((key, rack))
        })
        .collect()
}

fn rack_from_slots(key: &RackKey, slots: &[&SlotRecord]) -> Option<RackRecord> {
    let boxes: Vec<BoundingBox> = slots.iter().map(|s| s.bounds()).collect();
    let bounds = BoundingBox::union_all(&boxes)?;

    // Minimum slot center along the long axis, per section.
    let long = HorizontalAxis::long_of(bounds.size());
    let mut section_coord: BTreeMap<&str, f64> = BTreeMap::new();
    for slot in slots {
        let c = long.component(slot.position);
        section_coord
            .entry(slot.section.as_str())
            .and_modify(|m| *m = m.min(c))
            .or_insert(c);
    }

    let facing = facing_from_sections(&section_coord);
    let facing_axis = long.other().unit() * facing.sign();

    Some(RackRecord {
        rack_ref: key.rack_ref.clone(),
        bay_id: key.bay_id.clone(),
        sections: section_coord.keys().map(|s| s.to_string()).collect(),
        levels: slots.iter().map(|s| s.level).max().unwrap_or(0),
        slot_count: slots.len(),
        bounds,
        facing,
        facing_axis,
    })
}

/// `Negative` when section A sits further along the long axis than the last
/// section, `Positive` when it does not. Racks without an A section or with
/// a single section default to `Negative`.
fn facing_from_sections(section_coord: &BTreeMap<&str, f64>) -> Facing {
    if section_coord.len() < 2 {
        return Facing::Negative;
    }
    let (Some(a), Some((_, last))) = (section_coord.get("A"), section_coord.last_key_value())
    else {
        return Facing::Negative;
    };
    if a > last {
        Facing::Negative
    } else {
        Facing::Positive
    }
}

/// Override derived facing with explicit `[x, z]` hints from the rack
/// records of one bay.
///
/// The hint is projected onto the rack's short horizontal axis; a hint with
/// no component along that axis is ignored.
pub fn apply_facing_hints(
    racks: &mut BTreeMap<RackKey, RackRecord>,
    bay_id: &str,
    records: &[SpatialRecord],
) {
    for record in records {
        let RecordKind::Rack {
            rack_ref,
            facing: Some([hx, hz]),
            ..
        } = &record.kind
        else {
            continue;
        };
        let Some(rack) = racks.get_mut(&RackKey::new(bay_id, rack_ref)) else {
            continue;
        };
        let short = HorizontalAxis::long_of(rack.size()).other();
        let along = short.component(DVec3::new(*hx, 0.0, *hz));
        if along.abs() <= f64::EPSILON || !along.is_finite() {
            continue;
        }
        rack.facing = if along > 0.0 {
            Facing::Positive
        } else {
            Facing::Negative
        };
        rack.facing_axis = short.unit() * rack.facing.sign();
        debug!(rack = %rack.key(), facing = ?rack.facing, "Applied facing hint");
    }
}

/// Join the hitbox records of one bay with the racks they select.
///
/// Sections, levels and slot count come from the derived rack, falling back
/// to the bay file's rack record. The front direction comes from the derived
/// rack, then an explicit hint on the rack record, then the record's
/// footprint: racks deeper along z than wide along x face `[1, 0]`.
pub fn join_hitboxes(
    racks: &BTreeMap<RackKey, RackRecord>,
    bay_id: &str,
    records: &[SpatialRecord],
) -> Vec<RackHitbox> {
    let rack_records: HashMap<String, &SpatialRecord> = records
        .iter()
        .filter_map(|r| match &r.kind {
            RecordKind::Rack { rack_ref, .. } => Some((normalize_rack_ref(rack_ref), r)),
            _ => None,
        })
        .collect();

    records
        .iter()
        .filter_map(|record| {
            let RecordKind::RackHitbox {
                rack_ref,
                interactive,
            } = &record.kind
            else {
                return None;
            };
            let key = RackKey::new(bay_id, rack_ref);
            let derived = racks.get(&key);
            let declared = rack_records.get(&key.rack_ref).copied();
            if derived.is_none() && declared.is_none() {
                debug!(hitbox = %record.id, rack = %key, "Hitbox names an unknown rack");
            }

            let (sections, levels) = match (derived, declared.map(|r| &r.kind)) {
                (Some(rack), _) => (rack.sections.clone(), rack.levels),
                (None, Some(RecordKind::Rack { sections, levels, .. })) => (sections.clone(), *levels),
                _ => (Vec::new(), 0),
            };
            let front_facing = match (derived, declared) {
                (Some(rack), _) => [rack.facing_axis.x, rack.facing_axis.z],
                (None, Some(decl)) => match &decl.kind {
                    RecordKind::Rack {
                        facing: Some(hint), ..
                    } => *hint,
                    _ => footprint_facing(decl.geometry.size),
                },
                (None, None) => footprint_facing(record.geometry.size),
            };

            Some(RackHitbox {
                id: record.id.clone(),
                bay_id: key.bay_id.clone(),
                rack_ref: key.rack_ref.clone(),
                bounds: record.geometry.bounds(),
                interactive: *interactive,
                sections,
                levels,
                slot_count: derived.map_or(0, |r| r.slot_count),
                front_facing,
            })
        })
        .collect()
}

fn footprint_facing(size: DVec3) -> [f64; 2] {
    if size.z > size.x { [1.0, 0.0] } else { [0.0, 1.0] }
}
