use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use crate::ingestion::raw::{opt_string_or_number, string_or_number};
use crate::layout::normalize_rack_ref;

/// Axis order of source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisConvention {
    /// x = width, y = depth, z = height.
    Storage,
    /// x = width, y = up, z = depth.
    #[default]
    Render,
}

/// Which point of the box a source position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Corner,
    Center,
}

/// Center-anchored, render-axis placement of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub position: DVec3,
    pub size: DVec3,
}

impl Geometry {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_center_size(self.position, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorType {
    #[default]
    Standard,
    Emergency,
}

fn default_true() -> bool {
    true
}

/// Closed set of record kinds, discriminated by the source `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    Rack {
        #[serde(rename = "rack_number", deserialize_with = "string_or_number")]
        rack_ref: String,
        #[serde(default)]
        sections: Vec<String>,
        #[serde(default)]
        levels: u32,
        #[serde(default)]
        slots_per_section: Option<u32>,
        /// Explicit `[x, z]` aisle direction, overriding the derived one.
        #[serde(default)]
        facing: Option<[f64; 2]>,
    },
    #[serde(rename = "container")]
    Slot {
        #[serde(rename = "rack", deserialize_with = "string_or_number")]
        rack_ref: String,
        section: String,
        level: u32,
        #[serde(rename = "slot", default, deserialize_with = "opt_string_or_number")]
        slot_index: Option<String>,
        #[serde(rename = "bin", default)]
        bin_id: Option<String>,
    },
    RackHitbox {
        #[serde(deserialize_with = "string_or_number")]
        rack_ref: String,
        #[serde(default = "default_true")]
        interactive: bool,
    },
    Zone {
        #[serde(default)]
        label: String,
    },
    Door {
        #[serde(default)]
        label: String,
        #[serde(default)]
        door_type: DoorType,
    },
    LoadingDock {
        #[serde(default)]
        label: String,
    },
    FloorGuide {
        #[serde(default)]
        label: String,
    },
    BuildingOutline {
        #[serde(default)]
        label: String,
    },
}

impl RecordKind {
    /// Source `type` tag of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            RecordKind::Rack { .. } => "rack",
            RecordKind::Slot { .. } => "container",
            RecordKind::RackHitbox { .. } => "rack_hitbox",
            RecordKind::Zone { .. } => "zone",
            RecordKind::Door { .. } => "door",
            RecordKind::LoadingDock { .. } => "loading_dock",
            RecordKind::FloorGuide { .. } => "floor_guide",
            RecordKind::BuildingOutline { .. } => "building_outline",
        }
    }
}

/// Any positioned entity after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialRecord {
    pub id: String,
    pub kind: RecordKind,
    pub geometry: Geometry,
}

impl SpatialRecord {
    /// Copy moved by `offset` (bay-local → world).
    pub fn translated(&self, offset: DVec3) -> SpatialRecord {
        SpatialRecord {
            geometry: Geometry {
                position: self.geometry.position + offset,
                size: self.geometry.size,
            },
            ..self.clone()
        }
    }
}

/// Rack front direction relative to its short horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Positive,
    Negative,
}

impl Facing {
    pub fn sign(self) -> f64 {
        match self {
            Facing::Positive => 1.0,
            Facing::Negative => -1.0,
        }
    }
}

/// A storage location inside a rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub id: String,
    /// Normalized inventory location key.
    pub bin_id: String,
    pub bay_id: String,
    /// Normalized rack ref, e.g. `"18"`.
    pub rack_ref: String,
    pub section: String,
    pub level: u32,
    pub slot_index: Option<String>,
    pub position: DVec3,
    pub size: DVec3,
    /// Joined from inventory by the index; absent in static data.
    pub fill_fraction: Option<f64>,
}

impl SlotRecord {
    /// Extract a slot from a normalized container record.
    pub fn from_record(record: &SpatialRecord, bay_id: &str) -> Option<SlotRecord> {
        let RecordKind::Slot {
            rack_ref,
            section,
            level,
            slot_index,
            bin_id,
        } = &record.kind
        else {
            return None;
        };
        Some(SlotRecord {
            id: record.id.clone(),
            bin_id: bin_id.clone().unwrap_or_else(|| record.id.clone()),
            bay_id: bay_id.to_string(),
            rack_ref: rack_ref.clone(),
            section: section.clone(),
            level: *level,
            slot_index: slot_index.clone(),
            position: record.geometry.position,
            size: record.geometry.size,
            fill_fraction: None,
        })
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_center_size(self.position, self.size)
    }
}

/// Identity of a rack. Rack numbers repeat between bays, so the bay is part
/// of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackKey {
    pub bay_id: String,
    /// Normalized rack ref, e.g. `"18"`.
    pub rack_ref: String,
}

impl RackKey {
    /// Key for a rack ref in any scheme (`R18`, `18`, `rack-18`).
    pub fn new(bay_id: &str, rack_ref: &str) -> RackKey {
        RackKey {
            bay_id: bay_id.to_string(),
            rack_ref: normalize_rack_ref(rack_ref),
        }
    }
}

impl std::fmt::Display for RackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bay_id, self.rack_ref)
    }
}

/// Rack geometry derived from its slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackRecord {
    pub rack_ref: String,
    pub bay_id: String,
    /// Sorted, unique section labels.
    pub sections: Vec<String>,
    pub levels: u32,
    /// Number of slots the rack was derived from.
    pub slot_count: usize,
    pub bounds: BoundingBox,
    pub facing: Facing,
    /// Horizontal unit vector pointing to the aisle side.
    pub facing_axis: DVec3,
}

impl RackRecord {
    pub fn key(&self) -> RackKey {
        RackKey {
            bay_id: self.bay_id.clone(),
            rack_ref: self.rack_ref.clone(),
        }
    }

    pub fn center(&self) -> DVec3 {
        self.bounds.center()
    }

    pub fn size(&self) -> DVec3 {
        self.bounds.size()
    }
}

/// Clickable volume of a rack at bay level, joined with the rack it selects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackHitbox {
    pub id: String,
    pub bay_id: String,
    /// Normalized rack ref.
    pub rack_ref: String,
    pub bounds: BoundingBox,
    pub interactive: bool,
    pub sections: Vec<String>,
    pub levels: u32,
    pub slot_count: usize,
    /// Horizontal `[x, z]` direction the rack front faces.
    pub front_facing: [f64; 2],
}

impl RackHitbox {
    pub fn key(&self) -> RackKey {
        RackKey {
            bay_id: self.bay_id.clone(),
            rack_ref: self.rack_ref.clone(),
        }
    }
}

/// Coarse fill classification used for color-coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillLevel {
    Empty,
    Partial,
    High,
}

impl FillLevel {
    pub fn from_fraction(fraction: f64) -> FillLevel {
        if fraction <= 0.001 {
            FillLevel::Empty
        } else if fraction > 0.7 {
            FillLevel::High
        } else {
            FillLevel::Partial
        }
    }
}
