//! Typed shape of bay data files.
//!
//! All "string or number", "object or array" ambiguity of the source files
//! is resolved here, at the ingestion boundary. Anything that does not fit
//! these shapes fails to parse.

use glam::DVec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Anchor, AxisConvention, RecordKind};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

/// Accept `"R01"` or `1` as a string.
pub(crate) fn string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(d).map(StringOrNumber::into_string)
}

/// Accept `"3"`, `3` or `null`.
pub(crate) fn opt_string_or_number<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(d).map(|v| v.map(StringOrNumber::into_string))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Vec3Repr {
    Object { x: f64, y: f64, z: f64 },
    Array([f64; 3]),
}

/// Accept `{x, y, z}` or `[x, y, z]`.
pub(crate) fn vec3<'de, D>(d: D) -> Result<DVec3, D::Error>
where
    D: Deserializer<'de>,
{
    Vec3Repr::deserialize(d).map(|v| match v {
        Vec3Repr::Object { x, y, z } => DVec3::new(x, y, z),
        Vec3Repr::Array([x, y, z]) => DVec3::new(x, y, z),
    })
}

fn opt_vec3<'de, D>(d: D) -> Result<Option<DVec3>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "vec3")] DVec3);
    Option::<Wrap>::deserialize(d).map(|w| w.map(|Wrap(v)| v))
}

/// A source record before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(alias = "pos", deserialize_with = "vec3")]
    pub position: DVec3,
    #[serde(alias = "size", deserialize_with = "vec3")]
    pub dimensions: DVec3,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(flatten)]
    pub kind: RecordKind,
}

/// Container entries carry no `type` tag; their group implies it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContainer {
    pub id: String,
    #[serde(alias = "pos", deserialize_with = "vec3")]
    pub position: DVec3,
    #[serde(alias = "size", deserialize_with = "vec3")]
    pub dimensions: DVec3,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(deserialize_with = "string_or_number")]
    pub rack: String,
    #[serde(alias = "sect")]
    pub section: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub slot: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
}

impl From<RawContainer> for RawRecord {
    fn from(c: RawContainer) -> Self {
        RawRecord {
            id: c.id,
            position: c.position,
            dimensions: c.dimensions,
            anchor: c.anchor,
            kind: RecordKind::Slot {
                rack_ref: c.rack,
                section: c.section,
                level: c.level,
                slot_index: c.slot,
                bin_id: c.bin,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoordinateSystem {
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub z: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BayMetadata {
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub coordinate_system: Option<CoordinateSystem>,
}

/// One bay data file.
#[derive(Debug, Clone, Deserialize)]
pub struct BayFile {
    pub building: String,
    pub bay: String,
    #[serde(default, deserialize_with = "opt_vec3")]
    pub bay_origin: Option<DVec3>,
    #[serde(default)]
    pub metadata: BayMetadata,
    /// Explicit axis convention; inferred from metadata when absent.
    #[serde(default)]
    pub axes: Option<AxisConvention>,
    #[serde(default)]
    pub building_outline: Option<RawRecord>,
    #[serde(default)]
    pub zones: Vec<RawRecord>,
    #[serde(default)]
    pub doors: Vec<RawRecord>,
    #[serde(default)]
    pub loading_docks: Vec<RawRecord>,
    #[serde(default)]
    pub floor_guides: Vec<RawRecord>,
    #[serde(default)]
    pub racks: Vec<RawRecord>,
    #[serde(default)]
    pub rack_hitboxes: Vec<RawRecord>,
    #[serde(default)]
    pub containers: Vec<RawContainer>,
}

impl BayFile {
    /// Axis convention of the file's coordinates.
    ///
    /// Explicit `axes` wins; otherwise storage convention is assumed when the
    /// metadata labels z as height/up.
    pub fn axis_convention(&self) -> AxisConvention {
        if let Some(axes) = self.axes {
            return axes;
        }
        let z_is_up = self
            .metadata
            .coordinate_system
            .as_ref()
            .map(|cs| {
                let z = cs.z.to_lowercase();
                z.contains("height") || z.contains("up")
            })
            .unwrap_or(false);
        if z_is_up {
            AxisConvention::Storage
        } else {
            AxisConvention::Render
        }
    }

    /// Every typed group paired with the `type` tag its members must carry.
    pub fn typed_groups(&self) -> Vec<(&'static str, &[RawRecord])> {
        vec![
            ("building_outline", self.building_outline.as_slice()),
            ("zone", &self.zones),
            ("door", &self.doors),
            ("loading_dock", &self.loading_docks),
            ("floor_guide", &self.floor_guides),
            ("rack", &self.racks),
            ("rack_hitbox", &self.rack_hitboxes),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_accepts_object_and_array_vectors() {
        let a: RawRecord = serde_json::from_str(
            r#"{"id":"Z1","type":"zone","label":"Staging","position":{"x":1,"y":2,"z":3},"dimensions":[4,5,6]}"#,
        )
        .unwrap();
        assert_eq!(a.position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.dimensions, DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(a.anchor, Anchor::Corner);
        assert_eq!(a.kind, RecordKind::Zone { label: "Staging".into() });
    }

    #[test]
    fn raw_record_rejects_missing_type() {
        let r = serde_json::from_str::<RawRecord>(r#"{"id":"Z1","position":[0,0,0],"dimensions":[1,1,1]}"#);
        assert!(r.is_err());
    }

    #[test]
    fn container_rack_as_number_or_string() {
        let c: RawContainer = serde_json::from_str(
            r#"{"id":"C1","rack":18,"section":"A","level":2,"slot":3,"position":[0,0,0],"dimensions":[1,1,1]}"#,
        )
        .unwrap();
        assert_eq!(c.rack, "18");
        assert_eq!(c.slot.as_deref(), Some("3"));

        let c: RawContainer = serde_json::from_str(
            r#"{"id":"C2","rack":"R18","sect":"B","level":1,"slot":null,"pos":[0,0,0],"size":[1,1,1]}"#,
        )
        .unwrap();
        assert_eq!(c.rack, "R18");
        assert_eq!(c.section, "B");
        assert_eq!(c.slot, None);
    }

    #[test]
    fn container_converts_to_slot_kind() {
        let c: RawContainer = serde_json::from_str(
            r#"{"id":"C1","rack":"R02","section":"A","level":1,"bin":"3W02A1","position":[0,0,0],"dimensions":[1,1,1]}"#,
        )
        .unwrap();
        let raw: RawRecord = c.into();
        assert_eq!(raw.kind.type_name(), "container");
    }

    #[test]
    fn axis_convention_inference() {
        let mut file: BayFile = serde_json::from_str(r#"{"building":"bldg-00","bay":"BAY_00_NW"}"#).unwrap();
        assert_eq!(file.axis_convention(), AxisConvention::Render);

        file.metadata.coordinate_system = Some(CoordinateSystem {
            x: "width".into(),
            y: "depth".into(),
            z: "height".into(),
        });
        assert_eq!(file.axis_convention(), AxisConvention::Storage);

        file.axes = Some(AxisConvention::Render);
        assert_eq!(file.axis_convention(), AxisConvention::Render);
    }

    #[test]
    fn bay_origin_parses() {
        let file: BayFile =
            serde_json::from_str(r#"{"building":"b","bay":"x","bay_origin":{"x":5,"y":0,"z":7,"note":"NW corner"}}"#)
                .unwrap();
        assert_eq!(file.bay_origin, Some(DVec3::new(5.0, 0.0, 7.0)));
    }
}
