//! Building and bay layout of the campus.
//!
//! World-space centers and rects are always derived from origin and size;
//! nothing here stores a camera target directly.

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NavError, Result};

/// Footprint size of a building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BayConfig {
    pub bay_id: String,
    pub label: String,
    /// `[x, z]` offset from the building's NW corner.
    pub origin_local: [f64; 2],
    pub width: f64,
    pub length: f64,
    /// Inactive bays exist on the floor plan but carry no data yet.
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingConfig {
    pub building_id: String,
    pub label: String,
    /// `[x, z]` NW corner in world space; y is always 0.
    pub origin_world: [f64; 2],
    pub size: Footprint,
    #[serde(default)]
    pub bays: Vec<BayConfig>,
}

/// Axis-aligned rectangle on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    /// `[x, z]` of the NW corner.
    pub origin: [f64; 2],
    pub width: f64,
    pub length: f64,
}

impl WorldRect {
    pub fn center(&self) -> DVec3 {
        DVec3::new(
            self.origin[0] + self.width / 2.0,
            0.0,
            self.origin[1] + self.length / 2.0,
        )
    }

    pub fn merge(&self, other: &WorldRect) -> WorldRect {
        let min_x = self.origin[0].min(other.origin[0]);
        let min_z = self.origin[1].min(other.origin[1]);
        let max_x = (self.origin[0] + self.width).max(other.origin[0] + other.width);
        let max_z = (self.origin[1] + self.length).max(other.origin[1] + other.length);
        WorldRect {
            origin: [min_x, min_z],
            width: max_x - min_x,
            length: max_z - min_z,
        }
    }
}

/// The building/bay registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub buildings: Vec<BuildingConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let bay = |id: &str, label: &str, origin: [f64; 2], active: bool| BayConfig {
            bay_id: id.into(),
            label: label.into(),
            origin_local: origin,
            width: 60.0,
            length: 94.0,
            active,
        };
        SiteConfig {
            buildings: vec![
                BuildingConfig {
                    building_id: "bldg-00".into(),
                    label: "Building 00".into(),
                    origin_world: [0.0, 0.0],
                    size: Footprint {
                        width: 120.0,
                        length: 188.0,
                    },
                    bays: vec![
                        bay("BAY_00_NW", "Bay NW", [0.0, 0.0], true),
                        bay("BAY_00_NE", "Bay NE", [60.0, 0.0], false),
                        bay("BAY_00_SW", "Bay SW", [0.0, 94.0], false),
                        bay("BAY_00_SE", "Bay SE", [60.0, 94.0], false),
                    ],
                },
                BuildingConfig {
                    building_id: "bldg-22".into(),
                    label: "Building 22".into(),
                    origin_world: [0.0, 0.0],
                    size: Footprint {
                        width: 120.0,
                        length: 160.0,
                    },
                    bays: vec![
                        bay("BAY_3W", "Bay 3 West", [0.0, 0.0], false),
                        bay("BAY_3E", "Bay 3 East", [60.0, 0.0], false),
                    ],
                },
            ],
        }
    }
}

impl SiteConfig {
    /// Load a registry from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let site: SiteConfig = serde_json::from_str(&text)?;
        site.validate()?;
        info!(
            path = %path.display(),
            buildings = site.buildings.len(),
            "Loaded site registry"
        );
        Ok(site)
    }

    /// Reject empty registries, duplicate ids and non-positive sizes.
    pub fn validate(&self) -> Result<()> {
        if self.buildings.is_empty() {
            return Err(NavError::Config("site registry has no buildings".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for b in &self.buildings {
            if !seen.insert(b.building_id.as_str()) {
                return Err(NavError::Config(format!(
                    "duplicate building id {}",
                    b.building_id
                )));
            }
            if !(b.size.width > 0.0 && b.size.length > 0.0) {
                return Err(NavError::Config(format!(
                    "building {} has a non-positive size",
                    b.building_id
                )));
            }
            for bay in &b.bays {
                if !seen.insert(bay.bay_id.as_str()) {
                    return Err(NavError::Config(format!("duplicate bay id {}", bay.bay_id)));
                }
                if !(bay.width > 0.0 && bay.length > 0.0) {
                    return Err(NavError::Config(format!(
                        "bay {} has a non-positive size",
                        bay.bay_id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn building(&self, building_id: &str) -> Option<&BuildingConfig> {
        self.buildings.iter().find(|b| b.building_id == building_id)
    }

    pub fn bay(&self, building_id: &str, bay_id: &str) -> Option<&BayConfig> {
        self.building(building_id)?
            .bays
            .iter()
            .find(|b| b.bay_id == bay_id)
    }

    /// Building owning a bay id, searching every building.
    pub fn building_of_bay(&self, bay_id: &str) -> Option<&BuildingConfig> {
        self.buildings
            .iter()
            .find(|b| b.bays.iter().any(|bay| bay.bay_id == bay_id))
    }

    pub fn active_bays(&self, building_id: &str) -> Vec<&BayConfig> {
        self.building(building_id)
            .map(|b| b.bays.iter().filter(|bay| bay.active).collect())
            .unwrap_or_default()
    }

    pub fn building_rect(&self, building_id: &str) -> Option<WorldRect> {
        self.building(building_id).map(|b| WorldRect {
            origin: b.origin_world,
            width: b.size.width,
            length: b.size.length,
        })
    }

    pub fn building_world_center(&self, building_id: &str) -> Option<DVec3> {
        self.building_rect(building_id).map(|r| r.center())
    }

    /// NW corner of a bay in world space.
    pub fn bay_world_origin(&self, building_id: &str, bay_id: &str) -> Option<DVec3> {
        let b = self.building(building_id)?;
        let bay = self.bay(building_id, bay_id)?;
        Some(DVec3::new(
            b.origin_world[0] + bay.origin_local[0],
            0.0,
            b.origin_world[1] + bay.origin_local[1],
        ))
    }

    pub fn bay_rect(&self, building_id: &str, bay_id: &str) -> Option<WorldRect> {
        let origin = self.bay_world_origin(building_id, bay_id)?;
        let bay = self.bay(building_id, bay_id)?;
        Some(WorldRect {
            origin: [origin.x, origin.z],
            width: bay.width,
            length: bay.length,
        })
    }

    pub fn bay_world_center(&self, building_id: &str, bay_id: &str) -> Option<DVec3> {
        self.bay_rect(building_id, bay_id).map(|r| r.center())
    }

    /// Union of every building footprint.
    pub fn campus_rect(&self) -> Option<WorldRect> {
        self.buildings
            .iter()
            .filter_map(|b| self.building_rect(&b.building_id))
            .reduce(|a, b| a.merge(&b))
    }
}
