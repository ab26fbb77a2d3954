use std::sync::Arc;

use tracing::{debug, warn};

use super::framing::{self, FitRect, TopDownShot};
use crate::config::CameraConfig;
use crate::layout::SpatialIndex;
use crate::site::SiteConfig;
use crate::types::{BoundingBox, CameraPose, RackRecord, SelectionPath, ViewLevel};

/// Computes the default pose for a view level from site and index data.
#[derive(Debug, Clone)]
pub struct CameraDirector {
    config: CameraConfig,
    site: Arc<SiteConfig>,
    index: Arc<SpatialIndex>,
}

impl CameraDirector {
    pub fn new(config: CameraConfig, site: Arc<SiteConfig>, index: Arc<SpatialIndex>) -> Self {
        Self {
            config,
            site,
            index,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Default pose for `level` with the given selection, or `None` when the
    /// selection names something the site or index does not know.
    pub fn pose_for(&self, level: ViewLevel, path: &SelectionPath, aspect_ratio: f64) -> Option<CameraPose> {
        let pose = match level {
            ViewLevel::Campus => self.top_down(self.site.campus_rect()?.into(), aspect_ratio),
            ViewLevel::Building => {
                let rect = self.site.building_rect(path.building_id()?)?;
                self.top_down(rect.into(), aspect_ratio)
            }
            ViewLevel::Bay => self.top_down(self.bay_rect(path)?, aspect_ratio),
            ViewLevel::Rack => framing::front_of_rack(self.selected_rack(path)?, &self.config.rack),
            ViewLevel::Row => {
                let rack = self.selected_rack(path)?;
                let boxes: Vec<BoundingBox> = self
                    .index
                    .slots_for_section(&rack.bay_id, &rack.rack_ref, path.row_id()?)
                    .iter()
                    .map(|s| s.bounds())
                    .collect();
                let row = BoundingBox::union_all(&boxes)?;
                framing::front_of(row.center(), rack.facing_axis, &self.config.row)
            }
            ViewLevel::Slot => {
                let slot = self.index.slot_by_id(path.slot_id()?)?;
                let rack = self
                    .index
                    .rack(&slot.bay_id, &slot.rack_ref)
                    .or_else(|| self.selected_rack(path))?;
                framing::three_quarter_slot_view(slot.position, slot.size, rack.facing_axis, &self.config.slot)
            }
        };
        debug!(%level, %path, position = %pose.position, "Computed default pose");
        Some(pose)
    }

    /// Rack named by the selection, resolved within the selected bay.
    fn selected_rack(&self, path: &SelectionPath) -> Option<&RackRecord> {
        self.index.rack(path.bay_id()?, path.rack_id()?)
    }

    fn top_down(&self, rect: FitRect, aspect_ratio: f64) -> CameraPose {
        let shot = TopDownShot {
            aspect_ratio,
            ..self.config.top_down
        };
        framing::fit_top_down(&rect, &shot)
    }

    /// Registry rect of the bay, or the footprint of its slots when the bay
    /// is not registered.
    fn bay_rect(&self, path: &SelectionPath) -> Option<FitRect> {
        let bay_id = path.bay_id()?;
        if let Some(rect) = path
            .building_id()
            .and_then(|b| self.site.bay_rect(b, bay_id))
        {
            return Some(rect.into());
        }
        let boxes: Vec<BoundingBox> = self
            .index
            .slots_for_bay(bay_id)
            .iter()
            .map(|s| s.bounds())
            .collect();
        let Some(bounds) = BoundingBox::union_all(&boxes) else {
            warn!(bay = bay_id, "Bay is neither registered nor populated");
            return None;
        };
        Some(FitRect::from_bounds(&bounds))
    }
}

/// Levels whose default pose does not depend on the viewport, so a pose
/// saved on the way down stays valid on the way back.
pub fn is_cacheable(level: ViewLevel) -> bool {
    matches!(level, ViewLevel::Rack | ViewLevel::Row)
}

/// LIFO stack of poses left behind while drilling down.
#[derive(Debug, Clone, Default)]
pub struct PoseCache {
    stack: Vec<(ViewLevel, CameraPose)>,
}

impl PoseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the pose of the level being left on forward navigation.
    pub fn push(&mut self, level: ViewLevel, pose: CameraPose) {
        self.stack.push((level, pose));
    }

    /// Pose to restore when returning to `level`.
    ///
    /// Entries deeper than `level` are discarded. Only cacheable levels are
    /// restored; for the others the caller recomputes.
    pub fn restore(&mut self, level: ViewLevel) -> Option<CameraPose> {
        while let Some((saved, pose)) = self.stack.pop() {
            if saved == level {
                return is_cacheable(level).then_some(pose);
            }
            if saved < level {
                self.stack.push((saved, pose));
                return None;
            }
        }
        None
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_bounds;
    use crate::types::SlotRecord;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn slot(id: &str, section: &str, level: u32, x: f64) -> SlotRecord {
        SlotRecord {
            id: id.into(),
            bin_id: id.into(),
            bay_id: "BAY_00_NW".into(),
            rack_ref: "18".into(),
            section: section.into(),
            level,
            slot_index: None,
            position: DVec3::new(x, 1.0 + 2.0 * level as f64, 20.0),
            size: DVec3::new(2.0, 2.0, 1.0),
            fill_fraction: None,
        }
    }

    fn director() -> CameraDirector {
        let slots = vec![
            slot("3W18A1", "A", 1, 10.0),
            slot("3W18A2", "A", 2, 10.0),
            slot("3W18B1", "B", 1, 12.0),
            slot("3W18B2", "B", 2, 12.0),
        ];
        let racks = compute_bounds(&slots);
        let index = SpatialIndex::build(slots, racks, vec![]);
        CameraDirector::new(CameraConfig::default(), Arc::new(SiteConfig::default()), Arc::new(index))
    }

    fn path(ids: &[&str]) -> SelectionPath {
        SelectionPath::from_ids(ids.iter().copied()).unwrap()
    }

    #[test]
    fn top_down_levels_center_on_rects() {
        let d = director();
        let campus = d.pose_for(ViewLevel::Campus, &SelectionPath::new(), 1.6).unwrap();
        assert_eq!(campus.position.x, 60.0);
        assert_eq!(campus.position.z, 94.0);
        assert_eq!(campus.orientation().unwrap().pitch, -90.0);

        let bay = d
            .pose_for(ViewLevel::Bay, &path(&["bldg-00", "BAY_00_NW"]), 1.6)
            .unwrap();
        assert_eq!(bay.position.x, 30.0);
        assert_eq!(bay.position.z, 47.0);
        assert!(bay.position.y < campus.position.y);
    }

    #[test]
    fn top_down_depends_on_aspect() {
        let d = director();
        let p = path(&["bldg-00"]);
        let wide = d.pose_for(ViewLevel::Building, &p, 3.0).unwrap();
        let narrow = d.pose_for(ViewLevel::Building, &p, 0.5).unwrap();
        assert!(narrow.position.y > wide.position.y);
    }

    #[test]
    fn rack_pose_faces_rack_center() {
        let d = director();
        let rack = d.index.rack("BAY_00_NW", "18").unwrap().clone();
        let pose = d
            .pose_for(ViewLevel::Rack, &path(&["bldg-00", "BAY_00_NW", "rack-18"]), 1.6)
            .unwrap();
        assert_eq!(pose.look_at(), Some(rack.center()));
        assert_relative_eq!((pose.position - rack.center()).length(), (30.0f64.powi(2) + 0.04).sqrt());
    }

    #[test]
    fn row_pose_targets_section() {
        let d = director();
        let pose = d
            .pose_for(ViewLevel::Row, &path(&["bldg-00", "BAY_00_NW", "rack-18", "B"]), 1.6)
            .unwrap();
        let target = pose.look_at().unwrap();
        assert_eq!(target.x, 12.0);
        assert_eq!(pose.fov_degrees, 45.0);
    }

    #[test]
    fn slot_pose_looks_at_slot() {
        let d = director();
        let pose = d
            .pose_for(
                ViewLevel::Slot,
                &path(&["bldg-00", "BAY_00_NW", "rack-18", "A", "3W18A2"]),
                1.6,
            )
            .unwrap();
        assert_eq!(pose.look_at(), Some(DVec3::new(10.0, 5.0, 20.0)));
    }

    #[test]
    fn unknown_selection_gives_none() {
        let d = director();
        assert!(d.pose_for(ViewLevel::Building, &path(&["bldg-99"]), 1.6).is_none());
        assert!(d
            .pose_for(ViewLevel::Rack, &path(&["bldg-00", "BAY_00_NW", "rack-99"]), 1.6)
            .is_none());
        assert!(d
            .pose_for(ViewLevel::Row, &path(&["bldg-00", "BAY_00_NW", "rack-18", "Z"]), 1.6)
            .is_none());
        // Rack 18 exists, but not in this bay.
        assert!(d
            .pose_for(ViewLevel::Rack, &path(&["bldg-22", "BAY_3E", "rack-18"]), 1.6)
            .is_none());
    }

    #[test]
    fn unregistered_bay_falls_back_to_slot_footprint() {
        let d = director();
        let pose = d
            .pose_for(ViewLevel::Bay, &path(&["bldg-22", "BAY_00_NW"]), 1.6)
            .unwrap();
        assert_eq!(pose.position.x, 11.0);
        assert_eq!(pose.position.z, 20.0);
    }

    fn pose_at(x: f64) -> CameraPose {
        CameraPose::from_parts(DVec3::new(x, 0.0, 0.0), None, Some(DVec3::ZERO), 40.0).unwrap()
    }

    #[test]
    fn cache_restores_cacheable_levels_only() {
        let mut cache = PoseCache::new();
        cache.push(ViewLevel::Bay, pose_at(1.0));
        cache.push(ViewLevel::Rack, pose_at(2.0));
        cache.push(ViewLevel::Row, pose_at(3.0));

        assert_eq!(cache.restore(ViewLevel::Row), Some(pose_at(3.0)));
        assert_eq!(cache.restore(ViewLevel::Rack), Some(pose_at(2.0)));
        assert_eq!(cache.restore(ViewLevel::Bay), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_skips_deeper_entries() {
        let mut cache = PoseCache::new();
        cache.push(ViewLevel::Rack, pose_at(2.0));
        cache.push(ViewLevel::Row, pose_at(3.0));
        assert_eq!(cache.restore(ViewLevel::Rack), Some(pose_at(2.0)));

        cache.push(ViewLevel::Bay, pose_at(1.0));
        assert_eq!(cache.restore(ViewLevel::Rack), None);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
