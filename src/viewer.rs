//! Interactive session: navigation events in, camera poses out.

use std::sync::Arc;

use crossbeam::channel::Receiver;
use serde::Serialize;
use tracing::{debug, warn};

use crate::camera::{CameraDirector, PoseCache};
use crate::config::{CameraConfig, NavStep, Viewport};
use crate::error::Result;
use crate::layout::SpatialIndex;
use crate::navigation::{NavChange, Navigator};
use crate::scene::Scene;
use crate::site::SiteConfig;
use crate::types::{CameraPose, RackHitbox, RackRecord, SelectionPath, SlotRecord, ViewLevel};

/// State after an event: where we are and where the camera should go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub level: ViewLevel,
    pub path: SelectionPath,
    pub pose: Option<CameraPose>,
}

/// One navigation session over a loaded scene.
pub struct Viewer {
    navigator: Navigator,
    director: CameraDirector,
    cache: PoseCache,
    viewport: Viewport,
    pose: Option<CameraPose>,
    site: Arc<SiteConfig>,
    index: Arc<SpatialIndex>,
}

impl Viewer {
    /// Start at campus with the campus overview pose.
    pub fn new(scene: &Scene, camera: CameraConfig, viewport: Viewport) -> Self {
        let director = CameraDirector::new(camera, scene.site.clone(), scene.index.clone());
        let mut viewer = Self {
            navigator: Navigator::new(),
            director,
            cache: PoseCache::new(),
            viewport,
            pose: None,
            site: scene.site.clone(),
            index: scene.index.clone(),
        };
        viewer.recompute();
        viewer
    }

    pub fn level(&self) -> ViewLevel {
        self.navigator.level()
    }

    pub fn path(&self) -> &SelectionPath {
        self.navigator.path()
    }

    pub fn pose(&self) -> Option<&CameraPose> {
        self.pose.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn state(&self) -> ViewState {
        ViewState {
            level: self.level(),
            path: self.path().clone(),
            pose: self.pose,
        }
    }

    pub fn subscribe(&mut self) -> Receiver<NavChange> {
        self.navigator.subscribe()
    }

    /// Drill into a child of the current selection.
    pub fn select(&mut self, level: ViewLevel, id: &str) -> Result<ViewState> {
        let departing = self.navigator.level();
        self.navigator.select(level, id)?;
        if let Some(pose) = self.pose {
            self.cache.push(departing, pose);
        }
        self.recompute();
        Ok(self.state())
    }

    /// Return to the parent level, restoring a saved pose when one is valid.
    pub fn go_back(&mut self) -> Result<ViewState> {
        let change = self.navigator.go_back()?;
        match self.cache.restore(change.level) {
            Some(pose) => {
                debug!(level = %change.level, "Restored cached pose");
                self.pose = Some(pose);
            }
            None => self.recompute(),
        }
        Ok(self.state())
    }

    pub fn go_to_root(&mut self) -> ViewState {
        self.navigator.go_to_root();
        self.cache.clear();
        self.recompute();
        self.state()
    }

    /// Deep link to a full selection path.
    pub fn navigate_to(&mut self, path: &SelectionPath) -> Result<ViewState> {
        self.navigator.navigate_to(path)?;
        self.cache.clear();
        self.recompute();
        Ok(self.state())
    }

    /// Apply one scripted step.
    pub fn apply(&mut self, step: &NavStep) -> Result<ViewState> {
        match step {
            NavStep::Select(level, id) => self.select(*level, id),
            NavStep::Back => self.go_back(),
            NavStep::Root => Ok(self.go_to_root()),
            NavStep::Goto(path) => self.navigate_to(path),
        }
    }

    /// New viewport size. Top-down poses are refit to the new aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<ViewState> {
        self.viewport = Viewport::new(width, height)?;
        if self.level().uses_top_down() {
            self.recompute();
        }
        Ok(self.state())
    }

    /// Pose the renderer actually settled on (e.g. after user orbiting).
    ///
    /// It becomes the current pose and is what gets cached when drilling
    /// further down.
    pub fn report_camera(&mut self, pose: CameraPose) {
        self.pose = Some(pose);
    }

    /// Level the next click selects, `None` at slot level.
    pub fn interactive_level(&self) -> Option<ViewLevel> {
        self.level().child()
    }

    /// Slots worth drawing at the current level.
    ///
    /// Bay: every slot of the bay. Rack and slot: the selected rack. Row:
    /// only the selected section.
    pub fn visible_slots(&self) -> Vec<&SlotRecord> {
        let path = self.path();
        match self.level() {
            ViewLevel::Campus | ViewLevel::Building => Vec::new(),
            ViewLevel::Bay => path
                .bay_id()
                .map(|bay| self.index.slots_for_bay(bay))
                .unwrap_or_default(),
            ViewLevel::Rack | ViewLevel::Slot => match (path.bay_id(), path.rack_id()) {
                (Some(bay), Some(rack)) => self.index.slots_for_rack(bay, rack),
                _ => Vec::new(),
            },
            ViewLevel::Row => match (path.bay_id(), path.rack_id(), path.row_id()) {
                (Some(bay), Some(rack), Some(row)) => self.index.slots_for_section(bay, rack, row),
                _ => Vec::new(),
            },
        }
    }

    /// Racks worth drawing at the current level.
    ///
    /// Building: racks of every bay in the building. Deeper: racks of the
    /// selected bay.
    pub fn visible_racks(&self) -> Vec<&RackRecord> {
        let path = self.path();
        match self.level() {
            ViewLevel::Campus => Vec::new(),
            ViewLevel::Building => path
                .building_id()
                .and_then(|b| self.site.building(b))
                .map(|b| {
                    b.bays
                        .iter()
                        .flat_map(|bay| self.index.racks_for_bay(&bay.bay_id))
                        .collect()
                })
                .unwrap_or_default(),
            _ => path
                .bay_id()
                .map(|bay| self.index.racks_for_bay(bay))
                .unwrap_or_default(),
        }
    }

    /// Clickable rack volumes, only while a bay is the current level.
    pub fn visible_hitboxes(&self) -> Vec<&RackHitbox> {
        match (self.level(), self.path().bay_id()) {
            (ViewLevel::Bay, Some(bay)) => self
                .index
                .hitboxes_for_bay(bay)
                .into_iter()
                .filter(|h| h.interactive)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn recompute(&mut self) {
        let level = self.navigator.level();
        match self
            .director
            .pose_for(level, self.navigator.path(), self.viewport.aspect_ratio())
        {
            Some(pose) => self.pose = Some(pose),
            None => warn!(%level, path = %self.navigator.path(), "No default pose, keeping current camera"),
        }
    }
}
