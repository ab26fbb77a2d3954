//! Camera placement from spatial data.
//!
//! Every function here is pure: the same inputs always produce the same
//! pose, bit for bit. Smoothing between poses belongs to the renderer.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::site::WorldRect;
use crate::types::{Aim, BoundingBox, CameraPose, EulerAngles, RackRecord};

/// Which side of a rack the camera approaches from, relative to the rack's
/// facing axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApproachSide {
    /// Along `facing_axis`.
    Facing,
    /// Against `facing_axis`.
    #[default]
    Opposite,
}

impl ApproachSide {
    pub fn sign(self) -> f64 {
        match self {
            ApproachSide::Facing => 1.0,
            ApproachSide::Opposite => -1.0,
        }
    }
}

/// Horizontal rectangle to fit in a top-down view. `width` runs along x,
/// `length` along z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRect {
    pub center: DVec3,
    pub width: f64,
    pub length: f64,
}

impl From<WorldRect> for FitRect {
    fn from(r: WorldRect) -> Self {
        FitRect {
            center: r.center(),
            width: r.width,
            length: r.length,
        }
    }
}

impl FitRect {
    /// Floor-plane footprint of a box, centered on the box.
    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        let size = bounds.size();
        FitRect {
            center: bounds.center(),
            width: size.x,
            length: size.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDownShot {
    /// Vertical field of view.
    pub fov_degrees: f64,
    /// Viewport width / height.
    pub aspect_ratio: f64,
    /// Multiplier on the fitted height; >1 leaves a margin.
    pub padding: f64,
    pub yaw_degrees: f64,
    /// Added to the fitted height.
    pub base_height: f64,
}

impl Default for TopDownShot {
    fn default() -> Self {
        Self {
            fov_degrees: 22.0,
            aspect_ratio: 16.0 / 9.0,
            padding: 1.15,
            yaw_degrees: 0.0,
            base_height: 0.0,
        }
    }
}

/// Front-on view of a rack or of one of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackShot {
    pub pullback: f64,
    pub height_offset: f64,
    pub fov_degrees: f64,
    pub side: ApproachSide,
}

impl Default for RackShot {
    fn default() -> Self {
        Self {
            pullback: 30.0,
            height_offset: 0.2,
            fov_degrees: 40.0,
            side: ApproachSide::Opposite,
        }
    }
}

/// Row views reuse the rack framing with tighter defaults.
pub type RowShot = RackShot;

/// Row-level defaults: closer and slightly wider than a whole rack.
pub fn default_row_shot() -> RowShot {
    RackShot {
        pullback: 18.0,
        fov_degrees: 45.0,
        ..RackShot::default()
    }
}

/// Three-quarter view of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotShot {
    pub pullback: f64,
    /// Sideways offset as a fraction of the pullback.
    pub lateral_fraction: f64,
    pub height_offset: f64,
    pub fov_degrees: f64,
    pub side: ApproachSide,
}

impl Default for SlotShot {
    fn default() -> Self {
        Self {
            pullback: 12.0,
            lateral_fraction: 0.35,
            height_offset: 3.0,
            fov_degrees: 50.0,
            side: ApproachSide::Opposite,
        }
    }
}

fn check_fov(what: &str, fov_degrees: f64) -> Result<()> {
    if !(fov_degrees.is_finite() && fov_degrees > 0.0 && fov_degrees < 180.0) {
        return Err(NavError::Config(format!(
            "{what} field of view must be in (0, 180) degrees, got {fov_degrees}"
        )));
    }
    Ok(())
}

fn check_finite(what: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(NavError::Config(format!("{what} has a non-finite parameter")));
    }
    Ok(())
}

fn check_pullback(what: &str, pullback: f64) -> Result<()> {
    if !(pullback.is_finite() && pullback > 0.0) {
        return Err(NavError::Config(format!(
            "{what} pullback must be positive, got {pullback}"
        )));
    }
    Ok(())
}

impl TopDownShot {
    /// A padding below 1 would crop the fitted rect.
    pub fn validate(&self) -> Result<()> {
        check_fov("top-down", self.fov_degrees)?;
        if !(self.padding.is_finite() && self.padding >= 1.0) {
            return Err(NavError::Config(format!(
                "top-down padding must be at least 1.0, got {}",
                self.padding
            )));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(NavError::Config(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        check_finite("top-down shot", &[self.yaw_degrees, self.base_height])
    }
}

impl RackShot {
    pub fn validate(&self, what: &str) -> Result<()> {
        check_fov(what, self.fov_degrees)?;
        check_pullback(what, self.pullback)?;
        check_finite(what, &[self.height_offset])
    }
}

impl SlotShot {
    pub fn validate(&self) -> Result<()> {
        check_fov("slot", self.fov_degrees)?;
        check_pullback("slot", self.pullback)?;
        check_finite("slot shot", &[self.lateral_fraction, self.height_offset])
    }
}

const TOP_DOWN_NEAR: f64 = 1.0;
const TOP_DOWN_MIN_FAR: f64 = 2000.0;

/// Height at which a camera with the given vertical fov and aspect sees the
/// whole rect, before padding.
///
/// Returns `(h_len, h_wid)`: the heights needed to fit the length vertically
/// and the width horizontally.
pub fn fit_heights(rect: &FitRect, fov_degrees: f64, aspect_ratio: f64) -> (f64, f64) {
    let t = (fov_degrees.to_radians() / 2.0).tan();
    let h_len = (rect.length / 2.0) / t;
    let h_wid = (rect.width / 2.0) / (t * aspect_ratio);
    (h_len, h_wid)
}

/// Straight-down pose that fits `rect` in the viewport.
pub fn fit_top_down(rect: &FitRect, shot: &TopDownShot) -> CameraPose {
    let (h_len, h_wid) = fit_heights(rect, shot.fov_degrees, shot.aspect_ratio);
    let height = h_len.max(h_wid) * shot.padding + shot.base_height;

    CameraPose {
        position: rect.center + DVec3::new(0.0, height, 0.0),
        aim: Aim::Orientation(EulerAngles::top_down(shot.yaw_degrees)),
        fov_degrees: shot.fov_degrees,
        near: Some(TOP_DOWN_NEAR),
        far: Some(TOP_DOWN_MIN_FAR.max(height * 6.0)),
    }
}

/// Pose in front of a box, looking at its center.
pub fn front_of(center: DVec3, facing_axis: DVec3, shot: &RackShot) -> CameraPose {
    let position = center
        + facing_axis * (shot.side.sign() * shot.pullback)
        + DVec3::new(0.0, shot.height_offset, 0.0);
    CameraPose {
        position,
        aim: Aim::LookAt(center),
        fov_degrees: shot.fov_degrees,
        near: None,
        far: None,
    }
}

/// Pose in front of a rack, looking at its center.
pub fn front_of_rack(rack: &RackRecord, shot: &RackShot) -> CameraPose {
    front_of(rack.center(), rack.facing_axis, shot)
}

/// Angled pose on a slot: pulled back along the facing axis, shifted
/// sideways along its horizontal perpendicular, and raised.
///
/// The pullback is never less than the slot's largest horizontal extent.
pub fn three_quarter_slot_view(
    slot_position: DVec3,
    slot_size: DVec3,
    facing_axis: DVec3,
    shot: &SlotShot,
) -> CameraPose {
    let f = facing_axis;
    let perp = DVec3::new(-f.z, 0.0, f.x);
    let pullback = shot.pullback.max(slot_size.x.max(slot_size.z));

    let position = slot_position
        + f * (shot.side.sign() * pullback)
        + perp * (pullback * shot.lateral_fraction)
        + DVec3::new(0.0, shot.height_offset, 0.0);

    CameraPose {
        position,
        aim: Aim::LookAt(slot_position),
        fov_degrees: shot.fov_degrees,
        near: None,
        far: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Facing;
    use approx::assert_relative_eq;

    fn bay_shot() -> TopDownShot {
        TopDownShot {
            fov_degrees: 22.0,
            aspect_ratio: 1.6,
            padding: 1.15,
            ..TopDownShot::default()
        }
    }

    #[test]
    fn fit_top_down_bay() {
        let rect = FitRect {
            center: DVec3::ZERO,
            width: 60.0,
            length: 94.0,
        };
        let pose = fit_top_down(&rect, &bay_shot());
        let (h_len, h_wid) = fit_heights(&rect, 22.0, 1.6);

        assert_relative_eq!(pose.position.y, h_len.max(h_wid) * 1.15);
        assert!(pose.position.y > h_len);
        assert!(pose.position.y > h_wid);
        assert_eq!(pose.position.x, 0.0);
        assert_eq!(pose.position.z, 0.0);

        let o = pose.orientation().unwrap();
        assert_eq!(o.pitch, -90.0);
        assert_eq!(o.roll, 0.0);
        assert_eq!(pose.near, Some(1.0));
        assert_eq!(pose.far, Some(2000.0));
    }

    #[test]
    fn fit_top_down_length_dominates_for_tall_rect() {
        let rect = FitRect {
            center: DVec3::new(30.0, 0.0, 47.0),
            width: 60.0,
            length: 94.0,
        };
        let (h_len, h_wid) = fit_heights(&rect, 22.0, 1.6);
        assert!(h_len > h_wid);
        // 47 / tan(11°)
        assert_relative_eq!(h_len, 241.79, epsilon = 0.01);
    }

    #[test]
    fn fit_top_down_far_scales_with_height() {
        let rect = FitRect {
            center: DVec3::ZERO,
            width: 2000.0,
            length: 2000.0,
        };
        let pose = fit_top_down(&rect, &bay_shot());
        assert_relative_eq!(pose.far.unwrap(), pose.position.y * 6.0);
    }

    #[test]
    fn fit_top_down_is_reproducible() {
        let rect = FitRect {
            center: DVec3::new(12.5, 0.0, -3.0),
            width: 120.0,
            length: 188.0,
        };
        assert_eq!(fit_top_down(&rect, &bay_shot()), fit_top_down(&rect, &bay_shot()));
    }

    fn rack() -> RackRecord {
        RackRecord {
            rack_ref: "18".into(),
            bay_id: "BAY_00_NW".into(),
            sections: vec!["A".into(), "B".into()],
            levels: 4,
            slot_count: 8,
            bounds: BoundingBox::from_center_size(DVec3::new(10.0, 4.0, 20.0), DVec3::new(12.0, 8.0, 2.0)),
            facing: Facing::Positive,
            facing_axis: DVec3::Z,
        }
    }

    #[test]
    fn front_of_rack_opposite_side() {
        let pose = front_of_rack(&rack(), &RackShot::default());
        assert_eq!(pose.position, DVec3::new(10.0, 4.2, -10.0));
        assert_eq!(pose.look_at(), Some(DVec3::new(10.0, 4.0, 20.0)));
        assert_eq!(pose.fov_degrees, 40.0);
    }

    #[test]
    fn front_of_rack_facing_side() {
        let shot = RackShot {
            side: ApproachSide::Facing,
            ..RackShot::default()
        };
        let pose = front_of_rack(&rack(), &shot);
        assert_eq!(pose.position, DVec3::new(10.0, 4.2, 50.0));
    }

    #[test]
    fn row_shot_defaults() {
        let row = default_row_shot();
        assert_eq!(row.pullback, 18.0);
        assert_eq!(row.fov_degrees, 45.0);
        assert_eq!(row.height_offset, 0.2);
        assert_eq!(row.side, ApproachSide::Opposite);
    }

    #[test]
    fn three_quarter_offsets() {
        let slot = DVec3::new(5.0, 2.0, 5.0);
        let pose = three_quarter_slot_view(slot, DVec3::new(2.0, 1.0, 1.0), DVec3::Z, &SlotShot::default());
        // perp of +z is (-1, 0, 0)
        assert_relative_eq!(pose.position.x, 5.0 - 12.0 * 0.35);
        assert_relative_eq!(pose.position.y, 5.0);
        assert_relative_eq!(pose.position.z, 5.0 - 12.0);
        assert_eq!(pose.look_at(), Some(slot));
    }

    #[test]
    fn three_quarter_never_starts_inside_slot() {
        let shot = SlotShot {
            pullback: 0.5,
            lateral_fraction: 0.0,
            height_offset: 0.0,
            ..SlotShot::default()
        };
        let pose = three_quarter_slot_view(DVec3::ZERO, DVec3::new(4.0, 1.0, 1.0), DVec3::X, &shot);
        assert_eq!(pose.position, DVec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn default_shots_validate() {
        assert!(TopDownShot::default().validate().is_ok());
        assert!(RackShot::default().validate("rack").is_ok());
        assert!(default_row_shot().validate("row").is_ok());
        assert!(SlotShot::default().validate().is_ok());
    }

    #[test]
    fn degenerate_shots_are_rejected() {
        for fov in [0.0, -5.0, 180.0, 270.0, f64::NAN] {
            let shot = TopDownShot {
                fov_degrees: fov,
                ..TopDownShot::default()
            };
            assert!(matches!(shot.validate(), Err(NavError::Config(_))), "fov {fov}");
        }
        for padding in [-2.0, 0.0, 0.5, f64::INFINITY] {
            let shot = TopDownShot {
                padding,
                ..TopDownShot::default()
            };
            assert!(shot.validate().is_err(), "padding {padding}");
        }
        let rack = RackShot {
            pullback: 0.0,
            ..RackShot::default()
        };
        assert!(rack.validate("rack").unwrap_err().to_string().contains("pullback"));
        let slot = SlotShot {
            lateral_fraction: f64::NAN,
            ..SlotShot::default()
        };
        assert!(slot.validate().is_err());
    }
}
