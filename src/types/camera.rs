use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// Euler angles in degrees, applied in XYZ order (pitch, yaw, roll).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl EulerAngles {
    /// Straight down with the given yaw.
    pub fn top_down(yaw: f64) -> Self {
        EulerAngles {
            pitch: -90.0,
            yaw,
            roll: 0.0,
        }
    }

    pub fn to_quat(self) -> DQuat {
        DQuat::from_euler(
            EulerRot::XYZ,
            self.pitch.to_radians(),
            self.yaw.to_radians(),
            self.roll.to_radians(),
        )
    }
}

/// How the camera is aimed. Exactly one of the two is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aim {
    Orientation(EulerAngles),
    LookAt(DVec3),
}

/// Target camera placement for the renderer to animate towards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub position: DVec3,
    pub aim: Aim,
    pub fov_degrees: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far: Option<f64>,
}

impl CameraPose {
    /// Assemble a pose from loosely-typed parts, e.g. as reported back by a
    /// renderer. Exactly one of `orientation` / `look_at` must be present.
    pub fn from_parts(
        position: DVec3,
        orientation: Option<EulerAngles>,
        look_at: Option<DVec3>,
        fov_degrees: f64,
    ) -> Result<Self> {
        let aim = match (orientation, look_at) {
            (Some(o), None) => Aim::Orientation(o),
            (None, Some(t)) => Aim::LookAt(t),
            (Some(_), Some(_)) => {
                return Err(NavError::InvalidPose(
                    "orientation and look-at target are mutually exclusive".into(),
                ));
            }
            (None, None) => {
                return Err(NavError::InvalidPose(
                    "either orientation or look-at target is required".into(),
                ));
            }
        };
        if !position.is_finite() || !fov_degrees.is_finite() || fov_degrees <= 0.0 || fov_degrees >= 180.0 {
            return Err(NavError::InvalidPose(format!(
                "non-finite position or field of view out of range ({fov_degrees})"
            )));
        }
        Ok(CameraPose {
            position,
            aim,
            fov_degrees,
            near: None,
            far: None,
        })
    }

    pub fn orientation(&self) -> Option<EulerAngles> {
        match self.aim {
            Aim::Orientation(o) => Some(o),
            Aim::LookAt(_) => None,
        }
    }

    pub fn look_at(&self) -> Option<DVec3> {
        match self.aim {
            Aim::LookAt(t) => Some(t),
            Aim::Orientation(_) => None,
        }
    }

    /// World-space rotation of the camera (Y-up, looking down -Z).
    pub fn rotation(&self) -> DQuat {
        match self.aim {
            Aim::Orientation(o) => o.to_quat(),
            Aim::LookAt(target) => {
                let view = DMat4::look_at_rh(self.position, target, DVec3::Y);
                DQuat::from_mat4(&view.inverse())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_parts_rejects_both_and_neither() {
        let pos = DVec3::new(0.0, 10.0, 0.0);
        let both = CameraPose::from_parts(pos, Some(EulerAngles::top_down(0.0)), Some(DVec3::ZERO), 40.0);
        assert!(matches!(both, Err(NavError::InvalidPose(_))));

        let neither = CameraPose::from_parts(pos, None, None, 40.0);
        assert!(matches!(neither, Err(NavError::InvalidPose(_))));
    }

    #[test]
    fn from_parts_rejects_bad_fov() {
        let pos = DVec3::ZERO;
        assert!(CameraPose::from_parts(pos, None, Some(DVec3::X), 0.0).is_err());
        assert!(CameraPose::from_parts(pos, None, Some(DVec3::X), f64::NAN).is_err());
    }

    #[test]
    fn from_parts_accepts_look_at() {
        let pose = CameraPose::from_parts(DVec3::new(0.0, 5.0, 10.0), None, Some(DVec3::ZERO), 40.0).unwrap();
        assert_eq!(pose.look_at(), Some(DVec3::ZERO));
        assert_eq!(pose.orientation(), None);
    }

    #[test]
    fn top_down_rotation_points_down() {
        let pose = CameraPose::from_parts(
            DVec3::new(0.0, 100.0, 0.0),
            Some(EulerAngles::top_down(0.0)),
            None,
            22.0,
        )
        .unwrap();
        let forward = pose.rotation() * DVec3::NEG_Z;
        assert_relative_eq!(forward.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn look_at_rotation_faces_target() {
        let pose = CameraPose::from_parts(DVec3::new(0.0, 0.0, 10.0), None, Some(DVec3::ZERO), 40.0).unwrap();
        let forward = pose.rotation() * DVec3::NEG_Z;
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn pose_serializes_single_aim() {
        let pose = CameraPose::from_parts(DVec3::ZERO, None, Some(DVec3::X), 40.0).unwrap();
        let v = serde_json::to_value(pose).unwrap();
        assert!(v["aim"].get("lookAt").is_some());
        assert!(v["aim"].get("orientation").is_none());
        assert!(v.get("near").is_none());
    }
}
