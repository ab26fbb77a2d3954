use glam::DVec3;

use crate::types::{Anchor, AxisConvention};

/// Convert from storage axes (x width, y depth, z height) to render axes
/// (x width, y up, z depth).
///
/// Transform: `(x, y, z)` → `(x, z, y)`
pub fn storage_to_render(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.z, v.y)
}

/// Bring a vector into render axes from the given convention.
pub fn to_render_axes(v: DVec3, axes: AxisConvention) -> DVec3 {
    match axes {
        AxisConvention::Storage => storage_to_render(v),
        AxisConvention::Render => v,
    }
}

/// Corner-anchored position → center: `corner + size/2`.
pub fn corner_to_center(corner: DVec3, size: DVec3) -> DVec3 {
    corner + size * 0.5
}

/// Center-anchored position for a source anchor.
pub fn anchored_center(position: DVec3, size: DVec3, anchor: Anchor) -> DVec3 {
    match anchor {
        Anchor::Corner => corner_to_center(position, size),
        Anchor::Center => position,
    }
}

/// Name of the first axis with a non-positive or non-finite extent.
pub fn degenerate_axis(size: DVec3) -> Option<&'static str> {
    ["x", "y", "z"]
        .into_iter()
        .zip(size.to_array())
        .find(|(_, v)| !v.is_finite() || *v <= 0.0)
        .map(|(axis, _)| axis)
}
