//! Axis and plane visibility
//!
//! An axis seen end-on, or a plane seen edge-on, collapses to a point or a
//! line on screen and cannot be dragged reliably. Those handles fade out and
//! stop being pickable once they drop below [`VISIBILITY_CUTOFF`].

use glam::Vec3;

use crate::constants::opacity::{
    AXIS_FADE_END, AXIS_FADE_START, PLANE_FADE_END, PLANE_FADE_START, VISIBILITY_CUTOFF,
};

fn alignment(direction: Vec3, camera_position: Vec3, origin: Vec3) -> Option<f32> {
    let view = (camera_position - origin).normalize_or_zero();
    let direction = direction.normalize_or_zero();
    if view == Vec3::ZERO || direction == Vec3::ZERO {
        return None;
    }
    Some(direction.dot(view).abs().min(1.0))
}

/// Opacity of an axis handle.
///
/// Full below an alignment of 0.90 with the view direction, linear fade to
/// zero at 0.99, zero beyond.
pub fn axis_opacity(axis: Vec3, camera_position: Vec3, origin: Vec3) -> f32 {
    let Some(a) = alignment(axis, camera_position, origin) else {
        return 1.0;
    };
    if a <= AXIS_FADE_START {
        1.0
    } else if a >= AXIS_FADE_END {
        0.0
    } else {
        1.0 - (a - AXIS_FADE_START) / (AXIS_FADE_END - AXIS_FADE_START)
    }
}

/// Opacity of a plane handle (or rotation ring) with the given normal.
///
/// Zero at or below an alignment of 0.1, linear fade up to 0.2, full beyond.
pub fn plane_opacity(normal: Vec3, camera_position: Vec3, origin: Vec3) -> f32 {
    let Some(a) = alignment(normal, camera_position, origin) else {
        return 1.0;
    };
    if a <= PLANE_FADE_END {
        0.0
    } else if a >= PLANE_FADE_START {
        1.0
    } else {
        (a - PLANE_FADE_END) / (PLANE_FADE_START - PLANE_FADE_END)
    }
}

/// Whether a handle with this opacity is drawn and pickable
pub fn is_visible(opacity: f32) -> bool {
    opacity >= VISIBILITY_CUTOFF
}
