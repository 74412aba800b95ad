//! Drag plumbing shared by the three gizmos

use std::f32::consts::PI;

use tracing::{debug, info};

use se_core::{EditorScene, EntityId, RenderSync, Transform, UndoHistory};

use crate::constants::interaction::CHANGE_EPSILON;
use crate::error::{GizmoError, GizmoResult};
use crate::math::snap;

/// Global pointer capture held for the duration of a drag.
///
/// While held, the frontend routes every pointer move and release to the
/// host regardless of what lies under the cursor. Every path that ends a
/// drag must release it, or moves keep being delivered after the button is
/// up.
#[derive(Debug, Default)]
pub struct PointerCapture {
    held: bool,
}

impl PointerCapture {
    /// Take the capture. Returns false if it was already held.
    pub fn acquire(&mut self) -> bool {
        !std::mem::replace(&mut self.held, true)
    }

    /// Drop the capture. Returns whether it was held.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }

    /// Whether a drag currently owns the pointer
    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// One drag step: write the local transform, recompute world matrices, then
/// re-render synchronously. The caller updates its visual mirror afterwards,
/// so the mesh and its gizmo never disagree within a frame.
pub fn write_transform(
    scene: &mut dyn EditorScene,
    render: &mut dyn RenderSync,
    id: EntityId,
    transform: Transform,
) -> GizmoResult<()> {
    if !scene.set_transform(id, transform) {
        return Err(GizmoError::EntityNotFound(id));
    }
    scene.recompute_world_matrices();
    render.force_immediate_render_tick();
    Ok(())
}

/// Commit a finished drag to history if it changed the transform.
///
/// Returns whether a commit happened.
pub fn commit_if_changed(
    scene: &dyn EditorScene,
    history: &mut dyn UndoHistory,
    id: EntityId,
    start: &Transform,
    label: &str,
) -> bool {
    match scene.transform(id) {
        Some(current) if current.differs_from(start, CHANGE_EPSILON) => {
            history.commit(label);
            info!(%id, label, "Committed gizmo edit");
            true
        }
        Some(_) => {
            debug!(%id, label, "Drag ended without change");
            false
        }
        None => false,
    }
}

/// Snap an optional increment
pub fn snap_step(value: f32, step: Option<f32>) -> f32 {
    match step {
        Some(step) => snap(value, step),
        None => value,
    }
}

/// Snap an angle (radians) to a step in degrees.
///
/// The result is wrapped into `(-PI, PI]` in degrees before conversion, so
/// a half turn always comes out as exactly `PI`.
pub fn snap_angle(angle: f32, step_degrees: Option<f32>) -> f32 {
    let Some(step) = step_degrees.filter(|s| *s > 0.0 && s.is_finite()) else {
        return angle;
    };
    let mut degrees = snap(angle.to_degrees(), step);
    while degrees > 180.0 {
        degrees -= 360.0;
    }
    while degrees <= -180.0 {
        degrees += 360.0;
    }
    degrees / 180.0 * PI
}
