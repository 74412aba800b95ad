//! Scale gizmo
//!
//! Scale has no world position to intersect, so drags work in screen space:
//! an axis handle measures the pointer offset along the projected axis in
//! units of the handle's on-screen length, and the center handle uses the
//! `dx - dy` diagonal. The result is floored at [`MIN_SCALE`].

use glam::{Vec2, Vec3};
use tracing::debug;

use se_core::{EditorScene, EntityId, RenderSync, Transform, UndoHistory};

use crate::basis::{GizmoBasis, TransformSpace};
use crate::camera::ViewContext;
use crate::collision::{ray_cylinder, ray_sphere};
use crate::config::GizmoConfig;
use crate::constants::geometry::SHAFT_SIDES;
use crate::constants::interaction::{
    AXIS_HIT_RADIUS, MIN_HANDLE_PIXELS, MIN_SCALE, SCALE_REFERENCE_PIXELS,
};
use crate::drag::{commit_if_changed, snap_step, write_transform};
use crate::error::{GizmoError, GizmoResult};
use crate::geometry::{Frame, cube, prism};
use crate::handle::{Axis, HandleState, ScaleHandle};
use crate::opacity::{axis_opacity, is_visible};
use crate::render::{DepthSortedBatch, DrawList};
use crate::visual::{HandleStyle, center_handle_mesh};

/// Undo label of scale drags
pub const COMMIT_LABEL: &str = "Scale";

#[derive(Debug, Clone)]
struct ScaleDrag {
    handle: ScaleHandle,
    start_cursor: Vec2,
    /// Unit screen direction of the dragged axis
    screen_axis: Vec2,
    /// Pixels that make one unit of scale
    pixel_length: f32,
    start_transform: Transform,
    space: TransformSpace,
}

/// New scale for a raw (unsnapped) drag amount.
///
/// Axis handles add to their component; the uniform handle multiplies all
/// three by `1 + amount`. Every component is floored at [`MIN_SCALE`].
pub fn scaled(start: Vec3, handle: ScaleHandle, amount: f32, step: Option<f32>) -> Vec3 {
    let amount = snap_step(amount, step);
    let scale = match handle {
        ScaleHandle::Axis(axis) => {
            let mut scale = start;
            scale[axis.index()] += amount;
            scale
        }
        ScaleHandle::Uniform => start * (1.0 + amount),
    };
    scale.max(Vec3::splat(MIN_SCALE))
}

/// Scale gizmo for one entity
#[derive(Debug, Clone)]
pub struct ScaleGizmo {
    entity: EntityId,
    hovered: Option<ScaleHandle>,
    drag: Option<ScaleDrag>,
    mirror: Option<GizmoBasis>,
}

impl ScaleGizmo {
    /// Create an idle gizmo
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            hovered: None,
            drag: None,
            mirror: None,
        }
    }

    /// Manipulated entity
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Whether a drag is active
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handle being dragged
    pub fn active(&self) -> Option<ScaleHandle> {
        self.drag.as_ref().map(|d| d.handle)
    }

    /// Hovered handle
    pub fn hovered(&self) -> Option<ScaleHandle> {
        self.hovered
    }

    /// Set the hovered handle
    pub fn set_hovered(&mut self, handle: Option<ScaleHandle>) {
        self.hovered = handle;
    }

    /// Nearest visible handle under the cursor
    pub fn pick(
        &self,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> Option<ScaleHandle> {
        let ray = ctx.ray(cursor);
        let s = basis.scale;
        if config.show_center_handle
            && ray_sphere(&ray, basis.origin, config.center_size * 1.5 * s).is_some()
        {
            return Some(ScaleHandle::Uniform);
        }

        let mut best: Option<(f32, ScaleHandle)> = None;
        let mut consider = |t: Option<f32>, handle| {
            if let Some(t) = t
                && best.is_none_or(|(b, _)| t < b)
            {
                best = Some((t, handle));
            }
        };

        for axis in Axis::ALL {
            let dir = basis.axes[axis.index()];
            if !is_visible(axis_opacity(dir, basis.camera_position, basis.origin)) {
                continue;
            }
            let tip = basis.along(axis.index(), config.arrow_length);
            let handle = ScaleHandle::Axis(axis);
            consider(ray_cylinder(&ray, basis.origin, tip, AXIS_HIT_RADIUS * s), handle);
            consider(ray_sphere(&ray, tip, config.scale_handle_size * 1.8 * s), handle);
        }

        best.map(|(_, handle)| handle)
    }

    /// Start dragging `handle` from the pointer position `cursor`.
    ///
    /// Fails with [`GizmoError::DegenerateHandle`] when an axis projects to
    /// fewer than a few pixels.
    pub fn begin_drag(
        &mut self,
        scene: &dyn EditorScene,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        handle: ScaleHandle,
        cursor: Vec2,
    ) -> GizmoResult<()> {
        if self.drag.is_some() {
            return Err(GizmoError::DragAlreadyActive);
        }
        let id = self.entity;
        let start_transform = scene.transform(id).ok_or(GizmoError::EntityNotFound(id))?;

        let (screen_axis, pixel_length) = match handle {
            ScaleHandle::Axis(axis) => {
                let origin = ctx.project(basis.origin);
                let tip = ctx.project(basis.along(axis.index(), config.arrow_length));
                if !origin.is_in_front() || !tip.is_in_front() {
                    return Err(GizmoError::DegenerateHandle);
                }
                let offset = tip.pos() - origin.pos();
                let length = offset.length();
                if !length.is_finite() || length < MIN_HANDLE_PIXELS {
                    return Err(GizmoError::DegenerateHandle);
                }
                (offset / length, length)
            }
            ScaleHandle::Uniform => (Vec2::new(1.0, -1.0), SCALE_REFERENCE_PIXELS),
        };

        debug!(?handle, %id, pixel_length, "Scale drag started");
        self.drag = Some(ScaleDrag {
            handle,
            start_cursor: cursor,
            screen_axis,
            pixel_length,
            start_transform,
            space: basis.space,
        });
        self.mirror = Some(*basis);
        Ok(())
    }

    /// Rescale the entity to follow the pointer. Returns the new scale.
    pub fn drag_to(
        &mut self,
        scene: &mut dyn EditorScene,
        render: &mut dyn RenderSync,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> GizmoResult<Vec3> {
        let id = self.entity;
        let drag = self.drag.as_ref().ok_or(GizmoError::NoActiveDrag)?;

        let d = cursor - drag.start_cursor;
        let amount = match drag.handle {
            ScaleHandle::Axis(_) => d.dot(drag.screen_axis) / drag.pixel_length,
            // Right and up grow, left and down shrink
            ScaleHandle::Uniform => (d.x - d.y) / drag.pixel_length,
        };
        let mut transform = drag.start_transform;
        if amount != 0.0 {
            transform.scale = scaled(
                drag.start_transform.scale,
                drag.handle,
                amount,
                config.scale_step(),
            );
        }
        let space = drag.space;

        write_transform(scene, render, id, transform)?;
        self.mirror = GizmoBasis::from_scene(scene, id, ctx.camera_position, space);
        Ok(transform.scale)
    }

    /// Finish the drag, committing to history if the transform changed
    pub fn end_drag(
        &mut self,
        scene: &dyn EditorScene,
        history: &mut dyn UndoHistory,
    ) -> GizmoResult<bool> {
        let drag = self.drag.take().ok_or(GizmoError::NoActiveDrag)?;
        self.mirror = None;
        debug!(handle = ?drag.handle, "Scale drag ended");
        Ok(commit_if_changed(
            scene,
            history,
            self.entity,
            &drag.start_transform,
            COMMIT_LABEL,
        ))
    }

    /// Drop the drag without committing
    pub fn abort(&mut self) {
        if self.drag.take().is_some() {
            debug!(id = %self.entity, "Scale drag aborted");
        }
        self.mirror = None;
    }

    /// Append the gizmo's draw commands
    pub fn draw(
        &self,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        out: &mut DrawList,
    ) {
        let basis = self.mirror.as_ref().unwrap_or(basis);
        let active = self.active();
        let s = basis.scale;
        let mut batch = DepthSortedBatch::new();

        for axis in Axis::ALL {
            let i = axis.index();
            let dir = basis.axes[i];
            let opacity = axis_opacity(dir, basis.camera_position, basis.origin);
            if !is_visible(opacity) {
                continue;
            }
            let style = HandleStyle::new(
                config,
                config.axis_color(i),
                HandleState::of(ScaleHandle::Axis(axis), self.hovered, active),
                opacity,
            );
            let shaft = prism(
                config.shaft_radius * style.thickness,
                config.arrow_length,
                SHAFT_SIDES,
            );
            batch.add_mesh(
                &shaft.transformed(&Frame::along(basis.origin, dir, s)),
                ctx,
                style.color,
                true,
            );
            let tip = cube(config.scale_handle_size * style.thickness);
            let frame = Frame::new(
                basis.along(i, config.arrow_length),
                basis.axes[0],
                basis.axes[1],
                basis.axes[2],
                s,
            );
            batch.add_mesh(&tip.transformed(&frame), ctx, style.color, true);
        }

        if config.show_center_handle {
            let style = HandleStyle::new(
                config,
                config.center_color,
                HandleState::of(ScaleHandle::Uniform, self.hovered, active),
                1.0,
            );
            let (mesh, flat) = center_handle_mesh(
                config.center_handle,
                config.center_size * style.thickness,
                basis.origin,
                basis.to_camera(),
                s,
            );
            batch.add_mesh(&mesh, ctx, style.color, !flat);
        }

        batch.finish(out);
    }
}
