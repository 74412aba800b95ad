//! Translate gizmo
//!
//! `Idle -> Dragging(handle) -> Idle`. A drag intersects the live pointer
//! ray with a plane fixed at drag start and moves the entity by the
//! (constrained, optionally snapped) offset from the first intersection.

use glam::{Vec2, Vec3};
use tracing::debug;

use se_core::{EditorScene, EntityId, RenderSync, Transform, UndoHistory};

use crate::basis::{GizmoBasis, TransformSpace};
use crate::camera::ViewContext;
use crate::collision::{ray_cylinder, ray_quad, ray_sphere};
use crate::config::{ArrowHead, GizmoConfig, PlaneHandle};
use crate::constants::geometry::{CONE_SEGMENTS, DISC_SEGMENTS, SHAFT_SIDES};
use crate::constants::interaction::AXIS_HIT_RADIUS;
use crate::drag::{commit_if_changed, snap_step, write_transform};
use crate::error::{GizmoError, GizmoResult};
use crate::geometry::{Frame, cone, cube, disc, prism, rhombus, square, tetrahedron};
use crate::handle::{Axis, HandleState, PlaneAxes, TranslateHandle};
use crate::math::{Plane, ray_plane_intersection};
use crate::opacity::{axis_opacity, is_visible, plane_opacity};
use crate::render::{DepthSortedBatch, DrawList, with_alpha};
use crate::visual::{HandleStyle, center_handle_mesh, push_label};

/// Undo label of translate drags
pub const COMMIT_LABEL: &str = "Translate";

#[derive(Debug, Clone)]
struct TranslateDrag {
    handle: TranslateHandle,
    plane: Plane,
    start_hit: Vec3,
    start_world: Vec3,
    start_transform: Transform,
    axes: [Vec3; 3],
    space: TransformSpace,
}

/// Drag plane for a handle.
///
/// A single axis lies in two basis planes; the one facing the camera more
/// squarely gives the better-conditioned intersection. Plane handles use
/// their own plane, the center handle a screen-parallel one.
pub fn drag_plane(handle: TranslateHandle, basis: &GizmoBasis) -> Plane {
    let view = basis.view_direction();
    let normal = match handle {
        TranslateHandle::Axis(axis) => {
            let [a, b] = axis.others();
            let (na, nb) = (basis.axes[a.index()], basis.axes[b.index()]);
            if na.dot(view).abs() >= nb.dot(view).abs() { na } else { nb }
        }
        TranslateHandle::Plane(plane) => basis.axes[plane.normal().index()],
        TranslateHandle::Center if view != Vec3::ZERO => view,
        TranslateHandle::Center => basis.axes[2],
    };
    Plane::new(basis.origin, normal)
}

/// Restrict a raw world offset to the handle's degrees of freedom
pub fn constrain(handle: TranslateHandle, axes: &[Vec3; 3], raw: Vec3, step: Option<f32>) -> Vec3 {
    let along = |axis: Axis| {
        let dir = axes[axis.index()];
        dir * snap_step(raw.dot(dir), step)
    };
    match handle {
        TranslateHandle::Axis(axis) => along(axis),
        TranslateHandle::Plane(plane) => {
            let [a, b] = plane.axes();
            along(a) + along(b)
        }
        TranslateHandle::Center if step.is_some() => Axis::ALL.into_iter().map(along).sum(),
        TranslateHandle::Center => raw,
    }
}

fn plane_center(basis: &GizmoBasis, plane: PlaneAxes, config: &GizmoConfig) -> Vec3 {
    let [a, b] = plane.axes();
    basis.origin + (basis.axes[a.index()] + basis.axes[b.index()]) * config.plane_offset * basis.scale
}

/// Translate gizmo for one entity
#[derive(Debug, Clone)]
pub struct TranslateGizmo {
    entity: EntityId,
    hovered: Option<TranslateHandle>,
    drag: Option<TranslateDrag>,
    mirror: Option<GizmoBasis>,
}

impl TranslateGizmo {
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
    pub fn active(&self) -> Option<TranslateHandle> {
        self.drag.as_ref().map(|d| d.handle)
    }

    /// Hovered handle
    pub fn hovered(&self) -> Option<TranslateHandle> {
        self.hovered
    }

    /// Set the hovered handle
    pub fn set_hovered(&mut self, handle: Option<TranslateHandle>) {
        self.hovered = handle;
    }

    /// Nearest visible handle under the cursor
    pub fn pick(
        &self,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> Option<TranslateHandle> {
        let ray = ctx.ray(cursor);
        let s = basis.scale;
        // The center handle sits inside every shaft and wins outright
        if config.show_center_handle
            && ray_sphere(&ray, basis.origin, config.center_size * 1.5 * s).is_some()
        {
            return Some(TranslateHandle::Center);
        }

        let mut best: Option<(f32, TranslateHandle)> = None;
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
            let head = basis.along(axis.index(), config.arrow_length - config.head_length * 0.5);
            let handle = TranslateHandle::Axis(axis);
            consider(ray_cylinder(&ray, basis.origin, tip, AXIS_HIT_RADIUS * s), handle);
            consider(ray_sphere(&ray, head, config.head_radius * 1.5 * s), handle);
        }

        if config.show_plane_handles {
            for plane in PlaneAxes::ALL {
                let normal = basis.axes[plane.normal().index()];
                if !is_visible(plane_opacity(normal, basis.camera_position, basis.origin)) {
                    continue;
                }
                let [a, b] = plane.axes();
                let t = ray_quad(
                    &ray,
                    plane_center(basis, plane, config),
                    basis.axes[a.index()],
                    basis.axes[b.index()],
                    config.plane_size * 0.5 * s,
                );
                consider(t, TranslateHandle::Plane(plane));
            }
        }

        best.map(|(_, handle)| handle)
    }

    /// Start dragging `handle` from the pointer position `cursor`
    pub fn begin_drag(
        &mut self,
        scene: &dyn EditorScene,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        handle: TranslateHandle,
        cursor: Vec2,
    ) -> GizmoResult<()> {
        if self.drag.is_some() {
            return Err(GizmoError::DragAlreadyActive);
        }
        let id = self.entity;
        let start_transform = scene.transform(id).ok_or(GizmoError::EntityNotFound(id))?;
        let start_world = scene.world_position(id).ok_or(GizmoError::EntityNotFound(id))?;

        let plane = drag_plane(handle, basis);
        let start_hit =
            ray_plane_intersection(&ctx.ray(cursor), &plane).ok_or(GizmoError::RayMissed)?;

        debug!(?handle, %id, "Translate drag started");
        self.drag = Some(TranslateDrag {
            handle,
            plane,
            start_hit,
            start_world,
            start_transform,
            axes: basis.axes,
            space: basis.space,
        });
        self.mirror = Some(*basis);
        Ok(())
    }

    /// Move the entity to follow the pointer. Returns the applied world
    /// offset from the drag start.
    ///
    /// A ray that misses the drag plane leaves the transform untouched.
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

        let hit = ray_plane_intersection(&ctx.ray(cursor), &drag.plane)
            .ok_or(GizmoError::RayMissed)?;
        let delta = constrain(
            drag.handle,
            &drag.axes,
            hit - drag.start_hit,
            config.translate_step(),
        );
        if !delta.is_finite() {
            return Err(GizmoError::RayMissed);
        }

        let mut transform = drag.start_transform;
        if delta != Vec3::ZERO {
            let parent = scene.parent_world_matrix(id);
            if parent.determinant().abs() <= f32::EPSILON {
                return Err(GizmoError::DegenerateHandle);
            }
            transform.position = parent.inverse().transform_point3(drag.start_world + delta);
        }
        let space = drag.space;

        write_transform(scene, render, id, transform)?;
        self.mirror = GizmoBasis::from_scene(scene, id, ctx.camera_position, space);
        Ok(delta)
    }

    /// Finish the drag, committing to history if the transform changed.
    /// Returns whether a commit happened.
    pub fn end_drag(
        &mut self,
        scene: &dyn EditorScene,
        history: &mut dyn UndoHistory,
    ) -> GizmoResult<bool> {
        let drag = self.drag.take().ok_or(GizmoError::NoActiveDrag)?;
        self.mirror = None;
        debug!(handle = ?drag.handle, "Translate drag ended");
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
            debug!(id = %self.entity, "Translate drag aborted");
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
            let handle = TranslateHandle::Axis(axis);
            let style = HandleStyle::new(
                config,
                config.axis_color(i),
                HandleState::of(handle, self.hovered, active),
                opacity,
            );

            let shaft_length = (config.arrow_length - config.head_length).max(0.0);
            let shaft = prism(config.shaft_radius * style.thickness, shaft_length, SHAFT_SIDES);
            batch.add_mesh(
                &shaft.transformed(&Frame::along(basis.origin, dir, s)),
                ctx,
                style.color,
                true,
            );

            let radius = config.head_radius * style.thickness;
            let head_base = basis.along(i, shaft_length);
            let (head, base) = match config.arrow_head {
                ArrowHead::Cone => (cone(radius, config.head_length, CONE_SEGMENTS), head_base),
                ArrowHead::Tetrahedron => (tetrahedron(radius, config.head_length), head_base),
                ArrowHead::Rhombus => (rhombus(radius, config.head_length), head_base),
                ArrowHead::Cube => (
                    cube(radius),
                    basis.along(i, config.arrow_length - config.head_radius),
                ),
            };
            batch.add_mesh(
                &head.transformed(&Frame::along(base, dir, s)),
                ctx,
                style.color,
                true,
            );
        }

        if config.show_plane_handles {
            for plane in PlaneAxes::ALL {
                let n = plane.normal().index();
                let opacity = plane_opacity(basis.axes[n], basis.camera_position, basis.origin);
                if !is_visible(opacity) {
                    continue;
                }
                let handle = TranslateHandle::Plane(plane);
                let style = HandleStyle::new(
                    config,
                    config.axis_color(n),
                    HandleState::of(handle, self.hovered, active),
                    opacity * 0.6,
                );
                let half = config.plane_size * 0.5;
                let mesh = match config.plane_handle {
                    PlaneHandle::Square => square(half),
                    PlaneHandle::Circle => disc(half, DISC_SEGMENTS),
                };
                let [a, b] = plane.axes();
                let frame = Frame::in_plane(
                    plane_center(basis, plane, config),
                    basis.axes[a.index()],
                    basis.axes[b.index()],
                    s,
                );
                batch.add_mesh(&mesh.transformed(&frame), ctx, style.color, false);
            }
        }

        if config.show_center_handle {
            let style = HandleStyle::new(
                config,
                config.center_color,
                HandleState::of(TranslateHandle::Center, self.hovered, active),
                1.0,
            );
            let (mesh, flat) = center_handle_mesh(
                config.center_handle,
                config.center_size,
                basis.origin,
                basis.to_camera(),
                s,
            );
            batch.add_mesh(&mesh, ctx, style.color, !flat);
        }

        batch.finish(out);

        if config.show_axis_labels {
            for axis in Axis::ALL {
                let opacity =
                    axis_opacity(basis.axes[axis.index()], basis.camera_position, basis.origin);
                if is_visible(opacity) {
                    let at = basis.along(axis.index(), config.arrow_length + 0.12);
                    let color = with_alpha(config.axis_color(axis.index()), opacity);
                    push_label(out, ctx, at, axis.label(), color);
                }
            }
        }
    }
}
