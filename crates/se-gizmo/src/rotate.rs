//! Rotate gizmo
//!
//! Three axis rings plus a camera-facing view ring. The pointer angle is
//! measured on the ring plane in a frame oriented toward the camera, so a
//! counter-clockwise drag on screen is always a positive angle; the sign is
//! flipped back when the ring is seen from behind.
//!
//! In gimbal space the delta is added to the matching Euler angle. In world
//! and local space (and for the view ring) a delta quaternion about the ring
//! axis is applied to the world orientation at drag start and converted back
//! into the parent frame.

use std::f32::consts::PI;

use glam::{Quat, Vec2, Vec3};
use tracing::debug;

use se_core::{EditorScene, EntityId, RenderSync, Transform, UndoHistory};

use crate::basis::{GizmoBasis, TransformSpace};
use crate::camera::ViewContext;
use crate::collision::{point_loop_distance, ray_ring};
use crate::config::GizmoConfig;
use crate::constants::interaction::{RING_HIT_THICKNESS, VIEW_RING_PICK_PIXELS};
use crate::drag::{commit_if_changed, snap_angle, write_transform};
use crate::error::{GizmoError, GizmoResult};
use crate::geometry::{Frame, TorusCache};
use crate::handle::{Axis, HandleState, RotateHandle};
use crate::math::{Plane, ray_plane_intersection, wrap_angle};
use crate::opacity::{is_visible, plane_opacity};
use crate::render::{DepthSortedBatch, DrawCommand, DrawList, Stroke, shade};
use crate::visual::{HandleStyle, push_label};

/// Undo label of rotate drags
pub const COMMIT_LABEL: &str = "Rotate";

#[derive(Debug, Clone)]
struct RotateDrag {
    handle: RotateHandle,
    center: Vec3,
    /// Ring axis the rotation is applied about
    axis: Vec3,
    /// In-plane frame, `u x v` points toward the camera
    u: Vec3,
    v: Vec3,
    behind: bool,
    start_angle: f32,
    start_transform: Transform,
    parent_rotation: Quat,
    space: TransformSpace,
    /// Snapped sweep as seen on screen, for the sector and readout only
    sweep: f32,
}

impl RotateDrag {
    fn plane(&self) -> Plane {
        Plane::new(self.center, self.axis)
    }

    fn angle_of(&self, hit: Vec3) -> f32 {
        let d = hit - self.center;
        d.dot(self.v).atan2(d.dot(self.u))
    }

    fn point_at(&self, angle: f32, radius: f32) -> Vec3 {
        self.center + (self.u * angle.cos() + self.v * angle.sin()) * radius
    }
}

fn ring_normal(handle: RotateHandle, basis: &GizmoBasis) -> Vec3 {
    match handle {
        RotateHandle::Axis(axis) => basis.axes[axis.index()],
        RotateHandle::View => {
            let n = basis.to_camera();
            if n == Vec3::ZERO { Vec3::Z } else { n }
        }
    }
}

/// Rotate `start` by `angle` about the world-space `axis`.
///
/// Gimbal rings edit their Euler angle directly; everything else goes
/// through a delta quaternion applied to the world orientation.
pub fn apply_rotation(
    start: &Transform,
    parent_rotation: Quat,
    handle: RotateHandle,
    space: TransformSpace,
    axis: Vec3,
    angle: f32,
) -> Transform {
    let mut transform = *start;
    if angle == 0.0 {
        return transform;
    }
    match (space, handle) {
        (TransformSpace::Gimbal, RotateHandle::Axis(ring)) => {
            transform.rotation[ring.index()] += angle;
        }
        _ => {
            let delta = Quat::from_axis_angle(axis, angle);
            let world = parent_rotation * start.quat();
            transform.set_quat(parent_rotation.inverse() * delta * world);
        }
    }
    transform
}

/// Rotate gizmo for one entity
#[derive(Debug, Clone)]
pub struct RotateGizmo {
    entity: EntityId,
    hovered: Option<RotateHandle>,
    drag: Option<RotateDrag>,
    mirror: Option<GizmoBasis>,
}

impl RotateGizmo {
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
    pub fn active(&self) -> Option<RotateHandle> {
        self.drag.as_ref().map(|d| d.handle)
    }

    /// Hovered handle
    pub fn hovered(&self) -> Option<RotateHandle> {
        self.hovered
    }

    /// Set the hovered handle
    pub fn set_hovered(&mut self, handle: Option<RotateHandle>) {
        self.hovered = handle;
    }

    /// Current sweep in radians as seen on screen (zero when idle)
    pub fn sweep(&self) -> f32 {
        self.drag.as_ref().map_or(0.0, |d| d.sweep)
    }

    /// Nearest ring under the cursor. Axis rings are ray cast; the view ring
    /// is picked in screen space.
    pub fn pick(
        &self,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> Option<RotateHandle> {
        let ray = ctx.ray(cursor);
        let radius = config.ring_radius * basis.scale;
        let thickness = RING_HIT_THICKNESS * basis.scale;

        let mut best: Option<(f32, RotateHandle)> = None;
        for axis in Axis::ALL {
            let normal = basis.axes[axis.index()];
            if !is_visible(plane_opacity(normal, basis.camera_position, basis.origin)) {
                continue;
            }
            if let Some(t) = ray_ring(&ray, basis.origin, normal, radius, thickness)
                && best.is_none_or(|(b, _)| t < b)
            {
                best = Some((t, RotateHandle::Axis(axis)));
            }
        }
        if let Some((_, handle)) = best {
            return Some(handle);
        }

        if config.show_view_ring {
            let outline = self.view_ring_outline(basis, ctx, config);
            if !outline.is_empty() && point_loop_distance(cursor, &outline) <= VIEW_RING_PICK_PIXELS
            {
                return Some(RotateHandle::View);
            }
        }
        None
    }

    fn view_ring_outline(
        &self,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
    ) -> Vec<Vec2> {
        let frame = Frame::along(basis.origin, ring_normal(RotateHandle::View, basis), basis.scale);
        let radius = config.ring_radius * config.view_ring_factor;
        let segments = config.ring_segments.max(3);
        let mut points = Vec::with_capacity(segments as usize);
        for i in 0..segments {
            let a = std::f32::consts::TAU * i as f32 / segments as f32;
            let p = ctx.project(frame.to_world(Vec3::new(radius * a.cos(), radius * a.sin(), 0.0)));
            if !p.is_in_front() {
                return Vec::new();
            }
            points.push(p.pos());
        }
        points
    }

    /// Start dragging a ring from the pointer position `cursor`
    pub fn begin_drag(
        &mut self,
        scene: &dyn EditorScene,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        handle: RotateHandle,
        cursor: Vec2,
    ) -> GizmoResult<()> {
        if self.drag.is_some() {
            return Err(GizmoError::DragAlreadyActive);
        }
        let id = self.entity;
        let start_transform = scene.transform(id).ok_or(GizmoError::EntityNotFound(id))?;
        let (_, parent_rotation, _) = scene.parent_world_matrix(id).to_scale_rotation_translation();

        let axis = ring_normal(handle, basis);
        let to_camera = ctx.to_camera(basis.origin);
        let behind = to_camera.dot(axis) < 0.0;
        let facing = if behind { -axis } else { axis };
        let u = facing.any_orthonormal_vector();
        let v = facing.cross(u);

        let mut drag = RotateDrag {
            handle,
            center: basis.origin,
            axis,
            u,
            v,
            behind,
            start_angle: 0.0,
            start_transform,
            parent_rotation,
            space: basis.space,
            sweep: 0.0,
        };
        let hit = ray_plane_intersection(&ctx.ray(cursor), &drag.plane())
            .ok_or(GizmoError::RayMissed)?;
        drag.start_angle = drag.angle_of(hit);

        debug!(?handle, %id, behind, "Rotate drag started");
        self.drag = Some(drag);
        self.mirror = Some(*basis);
        Ok(())
    }

    /// Rotate the entity to follow the pointer. Returns the applied angle
    /// about the ring axis.
    pub fn drag_to(
        &mut self,
        scene: &mut dyn EditorScene,
        render: &mut dyn RenderSync,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cursor: Vec2,
    ) -> GizmoResult<f32> {
        let id = self.entity;
        let drag = self.drag.as_mut().ok_or(GizmoError::NoActiveDrag)?;

        let hit = ray_plane_intersection(&ctx.ray(cursor), &drag.plane())
            .ok_or(GizmoError::RayMissed)?;
        let raw = wrap_angle(drag.angle_of(hit) - drag.start_angle);
        let sweep = snap_angle(raw, config.rotate_step_degrees());
        let angle = if drag.behind { -sweep } else { sweep };
        drag.sweep = sweep;

        let transform = apply_rotation(
            &drag.start_transform,
            drag.parent_rotation,
            drag.handle,
            drag.space,
            drag.axis,
            angle,
        );
        let space = drag.space;

        write_transform(scene, render, id, transform)?;
        self.mirror = GizmoBasis::from_scene(scene, id, ctx.camera_position, space);
        Ok(angle)
    }

    /// Finish the drag, committing to history if the transform changed
    pub fn end_drag(
        &mut self,
        scene: &dyn EditorScene,
        history: &mut dyn UndoHistory,
    ) -> GizmoResult<bool> {
        let drag = self.drag.take().ok_or(GizmoError::NoActiveDrag)?;
        self.mirror = None;
        debug!(handle = ?drag.handle, sweep = drag.sweep, "Rotate drag ended");
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
            debug!(id = %self.entity, "Rotate drag aborted");
        }
        self.mirror = None;
    }

    /// Append the gizmo's draw commands
    pub fn draw(
        &self,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        cache: &mut TorusCache,
        out: &mut DrawList,
    ) {
        // During a drag the rings stay where the drag started; the gimbal
        // rings would otherwise chase the angle being edited.
        let basis = self.mirror.as_ref().unwrap_or(basis);
        let active = self.active();
        let mut batch = DepthSortedBatch::new();

        for axis in Axis::ALL {
            let normal = basis.axes[axis.index()];
            let opacity = plane_opacity(normal, basis.camera_position, basis.origin);
            if !is_visible(opacity) {
                continue;
            }
            let style = HandleStyle::new(
                config,
                config.axis_color(axis.index()),
                HandleState::of(RotateHandle::Axis(axis), self.hovered, active),
                opacity,
            );
            let ring = cache.get(
                config.ring_radius,
                config.ring_tube_radius * style.thickness,
                config.ring_segments,
                config.tube_segments,
            );
            let frame = Frame::along(basis.origin, normal, basis.scale);
            batch.add_mesh(&ring.transformed(&frame), ctx, style.color, true);
        }

        if config.show_view_ring {
            let style = HandleStyle::new(
                config,
                config.view_color,
                HandleState::of(RotateHandle::View, self.hovered, active),
                1.0,
            );
            let ring = cache.get(
                config.ring_radius * config.view_ring_factor,
                config.ring_tube_radius * 0.75 * style.thickness,
                config.ring_segments,
                config.tube_segments,
            );
            let frame =
                Frame::along(basis.origin, ring_normal(RotateHandle::View, basis), basis.scale);
            batch.add_mesh(&ring.transformed(&frame), ctx, style.color, true);
        }

        batch.finish(out);

        if let Some(drag) = &self.drag {
            self.draw_feedback(drag, basis, ctx, config, out);
        }
    }

    fn draw_feedback(
        &self,
        drag: &RotateDrag,
        basis: &GizmoBasis,
        ctx: &ViewContext,
        config: &GizmoConfig,
        out: &mut DrawList,
    ) {
        let radius = match drag.handle {
            RotateHandle::Axis(_) => config.ring_radius,
            RotateHandle::View => config.ring_radius * config.view_ring_factor,
        } * basis.scale;

        if config.show_rotation_sector && drag.sweep != 0.0 {
            // One vertex per ~6 degrees of sweep
            let steps = ((drag.sweep.abs() / (PI / 30.0)).ceil() as usize).max(2);
            let center = ctx.project(drag.center);
            let mut points = Vec::with_capacity(steps + 2);
            let mut visible = center.is_in_front();
            points.push(center.pos());
            for i in 0..=steps {
                let a = drag.start_angle + drag.sweep * i as f32 / steps as f32;
                let p = ctx.project(drag.point_at(a, radius));
                visible &= p.is_in_front();
                points.push(p.pos());
            }
            if visible {
                out.push(DrawCommand::Polygon {
                    points,
                    fill: config.sector_color,
                    stroke: Some(Stroke::new(1.0, shade(config.sector_color, -0.3))),
                });
            }
        }

        if config.show_angle_readout {
            let degrees = drag.sweep.to_degrees();
            let at = drag.point_at(drag.start_angle + drag.sweep, radius * 1.2);
            push_label(out, ctx, at, &format!("{degrees:.1}°"), config.active_color);
        }
    }
}
