//! Handle appearance helpers shared by the gizmos

use glam::Vec3;

use crate::camera::ViewContext;
use crate::config::{CenterHandle, GizmoConfig};
use crate::constants::geometry::DISC_SEGMENTS;
use crate::geometry::{Frame, Mesh, cube, disc, icosphere, octahedron};
use crate::handle::HandleState;
use crate::render::{Color, DrawCommand, DrawList, with_alpha};

/// Resolved color and thickness multiplier of a handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HandleStyle {
    pub color: Color,
    pub thickness: f32,
}

impl HandleStyle {
    pub fn new(config: &GizmoConfig, base: Color, state: HandleState, opacity: f32) -> Self {
        let (color, thickness) = match state {
            HandleState::Idle => (base, 1.0),
            HandleState::Hovered => (config.hover_color, config.hover_thickness),
            HandleState::Active => (config.active_color, config.active_thickness),
        };
        Self {
            color: with_alpha(color, opacity),
            thickness,
        }
    }
}

/// World-space center handle mesh and whether it is flat (no culling)
pub(crate) fn center_handle_mesh(
    shape: CenterHandle,
    size: f32,
    origin: Vec3,
    to_camera: Vec3,
    scale: f32,
) -> (Mesh, bool) {
    let frame = Frame::along(origin, to_camera, scale);
    match shape {
        CenterHandle::Cube => (cube(size).transformed(&frame), false),
        CenterHandle::Sphere => (icosphere(size, 1).transformed(&frame), false),
        CenterHandle::Octahedron => (octahedron(size * 1.3).transformed(&frame), false),
        CenterHandle::QuadCircle => (disc(size * 1.2, DISC_SEGMENTS).transformed(&frame), true),
    }
}

/// Push a text label at a world position, skipped when behind the camera
pub(crate) fn push_label(out: &mut DrawList, ctx: &ViewContext, at: Vec3, text: &str, color: Color) {
    let p = ctx.project(at);
    if p.is_in_front() {
        out.push(DrawCommand::Text {
            pos: p.pos(),
            text: text.to_string(),
            color,
            size: 13.0,
        });
    }
}
