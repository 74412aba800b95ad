//! Scene preview
//!
//! Entities are drawn as shaded boxes through the same depth-sorted
//! renderer the gizmos use, over a ground grid.

use glam::{Mat4, Vec2, Vec3};
use se_core::{EntityId, Scene};
use se_gizmo::geometry::cube;
use se_gizmo::render::shade;
use se_gizmo::{DepthSortedBatch, DrawCommand, DrawList, Mesh, Ray, Stroke, ViewContext};

/// Half size of the ground grid
const GRID_EXTENT: i32 = 10;
const GRID_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 0.35];
const GRID_AXIS_ALPHA: f32 = 0.8;
/// Lightening applied to selected boxes
const SELECTED_SHADE: f32 = 0.35;

/// Cached draw list of the scene
#[derive(Debug, Default)]
pub struct ScenePreview {
    list: DrawList,
    last_ctx: Option<ViewContext>,
    last_selection: Vec<EntityId>,
    stale: bool,
    rebuilds: u64,
}

impl ScenePreview {
    /// Force a rebuild on the next [`ScenePreview::ensure`]
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Number of rebuilds so far
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Current draw list
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    /// Rebuild if the camera, selection or scene changed since the last
    /// build. Returns whether a rebuild happened.
    pub fn ensure(&mut self, scene: &Scene, selection: &[EntityId], ctx: &ViewContext) -> bool {
        let fresh = !self.stale
            && self.last_ctx.as_ref() == Some(ctx)
            && self.last_selection == selection;
        if fresh {
            return false;
        }
        self.rebuild(scene, selection, ctx);
        true
    }

    /// Rebuild unconditionally
    pub fn rebuild(&mut self, scene: &Scene, selection: &[EntityId], ctx: &ViewContext) {
        let mut list = DrawList::new();
        push_grid(&mut list, ctx);

        let mut batch = DepthSortedBatch::new();
        for entity in scene.iter() {
            let mesh = box_mesh(&entity.world_matrix, entity.half_extents);
            let color = if selection.contains(&entity.id) {
                shade(entity.color, SELECTED_SHADE)
            } else {
                entity.color
            };
            // Mirrored boxes have inverted winding, so keep every face
            let cull = entity.world_matrix.determinant() > 0.0;
            batch.add_mesh(&mesh, ctx, color, cull);
        }
        batch.finish(&mut list);

        self.list = list;
        self.last_ctx = Some(*ctx);
        self.last_selection = selection.to_vec();
        self.stale = false;
        self.rebuilds += 1;
    }
}

fn box_mesh(world: &Mat4, half_extents: Vec3) -> Mesh {
    let mut mesh = cube(1.0);
    let transform = *world * Mat4::from_scale(half_extents);
    for v in &mut mesh.vertices {
        *v = transform.transform_point3(*v);
    }
    mesh
}

fn push_grid(list: &mut DrawList, ctx: &ViewContext) {
    let extent = GRID_EXTENT as f32;
    for i in -GRID_EXTENT..=GRID_EXTENT {
        let offset = i as f32;
        let mut color = GRID_COLOR;
        if i == 0 {
            color[3] = GRID_AXIS_ALPHA;
        }
        for (a, b) in [
            (Vec3::new(offset, 0.0, -extent), Vec3::new(offset, 0.0, extent)),
            (Vec3::new(-extent, 0.0, offset), Vec3::new(extent, 0.0, offset)),
        ] {
            if let Some(points) = project_segment(ctx, a, b) {
                list.push(DrawCommand::Polyline {
                    points,
                    closed: false,
                    stroke: Stroke::new(1.0, color),
                });
            }
        }
    }
}

/// Project a segment, clipping it against the camera plane
fn project_segment(ctx: &ViewContext, a: Vec3, b: Vec3) -> Option<Vec<Vec2>> {
    const STEPS: usize = 8;
    let points: Vec<Vec2> = (0..=STEPS)
        .map(|i| ctx.project(a.lerp(b, i as f32 / STEPS as f32)))
        .filter(|p| p.is_in_front())
        .map(|p| p.pos())
        .collect();
    (points.len() >= 2).then_some(points)
}

/// Nearest entity box under the cursor
pub fn pick_entity(scene: &Scene, ctx: &ViewContext, cursor: Vec2) -> Option<EntityId> {
    let ray = ctx.ray(cursor);
    scene
        .iter()
        .filter_map(|entity| {
            ray_box(&ray, &entity.world_matrix, entity.half_extents).map(|t| (t, entity.id))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

/// Ray against an oriented box given by its world matrix and half extents
fn ray_box(ray: &Ray, world: &Mat4, half_extents: Vec3) -> Option<f32> {
    if world.determinant().abs() <= f32::EPSILON {
        return None;
    }
    let inverse = world.inverse();
    let origin = inverse.transform_point3(ray.origin);
    let direction = inverse.transform_vector3(ray.direction);

    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], direction[axis], half_extents[axis]);
        if d.abs() <= f32::EPSILON {
            if o.abs() > h {
                return None;
            }
            continue;
        }
        let (t0, t1) = ((-h - o) / d, (h - o) / d);
        t_min = t_min.max(t0.min(t1));
        t_max = t_max.min(t0.max(t1));
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}
