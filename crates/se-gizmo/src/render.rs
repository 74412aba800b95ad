//! Depth-sorted volumetric renderer
//!
//! Gizmo geometry is drawn as flat 2D polygons on an overlay without a depth
//! buffer. Faces from every mesh of a frame are collected into one
//! [`DepthSortedBatch`], sorted farthest-first by average clip `w`, shaded by
//! a fixed directional light and emitted as [`DrawCommand`]s.

use glam::{Vec2, Vec3};

use crate::camera::ViewContext;
use crate::constants::shading::{AMBIENT, DIFFUSE, EDGE_WIDTH, LIGHT_DIRECTION, NEUTRAL_INTENSITY};
use crate::geometry::Mesh;

/// Linear RGBA color
pub type Color = [f32; 4];

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line width in pixels
    pub width: f32,
    /// Line color
    pub color: Color,
}

impl Stroke {
    /// Create a stroke
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// A 2D draw command in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled convex polygon
    Polygon {
        /// Vertices in screen pixels
        points: Vec<Vec2>,
        /// Fill color
        fill: Color,
        /// Optional outline
        stroke: Option<Stroke>,
    },
    /// Open or closed line strip
    Polyline {
        /// Vertices in screen pixels
        points: Vec<Vec2>,
        /// Join the last point back to the first
        closed: bool,
        /// Line style
        stroke: Stroke,
    },
    /// Text centered on `pos`
    Text {
        /// Center in screen pixels
        pos: Vec2,
        /// Label contents
        text: String,
        /// Text color
        color: Color,
        /// Font size in points
        size: f32,
    },
}

/// Draw commands of one frame, in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Commands in paint order
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over commands
    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    /// Number of polygon commands
    pub fn polygon_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
            .count()
    }
}

/// Apply a percentage shade: positive lightens toward white, negative
/// darkens toward black. Alpha is kept.
pub fn shade(color: Color, percent: f32) -> Color {
    let p = percent.clamp(-1.0, 1.0);
    let channel = |c: f32| {
        if p >= 0.0 {
            c + (1.0 - c) * p
        } else {
            c * (1.0 + p)
        }
    };
    [channel(color[0]), channel(color[1]), channel(color[2]), color[3]]
}

/// Multiply a color's alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Directional light intensity for a unit normal
pub fn light_intensity(normal: Vec3) -> f32 {
    let light = Vec3::from_array(LIGHT_DIRECTION).normalize();
    AMBIENT + DIFFUSE * normal.dot(light).max(0.0)
}

#[derive(Debug, Clone)]
struct SortedFace {
    points: Vec<Vec2>,
    depth: f32,
    fill: Color,
    edge: Color,
}

/// Collects shaded faces from several meshes and sorts them together
#[derive(Debug, Clone, Default)]
pub struct DepthSortedBatch {
    faces: Vec<SortedFace>,
}

impl DepthSortedBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of faces collected so far
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether no face has been collected
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Project and shade the faces of a world-space mesh.
    ///
    /// Faces with a degenerate normal or a vertex behind the camera are
    /// skipped. With `cull_back_faces`, faces turned away from the camera are
    /// dropped too. Returns the number of faces added.
    pub fn add_mesh(
        &mut self,
        mesh: &Mesh,
        ctx: &ViewContext,
        color: Color,
        cull_back_faces: bool,
    ) -> usize {
        let projected: Vec<_> = mesh.vertices.iter().map(|&v| ctx.project(v)).collect();
        let before = self.faces.len();

        for face in &mesh.faces {
            let Some(normal) = mesh.face_normal(face) else {
                continue;
            };
            if cull_back_faces {
                let to_camera = ctx.camera_position - mesh.face_center(face);
                if normal.dot(to_camera) <= 0.0 {
                    continue;
                }
            }

            let mut points = Vec::with_capacity(face.indices().len());
            let mut depth = 0.0;
            let mut visible = true;
            for &i in face.indices() {
                match projected.get(i as usize) {
                    Some(p) if p.is_in_front() && p.x.is_finite() && p.y.is_finite() => {
                        points.push(p.pos());
                        depth += p.w;
                    }
                    _ => {
                        visible = false;
                        break;
                    }
                }
            }
            if !visible {
                continue;
            }

            let fill = shade(color, light_intensity(normal) - NEUTRAL_INTENSITY);
            self.faces.push(SortedFace {
                depth: depth / points.len() as f32,
                points,
                fill,
                edge: shade(fill, -0.15),
            });
        }

        self.faces.len() - before
    }

    /// Sort back-to-front and append the polygons to `out`
    pub fn finish(mut self, out: &mut DrawList) {
        self.faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for face in self.faces {
            out.push(DrawCommand::Polygon {
                points: face.points,
                fill: face.fill,
                stroke: Some(Stroke::new(EDGE_WIDTH, face.edge)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::geometry::{Face, Frame, Mesh, cube, disc};
    use crate::math::Viewport;
    use approx::assert_abs_diff_eq;

    fn context() -> ViewContext {
        let viewport = Viewport::new(800.0, 600.0);
        OrbitCamera::new(viewport.aspect()).view_context(viewport)
    }

    fn polygons(list: &DrawList) -> Vec<(&Vec<Vec2>, Color)> {
        list.iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { points, fill, .. } => Some((points, *fill)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_shade() {
        let c = [0.5, 0.2, 1.0, 0.7];
        assert_eq!(shade(c, 0.0), c);
        let light = shade(c, 0.5);
        assert_abs_diff_eq!(light[0], 0.75);
        assert_abs_diff_eq!(light[3], 0.7);
        let dark = shade(c, -0.5);
        assert_abs_diff_eq!(dark[1], 0.1);
    }

    #[test]
    fn test_faces_sorted_far_to_near() {
        let ctx = context();
        let near = disc(0.5, 8).transformed(&Frame::along(Vec3::new(0.0, 0.0, 2.0), Vec3::Z, 1.0));
        let far = disc(0.5, 8).transformed(&Frame::along(Vec3::new(0.0, 0.0, -2.0), Vec3::Z, 1.0));

        let mut batch = DepthSortedBatch::new();
        // Near first, so sorting has to reorder
        batch.add_mesh(&near, &ctx, [1.0, 0.0, 0.0, 1.0], false);
        batch.add_mesh(&far, &ctx, [0.0, 0.0, 1.0, 1.0], false);
        let mut list = DrawList::new();
        batch.finish(&mut list);

        let fills: Vec<_> = polygons(&list).iter().map(|(_, f)| *f).collect();
        assert_eq!(fills.len(), 16);
        // All blue (far) faces come before all red (near) faces
        let first_red = fills.iter().position(|f| f[0] > f[2]).unwrap();
        assert!(fills[..first_red].iter().all(|f| f[2] > f[0]));
        assert!(fills[first_red..].iter().all(|f| f[0] > f[2]));
    }

    #[test]
    fn test_back_face_culling() {
        let ctx = context();
        let mesh = cube(0.5);
        let mut all = DepthSortedBatch::new();
        assert_eq!(all.add_mesh(&mesh, &ctx, [1.0; 4], false), 6);
        // Camera on +Z sees only the +Z face
        let mut culled = DepthSortedBatch::new();
        assert_eq!(culled.add_mesh(&mesh, &ctx, [1.0; 4], true), 1);
    }

    #[test]
    fn test_degenerate_and_behind_faces_skipped() {
        let ctx = context();
        let mesh = Mesh::new(
            vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::X * 2.0,
                // Behind the camera at z = 10
                Vec3::new(0.0, 0.0, 20.0),
                Vec3::new(1.0, 0.0, 20.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(f32::NAN, 0.0, 0.0),
            ],
            vec![
                Face::Tri([0, 1, 2]),
                Face::Tri([3, 4, 5]),
                Face::Tri([6, 1, 5]),
                Face::Tri([0, 1, 5]),
            ],
        );
        let mut batch = DepthSortedBatch::new();
        assert_eq!(batch.add_mesh(&mesh, &ctx, [1.0; 4], false), 1);
    }

    #[test]
    fn test_lit_face_brighter_than_unlit() {
        let up = light_intensity(Vec3::Y);
        let down = light_intensity(Vec3::NEG_Y);
        assert!(up > down);
        assert_abs_diff_eq!(down, AMBIENT);
    }
}
