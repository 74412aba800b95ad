//! Procedural handle geometry
//!
//! Shapes are generated in a local frame (`x` = right, `y` = up, `z` =
//! forward) with faces wound counter-clockwise seen from outside, then
//! placed in world space through a [`Frame`].

mod shapes;
mod torus;

pub use shapes::{
    bipyramid, cone, cube, disc, icosphere, octahedron, prism, rhombus, square, tetrahedron,
};
pub use torus::{TorusCache, TorusKey, torus};

use glam::Vec3;

/// A triangle or quad, as indices into [`Mesh::vertices`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Triangle
    Tri([u32; 3]),
    /// Planar quad
    Quad([u32; 4]),
}

impl Face {
    /// Vertex indices in winding order
    pub fn indices(&self) -> &[u32] {
        match self {
            Face::Tri(i) => i,
            Face::Quad(i) => i,
        }
    }

    fn reversed(self) -> Self {
        match self {
            Face::Tri([a, b, c]) => Face::Tri([c, b, a]),
            Face::Quad([a, b, c, d]) => Face::Quad([d, c, b, a]),
        }
    }
}

/// Vertex / face list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Faces indexing into `vertices`
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Create a mesh
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Normal of a face from its first three vertices, `None` when the face
    /// is degenerate or references missing vertices
    pub fn face_normal(&self, face: &Face) -> Option<Vec3> {
        let idx = face.indices();
        let a = *self.vertices.get(idx[0] as usize)?;
        let b = *self.vertices.get(idx[1] as usize)?;
        let c = *self.vertices.get(idx[2] as usize)?;
        let normal = (b - a).cross(c - a);
        let length = normal.length();
        if length.is_finite() && length > f32::EPSILON * 1e-3 {
            Some(normal / length)
        } else {
            None
        }
    }

    /// Average of a face's vertices
    pub fn face_center(&self, face: &Face) -> Vec3 {
        let idx = face.indices();
        let sum: Vec3 = idx
            .iter()
            .filter_map(|&i| self.vertices.get(i as usize))
            .copied()
            .sum();
        sum / idx.len() as f32
    }

    /// Average of all vertices
    pub fn centroid(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec3>() / self.vertices.len() as f32
    }

    /// Flip faces of a convex mesh so that every normal points away from the
    /// centroid
    pub fn orient_outward(mut self) -> Self {
        let centroid = self.centroid();
        for i in 0..self.faces.len() {
            let face = self.faces[i];
            if let Some(normal) = self.face_normal(&face)
                && normal.dot(self.face_center(&face) - centroid) < 0.0
            {
                self.faces[i] = face.reversed();
            }
        }
        self
    }

    /// Copy placed into world space
    pub fn transformed(&self, frame: &Frame) -> Mesh {
        let vertices = self.vertices.iter().map(|&v| frame.to_world(v)).collect();
        let faces = if frame.is_mirrored() {
            self.faces.iter().map(|f| f.reversed()).collect()
        } else {
            self.faces.clone()
        };
        Mesh { vertices, faces }
    }
}

/// Placement of a local shape in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// World position of the local origin
    pub origin: Vec3,
    /// World direction of local +X
    pub right: Vec3,
    /// World direction of local +Y
    pub up: Vec3,
    /// World direction of local +Z
    pub forward: Vec3,
    /// Uniform scale applied before placement
    pub scale: f32,
}

impl Frame {
    /// Frame from explicit axes
    pub fn new(origin: Vec3, right: Vec3, up: Vec3, forward: Vec3, scale: f32) -> Self {
        Self {
            origin,
            right,
            up,
            forward,
            scale,
        }
    }

    /// Right-handed frame whose forward axis is `direction`
    pub fn along(origin: Vec3, direction: Vec3, scale: f32) -> Self {
        let forward = direction.normalize_or_zero();
        let forward = if forward == Vec3::ZERO { Vec3::Z } else { forward };
        let right = forward.any_orthonormal_vector();
        let up = forward.cross(right);
        Self::new(origin, right, up, forward, scale)
    }

    /// Frame spanning a plane: local x / y follow `u` / `v`
    pub fn in_plane(origin: Vec3, u: Vec3, v: Vec3, scale: f32) -> Self {
        Self::new(origin, u, v, u.cross(v).normalize_or_zero(), scale)
    }

    /// Map a local point to world space
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + (self.right * local.x + self.up * local.y + self.forward * local.z) * self.scale
    }

    /// Whether the frame flips handedness (and therefore winding)
    pub fn is_mirrored(&self) -> bool {
        self.right.cross(self.up).dot(self.forward) * self.scale < 0.0
    }
}
