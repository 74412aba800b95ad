//! Rotation ring geometry and its cache

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec3;
use tracing::debug;

use super::{Face, Mesh};
use crate::constants::geometry::CACHE_KEY_SCALE;

/// Torus in the local XY plane (ring normal +Z).
///
/// Vertex `(i, j)` is stored at `i * tube_segments + j`, where `i` walks the
/// ring and `j` the tube cross-section.
pub fn torus(radius: f32, tube_radius: f32, ring_segments: u32, tube_segments: u32) -> Mesh {
    let ring_n = ring_segments.max(3);
    let tube_n = tube_segments.max(3);

    let mut vertices = Vec::with_capacity((ring_n * tube_n) as usize);
    for i in 0..ring_n {
        let u = TAU * i as f32 / ring_n as f32;
        let (sin_u, cos_u) = u.sin_cos();
        for j in 0..tube_n {
            let v = TAU * j as f32 / tube_n as f32;
            let (sin_v, cos_v) = v.sin_cos();
            let r = radius + tube_radius * cos_v;
            vertices.push(Vec3::new(r * cos_u, r * sin_u, tube_radius * sin_v));
        }
    }

    let index = |i: u32, j: u32| (i % ring_n) * tube_n + (j % tube_n);
    let mut faces = Vec::with_capacity((ring_n * tube_n) as usize);
    for i in 0..ring_n {
        for j in 0..tube_n {
            faces.push(Face::Quad([
                index(i, j),
                index(i + 1, j),
                index(i + 1, j + 1),
                index(i, j + 1),
            ]));
        }
    }
    Mesh::new(vertices, faces)
}

/// Cache key: sizes rounded to three decimals plus the segment counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TorusKey {
    radius: i64,
    tube_radius: i64,
    ring_segments: u32,
    tube_segments: u32,
}

impl TorusKey {
    /// Build the key for a torus request
    pub fn new(radius: f32, tube_radius: f32, ring_segments: u32, tube_segments: u32) -> Self {
        Self {
            radius: (radius * CACHE_KEY_SCALE).round() as i64,
            tube_radius: (tube_radius * CACHE_KEY_SCALE).round() as i64,
            ring_segments,
            tube_segments,
        }
    }

    fn generate(&self) -> Mesh {
        torus(
            self.radius as f32 / CACHE_KEY_SCALE,
            self.tube_radius as f32 / CACHE_KEY_SCALE,
            self.ring_segments,
            self.tube_segments,
        )
    }
}

/// Lazily filled torus cache.
///
/// Entries are never evicted: keys come from a handful of slider values.
/// Meshes are generated from the rounded key, so one key always maps to
/// bit-identical geometry.
#[derive(Debug, Default)]
pub struct TorusCache {
    entries: HashMap<TorusKey, Arc<Mesh>>,
}

impl TorusCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or generate) a torus
    pub fn get(
        &mut self,
        radius: f32,
        tube_radius: f32,
        ring_segments: u32,
        tube_segments: u32,
    ) -> Arc<Mesh> {
        let key = TorusKey::new(radius, tube_radius, ring_segments, tube_segments);
        self.entries
            .entry(key)
            .or_insert_with(|| {
                debug!(?key, "Generating torus");
                Arc::new(key.generate())
            })
            .clone()
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torus_faces_outward() {
        let mesh = torus(1.0, 0.1, 48, 8);
        assert_eq!(mesh.vertices.len(), 48 * 8);
        assert_eq!(mesh.faces.len(), 48 * 8);
        for face in &mesh.faces {
            let normal = mesh.face_normal(face).unwrap();
            let center = mesh.face_center(face);
            // Direction from the tube's center line to the face
            let spine = Vec3::new(center.x, center.y, 0.0).normalize();
            assert!(normal.dot(center - spine) > 0.0);
        }
    }

    #[test]
    fn test_cache_reuses_equal_keys() {
        let mut cache = TorusCache::new();
        let a = cache.get(1.0, 0.02, 48, 8);
        let b = cache.get(1.0004, 0.0199, 48, 8);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_key_captures_every_parameter() {
        let mut cache = TorusCache::new();
        let base = cache.get(1.0, 0.02, 48, 8);
        let radius = cache.get(1.002, 0.02, 48, 8);
        let tube = cache.get(1.0, 0.03, 48, 8);
        let segments = cache.get(1.0, 0.02, 64, 8);
        assert_eq!(cache.len(), 4);
        assert_ne!(base.vertices, radius.vertices);
        assert_ne!(base.vertices, tube.vertices);
        assert_ne!(base.vertices.len(), segments.vertices.len());
    }

    #[test]
    fn test_separate_caches_produce_identical_meshes() {
        let a = TorusCache::new().get(0.9, 0.025, 48, 8);
        let b = TorusCache::new().get(0.9, 0.025, 48, 8);
        assert_eq!(*a, *b);
    }
}
