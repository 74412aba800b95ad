//! Convex handle shapes
//!
//! Pointed shapes (cones, pyramids, bipyramids, prisms) extend along local
//! +Z from the origin. Symmetric shapes are centered on the origin. Flat
//! shapes lie in the local XY plane and face +Z.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec3;

use super::{Face, Mesh};

fn ring(radius: f32, z: f32, segments: u32) -> impl Iterator<Item = Vec3> {
    (0..segments).map(move |i| {
        let angle = TAU * i as f32 / segments as f32;
        Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
    })
}

/// N-gon pyramid: base at `z = 0`, apex at `z = height`
pub fn cone(radius: f32, height: f32, segments: u32) -> Mesh {
    let n = segments.max(3);
    let mut vertices: Vec<Vec3> = ring(radius, 0.0, n).collect();
    let apex = n;
    let base = n + 1;
    vertices.push(Vec3::new(0.0, 0.0, height));
    vertices.push(Vec3::ZERO);

    let mut faces = Vec::with_capacity(2 * n as usize);
    for i in 0..n {
        let next = (i + 1) % n;
        faces.push(Face::Tri([i, next, apex]));
        faces.push(Face::Tri([base, next, i]));
    }
    Mesh::new(vertices, faces).orient_outward()
}

/// Three-sided pyramid
pub fn tetrahedron(radius: f32, height: f32) -> Mesh {
    cone(radius, height, 3)
}

/// Double pyramid: apexes at `z = 0` and `z = length`, widest at the middle
pub fn bipyramid(radius: f32, length: f32, segments: u32) -> Mesh {
    let n = segments.max(3);
    let mut vertices: Vec<Vec3> = ring(radius, length * 0.5, n).collect();
    let tip = n;
    let tail = n + 1;
    vertices.push(Vec3::new(0.0, 0.0, length));
    vertices.push(Vec3::ZERO);

    let mut faces = Vec::with_capacity(2 * n as usize);
    for i in 0..n {
        let next = (i + 1) % n;
        faces.push(Face::Tri([i, next, tip]));
        faces.push(Face::Tri([tail, next, i]));
    }
    Mesh::new(vertices, faces).orient_outward()
}

/// Four-sided bipyramid arrowhead
pub fn rhombus(radius: f32, length: f32) -> Mesh {
    bipyramid(radius, length, 4)
}

/// Regular octahedron centered on the origin
pub fn octahedron(radius: f32) -> Mesh {
    let vertices = vec![
        Vec3::X * radius,
        Vec3::Y * radius,
        Vec3::NEG_X * radius,
        Vec3::NEG_Y * radius,
        Vec3::Z * radius,
        Vec3::NEG_Z * radius,
    ];
    let mut faces = Vec::with_capacity(8);
    for i in 0..4 {
        let next = (i + 1) % 4;
        faces.push(Face::Tri([i, next, 4]));
        faces.push(Face::Tri([5, next, i]));
    }
    Mesh::new(vertices, faces).orient_outward()
}

/// Axis-aligned cube centered on the origin
pub fn cube(half: f32) -> Mesh {
    let h = half;
    let vertices = vec![
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(h, -h, h),
        Vec3::new(h, h, h),
        Vec3::new(-h, h, h),
    ];
    let faces = vec![
        Face::Quad([0, 3, 2, 1]), // -Z
        Face::Quad([4, 5, 6, 7]), // +Z
        Face::Quad([0, 1, 5, 4]), // -Y
        Face::Quad([3, 7, 6, 2]), // +Y
        Face::Quad([0, 4, 7, 3]), // -X
        Face::Quad([1, 2, 6, 5]), // +X
    ];
    Mesh::new(vertices, faces)
}

/// Sphere approximated by a subdivided icosahedron
pub fn icosphere(radius: f32, subdivisions: u32) -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let mut vertices: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    let mut triangles: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = ((vertices[a as usize] + vertices[b as usize]) * 0.5).normalize();
                vertices.push(mid);
                (vertices.len() - 1) as u32
            })
        };

        let mut next = Vec::with_capacity(triangles.len() * 4);
        for [a, b, c] in triangles {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            next.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        triangles = next;
    }

    let vertices = vertices.into_iter().map(|v| v * radius).collect();
    let faces = triangles.into_iter().map(Face::Tri).collect();
    Mesh::new(vertices, faces).orient_outward()
}

/// Flat n-gon facing +Z
pub fn disc(radius: f32, segments: u32) -> Mesh {
    let n = segments.max(3);
    let mut vertices: Vec<Vec3> = ring(radius, 0.0, n).collect();
    vertices.push(Vec3::ZERO);
    let faces = (0..n).map(|i| Face::Tri([n, i, (i + 1) % n])).collect();
    Mesh::new(vertices, faces)
}

/// Flat square facing +Z
pub fn square(half: f32) -> Mesh {
    Mesh::new(
        vec![
            Vec3::new(-half, -half, 0.0),
            Vec3::new(half, -half, 0.0),
            Vec3::new(half, half, 0.0),
            Vec3::new(-half, half, 0.0),
        ],
        vec![Face::Quad([0, 1, 2, 3])],
    )
}

/// Closed n-sided prism from `z = 0` to `z = length`
pub fn prism(radius: f32, length: f32, sides: u32) -> Mesh {
    let n = sides.max(3);
    let mut vertices: Vec<Vec3> = ring(radius, 0.0, n).chain(ring(radius, length, n)).collect();
    let bottom = 2 * n;
    let top = 2 * n + 1;
    vertices.push(Vec3::ZERO);
    vertices.push(Vec3::new(0.0, 0.0, length));

    let mut faces = Vec::with_capacity(3 * n as usize);
    for i in 0..n {
        let next = (i + 1) % n;
        faces.push(Face::Quad([i, next, n + next, n + i]));
        faces.push(Face::Tri([bottom, next, i]));
        faces.push(Face::Tri([top, n + i, n + next]));
    }
    Mesh::new(vertices, faces).orient_outward()
}
