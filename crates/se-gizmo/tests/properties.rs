//! Numeric properties of the math, basis, opacity and cache layers

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use glam::{Vec2, Vec3};
use se_gizmo::{
    DepthSortedBatch, DrawCommand, DrawList, OrbitCamera, TorusCache, Viewport,
    basis::screen_scale,
    geometry::{cube, torus},
    math::{Plane, ray_plane_intersection, snap},
    opacity::{axis_opacity, is_visible, plane_opacity},
};

#[test]
fn projection_round_trips_through_view_plane() {
    let viewport = Viewport::new(1280.0, 720.0);
    let mut camera = OrbitCamera::new(viewport.aspect());
    camera.orbit(-1.1, 0.7);
    camera.zoom(1.5);
    let ctx = camera.view_context(viewport);
    let forward = camera.forward();

    for point in [
        Vec3::new(1.0, 2.0, -0.5),
        Vec3::new(-2.5, 0.1, 1.5),
        Vec3::new(0.0, -1.0, 0.0),
    ] {
        let screen = ctx.project(point);
        assert!(screen.is_in_front());
        let hit = ray_plane_intersection(&ctx.ray(screen.pos()), &Plane::new(point, forward))
            .unwrap();
        assert!(hit.abs_diff_eq(point, 1e-3), "{hit} != {point}");
    }
}

#[test]
fn axis_opacity_fades_monotonically() {
    let camera = Vec3::new(0.0, 0.0, 5.0);
    let mut last = f32::INFINITY;
    for i in 0..=100 {
        // Alignment sweeps from 0.85 to 1.0
        let alignment = 0.85 + 0.15 * i as f32 / 100.0;
        let side = (1.0 - alignment * alignment).max(0.0).sqrt();
        let axis = Vec3::new(side, 0.0, alignment);
        let opacity = axis_opacity(axis, camera, Vec3::ZERO);
        assert!(opacity <= last + 1e-6);
        last = opacity;
    }
    assert_eq!(axis_opacity(Vec3::Z, camera, Vec3::ZERO), 0.0);
    assert_eq!(axis_opacity(Vec3::X, camera, Vec3::ZERO), 1.0);
}

#[test]
fn plane_opacity_hides_edge_on_planes() {
    let camera = Vec3::new(0.0, 0.0, 5.0);
    assert_eq!(plane_opacity(Vec3::Z, camera, Vec3::ZERO), 1.0);
    assert_eq!(plane_opacity(Vec3::X, camera, Vec3::ZERO), 0.0);
    assert!(!is_visible(plane_opacity(Vec3::Y, camera, Vec3::ZERO)));

    let tilted = Vec3::new(0.15_f32.acos().sin(), 0.0, 0.15);
    assert_abs_diff_eq!(plane_opacity(tilted, camera, Vec3::ZERO), 0.5, epsilon = 1e-3);
}

#[test]
fn basis_scale_is_always_positive() {
    let cases = [
        (Vec3::ZERO, Vec3::ZERO),
        (Vec3::splat(3.0), Vec3::splat(3.0)),
        (Vec3::new(0.0, 0.0, 1e-9), Vec3::ZERO),
        (Vec3::new(1e6, 0.0, 0.0), Vec3::ZERO),
        (Vec3::new(f32::MAX, f32::MAX, 0.0), Vec3::new(-f32::MAX, 0.0, 0.0)),
    ];
    for (camera, origin) in cases {
        let scale = screen_scale(camera, origin);
        assert!(scale > 0.0 && scale.is_finite(), "{camera} {origin} -> {scale}");
    }
    assert!(screen_scale(Vec3::Z * 20.0, Vec3::ZERO) > screen_scale(Vec3::Z * 10.0, Vec3::ZERO));
}

#[test]
fn snap_matches_round_formula() {
    for (d, s) in [(0.37_f32, 0.25_f32), (-1.13, 0.5), (12.0, 5.0), (0.049, 0.1)] {
        assert_eq!(snap(d, s), (d / s).round() * s);
    }
}

#[test]
fn torus_cache_is_deterministic() {
    let mut cache = TorusCache::new();
    let a = cache.get(0.9, 0.02, 48, 8);
    let b = cache.get(0.9001, 0.0201, 48, 8);
    assert!(Arc::ptr_eq(&a, &b), "same key to three decimals");
    assert_eq!(*a, torus(0.9, 0.02, 48, 8));

    let mut fresh = TorusCache::new();
    assert_eq!(*fresh.get(0.9, 0.02, 48, 8), *a);

    let wider = cache.get(0.95, 0.02, 48, 8);
    let thicker = cache.get(0.9, 0.03, 48, 8);
    assert_ne!(*wider, *a);
    assert_ne!(*thicker, *a);
    assert_eq!(cache.len(), 3);
}

#[test]
fn back_faces_of_a_closed_mesh_are_culled() {
    let viewport = Viewport::new(800.0, 600.0);
    let mut camera = OrbitCamera::new(viewport.aspect());
    camera.orbit(0.7, 0.4);
    let ctx = camera.view_context(viewport);
    let color = [0.8, 0.2, 0.2, 1.0];

    let mut all = DepthSortedBatch::new();
    assert_eq!(all.add_mesh(&cube(1.0), &ctx, color, false), 6);

    // Seen from an oblique corner exactly three faces turn toward the camera
    let mut front = DepthSortedBatch::new();
    assert_eq!(front.add_mesh(&cube(1.0), &ctx, color, true), 3);

    let mut out = DrawList::new();
    front.finish(&mut out);
    assert_eq!(out.polygon_count(), 3);
    for command in out.iter() {
        let DrawCommand::Polygon { points, fill, .. } = command else {
            panic!("expected only polygons");
        };
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p: &Vec2| p.is_finite()));
        assert_eq!(fill[3], 1.0);
    }
}
