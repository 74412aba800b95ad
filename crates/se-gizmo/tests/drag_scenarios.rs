//! End-to-end drag lifecycles against an in-memory scene

use std::f32::consts::PI;

use approx::assert_abs_diff_eq;
use glam::{EulerRot, Quat, Vec2, Vec3};
use se_core::{
    Entity, EntityId, EulerOrder, RenderSync, Scene, Transform, TransformStore, UndoHistory,
};
use se_gizmo::{
    Axis, GizmoBasis, GizmoConfig, GizmoError, GizmoHost, OrbitCamera, RotateGizmo, RotateHandle,
    ScaleGizmo, ScaleHandle, ScreenPoint, Tool, TransformSpace, TranslateGizmo, TranslateHandle,
    ViewContext, Viewport, constants::interaction::MIN_SCALE,
};

#[derive(Default)]
struct Editor {
    notified: usize,
    ticks: usize,
    commits: Vec<String>,
}

impl RenderSync for Editor {
    fn notify(&mut self) {
        self.notified += 1;
    }

    fn force_immediate_render_tick(&mut self) {
        self.ticks += 1;
    }
}

impl UndoHistory for Editor {
    fn commit(&mut self, label: &str) {
        self.commits.push(label.to_owned());
    }
}

/// Camera at (0, 0, 10) looking at the origin through an 800x600 viewport
fn front_view() -> ViewContext {
    let viewport = Viewport::new(800.0, 600.0);
    OrbitCamera::new(viewport.aspect()).view_context(viewport)
}

fn scene_with_box(transform: Transform) -> (Scene, EntityId) {
    let mut scene = Scene::new();
    let id = scene.insert(Entity::new("box").with_transform(transform));
    scene.update_world_transforms();
    (scene, id)
}

#[test]
fn translate_x_axis_by_100_pixels() {
    let (mut scene, id) = scene_with_box(Transform::IDENTITY);
    let ctx = front_view();
    let config = GizmoConfig::default();
    let mut editor = Editor::default();

    let basis = GizmoBasis::from_scene(&scene, id, ctx.camera_position, TransformSpace::World)
        .unwrap();
    let start = ctx.project(basis.along(0, 0.5)).pos();
    let mut gizmo = TranslateGizmo::new(id);
    assert_eq!(
        gizmo.pick(&basis, &ctx, &config, start),
        Some(TranslateHandle::Axis(Axis::X))
    );

    gizmo
        .begin_drag(&scene, &basis, &ctx, TranslateHandle::Axis(Axis::X), start)
        .unwrap();
    gizmo
        .drag_to(&mut scene, &mut editor, &ctx, &config, start + Vec2::new(100.0, 0.0))
        .unwrap();
    assert!(gizmo.end_drag(&scene, &mut editor).unwrap());

    // World units per pixel at the origin's depth
    let distance = 10.0;
    let per_pixel = 2.0 * distance * 25.0_f32.to_radians().tan() / 600.0;
    let position = scene.transform(id).unwrap().position;
    assert_abs_diff_eq!(position.x, 100.0 * per_pixel, epsilon = 1e-3);
    assert_abs_diff_eq!(position.y, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(position.z, 0.0, epsilon = 1e-6);
    assert_eq!(editor.commits, vec!["Translate".to_owned()]);
    assert_eq!(editor.ticks, 1);
}

#[test]
fn translate_follows_camera_orbited_mid_drag() {
    let (mut scene, id) = scene_with_box(Transform::IDENTITY);
    let viewport = Viewport::new(800.0, 600.0);
    let mut camera = OrbitCamera::new(viewport.aspect());
    let config = GizmoConfig::default();
    let mut editor = Editor::default();

    let ctx = camera.view_context(viewport);
    let basis = GizmoBasis::world(Vec3::ZERO, ctx.camera_position);
    let start = ctx.project(basis.along(0, 0.5)).pos();
    let mut gizmo = TranslateGizmo::new(id);
    gizmo
        .begin_drag(&scene, &basis, &ctx, TranslateHandle::Axis(Axis::X), start)
        .unwrap();

    // The camera moves between pointer events; the next step must use it
    camera.orbit(0.3, 0.0);
    let orbited = camera.view_context(viewport);
    let target = Vec3::new(1.5, 0.0, 0.0);
    gizmo
        .drag_to(
            &mut scene,
            &mut editor,
            &orbited,
            &config,
            orbited.project(target).pos(),
        )
        .unwrap();

    let start_point = basis.along(0, 0.5);
    let position = scene.transform(id).unwrap().position;
    assert_abs_diff_eq!(position.x, target.x - start_point.x, epsilon = 1e-3);
    assert_abs_diff_eq!(position.y, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(position.z, 0.0, epsilon = 1e-6);
}

#[test]
fn rotate_180_degrees_with_snap_is_exactly_pi() {
    let (mut scene, id) = scene_with_box(Transform::IDENTITY);
    let ctx = front_view();
    let config = GizmoConfig {
        snap_enabled: true,
        rotate_snap_degrees: 15.0,
        ..GizmoConfig::default()
    };
    let mut editor = Editor::default();

    let basis = GizmoBasis::from_scene(&scene, id, ctx.camera_position, TransformSpace::Gimbal)
        .unwrap();
    let radius = config.ring_radius * basis.scale;
    let on_ring = |degrees: f32| {
        let a = degrees.to_radians();
        ctx.project(Vec3::new(a.cos(), a.sin(), 0.0) * radius).pos()
    };

    let mut gizmo = RotateGizmo::new(id);
    gizmo
        .begin_drag(&scene, &basis, &ctx, RotateHandle::Axis(Axis::Z), on_ring(0.0))
        .unwrap();
    gizmo
        .drag_to(&mut scene, &mut editor, &ctx, &config, on_ring(91.0))
        .unwrap();
    let angle = gizmo
        .drag_to(&mut scene, &mut editor, &ctx, &config, on_ring(178.0))
        .unwrap();
    assert!(gizmo.end_drag(&scene, &mut editor).unwrap());

    assert_eq!(angle, PI);
    let rotation = scene.transform(id).unwrap().rotation;
    assert_eq!(rotation.z, PI);
    assert_eq!(rotation.x, 0.0);
    assert_eq!(rotation.y, 0.0);
    assert_eq!(editor.commits, vec!["Rotate".to_owned()]);
}

#[test]
fn world_rotation_composes_with_existing_orientation() {
    let start = Transform {
        rotation: Vec3::new(0.3, 0.0, 0.0),
        rotation_order: EulerOrder::XYZ,
        ..Transform::IDENTITY
    };
    let (mut scene, id) = scene_with_box(start);
    let ctx = front_view();
    let config = GizmoConfig {
        snap_enabled: true,
        rotate_snap_degrees: 15.0,
        ..GizmoConfig::default()
    };
    let mut editor = Editor::default();

    let basis = GizmoBasis::from_scene(&scene, id, ctx.camera_position, TransformSpace::World)
        .unwrap();
    let radius = config.ring_radius * basis.scale;
    let on_ring = |degrees: f32| {
        let a = degrees.to_radians();
        ctx.project(Vec3::new(a.cos(), a.sin(), 0.0) * radius).pos()
    };

    let mut gizmo = RotateGizmo::new(id);
    gizmo
        .begin_drag(&scene, &basis, &ctx, RotateHandle::Axis(Axis::Z), on_ring(10.0))
        .unwrap();
    gizmo
        .drag_to(&mut scene, &mut editor, &ctx, &config, on_ring(101.0))
        .unwrap();
    gizmo.end_drag(&scene, &mut editor).unwrap();

    let expected = Quat::from_rotation_z(PI / 2.0) * Quat::from_euler(EulerRot::XYZ, 0.3, 0.0, 0.0);
    let actual = scene.transform(id).unwrap().quat();
    assert_abs_diff_eq!(actual.dot(expected).abs(), 1.0, epsilon = 1e-5);
}

#[test]
fn scale_drag_past_zero_clamps_to_floor() {
    let (mut scene, id) = scene_with_box(Transform::IDENTITY);
    let ctx = front_view();
    let config = GizmoConfig::default();
    let mut editor = Editor::default();

    let basis = GizmoBasis::from_scene(&scene, id, ctx.camera_position, TransformSpace::Local)
        .unwrap();
    let origin = ctx.project(basis.origin).pos();
    let tip = ctx.project(basis.along(0, config.arrow_length)).pos();
    let handle_pixels = (tip - origin).length();

    let mut gizmo = ScaleGizmo::new(id);
    gizmo
        .begin_drag(&scene, &basis, &ctx, &config, ScaleHandle::Axis(Axis::X), tip)
        .unwrap();
    let scale = gizmo
        .drag_to(
            &mut scene,
            &mut editor,
            &ctx,
            &config,
            tip - Vec2::new(3.0 * handle_pixels, 0.0),
        )
        .unwrap();
    gizmo.end_drag(&scene, &mut editor).unwrap();

    assert_eq!(scale, Vec3::new(MIN_SCALE, 1.0, 1.0));
    assert_eq!(scene.transform(id).unwrap().scale.x, MIN_SCALE);
    assert_eq!(editor.commits, vec!["Scale".to_owned()]);
}

#[test]
fn zero_movement_drags_do_not_commit() {
    let start = Transform::from_position(Vec3::new(0.5, -0.25, 1.0));
    let (mut scene, id) = scene_with_box(start);
    let ctx = front_view();
    let config = GizmoConfig::default();
    let mut editor = Editor::default();
    let basis = GizmoBasis::from_scene(&scene, id, ctx.camera_position, TransformSpace::World)
        .unwrap();

    let cursor = ctx.project(basis.along(0, 0.5)).pos();
    let mut translate = TranslateGizmo::new(id);
    translate
        .begin_drag(&scene, &basis, &ctx, TranslateHandle::Axis(Axis::X), cursor)
        .unwrap();
    translate
        .drag_to(&mut scene, &mut editor, &ctx, &config, cursor)
        .unwrap();
    assert!(!translate.end_drag(&scene, &mut editor).unwrap());

    let ring = ctx.project(basis.along(0, config.ring_radius)).pos();
    let mut rotate = RotateGizmo::new(id);
    rotate
        .begin_drag(&scene, &basis, &ctx, RotateHandle::Axis(Axis::Z), ring)
        .unwrap();
    assert!(!rotate.end_drag(&scene, &mut editor).unwrap());

    let mut scale = ScaleGizmo::new(id);
    scale
        .begin_drag(&scene, &basis, &ctx, &config, ScaleHandle::Uniform, cursor)
        .unwrap();
    scale
        .drag_to(&mut scene, &mut editor, &ctx, &config, cursor)
        .unwrap();
    assert!(!scale.end_drag(&scene, &mut editor).unwrap());

    assert_eq!(scene.transform(id).unwrap(), start);
    assert!(editor.commits.is_empty());
}

#[test]
fn host_routes_a_full_drag() {
    let (mut scene, id) = scene_with_box(Transform::IDENTITY);
    let ctx = front_view();
    let config = GizmoConfig::default();
    let mut editor = Editor::default();

    let mut host = GizmoHost::new();
    host.set_tool(Tool::Translate, &scene, &mut editor);
    host.set_selection(&[id], &scene, &mut editor);
    host.sync(&scene, &mut editor);

    let basis = GizmoBasis::world(Vec3::ZERO, ctx.camera_position);
    let start = ctx.project(basis.along(1, 0.5)).pos();
    assert!(host.pointer_down(&scene, &ctx, &config, start));
    for step in 1..=5 {
        let cursor = start - Vec2::new(0.0, 10.0 * step as f32);
        assert!(host.pointer_move(&mut scene, &mut editor, &ctx, &config, cursor));
    }
    assert!(host.pointer_up(&scene, &mut editor));

    let position = scene.transform(id).unwrap().position;
    assert!(position.y > 0.0);
    assert_abs_diff_eq!(position.x, 0.0, epsilon = 1e-6);
    assert_eq!(editor.ticks, 5);
    assert_eq!(editor.commits.len(), 1);

    // Pointer moves after release only update hover
    let far = Vec2::new(5.0, 5.0);
    host.pointer_move(&mut scene, &mut editor, &ctx, &config, far);
    assert_eq!(editor.ticks, 5);
    assert_eq!(scene.transform(id).unwrap().position, position);
}

#[test]
fn entity_removed_mid_drag_releases_capture_for_every_tool() {
    let config = GizmoConfig::default();
    let ctx = front_view();
    let basis = GizmoBasis::world(Vec3::ZERO, ctx.camera_position);
    let center = ctx.project(Vec3::ZERO).pos();
    let ring = ctx.project(basis.along(1, config.ring_radius)).pos();

    for (tool, grab) in [
        (Tool::Translate, center),
        (Tool::Rotate, ring),
        (Tool::Scale, center),
    ] {
        let (mut scene, id) = scene_with_box(Transform::IDENTITY);
        let mut editor = Editor::default();
        let mut host = GizmoHost::new();
        host.set_tool(tool, &scene, &mut editor);
        host.set_selection(&[id], &scene, &mut editor);
        assert!(host.pointer_down(&scene, &ctx, &config, grab), "{tool:?}");

        scene.remove(id).unwrap();
        host.pointer_move(&mut scene, &mut editor, &ctx, &config, grab + Vec2::new(30.0, -20.0));

        assert!(!host.has_capture(), "{tool:?}");
        assert!(!host.is_dragging(), "{tool:?}");
        assert!(!host.pointer_up(&scene, &mut editor), "{tool:?}");
        assert!(editor.commits.is_empty(), "{tool:?}");
        assert_eq!(editor.ticks, 0, "{tool:?}");
    }
}

#[test]
fn translate_axis_aimed_at_camera_does_not_start() {
    let (scene, id) = scene_with_box(Transform::IDENTITY);
    let ctx = front_view();
    let basis = GizmoBasis::world(Vec3::ZERO, ctx.camera_position);
    let mut gizmo = TranslateGizmo::new(id);

    // Z points straight at the eye, so the fallback drag plane is edge-on
    let center = ctx.project(Vec3::ZERO).pos();
    let result = gizmo.begin_drag(&scene, &basis, &ctx, TranslateHandle::Axis(Axis::Z), center);
    assert_eq!(result, Err(GizmoError::RayMissed));
    assert!(!gizmo.is_dragging());
    assert_eq!(scene.transform(id).unwrap(), Transform::IDENTITY);
}

#[test]
fn translate_ray_missing_plane_keeps_last_position() {
    let (mut scene, id) = scene_with_box(Transform::IDENTITY);
    let viewport = Viewport::new(800.0, 600.0);
    let mut camera = OrbitCamera::new(viewport.aspect());
    let config = GizmoConfig::default();
    let mut editor = Editor::default();

    let ctx = camera.view_context(viewport);
    let basis = GizmoBasis::world(Vec3::ZERO, ctx.camera_position);
    let start = ctx.project(basis.along(0, 0.5)).pos();
    let mut gizmo = TranslateGizmo::new(id);
    gizmo
        .begin_drag(&scene, &basis, &ctx, TranslateHandle::Axis(Axis::X), start)
        .unwrap();
    gizmo
        .drag_to(&mut scene, &mut editor, &ctx, &config, start + Vec2::new(40.0, 0.0))
        .unwrap();
    let moved = scene.transform(id).unwrap();
    assert!(moved.position.x > 0.0);

    // Step past the drag plane so it sits behind the eye
    camera.target = Vec3::new(0.0, 0.0, -20.0);
    camera.orbit(0.0, 0.0);
    let behind = camera.view_context(viewport);
    let result = gizmo.drag_to(
        &mut scene,
        &mut editor,
        &behind,
        &config,
        behind.project(camera.target).pos(),
    );
    assert_eq!(result, Err(GizmoError::RayMissed));

    let held = scene.transform(id).unwrap();
    assert_eq!(held, moved);
    assert!(held.position.is_finite());
    assert_eq!(editor.ticks, 1);
    assert!(gizmo.end_drag(&scene, &mut editor).unwrap());
    assert_eq!(editor.commits, vec!["Translate".to_owned()]);
}

#[test]
fn scale_axis_seen_end_on_is_rejected() {
    let mut start = Transform::IDENTITY;
    start.scale = Vec3::new(2.0, 0.5, 1.5);
    let (mut scene, id) = scene_with_box(start);
    let ctx = front_view();
    let config = GizmoConfig::default();
    let mut editor = Editor::default();
    let basis = GizmoBasis::from_scene(&scene, id, ctx.camera_position, TransformSpace::Local)
        .unwrap();
    let mut gizmo = ScaleGizmo::new(id);

    let cursor = ctx.project(basis.origin).pos();
    let result = gizmo.begin_drag(&scene, &basis, &ctx, &config, ScaleHandle::Axis(Axis::Z), cursor);
    assert_eq!(result, Err(GizmoError::DegenerateHandle));
    assert!(!gizmo.is_dragging());
    assert_eq!(
        gizmo.drag_to(&mut scene, &mut editor, &ctx, &config, cursor + Vec2::splat(50.0)),
        Err(GizmoError::NoActiveDrag)
    );

    assert_eq!(scene.transform(id).unwrap(), start);
    assert!(editor.commits.is_empty());
    assert_eq!(editor.ticks, 0);
}

#[test]
fn points_at_or_behind_the_eye_do_not_project() {
    let ctx = front_view();

    let behind = ctx.project(Vec3::new(0.5, -0.5, 20.0));
    assert!(!behind.is_in_front());
    assert!(behind.pos().is_finite() && behind.z.is_finite() && behind.w.is_finite());

    // On the eye plane the clip w is exactly zero
    let level = ctx.project(Vec3::new(1.0, 0.0, 10.0));
    assert_eq!(level, ScreenPoint::DEGENERATE);
    assert!(!level.is_in_front());
}
