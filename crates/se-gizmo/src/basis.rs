//! Gizmo basis builder

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use se_core::{EditorScene, EntityId, Transform};

use crate::constants::basis::{MIN_AXIS_LENGTH, MIN_CAMERA_DISTANCE, SCREEN_SCALE_FACTOR};

const UNIT_AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Space the gizmo axes are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransformSpace {
    /// World-aligned axes
    #[default]
    World,
    /// Axes follow the entity's world orientation
    Local,
    /// Nested Euler rings (rotation only)
    Gimbal,
}

impl TransformSpace {
    /// All spaces, in toolbar order
    pub const ALL: [TransformSpace; 3] = [
        TransformSpace::World,
        TransformSpace::Local,
        TransformSpace::Gimbal,
    ];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            TransformSpace::World => "World",
            TransformSpace::Local => "Local",
            TransformSpace::Gimbal => "Gimbal",
        }
    }

    /// Next space in the cycle World -> Local -> Gimbal -> World
    pub fn next(self) -> Self {
        match self {
            TransformSpace::World => TransformSpace::Local,
            TransformSpace::Local => TransformSpace::Gimbal,
            TransformSpace::Gimbal => TransformSpace::World,
        }
    }

    /// Gimbal only applies to rotation; other gizmos use local axes instead
    pub fn without_gimbal(self) -> Self {
        match self {
            TransformSpace::Gimbal => TransformSpace::Local,
            other => other,
        }
    }
}

/// Origin, axes and screen-consistent scale shared by all gizmos.
///
/// Rebuilt every frame from the authoritative world matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoBasis {
    /// World position of the manipulated entity
    pub origin: Vec3,
    /// Unit axes, indexed X / Y / Z
    pub axes: [Vec3; 3],
    /// World units per gizmo unit, always positive
    pub scale: f32,
    /// Camera position the scale was derived from
    pub camera_position: Vec3,
    /// Space the axes were built in
    pub space: TransformSpace,
}

/// Uniform gizmo scale for a camera / origin pair
pub fn screen_scale(camera_position: Vec3, origin: Vec3) -> f32 {
    let distance = camera_position.distance(origin);
    let distance = if distance.is_finite() {
        distance.max(MIN_CAMERA_DISTANCE)
    } else {
        MIN_CAMERA_DISTANCE
    };
    distance * SCREEN_SCALE_FACTOR
}

impl GizmoBasis {
    /// World-aligned basis at `origin`
    pub fn world(origin: Vec3, camera_position: Vec3) -> Self {
        Self {
            origin,
            axes: UNIT_AXES,
            scale: screen_scale(camera_position, origin),
            camera_position,
            space: TransformSpace::World,
        }
    }

    /// Basis aligned with the columns of a world matrix.
    ///
    /// Each column is re-normalized to strip scale; a collapsed column falls
    /// back to the matching world axis.
    pub fn local(world_matrix: &Mat4, camera_position: Vec3) -> Self {
        let origin = world_matrix.w_axis.truncate();
        let columns = [
            world_matrix.x_axis.truncate(),
            world_matrix.y_axis.truncate(),
            world_matrix.z_axis.truncate(),
        ];
        let mut axes = UNIT_AXES;
        for (axis, column) in axes.iter_mut().zip(columns) {
            if column.length() > MIN_AXIS_LENGTH && column.is_finite() {
                *axis = column.normalize();
            }
        }
        Self {
            origin,
            axes,
            scale: screen_scale(camera_position, origin),
            camera_position,
            space: TransformSpace::Local,
        }
    }

    /// Nested gimbal rings.
    ///
    /// Walking the rotation order from outermost to innermost, each ring's
    /// axis is its unit axis carried by the parent orientation and by every
    /// rotation applied before it. Changing the angle of a ring therefore
    /// rotates the entity about exactly that ring's axis.
    pub fn gimbal(
        origin: Vec3,
        parent_rotation: Quat,
        transform: &Transform,
        camera_position: Vec3,
    ) -> Self {
        let mut frame = parent_rotation.normalize();
        let mut axes = UNIT_AXES;
        for axis in transform.rotation_order.axes() {
            axes[axis] = (frame * UNIT_AXES[axis]).normalize_or_zero();
            frame *= Quat::from_axis_angle(UNIT_AXES[axis], transform.rotation[axis]);
        }
        Self {
            origin,
            axes,
            scale: screen_scale(camera_position, origin),
            camera_position,
            space: TransformSpace::Gimbal,
        }
    }

    /// Build the basis for an entity, `None` when the scene has no world
    /// matrix for it
    pub fn from_scene(
        scene: &dyn EditorScene,
        id: EntityId,
        camera_position: Vec3,
        space: TransformSpace,
    ) -> Option<Self> {
        let world = scene.world_matrix(id)?;
        let basis = match space {
            TransformSpace::World => Self::world(world.w_axis.truncate(), camera_position),
            TransformSpace::Local => Self::local(&world, camera_position),
            TransformSpace::Gimbal => {
                let transform = scene.transform(id)?;
                let (_, parent_rotation, _) =
                    scene.parent_world_matrix(id).to_scale_rotation_translation();
                Self::gimbal(
                    world.w_axis.truncate(),
                    parent_rotation,
                    &transform,
                    camera_position,
                )
            }
        };
        Some(basis)
    }

    /// Unit vector from the origin toward the camera (zero if they coincide)
    pub fn to_camera(&self) -> Vec3 {
        (self.camera_position - self.origin).normalize_or_zero()
    }

    /// Unit vector from the camera toward the origin
    pub fn view_direction(&self) -> Vec3 {
        -self.to_camera()
    }

    /// Point `distance` gizmo units along axis `index`
    pub fn along(&self, index: usize, distance: f32) -> Vec3 {
        self.origin + self.axes[index] * distance * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use se_core::EulerOrder;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_scale_tracks_camera_distance() {
        let near = GizmoBasis::world(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        let far = GizmoBasis::world(Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0));
        assert_abs_diff_eq!(far.scale / near.scale, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(near.scale, 2.0 * SCREEN_SCALE_FACTOR);
    }

    #[test]
    fn test_scale_positive_when_camera_at_origin() {
        for p in [Vec3::ZERO, Vec3::splat(3.5), Vec3::new(-1e6, 2.0, 0.0)] {
            assert!(GizmoBasis::world(p, p).scale > 0.0);
        }
        assert!(screen_scale(Vec3::ZERO, Vec3::splat(f32::INFINITY)) > 0.0);
    }

    #[test]
    fn test_local_axes_strip_scale() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 0.5, 3.0),
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let basis = GizmoBasis::local(&world, Vec3::new(0.0, 0.0, 10.0));
        assert!(basis.origin.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
        assert!(basis.axes[0].abs_diff_eq(Vec3::Y, 1e-6));
        assert!(basis.axes[1].abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!(basis.axes[2].abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_local_collapsed_column_falls_back() {
        let world = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        let basis = GizmoBasis::local(&world, Vec3::Z);
        assert_eq!(basis.axes[0], Vec3::X);
    }

    #[test]
    fn test_gimbal_follows_rotation_order() {
        let mut transform = Transform::IDENTITY;
        transform.rotation = Vec3::new(0.0, FRAC_PI_2, 0.0);

        // XYZ: X is outermost, so Y's rotation does not move the X ring but
        // carries the innermost Z ring onto the world X axis.
        transform.rotation_order = EulerOrder::XYZ;
        let xyz = GizmoBasis::gimbal(Vec3::ZERO, Quat::IDENTITY, &transform, Vec3::Z);
        assert!(xyz.axes[0].abs_diff_eq(Vec3::X, 1e-6));
        assert!(xyz.axes[1].abs_diff_eq(Vec3::Y, 1e-6));
        assert!(xyz.axes[2].abs_diff_eq(Vec3::X, 1e-6));

        // ZYX: reversed nesting moves the X ring instead
        transform.rotation_order = EulerOrder::ZYX;
        let zyx = GizmoBasis::gimbal(Vec3::ZERO, Quat::IDENTITY, &transform, Vec3::Z);
        assert!(zyx.axes[2].abs_diff_eq(Vec3::Z, 1e-6));
        assert!(zyx.axes[0].abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_gimbal_ring_rotates_about_its_axis() {
        let mut transform = Transform::IDENTITY;
        transform.rotation = Vec3::new(0.3, -0.7, 1.1);
        transform.rotation_order = EulerOrder::YZX;
        let parent = Quat::from_rotation_x(0.4);
        let basis = GizmoBasis::gimbal(Vec3::ZERO, parent, &transform, Vec3::Z);

        for axis in 0..3 {
            let mut rotated = transform;
            rotated.rotation[axis] += 0.25;
            let expected = Quat::from_axis_angle(basis.axes[axis], 0.25) * parent * transform.quat();
            let actual = parent * rotated.quat();
            assert!(
                expected.abs_diff_eq(actual, 1e-5) || expected.abs_diff_eq(-actual, 1e-5),
                "ring {axis} does not rotate about its own axis"
            );
        }
    }
}
