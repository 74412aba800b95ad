//! Transform component with configurable Euler rotation order

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Order in which the Euler angles of a [`Transform`] are composed.
///
/// `XYZ` means the rotation matrix is `Rx * Ry * Rz`: the X rotation is the
/// outermost (applied last to a vector) and Z the innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EulerOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

impl EulerOrder {
    /// All orders, in display order
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::XYZ,
        EulerOrder::XZY,
        EulerOrder::YXZ,
        EulerOrder::YZX,
        EulerOrder::ZXY,
        EulerOrder::ZYX,
    ];

    /// Axis indices (0 = X, 1 = Y, 2 = Z) from outermost to innermost
    pub fn axes(self) -> [usize; 3] {
        match self {
            EulerOrder::XYZ => [0, 1, 2],
            EulerOrder::XZY => [0, 2, 1],
            EulerOrder::YXZ => [1, 0, 2],
            EulerOrder::YZX => [1, 2, 0],
            EulerOrder::ZXY => [2, 0, 1],
            EulerOrder::ZYX => [2, 1, 0],
        }
    }

    /// Position of `axis` in the composition (0 = outermost)
    pub fn position_of(self, axis: usize) -> usize {
        self.axes().iter().position(|&a| a == axis).unwrap_or(0)
    }

    fn glam(self) -> EulerRot {
        match self {
            EulerOrder::XYZ => EulerRot::XYZ,
            EulerOrder::XZY => EulerRot::XZY,
            EulerOrder::YXZ => EulerRot::YXZ,
            EulerOrder::YZX => EulerRot::YZX,
            EulerOrder::ZXY => EulerRot::ZXY,
            EulerOrder::ZYX => EulerRot::ZYX,
        }
    }

    /// Short label used in the UI
    pub fn label(self) -> &'static str {
        match self {
            EulerOrder::XYZ => "XYZ",
            EulerOrder::XZY => "XZY",
            EulerOrder::YXZ => "YXZ",
            EulerOrder::YZX => "YZX",
            EulerOrder::ZXY => "ZXY",
            EulerOrder::ZYX => "ZYX",
        }
    }

    /// Build a quaternion from per-axis angles (radians, indexed by axis)
    pub fn to_quat(self, angles: Vec3) -> Quat {
        let [a, b, c] = self.axes();
        Quat::from_euler(self.glam(), angles[a], angles[b], angles[c])
    }

    /// Decompose a quaternion into per-axis angles (radians, indexed by axis)
    pub fn from_quat(self, rotation: Quat) -> Vec3 {
        let (first, second, third) = rotation.normalize().to_euler(self.glam());
        let [a, b, c] = self.axes();
        let mut angles = Vec3::ZERO;
        angles[a] = first;
        angles[b] = second;
        angles[c] = third;
        angles
    }
}

/// Local (parent-relative) transform of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, indexed by axis (x, y, z)
    pub rotation: Vec3,
    pub rotation_order: EulerOrder,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        rotation_order: EulerOrder::XYZ,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Rotation as a quaternion
    pub fn quat(&self) -> Quat {
        self.rotation_order.to_quat(self.rotation)
    }

    /// Set the rotation from a quaternion, keeping the rotation order
    pub fn set_quat(&mut self, rotation: Quat) {
        self.rotation = self.rotation_order.from_quat(rotation);
    }

    /// Local matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Whether two transforms differ by more than `epsilon` in any field
    pub fn differs_from(&self, other: &Transform, epsilon: f32) -> bool {
        !self.position.abs_diff_eq(other.position, epsilon)
            || !self.rotation.abs_diff_eq(other.rotation, epsilon)
            || !self.scale.abs_diff_eq(other.scale, epsilon)
            || self.rotation_order != other.rotation_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_xyz_order_composes_outer_to_inner() {
        let angles = Vec3::new(0.3, -0.7, 1.1);
        let expected = Quat::from_rotation_x(0.3)
            * Quat::from_rotation_y(-0.7)
            * Quat::from_rotation_z(1.1);
        let q = EulerOrder::XYZ.to_quat(angles);
        assert!(q.abs_diff_eq(expected, 1e-5) || q.abs_diff_eq(-expected, 1e-5));
    }

    #[test]
    fn test_zyx_order_composes_outer_to_inner() {
        let angles = Vec3::new(0.3, -0.7, 1.1);
        let expected = Quat::from_rotation_z(1.1)
            * Quat::from_rotation_y(-0.7)
            * Quat::from_rotation_x(0.3);
        let q = EulerOrder::ZYX.to_quat(angles);
        assert!(q.abs_diff_eq(expected, 1e-5) || q.abs_diff_eq(-expected, 1e-5));
    }

    #[test]
    fn test_euler_round_trip_all_orders() {
        let angles = Vec3::new(0.4, 0.2, -0.9);
        for order in EulerOrder::ALL {
            let q = order.to_quat(angles);
            let back = order.from_quat(q);
            assert_abs_diff_eq!(back.x, angles.x, epsilon = 1e-4);
            assert_abs_diff_eq!(back.y, angles.y, epsilon = 1e-4);
            assert_abs_diff_eq!(back.z, angles.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_position_of() {
        assert_eq!(EulerOrder::YZX.position_of(1), 0);
        assert_eq!(EulerOrder::YZX.position_of(2), 1);
        assert_eq!(EulerOrder::YZX.position_of(0), 2);
    }

    #[test]
    fn test_matrix_translation_column() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.5, 0.0, 0.0),
            scale: Vec3::splat(2.0),
            ..Transform::IDENTITY
        };
        let m = t.to_matrix();
        assert_abs_diff_eq!(m.w_axis.x, 1.0);
        assert_abs_diff_eq!(m.w_axis.y, 2.0);
        assert_abs_diff_eq!(m.w_axis.z, 3.0);
    }

    #[test]
    fn test_differs_from() {
        let a = Transform::IDENTITY;
        let mut b = a;
        assert!(!a.differs_from(&b, 1e-6));
        b.scale.y = 1.5;
        assert!(a.differs_from(&b, 1e-6));
    }
}
