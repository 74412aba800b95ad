//! Handle identifiers

use glam::Vec3;

/// Which axis is being manipulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All axes
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into a basis / vector
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// World unit vector
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Label drawn at the axis tip
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// The two other axes, in cyclic order
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::Z, Axis::X],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

/// A two-axis plane handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneAxes {
    /// Normal along Z
    XY,
    /// Normal along X
    YZ,
    /// Normal along Y
    ZX,
}

impl PlaneAxes {
    /// All planes
    pub const ALL: [PlaneAxes; 3] = [PlaneAxes::XY, PlaneAxes::YZ, PlaneAxes::ZX];

    /// In-plane axes
    pub fn axes(self) -> [Axis; 2] {
        self.normal().others()
    }

    /// Axis perpendicular to the plane
    pub fn normal(self) -> Axis {
        match self {
            PlaneAxes::XY => Axis::Z,
            PlaneAxes::YZ => Axis::X,
            PlaneAxes::ZX => Axis::Y,
        }
    }
}

/// Translate gizmo handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslateHandle {
    /// Single-axis arrow
    Axis(Axis),
    /// Two-axis plane patch
    Plane(PlaneAxes),
    /// Screen-parallel free move
    Center,
}

/// Rotate gizmo handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateHandle {
    /// Ring around an axis
    Axis(Axis),
    /// Camera-facing ring
    View,
}

/// Scale gizmo handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleHandle {
    /// Single-axis scale
    Axis(Axis),
    /// Uniform scale from the center handle
    Uniform,
}

/// Any gizmo handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoHandle {
    /// Handle of the translate gizmo
    Translate(TranslateHandle),
    /// Handle of the rotate gizmo
    Rotate(RotateHandle),
    /// Handle of the scale gizmo
    Scale(ScaleHandle),
}

/// Interaction state of a handle, selects its color and thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleState {
    /// Neither hovered nor dragged
    #[default]
    Idle,
    /// Under the pointer
    Hovered,
    /// Being dragged
    Active,
}

impl HandleState {
    /// State of `handle` given the hovered and dragged handles
    pub fn of<H: PartialEq>(handle: H, hovered: Option<H>, active: Option<H>) -> Self {
        if active.as_ref() == Some(&handle) {
            HandleState::Active
        } else if active.is_none() && hovered.as_ref() == Some(&handle) {
            HandleState::Hovered
        } else {
            HandleState::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_axes_are_perpendicular_to_normal() {
        for plane in PlaneAxes::ALL {
            let [a, b] = plane.axes();
            let n = plane.normal();
            assert_eq!(a.unit().cross(b.unit()), n.unit());
        }
    }

    #[test]
    fn test_state_prefers_active() {
        let x = TranslateHandle::Axis(Axis::X);
        let y = TranslateHandle::Axis(Axis::Y);
        assert_eq!(HandleState::of(x, Some(x), None), HandleState::Hovered);
        assert_eq!(HandleState::of(x, Some(x), Some(x)), HandleState::Active);
        // Hover is ignored while another handle is dragged
        assert_eq!(HandleState::of(x, Some(x), Some(y)), HandleState::Idle);
    }
}
