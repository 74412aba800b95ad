//! Projection and intersection math
//!
//! All functions are pure and total. Degenerate inputs produce sentinels
//! (`ScreenPoint::DEGENERATE`, a zero ray direction, `None`) instead of NaN.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::constants::math::{PARALLEL_EPSILON, W_EPSILON};

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport, clamping each side to at least one pixel
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Width / height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A projected point: pixel coordinates (Y down), NDC depth, and clip `w`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Pixels from the left edge
    pub x: f32,
    /// Pixels from the top edge
    pub y: f32,
    /// NDC depth
    pub z: f32,
    /// Clip-space w, a camera-space depth proxy
    pub w: f32,
}

impl ScreenPoint {
    /// Returned when the point projects with `w == 0`
    pub const DEGENERATE: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 0.0,
    };

    /// Pixel position
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Whether the point lies in front of the camera
    pub fn is_in_front(&self) -> bool {
        self.w > W_EPSILON
    }
}

/// Project a world point to screen space
pub fn project(point: Vec3, view_proj: &Mat4, viewport: Viewport) -> ScreenPoint {
    let clip: Vec4 = *view_proj * point.extend(1.0);
    if clip.w.abs() < W_EPSILON {
        return ScreenPoint::DEGENERATE;
    }
    let ndc = clip.truncate() / clip.w;
    ScreenPoint {
        x: (ndc.x + 1.0) * 0.5 * viewport.width,
        y: (1.0 - ndc.y) * 0.5 * viewport.height,
        z: ndc.z,
        w: clip.w,
    }
}

/// A world-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point, the camera position for pointer rays
    pub origin: Vec3,
    /// Unit direction, or zero when the ray could not be formed
    pub direction: Vec3,
}

impl Ray {
    /// Point at parameter `t`
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Build the ray from the camera through a pixel.
///
/// The pixel is unprojected at the far plane and the direction runs from the
/// camera position toward that point.
pub fn screen_to_ray(
    screen: Vec2,
    viewport: Viewport,
    inv_view_proj: &Mat4,
    camera_position: Vec3,
) -> Ray {
    let ndc_x = 2.0 * screen.x / viewport.width - 1.0;
    let ndc_y = 1.0 - 2.0 * screen.y / viewport.height;
    let far = inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

    Ray {
        origin: camera_position,
        direction: (far - camera_position).normalize_or_zero(),
    }
}

/// An infinite plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane
    pub point: Vec3,
    /// Unit normal
    pub normal: Vec3,
}

impl Plane {
    /// Create a plane, normalizing the normal
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }
}

/// Ray-plane intersection.
///
/// Returns `None` when the ray is parallel to the plane or the plane lies
/// behind the ray origin.
pub fn ray_plane_intersection(ray: &Ray, plane: &Plane) -> Option<Vec3> {
    let denom = plane.normal.dot(ray.direction);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane.point - ray.origin).dot(plane.normal) / denom;
    if t < 0.0 || !t.is_finite() {
        return None;
    }

    Some(ray.at(t))
}

/// Wrap an angle into `(-PI, PI]`
pub fn wrap_angle(mut angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Quantize `value` to the nearest multiple of `increment`.
/// Non-positive increments leave the value unchanged.
pub fn snap(value: f32, increment: f32) -> f32 {
    if increment > 0.0 && increment.is_finite() {
        (value / increment).round() * increment
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use approx::assert_abs_diff_eq;

    fn test_camera() -> (OrbitCamera, Viewport) {
        let viewport = Viewport::new(800.0, 600.0);
        let mut camera = OrbitCamera::new(viewport.aspect());
        camera.orbit(0.4, 0.3);
        (camera, viewport)
    }

    #[test]
    fn test_project_centers_target() {
        let (camera, viewport) = test_camera();
        let p = project(camera.target, &camera.view_projection_matrix(), viewport);
        assert_abs_diff_eq!(p.x, 400.0, epsilon = 1e-2);
        assert_abs_diff_eq!(p.y, 300.0, epsilon = 1e-2);
        assert!(p.is_in_front());
        assert_abs_diff_eq!(p.w, camera.distance, epsilon = 1e-3);
    }

    #[test]
    fn test_project_y_grows_downward() {
        let (camera, viewport) = test_camera();
        let vp = camera.view_projection_matrix();
        let low = project(camera.target, &vp, viewport);
        let high = project(camera.target + Vec3::Y, &vp, viewport);
        assert!(high.y < low.y);
    }

    #[test]
    fn test_project_degenerate_w() {
        let p = project(Vec3::ONE, &Mat4::ZERO, Viewport::new(100.0, 100.0));
        assert_eq!(p, ScreenPoint::DEGENERATE);
        assert!(!p.is_in_front());
    }

    #[test]
    fn test_round_trip_projection() {
        let (camera, viewport) = test_camera();
        let vp = camera.view_projection_matrix();
        let inv = vp.inverse();
        let forward = camera.forward();

        for point in [
            Vec3::new(0.3, -0.2, 0.5),
            Vec3::new(-1.0, 0.7, 0.1),
            Vec3::new(0.0, 0.0, 0.0),
        ] {
            let screen = project(point, &vp, viewport);
            let ray = screen_to_ray(screen.pos(), viewport, &inv, camera.position);
            let hit = ray_plane_intersection(&ray, &Plane::new(point, forward)).unwrap();
            assert_abs_diff_eq!(hit.x, point.x, epsilon = 1e-3);
            assert_abs_diff_eq!(hit.y, point.y, epsilon = 1e-3);
            assert_abs_diff_eq!(hit.z, point.z, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_ray_parallel_to_plane() {
        let ray = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
        };
        assert!(ray_plane_intersection(&ray, &Plane::new(Vec3::ZERO, Vec3::Y)).is_none());
    }

    #[test]
    fn test_plane_behind_ray() {
        let ray = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::Y,
        };
        assert!(ray_plane_intersection(&ray, &Plane::new(Vec3::ZERO, Vec3::Y)).is_none());
    }

    #[test]
    fn test_zero_direction_ray_never_hits() {
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::ZERO,
        };
        assert!(ray_plane_intersection(&ray, &Plane::new(Vec3::X, Vec3::X)).is_none());
    }

    #[test]
    fn test_wrap_angle_range() {
        assert_abs_diff_eq!(wrap_angle(2.5 * PI), 0.5 * PI, epsilon = 1e-5);
        assert_abs_diff_eq!(wrap_angle(-PI), PI, epsilon = 1e-6);
        assert_abs_diff_eq!(wrap_angle(-1.5 * PI), 0.5 * PI, epsilon = 1e-5);
        assert_abs_diff_eq!(wrap_angle(0.25), 0.25);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_snap_matches_round_formula() {
        for (d, s) in [(0.26, 0.25), (-0.38, 0.25), (1.74, 0.5), (7.0, 2.0)] {
            assert_eq!(snap(d, s), (d / s).round() * s);
        }
        assert_eq!(snap(0.37, 0.0), 0.37);
    }
}
