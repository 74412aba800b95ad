//! Handle picking
//!
//! Ray casts against the simplified hit shapes of gizmo handles. Every test
//! returns the ray parameter `t` of the hit so that callers can keep the
//! nearest handle.

use glam::{Vec2, Vec3};

use crate::constants::math::PARALLEL_EPSILON;
use crate::math::Ray;

/// Ray against a finite cylinder between `start` and `end`.
///
/// The ray and the cylinder axis are projected onto the plane perpendicular
/// to the axis, which turns the surface test into a 2D quadratic. The hit is
/// then rejected if it lies beyond either end cap.
pub fn ray_cylinder(ray: &Ray, start: Vec3, end: Vec3, radius: f32) -> Option<f32> {
    let length = (end - start).length();
    if length <= f32::EPSILON {
        return None;
    }
    let axis = (end - start) / length;

    let d = ray.direction - axis * ray.direction.dot(axis);
    let offset = ray.origin - start;
    let o = offset - axis * offset.dot(axis);

    let a = d.dot(d);
    if a <= f32::EPSILON {
        // Ray parallel to the axis
        return None;
    }
    let b = 2.0 * d.dot(o);
    let c = o.dot(o) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t < 0.0 {
        return None;
    }

    let along = (ray.at(t) - start).dot(axis);
    (0.0..=length).contains(&along).then_some(t)
}

/// Ray against a sphere
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (t > 0.0).then_some(t)
}

/// Ray against a square patch spanned by unit vectors `u` and `v`
pub fn ray_quad(ray: &Ray, center: Vec3, u: Vec3, v: Vec3, half_size: f32) -> Option<f32> {
    let normal = u.cross(v).normalize_or_zero();
    let t = ray_plane_t(ray, center, normal)?;
    let local = ray.at(t) - center;
    (local.dot(u).abs() <= half_size && local.dot(v).abs() <= half_size).then_some(t)
}

/// Ray against a ring (circle with a hit tolerance) in the plane through
/// `center` with the given normal
pub fn ray_ring(ray: &Ray, center: Vec3, normal: Vec3, radius: f32, thickness: f32) -> Option<f32> {
    let t = ray_plane_t(ray, center, normal)?;
    let distance_from_ring = ((ray.at(t) - center).length() - radius).abs();
    (distance_from_ring <= thickness).then_some(t)
}

fn ray_plane_t(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (point - ray.origin).dot(normal) / denom;
    (t >= 0.0 && t.is_finite()).then_some(t)
}

/// Distance from `p` to the segment `a`-`b`, in the same units as the inputs
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Distance from `p` to a closed polyline
pub fn point_loop_distance(p: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [single] => p.distance(*single),
        _ => points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(&a, &b)| point_segment_distance(p, a, b))
            .fold(f32::INFINITY, f32::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    #[test]
    fn test_ray_hits_cylinder() {
        let r = ray(Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z);
        let t = ray_cylinder(&r, Vec3::ZERO, Vec3::X, 0.1).unwrap();
        assert_abs_diff_eq!(t, 0.9, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_misses_cylinder() {
        let r = ray(Vec3::new(0.5, 0.0, 1.0), Vec3::Z);
        assert!(ray_cylinder(&r, Vec3::ZERO, Vec3::X, 0.1).is_none());
    }

    #[test]
    fn test_ray_outside_cylinder_bounds() {
        let r = ray(Vec3::new(2.0, 0.0, 1.0), Vec3::NEG_Z);
        assert!(ray_cylinder(&r, Vec3::ZERO, Vec3::X, 0.1).is_none());
    }

    #[test]
    fn test_zero_length_cylinder() {
        let r = ray(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        assert!(ray_cylinder(&r, Vec3::ZERO, Vec3::ZERO, 0.1).is_none());
    }

    #[test]
    fn test_ray_sphere() {
        let r = ray(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_abs_diff_eq!(ray_sphere(&r, Vec3::ZERO, 1.0).unwrap(), 4.0, epsilon = 1e-5);
        assert!(ray_sphere(&r, Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_quad() {
        let r = ray(Vec3::new(0.3, 0.3, 5.0), Vec3::NEG_Z);
        assert!(ray_quad(&r, Vec3::new(0.3, 0.3, 0.0), Vec3::X, Vec3::Y, 0.1).is_some());
        assert!(ray_quad(&r, Vec3::new(0.5, 0.3, 0.0), Vec3::X, Vec3::Y, 0.1).is_none());
    }

    #[test]
    fn test_ray_ring() {
        let hit = ray(Vec3::new(1.0, 0.0, 5.0), Vec3::NEG_Z);
        let center = ray(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray_ring(&hit, Vec3::ZERO, Vec3::Z, 1.0, 0.05).is_some());
        assert!(ray_ring(&center, Vec3::ZERO, Vec3::Z, 1.0, 0.05).is_none());
        // Edge-on
        let edge = ray(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);
        assert!(ray_ring(&edge, Vec3::ZERO, Vec3::Z, 1.0, 0.05).is_none());
    }

    #[test]
    fn test_point_loop_distance() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert_abs_diff_eq!(point_loop_distance(Vec2::new(5.0, 2.0), &square), 2.0);
        // Closing edge
        assert_abs_diff_eq!(point_loop_distance(Vec2::new(-3.0, 5.0), &square), 3.0);
        assert_eq!(point_loop_distance(Vec2::ZERO, &[]), f32::INFINITY);
    }
}
