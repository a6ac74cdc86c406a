//! Geometry primitives used by the calculators and detectors.
//!
//! All positions are millimetres in the field frame (origin at the centre
//! spot, x along the field length). Velocities are metres per second.

mod field;
mod shapes;

pub use field::Field;
pub use shapes::{Ray, Rectangle, Tube};

/// 2D vector in field coordinates.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Build a [`Vec2`] without importing nalgebra at the call site.
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Unsigned angle between two vectors in radians, `[0, π]`.
///
/// Returns 0 when either vector has no direction.
pub fn angle_between(a: &Vec2, b: &Vec2) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na <= f64::EPSILON || nb <= f64::EPSILON {
        return 0.0;
    }
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// Unit vector pointing along `angle` (radians).
pub fn unit_from_angle(angle: f64) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Closest point on segment `a`-`b` to `p`.
pub fn closest_point_on_segment(p: &Vec2, a: &Vec2, b: &Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::EPSILON {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to segment `a`-`b`.
pub fn distance_to_segment(p: &Vec2, a: &Vec2, b: &Vec2) -> f64 {
    (p - closest_point_on_segment(p, a, b)).norm()
}

/// Intersection of segments `p1`-`p2` and `q1`-`q2`, if any.
pub fn segment_intersection(p1: &Vec2, p2: &Vec2, q1: &Vec2, q2: &Vec2) -> Option<Vec2> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = r.perp(&s);
    if denom.abs() <= f64::EPSILON {
        return None;
    }
    let qp = q1 - p1;
    let t = qp.perp(&s) / denom;
    let u = qp.perp(&r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + r * t)
    } else {
        None
    }
}
