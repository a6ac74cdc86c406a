use super::{closest_point_on_segment, distance_to_segment, segment_intersection, Vec2};

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rectangle {
    /// Rectangle spanned by two arbitrary corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_center(center: Vec2, width: f64, height: f64) -> Self {
        let half = Vec2::new(width / 2.0, height / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Grow (positive) or shrink (negative) on every side.
    pub fn with_margin(&self, margin: f64) -> Self {
        let m = Vec2::new(margin, margin);
        let min = self.min - m;
        let max = self.max + m;
        // A shrink past the centre collapses to a point instead of inverting
        if min.x > max.x || min.y > max.y {
            let c = self.center();
            return Self { min: c, max: c };
        }
        Self { min, max }
    }

    /// Inclusive containment.
    pub fn contains(&self, p: &Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Containment with an extra margin on every side.
    pub fn contains_with_margin(&self, p: &Vec2, margin: f64) -> bool {
        self.with_margin(margin).contains(p)
    }

    fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Closest point on the rectangle outline.
    pub fn nearest_point_on_boundary(&self, p: &Vec2) -> Vec2 {
        let c = self.corners();
        let mut best = c[0];
        let mut best_dist = f64::MAX;
        for i in 0..4 {
            let candidate = closest_point_on_segment(p, &c[i], &c[(i + 1) % 4]);
            let dist = (candidate - p).norm();
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }
        best
    }

    /// Distance from `p` to the outline, negative when `p` is inside.
    pub fn signed_distance(&self, p: &Vec2) -> f64 {
        let d = (self.nearest_point_on_boundary(p) - p).norm();
        if self.contains(p) {
            -d
        } else {
            d
        }
    }

    /// Points where segment `a`-`b` crosses the outline.
    pub fn segment_intersections(&self, a: &Vec2, b: &Vec2) -> Vec<Vec2> {
        let c = self.corners();
        (0..4)
            .filter_map(|i| segment_intersection(a, b, &c[i], &c[(i + 1) % 4]))
            .collect()
    }

    /// For a point inside, the nearest point that lies `margin` outside the
    /// outline. Points already further out are returned unchanged.
    pub fn nearest_point_outside(&self, p: &Vec2, margin: f64) -> Vec2 {
        let grown = self.with_margin(margin);
        if !grown.contains(p) {
            return *p;
        }
        grown.nearest_point_on_boundary(p)
    }

    /// Clamp a point into the rectangle.
    pub fn clamp(&self, p: &Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }
}

/// Capsule around a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tube {
    pub start: Vec2,
    pub end: Vec2,
    pub radius: f64,
}

impl Tube {
    pub fn new(start: Vec2, end: Vec2, radius: f64) -> Self {
        Self { start, end, radius }
    }

    pub fn contains(&self, p: &Vec2) -> bool {
        distance_to_segment(p, &self.start, &self.end) <= self.radius
    }

    /// Whether a disc of `radius` around `p` overlaps the tube.
    pub fn intersects_circle(&self, p: &Vec2, radius: f64) -> bool {
        distance_to_segment(p, &self.start, &self.end) <= self.radius + radius
    }
}

/// Half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    dir: Vec2,
}

impl Ray {
    /// `None` for a zero direction.
    pub fn new(origin: Vec2, direction: Vec2) -> Option<Self> {
        let n = direction.norm();
        if n <= f64::EPSILON {
            return None;
        }
        Some(Self {
            origin,
            dir: direction / n,
        })
    }

    pub fn direction(&self) -> Vec2 {
        self.dir
    }

    /// Signed distance of the projection of `p` along the ray.
    pub fn along(&self, p: &Vec2) -> f64 {
        (p - self.origin).dot(&self.dir)
    }

    /// Perpendicular distance of `p` from the supporting line.
    pub fn lateral_distance(&self, p: &Vec2) -> f64 {
        (p - self.origin).perp(&self.dir).abs()
    }

    /// Whether the ray passes through the rectangle.
    pub fn hits(&self, rect: &Rectangle, max_length: f64) -> bool {
        if rect.contains(&self.origin) {
            return true;
        }
        let end = self.origin + self.dir * max_length;
        !rect.segment_intersections(&self.origin, &end).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec2;

    #[test]
    fn test_rectangle_margin_and_contains() {
        let r = Rectangle::from_center(vec2(0.0, 0.0), 200.0, 100.0);
        assert!(r.contains(&vec2(100.0, 50.0)));
        assert!(!r.contains(&vec2(101.0, 0.0)));
        assert!(r.contains_with_margin(&vec2(101.0, 0.0), 5.0));
        let collapsed = r.with_margin(-80.0);
        assert_eq!(collapsed.min, collapsed.max);
    }

    #[test]
    fn test_rectangle_nearest_point_outside() {
        let r = Rectangle::from_corners(vec2(0.0, -100.0), vec2(100.0, 100.0));
        let out = r.nearest_point_outside(&vec2(10.0, 0.0), 20.0);
        assert!((out - vec2(-20.0, 0.0)).norm() < 1e-9);
        let untouched = r.nearest_point_outside(&vec2(-50.0, 0.0), 20.0);
        assert_eq!(untouched, vec2(-50.0, 0.0));
    }

    #[test]
    fn test_rectangle_signed_distance() {
        let r = Rectangle::from_center(vec2(0.0, 0.0), 100.0, 100.0);
        assert!((r.signed_distance(&vec2(0.0, 0.0)) + 50.0).abs() < 1e-9);
        assert!((r.signed_distance(&vec2(80.0, 0.0)) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_tube_contains() {
        let t = Tube::new(vec2(0.0, 0.0), vec2(1000.0, 0.0), 500.0);
        assert!(t.contains(&vec2(500.0, 499.0)));
        assert!(!t.contains(&vec2(500.0, 501.0)));
        assert!(t.contains(&vec2(-300.0, 0.0)));
        assert!(t.intersects_circle(&vec2(500.0, 580.0), 90.0));
    }

    #[test]
    fn test_ray_projection() {
        let ray = Ray::new(vec2(0.0, 0.0), vec2(-2.0, 0.0)).unwrap();
        assert!((ray.along(&vec2(-100.0, 20.0)) - 100.0).abs() < 1e-9);
        assert!((ray.lateral_distance(&vec2(-100.0, 20.0)) - 20.0).abs() < 1e-9);
        assert!(Ray::new(vec2(0.0, 0.0), vec2(0.0, 0.0)).is_none());

        let box_behind = Rectangle::from_corners(vec2(-500.0, -50.0), vec2(-400.0, 50.0));
        assert!(ray.hits(&box_behind, 1000.0));
        assert!(!ray.hits(&box_behind, 300.0));
    }
}
