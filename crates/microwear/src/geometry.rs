//! Planar primitives and intersection tests used by the statistics engine.
//!
//! Coordinates are image pixels (`[x, y]`, y pointing down). None of these
//! tests allocate.

/// Line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: [f64; 2],
    pub b: [f64; 2],
}

impl Segment {
    pub fn new(a: [f64; 2], b: [f64; 2]) -> Self {
        Self { a, b }
    }

    pub fn delta(&self) -> [f64; 2] {
        [self.b[0] - self.a[0], self.b[1] - self.a[1]]
    }

    pub fn length(&self) -> f64 {
        let [dx, dy] = self.delta();
        dx.hypot(dy)
    }

    pub fn midpoint(&self) -> [f64; 2] {
        [
            (self.a[0] + self.b[0]) * 0.5,
            (self.a[1] + self.b[1]) * 0.5,
        ]
    }

    /// Direction angle in radians, `atan2(dy, dx)`.
    pub fn angle(&self) -> f64 {
        let [dx, dy] = self.delta();
        dy.atan2(dx)
    }

    /// Axis-aligned bounds `(min, max)`.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.a[0].min(self.b[0]), self.a[1].min(self.b[1])],
            [self.a[0].max(self.b[0]), self.a[1].max(self.b[1])],
        )
    }
}

/// Axis-aligned rectangle, closed on all sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Rect {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }

    fn edges(&self) -> [Segment; 4] {
        let [x0, y0] = self.min;
        let [x1, y1] = self.max;
        [
            Segment::new([x0, y0], [x1, y0]),
            Segment::new([x1, y0], [x1, y1]),
            Segment::new([x1, y1], [x0, y1]),
            Segment::new([x0, y1], [x0, y0]),
        ]
    }
}

/// `(λ, γ)` parameters of the crossing point of two segments' supporting
/// lines, or `None` when they are parallel.
fn crossing_params(s: &Segment, t: &Segment) -> Option<(f64, f64)> {
    let [dx1, dy1] = s.delta();
    let [dx2, dy2] = t.delta();
    let det = dx1 * dy2 - dy1 * dx2;
    if det == 0.0 {
        return None;
    }
    let ox = t.a[0] - s.a[0];
    let oy = t.a[1] - s.a[1];
    let lambda = (ox * dy2 - oy * dx2) / det;
    let gamma = (ox * dy1 - oy * dx1) / det;
    Some((lambda, gamma))
}

/// Strict interior crossing: touching endpoints and parallel/collinear
/// segments do not count.
pub fn segments_cross(s: &Segment, t: &Segment) -> bool {
    match crossing_params(s, t) {
        Some((lambda, gamma)) => 0.0 < lambda && lambda < 1.0 && 0.0 < gamma && gamma < 1.0,
        None => false,
    }
}

/// Closed crossing test (`t, u ∈ [0, 1]`), used for grid cell coverage.
pub fn segments_touch(s: &Segment, t: &Segment) -> bool {
    match crossing_params(s, t) {
        Some((lambda, gamma)) => (0.0..=1.0).contains(&lambda) && (0.0..=1.0).contains(&gamma),
        None => false,
    }
}

/// Closest point of `seg` to `p` (parametric projection clamped to the segment).
pub fn closest_point_on_segment(seg: &Segment, p: [f64; 2]) -> [f64; 2] {
    let [dx, dy] = seg.delta();
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return seg.a;
    }
    let t = (((p[0] - seg.a[0]) * dx + (p[1] - seg.a[1]) * dy) / len_sq).clamp(0.0, 1.0);
    [seg.a[0] + t * dx, seg.a[1] + t * dy]
}

/// True when the segment comes within `radius` of `center`.
pub fn segment_hits_circle(seg: &Segment, center: [f64; 2], radius: f64) -> bool {
    let q = closest_point_on_segment(seg, center);
    let dx = q[0] - center[0];
    let dy = q[1] - center[1];
    dx * dx + dy * dy <= radius * radius
}

/// True when an endpoint lies inside `rect` or the segment crosses one of
/// its edges.
pub fn segment_touches_rect(seg: &Segment, rect: &Rect) -> bool {
    if rect.contains(seg.a) || rect.contains(seg.b) {
        return true;
    }
    rect.edges().iter().any(|edge| segments_touch(seg, edge))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: [f64; 2], b: [f64; 2]) -> Segment {
        Segment::new(a, b)
    }

    #[test]
    fn perpendicular_cross_is_detected() {
        let h = seg([2.0, 5.0], [8.0, 5.0]);
        let v = seg([5.0, 2.0], [5.0, 8.0]);
        assert!(segments_cross(&h, &v));
        assert!(segments_cross(&v, &h));
    }

    #[test]
    fn parallel_segments_never_cross() {
        let a = seg([0.0, 0.0], [10.0, 0.0]);
        let b = seg([0.0, 1.0], [10.0, 1.0]);
        assert!(!segments_cross(&a, &b));
        let collinear = seg([5.0, 0.0], [15.0, 0.0]);
        assert!(!segments_cross(&a, &collinear));
    }

    #[test]
    fn touching_endpoints_are_not_a_crossing() {
        let a = seg([0.0, 0.0], [10.0, 0.0]);
        let b = seg([10.0, 0.0], [10.0, 10.0]);
        assert!(!segments_cross(&a, &b));
        assert!(segments_touch(&a, &b));
    }

    #[test]
    fn disjoint_segments_do_not_cross() {
        let a = seg([0.0, 0.0], [1.0, 1.0]);
        let b = seg([5.0, 0.0], [6.0, -3.0]);
        assert!(!segments_cross(&a, &b));
    }

    #[test]
    fn circle_hit_uses_clamped_projection() {
        let s = seg([2.0, 5.0], [8.0, 5.0]);
        assert!(segment_hits_circle(&s, [5.0, 5.0], 1.0));
        assert!(segment_hits_circle(&s, [5.0, 6.0], 1.0));
        assert!(!segment_hits_circle(&s, [5.0, 6.5], 1.0));
        // Beyond the endpoint the distance is measured to the endpoint.
        assert!(!segment_hits_circle(&s, [10.0, 5.0], 1.5));
        assert!(segment_hits_circle(&s, [9.0, 5.0], 1.0));
    }

    #[test]
    fn degenerate_segment_projects_to_its_point() {
        let s = seg([3.0, 3.0], [3.0, 3.0]);
        assert_eq!(closest_point_on_segment(&s, [10.0, 10.0]), [3.0, 3.0]);
    }

    #[test]
    fn rect_touch_covers_inside_crossing_and_miss() {
        let r = Rect::new([0.0, 0.0], [10.0, 10.0]);
        assert!(segment_touches_rect(&seg([2.0, 2.0], [3.0, 3.0]), &r));
        assert!(segment_touches_rect(&seg([-5.0, 5.0], [15.0, 5.0]), &r));
        assert!(segment_touches_rect(&seg([-5.0, -5.0], [0.0, 0.0]), &r));
        assert!(!segment_touches_rect(&seg([11.0, 0.0], [20.0, 10.0]), &r));
    }

    #[test]
    fn segment_metrics() {
        let s = seg([0.0, 0.0], [3.0, 4.0]);
        assert_eq!(s.length(), 5.0);
        assert_eq!(s.midpoint(), [1.5, 2.0]);
        assert_eq!(s.bounds(), ([0.0, 0.0], [3.0, 4.0]));
    }
}
