//! Points, triangles, and the two primitives the layout is built on:
//! squared distance and unsigned triangle area.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance. Only ever compared, never rooted.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Twice the signed area of `(a, b, c)`; positive for counter-clockwise order.
#[inline]
fn cross(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Unsigned area of the triangle `(a, b, c)`. Exactly 0 for collinear points.
#[inline]
pub fn area(a: &Point, b: &Point, c: &Point) -> f64 {
    0.5 * cross(a, b, c).abs()
}

/// A triangle with named vertex roles.
///
/// Splits cut from `apex` to a point on the base edge `base_start`–`base_end`.
/// The positional order `(apex, base_start, base_end)` is also the drawing order,
/// so rotating the roles changes which edge the next split operates on but
/// never the enclosed area or the winding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub apex: Point,
    pub base_start: Point,
    pub base_end: Point,
}

impl Triangle {
    pub const fn new(apex: Point, base_start: Point, base_end: Point) -> Self {
        Self {
            apex,
            base_start,
            base_end,
        }
    }

    pub fn from_points([apex, base_start, base_end]: [Point; 3]) -> Self {
        Self::new(apex, base_start, base_end)
    }

    /// Vertices in drawing order.
    pub fn points(&self) -> [Point; 3] {
        [self.apex, self.base_start, self.base_end]
    }

    pub fn area(&self) -> f64 {
        area(&self.apex, &self.base_start, &self.base_end)
    }

    pub fn is_finite(&self) -> bool {
        self.points().iter().all(Point::is_finite)
    }

    /// Cyclic relabel: `base_start` becomes the apex.
    pub fn rotate(&self) -> Triangle {
        Triangle::new(self.base_start, self.base_end, self.apex)
    }

    /// Cyclically relabel so the longest edge becomes the base.
    /// Ties prefer the current base, then the edge opposite `base_start`.
    pub fn rebase_to_longest_edge(&self) -> Triangle {
        let base = self.base_start.distance_squared(&self.base_end);
        let opposite_start = self.apex.distance_squared(&self.base_end);
        let opposite_end = self.apex.distance_squared(&self.base_start);
        let longest = base.max(opposite_start).max(opposite_end);

        if base == longest {
            *self
        } else if opposite_start == longest {
            self.rotate()
        } else {
            self.rotate().rotate()
        }
    }

    pub fn centroid(&self) -> Point {
        Point::new(
            (self.apex.x + self.base_start.x + self.base_end.x) / 3.0,
            (self.apex.y + self.base_start.y + self.base_end.y) / 3.0,
        )
    }

    /// Whether `p` lies inside or on the triangle, allowing `tolerance` of slack
    /// in each barycentric coordinate.
    pub fn contains(&self, p: &Point, tolerance: f64) -> bool {
        let total = cross(&self.apex, &self.base_start, &self.base_end);
        if total == 0.0 {
            // Degenerate: accept points on the bounding box of the segment.
            let [a, b, c] = self.points();
            let min_x = a.x.min(b.x).min(c.x) - tolerance;
            let max_x = a.x.max(b.x).max(c.x) + tolerance;
            let min_y = a.y.min(b.y).min(c.y) - tolerance;
            let max_y = a.y.max(b.y).max(c.y) + tolerance;
            return p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y;
        }
        let w0 = cross(p, &self.base_start, &self.base_end) / total;
        let w1 = cross(&self.apex, p, &self.base_end) / total;
        let w2 = cross(&self.apex, &self.base_start, p) / total;
        w0 >= -tolerance && w1 >= -tolerance && w2 >= -tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Triangle {
        Triangle::new(Point::new(a.0, a.1), Point::new(b.0, b.1), Point::new(c.0, c.1))
    }

    #[test]
    fn area_matches_known_value() {
        let t = tri((0.0, 0.0), (4.0, 0.0), (2.0, 4.0));
        assert_eq!(t.area(), 8.0);
    }

    #[test]
    fn area_ignores_order() {
        let t = tri((1.0, 2.0), (7.5, -3.0), (-2.0, 5.0));
        let [a, b, c] = t.points();
        let expected = t.area();
        assert_eq!(area(&c, &b, &a), expected);
        assert_eq!(t.rotate().area(), expected);
        assert_eq!(t.rotate().rotate().area(), expected);
    }

    #[test]
    fn collinear_area_is_exactly_zero() {
        let t = tri((0.0, 0.0), (1.0, 1.0), (3.0, 3.0));
        assert_eq!(t.area(), 0.0);
    }

    #[test]
    fn squared_distance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert_eq!(a.distance_squared(&b), 25.0);
        assert_eq!(b.distance_squared(&a), 25.0);
    }

    #[test]
    fn rebase_moves_longest_edge_to_base() {
        // Base (0,0)-(4,0) is the shortest edge here.
        let t = tri((2.0, 4.0), (0.0, 0.0), (4.0, 0.0));
        let r = t.rebase_to_longest_edge();
        let base = r.base_start.distance_squared(&r.base_end);
        assert_eq!(base, 20.0);
        assert_eq!(r.area(), t.area());
        assert_eq!(r, t.rotate());

        let already = tri((0.0, 0.0), (4.0, 0.0), (2.0, 4.0));
        assert_eq!(already.rebase_to_longest_edge(), already);

        let third = tri((0.0, 10.0), (1.0, 0.0), (0.0, 0.0));
        let r = third.rebase_to_longest_edge();
        assert_eq!(r, third.rotate().rotate());
        assert_eq!(r.base_start.distance_squared(&r.base_end), 101.0);
    }

    #[test]
    fn contains_vertices_and_centroid_only() {
        let t = tri((0.0, 0.0), (4.0, 0.0), (2.0, 4.0));
        for p in t.points() {
            assert!(t.contains(&p, 1e-9));
        }
        assert!(t.contains(&t.centroid(), 0.0));
        assert!(!t.contains(&Point::new(5.0, 5.0), 1e-9));
    }
}
