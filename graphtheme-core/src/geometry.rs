use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Number of points in a closed quadrilateral ring (4 corners + closing point).
pub const QUAD_RING_LEN: usize = 5;

/// A 2D point. Map units for feature geometry, pixels for chart footprints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A pixel-space rectangle with y growing downward (`top <= bottom`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelBounds {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Closed containment, inclusive on all four sides.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::rect(self.left, self.top, self.right, self.bottom)
    }
}

/// A closed polygon ring: the first vertex is repeated as the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a validated closed ring (at least a triangle plus the closing point).
    pub fn closed(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if vertices.len() < 4 {
            return Err(GeometryError::TooFewPoints {
                count: vertices.len(),
            });
        }
        if vertices.first() != vertices.last() {
            return Err(GeometryError::NotClosed);
        }
        Ok(Self { vertices })
    }

    /// Close an open ring by repeating its first vertex.
    pub fn close(mut vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if let Some(&first) = vertices.first() {
            if vertices.last() != Some(&first) {
                vertices.push(first);
            }
        }
        Self::closed(vertices)
    }

    /// Wrap host-supplied vertices without validation.
    pub fn from_unchecked(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// The 5-point footprint `[lt, lb, rb, rt, lt]` of a pixel rectangle.
    pub fn rect(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            vertices: vec![
                Point::new(left, top),
                Point::new(left, bottom),
                Point::new(right, bottom),
                Point::new(right, top),
                Point::new(left, top),
            ],
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_quadrilateral(&self) -> bool {
        self.vertices.len() == QUAD_RING_LEN
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }
}

/// Ray-casting parity test.
///
/// Casts a horizontal ray from `point` and toggles on each edge it crosses.
/// The half-open inequality on the edge's y-range keeps a vertex lying exactly
/// on the ray from being counted twice, and skips horizontal edges entirely.
/// `polygon` must be a closed ring; the result is unspecified otherwise.
pub fn point_in_polygon(point: &Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    if n == 0 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        let spans = (pi.y <= point.y && point.y < pj.y) || (pj.y <= point.y && point.y < pi.y);
        if spans && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Intersection point of segments `a1-a2` and `b1-b2`.
///
/// Touching at an endpoint counts. Parallel and collinear segments never
/// intersect, even when they overlap.
pub fn segment_intersection(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> Option<Point> {
    let ua_t = (b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x);
    let ub_t = (a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x);
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 {
        return None;
    }
    let ua = ua_t / denom;
    let ub = ub_t / denom;
    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(Point::new(
            a1.x + ua * (a2.x - a1.x),
            a1.y + ua * (a2.y - a1.y),
        ))
    } else {
        None
    }
}

/// Whether two closed quadrilaterals overlap.
///
/// Returns `None` when either ring does not have exactly five points. Otherwise
/// the quads overlap if a vertex of one lies inside the other, or if any pair
/// of edges crosses (the "+" case where neither contains a vertex of the other).
/// Only meaningful for simple, non-self-intersecting quadrilaterals.
pub fn quadrilaterals_overlap(quad: &[Point], quad2: &[Point]) -> Option<bool> {
    if quad.len() != QUAD_RING_LEN || quad2.len() != QUAD_RING_LEN {
        return None;
    }

    if quad.iter().any(|p| point_in_polygon(p, quad2))
        || quad2.iter().any(|p| point_in_polygon(p, quad))
    {
        return Some(true);
    }

    let crosses = quad.windows(2).any(|a| {
        quad2
            .windows(2)
            .any(|b| segment_intersection(&a[0], &a[1], &b[0], &b[1]).is_some())
    });
    Some(crosses)
}

/// True iff at least one vertex of `quad` lies within the closed `bounds`.
///
/// This is a conservative approximation: a footprint that fully encloses the
/// viewport without any vertex inside it is reported as outside.
pub fn intersects_viewport(bounds: &PixelBounds, quad: &[Point]) -> bool {
    quad.iter().any(|p| bounds.contains_point(p))
}

/// How a footprint is tested against the visible pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportTest {
    /// At least one footprint vertex inside the viewport.
    #[default]
    Vertex,
    /// Vertex test, falling back to a full quadrilateral overlap test.
    Overlap,
}

impl ViewportTest {
    pub fn is_visible(&self, bounds: &PixelBounds, quad: &[Point]) -> bool {
        if intersects_viewport(bounds, quad) {
            return true;
        }
        match self {
            ViewportTest::Vertex => false,
            ViewportTest::Overlap => {
                quadrilaterals_overlap(bounds.to_polygon().vertices(), quad).unwrap_or(false)
            }
        }
    }
}
