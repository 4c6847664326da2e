//! Planar polygon helpers
//!
//! Polygons are plain vertex slices, closed implicitly from the last vertex
//! back to the first.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Smallest box around `points`, or `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Simple polygon delimiting the area a map is generated in
///
/// Fewer than three vertices is allowed and describes an empty region: it
/// contains no point, so sampling and clipping produce nothing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryShape {
    vertices: Vec<Vec2>,
}

impl BoundaryShape {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle with corners `min` and `max`, counter-clockwise
    pub fn rectangle(min: Vec2, max: Vec2) -> Self {
        Self::new(vec![
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    /// Regular polygon approximating a circle
    pub fn regular(center: Vec2, radius: f32, sides: usize) -> Self {
        let step = std::f32::consts::TAU / sides.max(1) as f32;
        Self::new(
            (0..sides)
                .map(|i| center + Vec2::from_angle(step * i as f32) * radius)
                .collect(),
        )
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether the shape encloses any area at all
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.vertices)
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.vertices)
    }
}

/// Even-odd (ray casting) point-in-polygon test
///
/// Returns false for polygons with fewer than three vertices. Horizontal
/// edges never count as crossings.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y + f32::EPSILON) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Average of the polygon's vertices (not the area centroid)
pub fn vertex_centroid(polygon: &[Vec2]) -> Option<Vec2> {
    if polygon.is_empty() {
        return None;
    }
    let sum: Vec2 = polygon.iter().copied().sum();
    Some(sum / polygon.len() as f32)
}

/// Signed shoelace area; positive for counter-clockwise winding
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        twice_area += a.perp_dot(b);
    }
    twice_area * 0.5
}
