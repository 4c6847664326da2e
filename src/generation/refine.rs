//! Cell polygon refinement: inset gap and minimum vertex count
//!
//! Both passes return new polygons and leave their input untouched.

use glam::Vec2;

use crate::geometry::vertex_centroid;
use crate::random::SeedSource;

/// Upper bound on edge splits while padding a polygon
const MAX_PADDING_SPLITS: usize = 32;

/// Per-axis jitter added to inserted midpoints
const MIDPOINT_JITTER: f32 = 1e-3;

/// Vertices never travel further than this fraction of their centroid distance
const MAX_SHRINK_FRACTION: f32 = 0.999;

/// Pull every vertex towards the vertex centroid by `gap`
///
/// Movement is capped just short of the centroid so vertices never cross
/// it, which keeps winding and topology intact.
pub fn shrink_towards_centroid(polygon: &[Vec2], gap: f32) -> Vec<Vec2> {
    let Some(center) = vertex_centroid(polygon) else {
        return Vec::new();
    };

    polygon
        .iter()
        .map(|&v| {
            let to_center = center - v;
            let dist = to_center.length();
            if dist <= f32::EPSILON || gap <= 0.0 {
                v
            } else {
                v + to_center / dist * gap.min(dist * MAX_SHRINK_FRACTION)
            }
        })
        .collect()
}

/// Split the longest edges until the polygon has `min_vertices` corners
///
/// Each split inserts the jittered midpoint of the currently longest edge,
/// at most 32 times. Empty polygons are returned unchanged.
pub fn ensure_min_vertices(polygon: &[Vec2], min_vertices: usize, rng: &mut SeedSource) -> Vec<Vec2> {
    let mut result = polygon.to_vec();
    if result.is_empty() {
        return result;
    }

    let mut splits = 0;
    while result.len() < min_vertices && splits < MAX_PADDING_SPLITS {
        let n = result.len();
        let mut best_index = 0;
        let mut best_len = 0.0;
        for i in 0..n {
            let len = result[i].distance_squared(result[(i + 1) % n]);
            if len > best_len {
                best_len = len;
                best_index = i;
            }
        }

        let a = result[best_index];
        let b = result[(best_index + 1) % n];
        let jitter = Vec2::new(
            rng.range(-MIDPOINT_JITTER, MIDPOINT_JITTER),
            rng.range(-MIDPOINT_JITTER, MIDPOINT_JITTER),
        );
        result.insert(best_index + 1, (a + b) * 0.5 + jitter);
        splits += 1;
    }

    result
}

/// Inset then pad, in that order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonRefiner {
    pub gap: f32,
    pub min_corners: usize,
}

impl PolygonRefiner {
    pub fn new(gap: f32, min_corners: usize) -> Self {
        Self { gap, min_corners }
    }

    pub fn refine(&self, polygon: &[Vec2], rng: &mut SeedSource) -> Vec<Vec2> {
        let inset = shrink_towards_centroid(polygon, self.gap);
        if !inset.is_empty() && inset.len() < self.min_corners {
            ensure_min_vertices(&inset, self.min_corners, rng)
        } else {
            inset
        }
    }
}
