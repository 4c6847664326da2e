//! Approximate shared-edge detection between cell polygons
//!
//! Cells are inset after clipping, so two neighbors no longer share exact
//! vertices. Instead a pair counts as adjacent when at least two vertices of
//! one polygon lie within `epsilon` of vertices of the other, which is what
//! the two endpoints of a shared edge look like after the inset. This is a
//! heuristic: a single close corner plus an unrelated close pair also links
//! two cells.

use glam::Vec2;

/// Close vertex pairs needed before two polygons count as adjacent
const MIN_SHARED_VERTICES: usize = 2;

/// Whether `a` and `b` appear to share an edge
pub fn share_edge(a: &[Vec2], b: &[Vec2], epsilon: f32) -> bool {
    let eps_sq = epsilon * epsilon;
    let mut hits = 0;
    for va in a {
        for vb in b {
            if va.distance_squared(*vb) < eps_sq {
                hits += 1;
                if hits >= MIN_SHARED_VERTICES {
                    return true;
                }
            }
        }
    }
    false
}

/// Symmetric neighbor lists for `polygons`, indexed like the input
///
/// Checks every unordered pair, so the cost is quadratic in the polygon
/// count times the vertex count; fine for maps of a few dozen cells.
pub fn build_adjacency<P: AsRef<[Vec2]>>(polygons: &[P], epsilon: f32) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); polygons.len()];
    for i in 0..polygons.len() {
        for j in (i + 1)..polygons.len() {
            if share_edge(polygons[i].as_ref(), polygons[j].as_ref(), epsilon) {
                neighbors[i].push(j);
                neighbors[j].push(i);
            }
        }
    }
    // Pushes arrive in ascending order already; sort keeps that explicit
    for list in &mut neighbors {
        list.sort_unstable();
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at(x: f32, y: f32, size: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x, y),
            Vec2::new(x + size, y),
            Vec2::new(x + size, y + size),
            Vec2::new(x, y + size),
        ]
    }

    #[test]
    fn test_shared_edge_detected() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(1.02, 0.0, 1.0);
        assert!(share_edge(&a, &b, 0.1));
        assert!(share_edge(&b, &a, 0.1));
    }

    #[test]
    fn test_single_corner_is_not_enough() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(1.02, 1.02, 1.0);
        assert!(!share_edge(&a, &b, 0.1));
    }

    #[test]
    fn test_gap_wider_than_epsilon() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(1.2, 0.0, 1.0);
        assert!(!share_edge(&a, &b, 0.1));
    }

    #[test]
    fn test_build_adjacency_grid() {
        // 2x2 grid with small gutters
        let polygons = vec![
            square_at(0.0, 0.0, 1.0),
            square_at(1.05, 0.0, 1.0),
            square_at(0.0, 1.05, 1.0),
            square_at(1.05, 1.05, 1.0),
        ];
        let adjacency = build_adjacency(&polygons, 0.1);

        assert_eq!(adjacency[0], vec![1, 2]);
        assert_eq!(adjacency[1], vec![0, 3]);
        assert_eq!(adjacency[2], vec![0, 3]);
        assert_eq!(adjacency[3], vec![1, 2]);
    }

    #[test]
    fn test_build_adjacency_symmetric_without_self_loops() {
        let polygons: Vec<Vec<Vec2>> = (0..5).map(|i| square_at(i as f32 * 1.01, 0.0, 1.0)).collect();
        let adjacency = build_adjacency(&polygons, 0.05);
        for (i, list) in adjacency.iter().enumerate() {
            assert!(!list.contains(&i));
            for &j in list {
                assert!(adjacency[j].contains(&i));
            }
        }
        assert_eq!(adjacency[2], vec![1, 3]);
    }
}
