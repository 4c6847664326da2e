//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over cell centers
///
/// Answers "which center is closest to this point" in O(log n). The nearest
/// center is a strong hint for hit testing, not a guarantee: the caller still
/// checks the polygon.
#[derive(Clone)]
pub struct SpatialIndex {
    /// `None` when built from no centers
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("populated", &self.tree.is_some())
            .finish()
    }
}

impl SpatialIndex {
    /// Build spatial index from cell centers
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_cell_map::*;
    /// use glam::Vec2;
    ///
    /// let centers = vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0)];
    ///
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(Vec2::new(0.9, 0.1)), 0);
    /// ```
    pub fn new(centers: &[Vec2]) -> Self {
        if centers.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f32; 2]> = centers.iter().map(|c| [c.x, c.y]).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Index of the center closest to `position`
    ///
    /// Returns 0 for an index built from no centers.
    pub fn find_nearest(&self, position: Vec2) -> usize {
        match &self.tree {
            Some(tree) => tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]).item,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let centers = vec![
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, -1.0),
        ];

        let index = SpatialIndex::new(&centers);

        assert_eq!(index.find_nearest(Vec2::new(0.9, 0.1)), 0);
        assert_eq!(index.find_nearest(Vec2::new(0.0, 0.95)), 1);
        assert_eq!(index.find_nearest(Vec2::new(-0.8, 0.2)), 2);
        assert_eq!(index.find_nearest(Vec2::new(0.1, -3.0)), 3);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let centers = vec![Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        let index = SpatialIndex::new(&centers);

        assert_eq!(index.find_nearest(centers[0]), 0);
        assert_eq!(index.find_nearest(centers[1]), 1);
    }

    #[test]
    fn test_spatial_index_empty() {
        let index = SpatialIndex::new(&[]);
        assert_eq!(index.find_nearest(Vec2::ONE), 0);
    }
}
