//! Map Cell and Cell Graph
//!
//! Represents the cells of a generated map and the adjacency between them.

use glam::Vec2;
use std::collections::{HashSet, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{point_in_polygon, signed_area, vertex_centroid};

/// A single polygonal cell of the map
///
/// Each cell represents one explorable region with:
/// - A unique ID, equal to its index in the owning [`CellGraph`]
/// - The site it was grown from
/// - Its refined boundary polygon, for rendering and hit testing
/// - Neighbor connectivity for the exploration rules
///
/// # Design Notes
///
/// Polygons are already inset by the configured gap, so neighboring cells do
/// not touch. Adjacency is therefore computed from near-coincident vertices,
/// not from shared edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Unique identifier for this cell (0 to cell_count-1)
    ///
    /// The same seed, boundary and configuration always produce the same
    /// IDs for the same cells.
    pub id: usize,

    /// Site of the tessellation this cell was clipped from
    pub site: Vec2,

    /// Boundary polygon after inset and vertex padding
    ///
    /// Closed implicitly from the last vertex back to the first; winding
    /// follows the boundary shape the map was generated in.
    pub polygon: Vec<Vec2>,

    /// IDs of adjacent cells, sorted ascending
    ///
    /// Never contains the cell's own ID.
    pub neighbors: Vec<usize>,

    /// Whether this is the cell exploration starts from
    pub is_start: bool,
}

impl Cell {
    /// Create a new cell without neighbors
    ///
    /// This is typically called during map generation, not by user code.
    pub fn new(id: usize, site: Vec2, polygon: Vec<Vec2>) -> Self {
        Self {
            id,
            site,
            polygon,
            neighbors: Vec::new(),
            is_start: false,
        }
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.binary_search(&other_cell_id).is_ok()
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// Average of the polygon vertices
    ///
    /// Good enough to place a marker on the cell. Cells cut from a concave
    /// boundary can have their average outside the polygon; those, and empty
    /// polygons, use the site instead.
    pub fn center(&self) -> Vec2 {
        vertex_centroid(&self.polygon)
            .filter(|&c| point_in_polygon(c, &self.polygon))
            .unwrap_or(self.site)
    }

    /// Unsigned polygon area
    pub fn area(&self) -> f32 {
        signed_area(&self.polygon).abs()
    }

    /// Even-odd containment test against the refined polygon
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.polygon)
    }
}

/// Cells of one generated map, indexed by ID
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellGraph {
    cells: Vec<Cell>,
}

impl CellGraph {
    /// Wrap cells whose IDs equal their indices
    pub(crate) fn from_cells(cells: Vec<Cell>) -> Self {
        debug_assert!(cells.iter().enumerate().all(|(i, c)| c.id == i));
        Self { cells }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn get(&self, id: usize) -> Option<&Cell> {
        self.cells.get(id)
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Neighbor IDs of a cell, empty for an unknown ID
    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.cells
            .get(id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// ID of the start cell, `None` for an empty graph
    pub fn start_cell(&self) -> Option<usize> {
        self.cells.iter().find(|c| c.is_start).map(|c| c.id)
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting cell ID
    /// * `hops` - Maximum number of neighbor hops (0 = just the center cell)
    ///
    /// # Returns
    ///
    /// Cell IDs within range, including the center cell, sorted by ID.
    /// Returns an empty vec if `center_id` is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_cell_map::*;
    ///
    /// let boundary = BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0));
    /// let map = generate_map(42, &boundary, &MapConfig::default()).unwrap();
    ///
    /// let start = map.start_cell();
    /// let nearby = map.graph().find_cells_within_radius(start, 1);
    /// assert!(nearby.contains(&start));
    /// assert_eq!(nearby.len(), map.graph().neighbors(start).len() + 1);
    /// ```
    ///
    /// # Performance
    ///
    /// Visits each reached cell once; at most O(cells + neighbor links).
    pub fn find_cells_within_radius(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.cells.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &cell_id in &current {
                for &neighbor in self.neighbors(cell_id) {
                    if neighbor < self.cells.len() && visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut cells: Vec<usize> = visited.into_iter().collect();
        cells.sort_unstable();
        cells
    }

    /// Every cell reachable from `start_id`, in breadth-first order
    pub fn reachable_from(&self, start_id: usize) -> Vec<usize> {
        if start_id >= self.cells.len() {
            return vec![];
        }

        let mut seen = vec![false; self.cells.len()];
        let mut order = Vec::with_capacity(self.cells.len());
        let mut queue = VecDeque::from([start_id]);
        seen[start_id] = true;

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for &neighbor in self.neighbors(id) {
                // Unknown IDs can only come from hand-built or deserialized graphs
                if let Some(flag) = seen.get_mut(neighbor) {
                    if !*flag {
                        *flag = true;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        order
    }

    /// Whether every cell can be reached from the start cell
    pub fn is_connected(&self) -> bool {
        match self.start_cell() {
            Some(start) => self.reachable_from(start).len() == self.cells.len(),
            None => self.cells.is_empty(),
        }
    }
}

impl<'a> IntoIterator for &'a CellGraph {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
