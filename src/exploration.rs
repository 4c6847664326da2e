//! Cell-by-cell exploration of a generated map
//!
//! The player starts on the start cell and may only open cells bordering the
//! cell they opened last. The map is won once every cell is open.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::CellGraph;
use crate::error::{MapError, Result};

/// State of one cell during exploration
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Locked,
    /// Borders the current cell and can be opened next
    Available,
    Opened,
}

/// Exploration progress over one [`CellGraph`]
///
/// # Examples
///
/// ```
/// use voronoi_cell_map::*;
/// use glam::Vec2;
///
/// let boundary = BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0));
/// let map = generate_map(42, &boundary, &MapConfig::default()).unwrap();
///
/// let mut exploration = Exploration::new(map.graph().clone());
/// assert_eq!(exploration.current(), map.start_cell());
///
/// let next = exploration.available_cells()[0];
/// assert!(exploration.select(next).unwrap());
/// assert_eq!(exploration.state(next), Some(CellState::Opened));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Exploration {
    graph: CellGraph,
    states: Vec<CellState>,
    current: usize,
}

impl Exploration {
    /// Start exploring with only the start cell opened
    ///
    /// An empty graph is trivially complete.
    pub fn new(graph: CellGraph) -> Self {
        let mut states = vec![CellState::Locked; graph.len()];
        let current = graph.start_cell().unwrap_or(0);
        if let Some(state) = states.get_mut(current) {
            *state = CellState::Opened;
        }

        let mut exploration = Self {
            graph,
            states,
            current,
        };
        exploration.refresh_availability();
        exploration
    }

    /// Open a cell bordering the current one
    ///
    /// Returns `Ok(false)` without changing anything if the cell is locked or
    /// already open.
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` for an ID outside the graph.
    pub fn select(&mut self, id: usize) -> Result<bool> {
        let state = self.states.get(id).copied().ok_or(MapError::CellNotFound(id))?;
        if state != CellState::Available {
            return Ok(false);
        }

        self.states[id] = CellState::Opened;
        self.current = id;
        self.refresh_availability();

        log::debug!(cell = id, opened = self.opened_count(); "Cell opened");
        if self.is_complete() {
            log::info!(cells = self.states.len(); "All cells opened");
        }
        Ok(true)
    }

    /// Only neighbors of the current cell stay available
    fn refresh_availability(&mut self) {
        for state in &mut self.states {
            if *state == CellState::Available {
                *state = CellState::Locked;
            }
        }
        for &neighbor in self.graph.neighbors(self.current) {
            if let Some(state) = self.states.get_mut(neighbor) {
                if *state != CellState::Opened {
                    *state = CellState::Available;
                }
            }
        }
    }

    #[inline]
    pub fn state(&self, id: usize) -> Option<CellState> {
        self.states.get(id).copied()
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn opened_count(&self) -> usize {
        self.states.iter().filter(|&&s| s == CellState::Opened).count()
    }

    /// IDs of the cells that can be opened next, ascending
    pub fn available_cells(&self) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, &s)| s == CellState::Available)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|&s| s == CellState::Opened)
    }

    #[inline]
    pub fn graph(&self) -> &CellGraph {
        &self.graph
    }
}
