//! Seeded Voronoi cell-map generation
//!
//! A standalone library for cutting a 2D boundary into a small set of
//! irregular, gap-separated polygonal cells with neighbor connectivity,
//! suitable for exploration-style board games in any engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_cell_map::*;
//!
//! // Configure the generator
//! let config = MapConfigBuilder::new()
//!     .max_sites(20).unwrap()
//!     .gap(0.05).unwrap()
//!     .build().unwrap();
//!
//! let boundary = BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0));
//! let map = generate_map(42, &boundary, &config).unwrap();
//! println!("Generated {} cells", map.cell_count());
//!
//! // Walk the map from the start cell
//! let mut exploration = Exploration::new(map.graph().clone());
//! while let Some(&next) = exploration.available_cells().first() {
//!     exploration.select(next).unwrap();
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, cells and exploration state

// Modules
pub mod error;
pub mod config;
pub mod random;
pub mod geometry;
pub mod cell;
pub mod generation;
pub mod map;
pub mod exploration;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{MapError, Result};
pub use config::{MapConfig, MapConfigBuilder};
pub use random::SeedSource;
pub use geometry::{BoundaryShape, Bounds};
pub use cell::{Cell, CellGraph};
pub use generation::{DelaunayDiagram, DiagramEngine, HullDiagramEngine, Site};
pub use map::{generate_map, ExplorationMap, MapGenerator};
pub use exploration::{CellState, Exploration};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec2 for convenience
pub use glam::Vec2;
