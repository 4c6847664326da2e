//! Map generation pipeline and its result

use glam::Vec2;

use crate::cell::{Cell, CellGraph};
use crate::config::MapConfig;
use crate::error::{MapError, Result};
use crate::generation::{
    assemble_cells, build_adjacency, generate_sites, DiagramEngine, HullDiagramEngine,
    PolygonRefiner,
};
use crate::geometry::BoundaryShape;
use crate::random::SeedSource;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Generates cell maps from a configuration and a diagram engine
///
/// The generator holds no per-run state: every call to [`generate`] starts a
/// fresh random stream from its seed, so one generator can serve any number
/// of requests and identical inputs always give identical maps.
///
/// [`generate`]: MapGenerator::generate
///
/// # Examples
///
/// ```
/// use voronoi_cell_map::*;
/// use glam::Vec2;
///
/// let generator = MapGenerator::new(MapConfig::default());
/// let boundary = BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0));
///
/// let map = generator.generate(42, &boundary).unwrap();
/// println!("Generated {} cells", map.cell_count());
///
/// let start = map.start_cell();
/// for &neighbor in map.graph().neighbors(start) {
///     println!("Cell {} borders the start cell", neighbor);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MapGenerator<D = HullDiagramEngine> {
    config: MapConfig,
    engine: D,
}

impl MapGenerator<HullDiagramEngine> {
    /// Generator using the bundled convex-hull diagram engine
    pub fn new(config: MapConfig) -> Self {
        Self::with_engine(config, HullDiagramEngine)
    }
}

impl<D: DiagramEngine> MapGenerator<D> {
    /// Generator using a custom tessellation backend
    pub fn with_engine(config: MapConfig, engine: D) -> Self {
        Self { config, engine }
    }

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Generate a map for `boundary` from `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed for the run's random stream; equal seeds give equal maps
    /// * `boundary` - Simple polygon to fill, convex or concave
    ///
    /// # Returns
    ///
    /// `Result<ExplorationMap>` - Cell graph with its start cell, or error
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration fails [`MapConfig::validate`].
    /// - `EmptyMap` if no cell survives, e.g. for a boundary with fewer than
    ///   three vertices. The caller must not start a game on it.
    /// - `GenerationFailed` if the diagram engine fails.
    ///
    /// # Performance
    ///
    /// Sampling is linear in the sample count; clipping and adjacency are
    /// quadratic in the site count, which stays small (`max_sites`).
    pub fn generate(&self, seed: u64, boundary: &BoundaryShape) -> Result<ExplorationMap> {
        let mut rng = SeedSource::new(seed);
        self.generate_with(&mut rng, boundary)
    }

    /// Generate a map drawing from an existing random stream
    ///
    /// The map depends on the stream's current position, not only its seed.
    pub fn generate_with(&self, rng: &mut SeedSource, boundary: &BoundaryShape) -> Result<ExplorationMap> {
        let config = &self.config;
        config.validate()?;

        // Steps 1-3: sample, augment, reduce
        let sites: Vec<Vec2> = generate_sites(config, rng, boundary)
            .into_iter()
            .map(|s| s.position)
            .collect();

        // Step 4: tessellate and clip
        let diagram = self.engine.compute_diagram(&sites)?;

        // Step 5: inset and pad each clipped region
        let refiner = PolygonRefiner::new(config.gap, config.min_polygon_corners);
        let refined: Vec<Vec<Vec2>> = (0..sites.len())
            .map(|i| {
                let clipped = self.engine.clip(&diagram, boundary, i);
                if clipped.is_empty() {
                    clipped
                } else {
                    refiner.refine(&clipped, rng)
                }
            })
            .collect();

        // Step 6: cells and start cell
        let assembled = assemble_cells(refined, &sites)?;
        let mut cells = assembled.cells;

        // Step 7: adjacency
        let polygons: Vec<&[Vec2]> = cells.iter().map(|c| c.polygon.as_slice()).collect();
        let adjacency = build_adjacency(&polygons, config.adjacency_epsilon());
        for (cell, neighbors) in cells.iter_mut().zip(adjacency) {
            cell.neighbors = neighbors;
        }

        let map = ExplorationMap::new(CellGraph::from_cells(cells), assembled.start, sites);
        log::info!(
            seed = rng.seed(),
            cells = map.cell_count(),
            start = map.start_cell();
            "Map generated"
        );
        Ok(map)
    }
}

/// Generate a map with the default diagram engine
///
/// Shorthand for `MapGenerator::new(*config).generate(seed, boundary)`.
pub fn generate_map(seed: u64, boundary: &BoundaryShape, config: &MapConfig) -> Result<ExplorationMap> {
    MapGenerator::new(*config).generate(seed, boundary)
}

/// A generated map: the cell graph plus its start cell
///
/// Owns all of its data; nothing points back into the generator.
#[derive(Debug, Clone)]
pub struct ExplorationMap {
    graph: CellGraph,
    start: usize,
    /// Sites handed to the diagram engine, site 0 being the focal point
    sites: Vec<Vec2>,

    /// Spatial index over cell centers (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl ExplorationMap {
    fn new(graph: CellGraph, start: usize, sites: Vec<Vec2>) -> Self {
        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let centers: Vec<Vec2> = graph.iter().map(|c| c.center()).collect();
            SpatialIndex::new(&centers)
        };

        Self {
            graph,
            start,
            sites,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    #[inline]
    pub fn graph(&self) -> &CellGraph {
        &self.graph
    }

    /// Give up the map, keeping only the graph
    pub fn into_graph(self) -> CellGraph {
        self.graph
    }

    #[inline]
    pub fn start_cell(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.graph.len()
    }

    #[inline]
    pub fn get_cell(&self, id: usize) -> Option<&Cell> {
        self.graph.get(id)
    }

    /// Final site positions, in the order the diagram engine received them
    #[inline]
    pub fn sites(&self) -> &[Vec2] {
        &self.sites
    }

    /// Find the cell whose polygon contains a position (requires spatial-index feature)
    ///
    /// # Arguments
    ///
    /// * `position` - Point in boundary coordinates
    ///
    /// # Returns
    ///
    /// ID of the containing cell. `None` for points in the gutters between
    /// cells or outside the map.
    ///
    /// # Performance
    ///
    /// The cell with the nearest center is checked first via the KD-tree,
    /// which usually answers in O(log n); misses fall back to a linear scan.
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: Vec2) -> Option<usize> {
        let nearest = self.spatial_index.find_nearest(position);
        if self.graph.get(nearest).is_some_and(|c| c.contains(position)) {
            return Some(nearest);
        }
        self.graph.iter().find(|c| c.contains(position)).map(|c| c.id)
    }

    /// Check that an ID names a cell of this map
    pub fn require_cell(&self, id: usize) -> Result<&Cell> {
        self.graph.get(id).ok_or(MapError::CellNotFound(id))
    }
}
