//! Core cell map generation stages
//!
//! Samples sites inside the boundary, thins them out, tessellates them and
//! turns the clipped regions into refined, connected cells.

mod adjacency;
mod cells;
mod diagram;
mod poisson;
mod reduce;
mod refine;
mod sites;

pub use adjacency::{build_adjacency, share_edge};
pub use cells::{assemble_cells, AssembledCells};
pub use diagram::{clip_to_bisector, DelaunayDiagram, DiagramEngine, HullDiagramEngine};
pub use poisson::PoissonSampler;
pub use reduce::reduce_sites;
pub use refine::{ensure_min_vertices, shrink_towards_centroid, PolygonRefiner};
pub use sites::{initial_sites, CenterNeighborhood, Site};

use crate::config::MapConfig;
use crate::geometry::BoundaryShape;
use crate::random::SeedSource;

/// Produce the final site list for a boundary (without tessellating)
///
/// Runs sampling, center augmentation, protection and reduction in that
/// order. Site 0 is always the configured focal point.
pub fn generate_sites(config: &MapConfig, rng: &mut SeedSource, boundary: &BoundaryShape) -> Vec<Site> {
    let focal = config.focal_point;

    // Step 1: Poisson-disk samples
    let sampler = PoissonSampler::new(
        config.min_site_distance,
        config.poisson_attempts,
        config.max_samples,
    );
    let samples = sampler.sample(rng, focal, boundary);

    // Step 2: Make sure the start cell will have enough neighbors
    let neighborhood = CenterNeighborhood {
        target: config.extra_center_neighbors,
        radius: config.center_neighbor_radius,
        jitter: config.center_neighbor_jitter,
        min_distance: config.min_site_distance,
    };
    let sites = neighborhood.augment(rng, focal, boundary, initial_sites(focal, &samples));
    let sites = neighborhood.protect(sites, focal);

    // Step 3: Cap the site count
    let reduced = reduce_sites(&sites, config.max_sites);

    log::debug!(
        samples = samples.len(),
        candidates = sites.len(),
        sites = reduced.len();
        "Sites generated"
    );
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_generate_sites_respects_cap_and_focal() {
        let config = MapConfig::default();
        let boundary = BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0));
        let sites = generate_sites(&config, &mut SeedSource::new(42), &boundary);

        assert_eq!(sites.len(), config.max_sites);
        assert_eq!(sites[0].position, config.focal_point);
        assert!(sites.iter().all(|s| boundary.contains(s.position)));
    }

    #[test]
    fn test_generate_sites_keeps_center_neighbors() {
        let config = MapConfig::default();
        let boundary = BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0));
        let sites = generate_sites(&config, &mut SeedSource::new(7), &boundary);

        let near_center = sites[1..]
            .iter()
            .filter(|s| s.position.length() <= config.center_neighbor_radius)
            .count();
        assert!(near_center >= 1);
        assert!(sites.iter().filter(|s| s.protected).count() >= near_center + 1);
    }

    #[test]
    fn test_generate_sites_degenerate_boundary() {
        let config = MapConfig::default();
        let boundary = BoundaryShape::new(vec![Vec2::ZERO, Vec2::ONE]);
        let sites = generate_sites(&config, &mut SeedSource::new(1), &boundary);
        // Only the focal point remains; it has no region to live in
        assert_eq!(sites.len(), 1);
    }
}
