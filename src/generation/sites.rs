//! Site list assembly and center-neighborhood augmentation

use glam::Vec2;
use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::BoundaryShape;
use crate::random::SeedSource;

/// Samples closer than this to the focal point duplicate site 0
const FOCAL_DEDUP_DISTANCE: f32 = 1e-3;

/// Injected neighbors are placed at this fraction of the neighborhood radius
const INJECT_RADIUS_FACTOR: f32 = 0.8;

/// Random spread around [`INJECT_RADIUS_FACTOR`]
const INJECT_RADIUS_SPREAD: f32 = 0.12;

/// Injected neighbors may sit this much closer to other sites than samples do
const INJECT_SPACING_FACTOR: f32 = 0.6;

/// Input point of the tessellation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub position: Vec2,
    /// Protected sites survive site reduction
    pub protected: bool,
}

impl Site {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            protected: false,
        }
    }

    pub fn protected(position: Vec2) -> Self {
        Self {
            position,
            protected: true,
        }
    }
}

/// Build the site list with the focal point at index 0
///
/// Samples coinciding with the focal point are dropped so it is not
/// duplicated when the sampler already started from it.
pub fn initial_sites(focal: Vec2, samples: &[Vec2]) -> Vec<Site> {
    let dedup_sq = FOCAL_DEDUP_DISTANCE * FOCAL_DEDUP_DISTANCE;
    std::iter::once(Site::protected(focal))
        .chain(
            samples
                .iter()
                .filter(|s| s.distance_squared(focal) >= dedup_sq)
                .map(|&s| Site::new(s)),
        )
        .collect()
}

/// Tops up the number of sites around the focal point
///
/// Poisson sampling can leave the center sparse, which would give the start
/// cell only a couple of neighbors. Missing neighbors are injected on a
/// jittered ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterNeighborhood {
    /// Sites wanted within `radius` of the focal point (excluding site 0)
    pub target: usize,
    pub radius: f32,
    /// Angular jitter in radians
    pub jitter: f32,
    /// Poisson minimum distance; injected sites use a looser fraction of it
    pub min_distance: f32,
}

impl CenterNeighborhood {
    /// Sites other than site 0 within the neighborhood radius
    pub fn count_neighbors(&self, sites: &[Site], focal: Vec2) -> usize {
        sites
            .iter()
            .skip(1)
            .filter(|s| s.position.distance(focal) <= self.radius)
            .count()
    }

    /// Return `sites` with injected center neighbors appended
    ///
    /// Candidates outside the boundary or closer than `0.6 * min_distance`
    /// to any site (including ones injected earlier) are skipped, so fewer
    /// than the missing count may be added.
    pub fn augment(
        &self,
        rng: &mut SeedSource,
        focal: Vec2,
        boundary: &BoundaryShape,
        mut sites: Vec<Site>,
    ) -> Vec<Site> {
        let existing = self.count_neighbors(&sites, focal);
        if existing >= self.target {
            return sites;
        }

        let need = self.target - existing;
        let spacing = self.min_distance * INJECT_SPACING_FACTOR;
        let spacing_sq = spacing * spacing;

        for n in 0..need {
            let angle = TAU * (n as f32 / need as f32) + rng.range(-self.jitter, self.jitter);
            let dist = self.radius
                * (INJECT_RADIUS_FACTOR + rng.range(-INJECT_RADIUS_SPREAD, INJECT_RADIUS_SPREAD));
            let candidate = focal + Vec2::from_angle(angle) * dist;

            if !boundary.contains(candidate) {
                continue;
            }
            if sites
                .iter()
                .any(|s| s.position.distance_squared(candidate) < spacing_sq)
            {
                continue;
            }
            sites.push(Site::new(candidate));
        }

        log::debug!(existing = existing, wanted = self.target, total = sites.len(); "Center neighborhood augmented");
        sites
    }

    /// Protect site 0 and every site inside the neighborhood radius
    pub fn protect(&self, mut sites: Vec<Site>, focal: Vec2) -> Vec<Site> {
        for (i, site) in sites.iter_mut().enumerate() {
            if i == 0 || site.position.distance(focal) <= self.radius {
                site.protected = true;
            }
        }
        sites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighborhood() -> CenterNeighborhood {
        CenterNeighborhood {
            target: 6,
            radius: 0.8,
            jitter: 0.12,
            min_distance: 0.45,
        }
    }

    fn big_square() -> BoundaryShape {
        BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0))
    }

    #[test]
    fn test_initial_sites_dedup_focal() {
        let samples = [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let sites = initial_sites(Vec2::ZERO, &samples);
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[0].position, Vec2::ZERO);
        assert!(sites[0].protected);
        assert!(!sites[1].protected);
    }

    #[test]
    fn test_initial_sites_without_focal_sample() {
        let samples = [Vec2::new(3.0, 3.0)];
        let sites = initial_sites(Vec2::ZERO, &samples);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].position, Vec2::ZERO);
    }

    #[test]
    fn test_augment_fills_empty_center() {
        let mut rng = SeedSource::new(42);
        let sites = vec![Site::protected(Vec2::ZERO)];
        let hood = neighborhood();
        let sites = hood.augment(&mut rng, Vec2::ZERO, &big_square(), sites);

        // Ring spacing at radius ~0.64 is far above 0.6 * 0.45, so all fit
        assert_eq!(sites.len(), 7);
        assert_eq!(hood.count_neighbors(&sites, Vec2::ZERO), 6);
        for s in &sites[1..] {
            let d = s.position.length();
            assert!(d >= 0.8 * 0.68 - 1e-4 && d <= 0.8 * 0.92 + 1e-4, "radius {}", d);
        }
    }

    #[test]
    fn test_augment_noop_when_dense_enough() {
        let mut rng = SeedSource::new(1);
        let mut sites = vec![Site::protected(Vec2::ZERO)];
        for i in 0..6 {
            sites.push(Site::new(Vec2::from_angle(i as f32) * 0.5));
        }
        let before = sites.clone();
        let after = neighborhood().augment(&mut rng, Vec2::ZERO, &big_square(), sites);
        assert_eq!(before, after);
    }

    #[test]
    fn test_augment_respects_boundary() {
        let mut rng = SeedSource::new(5);
        // Focal point on the left edge: half of the ring falls outside
        let boundary = BoundaryShape::rectangle(Vec2::new(0.0, -5.0), Vec2::new(5.0, 5.0));
        let focal = Vec2::new(0.0, 0.0);
        let sites = neighborhood().augment(&mut rng, focal, &boundary, vec![Site::protected(focal)]);
        for s in &sites[1..] {
            assert!(boundary.contains(s.position));
        }
        assert!(sites.len() < 7);
    }

    #[test]
    fn test_augment_skips_crowded_slots() {
        let mut rng = SeedSource::new(9);
        let hood = CenterNeighborhood {
            target: 3,
            radius: 1.0,
            jitter: 0.0,
            min_distance: 10.0,
        };
        // Spacing 6.0 rejects every candidate near the focal site
        let sites = hood.augment(&mut rng, Vec2::ZERO, &big_square(), vec![Site::protected(Vec2::ZERO)]);
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn test_protect_marks_center_sites() {
        let sites = vec![
            Site::new(Vec2::new(3.0, 0.0)),
            Site::new(Vec2::new(0.5, 0.0)),
            Site::new(Vec2::new(2.0, 2.0)),
        ];
        let sites = neighborhood().protect(sites, Vec2::ZERO);
        assert!(sites[0].protected);
        assert!(sites[1].protected);
        assert!(!sites[2].protected);
    }
}
