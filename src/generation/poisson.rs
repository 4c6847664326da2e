//! Poisson-disk sampling inside a boundary polygon
//!
//! Bridson's algorithm with a background grid: every grid cell is small enough
//! (`min_distance / √2`) to hold at most one sample, so the minimum distance
//! check only has to look at the samples stored in nearby grid cells.

use glam::Vec2;
use std::f32::consts::{SQRT_2, TAU};

use crate::geometry::{BoundaryShape, Bounds};
use crate::random::SeedSource;

/// Grid cells searched in each direction around a candidate
///
/// Two cells of `min_distance / √2` cover more than `min_distance`.
const SEARCH_RADIUS: usize = 2;

/// Largest background grid the sampler will allocate
const MAX_GRID_CELLS: usize = 1 << 22;

/// Poisson-disk sampler parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonSampler {
    /// Minimum distance between any two samples
    pub min_distance: f32,
    /// Candidates tried around an active sample before retiring it (`k`)
    pub attempts: usize,
    /// Stop once this many samples were accepted
    pub max_samples: usize,
}

/// Occupancy grid over the boundary bounds, one sample index per cell
struct SampleGrid {
    origin: Vec2,
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Option<usize>>,
}

impl SampleGrid {
    /// `None` when the grid would exceed [`MAX_GRID_CELLS`]
    fn new(bounds: Bounds, cell_size: f32) -> Option<Self> {
        let cols = ((bounds.width() / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height() / cell_size).ceil() as usize).max(1);
        let count = cols.checked_mul(rows).filter(|&c| c <= MAX_GRID_CELLS)?;
        Some(Self {
            origin: bounds.min,
            cell_size,
            cols,
            rows,
            cells: vec![None; count],
        })
    }

    fn cell_of(&self, point: Vec2) -> (usize, usize) {
        let local = (point - self.origin) / self.cell_size;
        let gx = (local.x.max(0.0) as usize).min(self.cols - 1);
        let gy = (local.y.max(0.0) as usize).min(self.rows - 1);
        (gx, gy)
    }

    fn insert(&mut self, point: Vec2, sample_idx: usize) {
        let (gx, gy) = self.cell_of(point);
        self.cells[gy * self.cols + gx] = Some(sample_idx);
    }

    /// Whether any stored sample lies closer than `min_distance` to `point`
    fn has_sample_near(&self, point: Vec2, samples: &[Vec2], min_distance: f32) -> bool {
        let (gx, gy) = self.cell_of(point);
        let min_sq = min_distance * min_distance;

        let (x_lo, x_hi) = (gx.saturating_sub(SEARCH_RADIUS), (gx + SEARCH_RADIUS).min(self.cols - 1));
        let (y_lo, y_hi) = (gy.saturating_sub(SEARCH_RADIUS), (gy + SEARCH_RADIUS).min(self.rows - 1));

        (x_lo..=x_hi).any(|x| {
            (y_lo..=y_hi).any(|y| {
                self.cells[y * self.cols + x]
                    .map(|idx| samples[idx].distance_squared(point) < min_sq)
                    .unwrap_or(false)
            })
        })
    }
}

impl PoissonSampler {
    pub fn new(min_distance: f32, attempts: usize, max_samples: usize) -> Self {
        Self {
            min_distance,
            attempts,
            max_samples,
        }
    }

    /// Sample points inside `boundary`, growing outwards from `focal`
    ///
    /// The focal point is sample 0 when it lies inside the boundary. Otherwise
    /// up to `attempts` random points in the bounding box are tried to find a
    /// first sample. The result is in acceptance order and may be empty for
    /// degenerate or tiny boundaries, and is always empty for a non-positive
    /// minimum distance or one too small to grid the boundary with.
    pub fn sample(&self, rng: &mut SeedSource, focal: Vec2, boundary: &BoundaryShape) -> Vec<Vec2> {
        let mut samples = Vec::new();
        if boundary.is_degenerate() || self.max_samples == 0 {
            return samples;
        }
        if !(self.min_distance > 0.0 && self.min_distance.is_finite()) {
            log::warn!(min_distance = self.min_distance; "Poisson sampling needs a positive minimum distance");
            return samples;
        }
        let Some(bounds) = boundary.bounds() else {
            return samples;
        };

        let Some(mut grid) = SampleGrid::new(bounds, self.min_distance / SQRT_2) else {
            log::warn!(
                min_distance = self.min_distance,
                width = bounds.width(),
                height = bounds.height();
                "Minimum distance too small for the boundary, no samples"
            );
            return samples;
        };
        let mut active: Vec<Vec2> = Vec::new();

        if boundary.contains(focal) {
            grid.insert(focal, 0);
            samples.push(focal);
            active.push(focal);
        } else {
            for _ in 0..self.attempts {
                let p = Vec2::new(
                    rng.range(bounds.min.x, bounds.max.x),
                    rng.range(bounds.min.y, bounds.max.y),
                );
                if boundary.contains(p) {
                    grid.insert(p, 0);
                    samples.push(p);
                    active.push(p);
                    break;
                }
            }
        }

        while !active.is_empty() && samples.len() < self.max_samples {
            let idx = rng.index(active.len());
            let point = active[idx];
            let mut found = false;

            for _ in 0..self.attempts {
                let radius = rng.range(self.min_distance, 2.0 * self.min_distance);
                let angle = rng.range(0.0, TAU);
                let candidate = point + Vec2::from_angle(angle) * radius;

                if !bounds.contains(candidate) || !boundary.contains(candidate) {
                    continue;
                }
                if grid.has_sample_near(candidate, &samples, self.min_distance) {
                    continue;
                }

                grid.insert(candidate, samples.len());
                samples.push(candidate);
                active.push(candidate);
                found = true;
                break;
            }

            if !found {
                active.remove(idx);
            }
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f32) -> BoundaryShape {
        BoundaryShape::rectangle(Vec2::splat(-half), Vec2::splat(half))
    }

    #[test]
    fn test_focal_point_is_first_sample() {
        let mut rng = SeedSource::new(42);
        let samples = PoissonSampler::new(0.45, 30, 256).sample(&mut rng, Vec2::ZERO, &square(5.0));
        assert_eq!(samples[0], Vec2::ZERO);
        assert!(samples.len() > 50);
    }

    #[test]
    fn test_min_distance_respected() {
        let mut rng = SeedSource::new(3);
        let min_distance = 0.5;
        let samples =
            PoissonSampler::new(min_distance, 30, 512).sample(&mut rng, Vec2::ZERO, &square(4.0));

        for i in 0..samples.len() {
            for j in (i + 1)..samples.len() {
                let d = samples[i].distance(samples[j]);
                assert!(d >= min_distance - 1e-4, "samples {} and {} are {} apart", i, j, d);
            }
        }
    }

    #[test]
    fn test_samples_inside_boundary() {
        let mut rng = SeedSource::new(11);
        let boundary = BoundaryShape::regular(Vec2::ZERO, 3.0, 7);
        let samples = PoissonSampler::new(0.4, 30, 256).sample(&mut rng, Vec2::ZERO, &boundary);
        assert!(!samples.is_empty());
        for s in &samples {
            assert!(boundary.contains(*s), "{} escaped the boundary", s);
        }
    }

    #[test]
    fn test_max_samples_cap() {
        let mut rng = SeedSource::new(1);
        let samples = PoissonSampler::new(0.2, 30, 10).sample(&mut rng, Vec2::ZERO, &square(5.0));
        assert_eq!(samples.len(), 10);
    }

    #[test]
    fn test_focal_outside_boundary_uses_random_start() {
        let mut rng = SeedSource::new(8);
        let boundary = BoundaryShape::rectangle(Vec2::new(10.0, 10.0), Vec2::new(14.0, 14.0));
        let samples = PoissonSampler::new(0.5, 30, 64).sample(&mut rng, Vec2::ZERO, &boundary);
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| boundary.contains(*s)));
    }

    #[test]
    fn test_degenerate_boundary_yields_nothing() {
        let mut rng = SeedSource::new(8);
        let boundary = BoundaryShape::new(vec![Vec2::ZERO, Vec2::ONE]);
        let samples = PoissonSampler::new(0.5, 30, 64).sample(&mut rng, Vec2::ZERO, &boundary);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_tiny_boundary_yields_at_most_one_sample() {
        let mut rng = SeedSource::new(2);
        let samples = PoissonSampler::new(1.0, 30, 64).sample(&mut rng, Vec2::ZERO, &square(0.1));
        assert_eq!(samples, vec![Vec2::ZERO]);
    }

    #[test]
    fn test_non_positive_distance_yields_nothing() {
        let mut rng = SeedSource::new(5);
        for min_distance in [0.0, -1.0, f32::NAN] {
            let samples =
                PoissonSampler::new(min_distance, 30, 64).sample(&mut rng, Vec2::ZERO, &square(5.0));
            assert!(samples.is_empty(), "min_distance {} produced samples", min_distance);
        }
    }

    #[test]
    fn test_oversized_grid_yields_nothing() {
        let mut rng = SeedSource::new(5);
        let samples = PoissonSampler::new(1e-5, 30, 64).sample(&mut rng, Vec2::ZERO, &square(500.0));
        assert!(samples.is_empty());
    }

    #[test]
    fn test_sampling_determinism() {
        let sampler = PoissonSampler::new(0.45, 30, 256);
        let a = sampler.sample(&mut SeedSource::new(42), Vec2::ZERO, &square(5.0));
        let b = sampler.sample(&mut SeedSource::new(42), Vec2::ZERO, &square(5.0));
        assert_eq!(a, b);
    }
}
