//! Map Generation Configuration and Builder
//!
//! This module provides configuration types for deterministic cell map generation.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Smallest epsilon used for vertex matching in the adjacency pass
///
/// With a zero gap the derived epsilon would be zero and no cells could ever
/// be linked, so the effective value never drops below this.
pub const MIN_ADJACENCY_EPSILON: f32 = 1e-4;

/// Configuration for deterministic cell map generation
///
/// The seed is not part of the configuration: the same configuration is
/// reused for every map and the seed is passed per generation call.
///
/// # Example
///
/// ```rust
/// use voronoi_cell_map::*;
///
/// let config = MapConfigBuilder::new()
///     .max_sites(12)
///     .unwrap()
///     .gap(0.1)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_sites, 12);
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: MapConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Distance every cell vertex is pulled towards the cell centroid
    ///
    /// Creates the visible gutter between neighboring cells.
    pub gap: f32,

    /// Minimum distance between Poisson-disk samples
    pub min_site_distance: f32,

    /// Candidates tried around an active sample before it is retired (`k`)
    pub poisson_attempts: usize,

    /// Upper bound on accepted Poisson-disk samples
    pub max_samples: usize,

    /// Upper bound on sites handed to the diagram engine
    ///
    /// Each surviving site becomes at most one cell.
    pub max_sites: usize,

    /// Cells with fewer vertices are padded by splitting their longest edges
    pub min_polygon_corners: usize,

    /// Number of sites wanted around the focal point
    ///
    /// Guarantees the start cell has enough neighbors to branch from.
    pub extra_center_neighbors: usize,

    /// Radius around the focal point that counts as "near the center"
    pub center_neighbor_radius: f32,

    /// Angular jitter (radians) applied to injected center neighbors
    pub center_neighbor_jitter: f32,

    /// Point the map grows from; the cell containing it is the start cell
    pub focal_point: Vec2,

    /// Vertex distance below which two cell vertices count as shared
    ///
    /// `None` derives the value from the gap (`2 * gap`), because refinement
    /// pulls each copy of a shared vertex up to `gap` away from the other.
    pub adjacency_epsilon: Option<f32>,
}

impl MapConfig {
    /// Epsilon used by the adjacency pass
    ///
    /// Returns `adjacency_epsilon` if set, otherwise twice the gap, never
    /// less than [`MIN_ADJACENCY_EPSILON`].
    #[inline]
    pub fn adjacency_epsilon(&self) -> f32 {
        self.adjacency_epsilon
            .unwrap_or(self.gap * 2.0)
            .max(MIN_ADJACENCY_EPSILON)
    }

    /// Check every field against the limits [`MapConfigBuilder`] enforces
    ///
    /// Configurations built with struct literals or deserialized skip the
    /// builder; [`MapGenerator`](crate::MapGenerator) calls this before
    /// every run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        non_negative("gap", self.gap)?;
        check_min_site_distance(self.min_site_distance)?;
        positive("poisson attempts", self.poisson_attempts)?;
        positive("max samples", self.max_samples)?;
        positive("max sites", self.max_sites)?;
        check_min_polygon_corners(self.min_polygon_corners)?;
        non_negative("center neighbor radius", self.center_neighbor_radius)?;
        non_negative("center neighbor jitter", self.center_neighbor_jitter)?;
        check_focal_point(self.focal_point)?;
        if let Some(epsilon) = self.adjacency_epsilon {
            check_adjacency_epsilon(epsilon)?;
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            gap: 0.05,
            min_site_distance: 0.45,
            poisson_attempts: 30,
            max_samples: 256,
            max_sites: 20,
            min_polygon_corners: 8,
            extra_center_neighbors: 6,
            center_neighbor_radius: 0.8,
            center_neighbor_jitter: 0.12,
            focal_point: Vec2::ZERO,
            adjacency_epsilon: None,
        }
    }
}

/// Builder for creating MapConfig with validation
///
/// Starts from [`MapConfig::default`]; every setter that can receive an
/// out-of-range value returns a `Result`.
///
/// # Example
///
/// ```rust
/// use voronoi_cell_map::*;
/// use glam::Vec2;
///
/// let config = MapConfigBuilder::new()
///     .min_site_distance(0.6)
///     .unwrap()
///     .poisson_attempts(20)
///     .unwrap()
///     .focal_point(Vec2::new(1.0, -2.0))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.poisson_attempts, 20);
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    config: MapConfig,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - gap: 0.05
    /// - min_site_distance: 0.45
    /// - poisson_attempts: 30
    /// - max_samples: 256
    /// - max_sites: 20
    /// - min_polygon_corners: 8
    /// - extra_center_neighbors: 6
    /// - center_neighbor_radius: 0.8
    /// - center_neighbor_jitter: 0.12
    /// - focal_point: origin
    /// - adjacency_epsilon: derived from gap
    pub fn new() -> Self {
        Self {
            config: MapConfig::default(),
        }
    }

    /// Set the inset gap between neighboring cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if gap is negative
    pub fn gap(mut self, gap: f32) -> Result<Self> {
        non_negative("gap", gap)?;
        self.config.gap = gap;
        Ok(self)
    }

    /// Set the minimum distance between sampled sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if distance <= 0.0
    pub fn min_site_distance(mut self, distance: f32) -> Result<Self> {
        check_min_site_distance(distance)?;
        self.config.min_site_distance = distance;
        Ok(self)
    }

    /// Set the number of candidates tried per active sample
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if attempts is zero
    pub fn poisson_attempts(mut self, attempts: usize) -> Result<Self> {
        positive("poisson attempts", attempts)?;
        self.config.poisson_attempts = attempts;
        Ok(self)
    }

    /// Set the maximum number of Poisson-disk samples
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if max_samples is zero
    pub fn max_samples(mut self, max_samples: usize) -> Result<Self> {
        positive("max samples", max_samples)?;
        self.config.max_samples = max_samples;
        Ok(self)
    }

    /// Set the maximum number of sites (and therefore cells)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if max_sites is zero
    pub fn max_sites(mut self, max_sites: usize) -> Result<Self> {
        positive("max sites", max_sites)?;
        self.config.max_sites = max_sites;
        Ok(self)
    }

    /// Set the minimum number of corners of every cell polygon
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if corners < 3
    pub fn min_polygon_corners(mut self, corners: usize) -> Result<Self> {
        check_min_polygon_corners(corners)?;
        self.config.min_polygon_corners = corners;
        Ok(self)
    }

    /// Set how many sites should surround the focal point
    ///
    /// Zero disables augmentation.
    pub fn extra_center_neighbors(mut self, count: usize) -> Self {
        self.config.extra_center_neighbors = count;
        self
    }

    /// Set the radius that counts as the focal point's neighborhood
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius is negative
    pub fn center_neighbor_radius(mut self, radius: f32) -> Result<Self> {
        non_negative("center neighbor radius", radius)?;
        self.config.center_neighbor_radius = radius;
        Ok(self)
    }

    /// Set the angular jitter of injected center neighbors
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if jitter is negative
    pub fn center_neighbor_jitter(mut self, jitter: f32) -> Result<Self> {
        non_negative("center neighbor jitter", jitter)?;
        self.config.center_neighbor_jitter = jitter;
        Ok(self)
    }

    /// Set the focal point the map grows from
    pub fn focal_point(mut self, focal_point: Vec2) -> Self {
        self.config.focal_point = focal_point;
        self
    }

    /// Override the vertex-matching epsilon used for adjacency
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if epsilon <= 0.0
    pub fn adjacency_epsilon(mut self, epsilon: f32) -> Result<Self> {
        check_adjacency_epsilon(epsilon)?;
        self.config.adjacency_epsilon = Some(epsilon);
        Ok(self)
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the focal point is not finite
    pub fn build(self) -> Result<MapConfig> {
        check_focal_point(self.config.focal_point)?;
        Ok(self.config)
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "{} must be >= 0 (got {})",
            name, value
        )))
    }
}

fn positive(name: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!("{} must be > 0", name)))
    }
}

fn check_min_site_distance(distance: f32) -> Result<()> {
    if distance > 0.0 && distance.is_finite() {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "min site distance must be positive (got {})",
            distance
        )))
    }
}

fn check_min_polygon_corners(corners: usize) -> Result<()> {
    if corners >= 3 {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "min polygon corners must be >= 3 (got {})",
            corners
        )))
    }
}

fn check_adjacency_epsilon(epsilon: f32) -> Result<()> {
    if epsilon > 0.0 {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "adjacency epsilon must be positive (got {})",
            epsilon
        )))
    }
}

fn check_focal_point(focal_point: Vec2) -> Result<()> {
    if focal_point.is_finite() {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "focal point must be finite (got {})",
            focal_point
        )))
    }
}
