//! Error types for cell map generation

use thiserror::Error;

/// Errors that can occur during map generation or exploration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The diagram engine could not tessellate the sites
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    /// No cell survived clipping and refinement
    ///
    /// Usually caused by a boundary with fewer than three vertices or a
    /// focal point far outside the boundary. There is no start cell, so the
    /// map cannot be played.
    #[error("generation produced no cells")]
    EmptyMap,
    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
}

/// Result type alias for map operations
pub type Result<T> = std::result::Result<T, MapError>;
