//! Error types for isosurf operations.

use isosurf_core::CoreError;
use thiserror::Error;

/// Errors that can occur while building grids or extracting surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IsosurfError {
    /// The isovalue is NaN or infinite.
    #[error("isovalue must be finite, got {0}")]
    InvalidIsovalue(f32),

    /// Some grid dimension is below 2, so the grid has no complete cell.
    #[error("grid {}x{}x{} has no complete cell (every dimension must be at least 2)", dims[0], dims[1], dims[2])]
    EmptyGrid {
        /// Grid dimensions `(nx, ny, nz)`.
        dims: [usize; 3],
    },

    /// Sample buffer length does not match the grid dimensions.
    #[error("expected {expected} samples, got {got}")]
    DimensionMismatch {
        /// `nx * ny * nz`.
        expected: usize,
        /// Length of the buffer provided.
        got: usize,
    },

    /// Spacing components must be finite and strictly positive.
    #[error("invalid spacing ({}, {}, {})", spacing[0], spacing[1], spacing[2])]
    InvalidSpacing {
        /// The rejected spacing.
        spacing: [f32; 3],
    },

    /// Weld tolerance must be finite and strictly positive.
    #[error("invalid weld tolerance {0}")]
    InvalidTolerance(f32),

    /// The mesh needs more vertices than 32-bit triangle indices can address.
    #[error("mesh exceeds {limit} vertices")]
    MeshTooLarge {
        /// Largest vertex count the mesh can hold.
        limit: usize,
    },

    /// Extraction was cancelled through its `CancelToken`.
    #[error("extraction cancelled")]
    Cancelled,

    /// Could not build the dedicated worker pool.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// Internal consistency failure from the core algorithms.
    ///
    /// The extraction loop never addresses samples outside the grid, so this
    /// indicates a defect in the loop or in a `ScalarGrid` implementation.
    #[error("internal error: {0}")]
    Internal(#[from] CoreError),
}

/// Result type alias for isosurf operations.
pub type Result<T> = std::result::Result<T, IsosurfError>;
