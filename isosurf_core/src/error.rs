//! Error types for isosurf_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

/// Error types that can occur during isosurf_core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// A grid query fell outside `[0, dim - 1]` on some axis.
    ///
    /// The extraction loop derives every coordinate from the grid's own
    /// dimensions, so seeing this error means the loop or a `ScalarGrid`
    /// implementation is broken.
    OutOfRange {
        /// Requested X index.
        x: usize,
        /// Requested Y index.
        y: usize,
        /// Requested Z index.
        z: usize,
        /// Grid dimensions `(nx, ny, nz)`.
        dims: [usize; 3],
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::OutOfRange { x, y, z, dims } => {
                write!(
                    f,
                    "grid index ({}, {}, {}) outside dimensions {}x{}x{}",
                    x, y, z, dims[0], dims[1], dims[2]
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}
