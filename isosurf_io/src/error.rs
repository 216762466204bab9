//! Error types for isosurf_io.

use std::path::PathBuf;

use isosurf::IsosurfError;
use thiserror::Error;

/// Errors that can occur while loading volumes, exporting meshes or running
/// a pipeline.
#[derive(Error, Debug)]
pub enum IoError {
    /// Underlying file or stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Pipeline configuration parsed but is unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// No slices were supplied.
    #[error("cannot stack an empty list of slices")]
    EmptyStack,

    /// A slice does not have `height * width` samples.
    #[error("slice {index} has {got} samples, expected {expected}")]
    SliceSizeMismatch {
        /// Position of the slice in the stack.
        index: usize,
        /// `height * width`.
        expected: usize,
        /// Samples in the slice.
        got: usize,
    },

    /// A raw volume holds a different number of bytes than its dimensions
    /// require.
    #[error("raw volume has {got} bytes, expected {expected}")]
    RawSizeMismatch {
        /// Bytes required by the dimensions and sample type.
        expected: usize,
        /// Bytes actually read.
        got: usize,
    },

    /// Min-max normalization is undefined for a constant volume.
    #[error("volume is flat (every finite sample is {value}), cannot normalize")]
    FlatVolume {
        /// The single sample value, or NaN if no sample is finite.
        value: f32,
    },

    /// Grid construction or extraction failed.
    #[error(transparent)]
    Extract(#[from] IsosurfError),

    /// Could not create the output file.
    #[error("cannot write {}: {source}", path.display())]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying failure.
        source: std::io::Error,
    },
}

/// Result type alias for isosurf_io operations.
pub type Result<T> = std::result::Result<T, IoError>;
