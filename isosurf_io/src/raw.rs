//! Headerless raw volume files.
//!
//! A raw volume is a flat dump of `nx * ny * nz` samples, x varying fastest,
//! with no header. The sample encoding is supplied by the caller.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use isosurf::{Spacing, VoxelGrid};
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

/// Encoding of one sample in a raw volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawSample {
    /// Unsigned 8-bit.
    #[default]
    U8,
    /// Unsigned 16-bit little-endian.
    U16Le,
    /// Signed 16-bit little-endian (typical for CT Hounsfield units).
    I16Le,
    /// 32-bit float little-endian.
    F32Le,
}

impl RawSample {
    /// Bytes per sample.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            RawSample::U8 => 1,
            RawSample::U16Le | RawSample::I16Le => 2,
            RawSample::F32Le => 4,
        }
    }

    /// Decode one sample from exactly [`Self::size`] bytes.
    #[inline]
    fn decode(self, bytes: &[u8]) -> f32 {
        match self {
            RawSample::U8 => bytes[0] as f32,
            RawSample::U16Le => u16::from_le_bytes([bytes[0], bytes[1]]) as f32,
            RawSample::I16Le => i16::from_le_bytes([bytes[0], bytes[1]]) as f32,
            RawSample::F32Le => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }
}

/// Read a raw volume from `reader`.
///
/// The stream must contain exactly the bytes the dimensions require.
///
/// # Errors
/// - `Io` if reading fails
/// - `RawSizeMismatch` if the stream is shorter or longer than expected
/// - `Extract` if the dimensions or spacing are invalid
pub fn read_raw_volume<R: Read>(
    mut reader: R,
    dims: [usize; 3],
    spacing: Spacing,
    sample: RawSample,
) -> Result<VoxelGrid> {
    let count = dims[0].saturating_mul(dims[1]).saturating_mul(dims[2]);
    let expected = count.saturating_mul(sample.size());

    let mut bytes = Vec::with_capacity(expected);
    reader.read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        return Err(IoError::RawSizeMismatch {
            expected,
            got: bytes.len(),
        });
    }

    let values: Vec<f32> = bytes
        .chunks_exact(sample.size())
        .map(|chunk| sample.decode(chunk))
        .collect();

    Ok(VoxelGrid::new(dims, values, spacing)?)
}

/// Read a raw volume file.
pub fn read_raw_file<P: AsRef<Path>>(
    path: P,
    dims: [usize; 3],
    spacing: Spacing,
    sample: RawSample,
) -> Result<VoxelGrid> {
    let path = path.as_ref();
    log::info!(
        "reading {:?} volume {}x{}x{} from {}",
        sample,
        dims[0],
        dims[1],
        dims[2],
        path.display()
    );
    let file = File::open(path)?;
    read_raw_volume(BufReader::new(file), dims, spacing, sample)
}
