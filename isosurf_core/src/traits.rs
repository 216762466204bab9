//! Storage abstraction for sampled scalar volumes.
//!
//! The algorithms in this crate only read samples through [`ScalarGrid`], so
//! downstream crates can polygonise their own storage (owned arrays,
//! memory-mapped scans, procedural fields) without copying.

use crate::error::CoreError;
use crate::marching_cubes::CORNER_OFFSETS;
use crate::types::{Point3, Spacing};

/// Read-only view over a dense 3D array of scalar samples.
///
/// Implementors must be immutable for as long as an extraction borrows them.
pub trait ScalarGrid {
    /// Number of samples along each axis `(nx, ny, nz)`.
    fn dims(&self) -> [usize; 3];

    /// Physical size of one cell along each axis.
    fn spacing(&self) -> Spacing;

    /// Sample at an integer grid coordinate.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfRange`] if any coordinate is outside
    /// `[0, dim - 1]`.
    fn value_at(&self, x: usize, y: usize, z: usize) -> Result<f32, CoreError>;

    /// Check that a coordinate addresses a sample of this grid.
    #[inline]
    fn check_bounds(&self, x: usize, y: usize, z: usize) -> Result<(), CoreError> {
        let dims = self.dims();
        if x < dims[0] && y < dims[1] && z < dims[2] {
            Ok(())
        } else {
            Err(CoreError::OutOfRange { x, y, z, dims })
        }
    }

    /// Number of cells along each axis (`dim - 1`, saturating at zero).
    #[inline]
    fn cell_dims(&self) -> [usize; 3] {
        let [nx, ny, nz] = self.dims();
        [
            nx.saturating_sub(1),
            ny.saturating_sub(1),
            nz.saturating_sub(1),
        ]
    }

    /// Total number of cells in the grid.
    #[inline]
    fn num_cells(&self) -> usize {
        let [cx, cy, cz] = self.cell_dims();
        cx * cy * cz
    }

    /// Physical position of a grid sample.
    #[inline]
    fn physical_position(&self, x: usize, y: usize, z: usize) -> Point3 {
        self.spacing().to_physical(x, y, z)
    }

    /// The 8 corner samples of the cell with minimum corner `(x, y, z)`,
    /// in canonical corner order.
    fn corner_values(&self, x: usize, y: usize, z: usize) -> Result<[f32; 8], CoreError> {
        let mut values = [0.0f32; 8];
        for (i, (dx, dy, dz)) in CORNER_OFFSETS.iter().enumerate() {
            values[i] = self.value_at(x + *dx as usize, y + *dy as usize, z + *dz as usize)?;
        }
        Ok(values)
    }
}

impl<G: ScalarGrid + ?Sized> ScalarGrid for &G {
    #[inline]
    fn dims(&self) -> [usize; 3] {
        (**self).dims()
    }

    #[inline]
    fn spacing(&self) -> Spacing {
        (**self).spacing()
    }

    #[inline]
    fn value_at(&self, x: usize, y: usize, z: usize) -> Result<f32, CoreError> {
        (**self).value_at(x, y, z)
    }
}

/// Convert a corner index (0-7) to a corner offset tuple (i, j, k).
///
/// The corner ordering follows the standard marching cubes convention:
/// ```text
/// Corner:  0      1      2      3      4      5      6      7
/// Offset: (0,0,0)(1,0,0)(1,1,0)(0,1,0)(0,0,1)(1,0,1)(1,1,1)(0,1,1)
/// ```
#[inline]
pub const fn corner_from_index(idx: usize) -> (u32, u32, u32) {
    CORNER_OFFSETS[idx & 7]
}

/// Convert a corner offset tuple (i, j, k) to a corner index (0-7).
///
/// This is the inverse of `corner_from_index`.
#[inline]
pub const fn index_from_corner(corner: (u32, u32, u32)) -> usize {
    match (corner.0 & 1, corner.1 & 1, corner.2 & 1) {
        (0, 0, 0) => 0,
        (1, 0, 0) => 1,
        (1, 1, 0) => 2,
        (0, 1, 0) => 3,
        (0, 0, 1) => 4,
        (1, 0, 1) => 5,
        (1, 1, 1) => 6,
        _ => 7,
    }
}
