//! Dense voxel grid.
//!
//! An immutable 3D array of scalar samples with per-axis spacing, stored
//! x-fastest: `index = x + nx * (y + ny * z)`.

use isosurf_core::{CoreError, Point3, ScalarGrid, Spacing};

use crate::error::{IsosurfError, Result};

/// Read-only dense scalar volume.
///
/// Every dimension is at least 2, so the grid contains at least one cell.
/// Samples are never modified after construction; extraction borrows the
/// grid immutably and may share it across worker threads.
///
/// # Example
///
/// ```ignore
/// use isosurf::{Spacing, VoxelGrid};
///
/// let grid = VoxelGrid::new([2, 2, 2], vec![0.0; 8], Spacing::uniform(1.0))?;
/// assert_eq!(grid.value_at(1, 1, 1)?, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    dims: [usize; 3],
    spacing: Spacing,
    values: Vec<f32>,
}

impl VoxelGrid {
    /// Create a grid from x-fastest samples.
    ///
    /// # Errors
    /// - `EmptyGrid` if any dimension is below 2
    /// - `DimensionMismatch` if `values.len() != nx * ny * nz`
    /// - `InvalidSpacing` if a spacing component is not finite and positive
    pub fn new(dims: [usize; 3], values: Vec<f32>, spacing: Spacing) -> Result<Self> {
        validate_dims(dims)?;
        validate_spacing(spacing)?;

        let expected = sample_count(dims);
        if values.len() != expected {
            return Err(IsosurfError::DimensionMismatch {
                expected,
                got: values.len(),
            });
        }

        Ok(Self {
            dims,
            spacing,
            values,
        })
    }

    /// Create a grid by sampling `f` at every physical node position.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let sphere = VoxelGrid::from_fn([32, 32, 32], Spacing::uniform(0.1), |p| {
    ///     (p - Point3::splat(1.55)).length() - 1.0
    /// })?;
    /// ```
    pub fn from_fn<F>(dims: [usize; 3], spacing: Spacing, f: F) -> Result<Self>
    where
        F: Fn(Point3) -> f32,
    {
        validate_dims(dims)?;
        validate_spacing(spacing)?;

        let [nx, ny, nz] = dims;
        let mut values = Vec::with_capacity(sample_count(dims));
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    values.push(f(spacing.to_physical(x, y, z)));
                }
            }
        }

        Ok(Self {
            dims,
            spacing,
            values,
        })
    }

    /// Flat index of sample `(x, y, z)`, without bounds checks.
    #[inline]
    fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        let [nx, ny, _] = self.dims;
        x + nx * (y + ny * z)
    }

    /// All samples in x-fastest order.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Iterate over all samples in x-fastest order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied()
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a valid grid has at least 8 samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smallest and largest finite sample, or `None` if no sample is finite.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Physical extent of the grid, from the origin to the last node.
    pub fn extent(&self) -> Point3 {
        let [nx, ny, nz] = self.dims;
        self.spacing.to_physical(nx - 1, ny - 1, nz - 1)
    }

    /// Consume the grid and return its sample buffer.
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

impl ScalarGrid for VoxelGrid {
    #[inline]
    fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    fn spacing(&self) -> Spacing {
        self.spacing
    }

    #[inline]
    fn value_at(&self, x: usize, y: usize, z: usize) -> core::result::Result<f32, CoreError> {
        self.check_bounds(x, y, z)?;
        Ok(self.values[self.linear_index(x, y, z)])
    }
}

#[inline]
fn sample_count(dims: [usize; 3]) -> usize {
    dims[0].saturating_mul(dims[1]).saturating_mul(dims[2])
}

pub(crate) fn validate_dims(dims: [usize; 3]) -> Result<()> {
    if dims.iter().any(|&n| n < 2) {
        return Err(IsosurfError::EmptyGrid { dims });
    }
    Ok(())
}

pub(crate) fn validate_spacing(spacing: Spacing) -> Result<()> {
    if !spacing.is_valid() {
        return Err(IsosurfError::InvalidSpacing {
            spacing: spacing.as_array(),
        });
    }
    Ok(())
}
