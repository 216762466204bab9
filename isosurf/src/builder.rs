//! VoxelGridBuilder pattern for constructing VoxelGrid.
//!
//! Provides a fluent API for building grids with validation.

use isosurf_core::{Point3, Spacing};

use crate::error::{IsosurfError, Result};
use crate::grid::VoxelGrid;

/// Where the builder's samples come from.
enum Source {
    Constant(f32),
    Values(Vec<f32>),
    Function(Box<dyn Fn(Point3) -> f32>),
}

/// Builder for constructing `VoxelGrid` instances.
///
/// Spacing defaults to `1.0` on every axis and samples default to `0.0`.
/// Validation happens in [`VoxelGridBuilder::build`], except for
/// [`VoxelGridBuilder::push_slice`], which rejects a wrongly sized slice
/// immediately.
///
/// # Example
///
/// ```ignore
/// use isosurf::VoxelGridBuilder;
///
/// let grid = VoxelGridBuilder::new([64, 64, 3])
///     .with_spacing(0.7, 0.7, 2.5)
///     .push_slice(&slice0)?
///     .push_slice(&slice1)?
///     .push_slice(&slice2)?
///     .build()?;
/// ```
pub struct VoxelGridBuilder {
    dims: [usize; 3],
    spacing: Spacing,
    source: Source,
}

impl VoxelGridBuilder {
    /// Create a new builder for a grid of `dims = [nx, ny, nz]` samples.
    pub fn new(dims: [usize; 3]) -> Self {
        Self {
            dims,
            spacing: Spacing::default(),
            source: Source::Constant(0.0),
        }
    }

    /// Set the physical distance between adjacent samples along each axis.
    pub fn with_spacing(mut self, sx: f32, sy: f32, sz: f32) -> Self {
        self.spacing = Spacing::new(sx, sy, sz);
        self
    }

    /// Use the same spacing on every axis.
    pub fn with_uniform_spacing(mut self, size: f32) -> Self {
        self.spacing = Spacing::uniform(size);
        self
    }

    /// Use a complete x-fastest sample buffer.
    pub fn with_values(mut self, values: Vec<f32>) -> Self {
        self.source = Source::Values(values);
        self
    }

    /// Fill every sample with `value`.
    pub fn fill_constant(mut self, value: f32) -> Self {
        self.source = Source::Constant(value);
        self
    }

    /// Sample `f` at every node's physical position when building.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let center = Point3::splat(1.0);
    /// let builder = builder.fill_fn(move |p| (p - center).length() - 0.5);
    /// ```
    pub fn fill_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(Point3) -> f32 + 'static,
    {
        self.source = Source::Function(Box::new(f));
        self
    }

    /// Append one z-slice of `nx * ny` samples in x-fastest order.
    ///
    /// Slices are stacked in push order, so the first slice becomes `z = 0`.
    /// Replaces any non-slice source set earlier.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the slice length is not `nx * ny`.
    pub fn push_slice(mut self, slice: &[f32]) -> Result<Self> {
        let expected = self.dims[0].saturating_mul(self.dims[1]);
        if slice.len() != expected {
            return Err(IsosurfError::DimensionMismatch {
                expected,
                got: slice.len(),
            });
        }

        match &mut self.source {
            Source::Values(values) => values.extend_from_slice(slice),
            source => *source = Source::Values(slice.to_vec()),
        }
        Ok(self)
    }

    /// Number of complete z-slices held so far.
    pub fn num_slices(&self) -> usize {
        let per_slice = self.dims[0].saturating_mul(self.dims[1]);
        match &self.source {
            Source::Values(values) if per_slice > 0 => values.len() / per_slice,
            _ => 0,
        }
    }

    /// Build the final grid.
    ///
    /// # Errors
    /// - `EmptyGrid` if any dimension is below 2
    /// - `InvalidSpacing` if a spacing component is not finite and positive
    /// - `DimensionMismatch` if explicit values or slices do not fill the grid
    pub fn build(self) -> Result<VoxelGrid> {
        match self.source {
            Source::Values(values) => VoxelGrid::new(self.dims, values, self.spacing),
            Source::Constant(value) => VoxelGrid::from_fn(self.dims, self.spacing, |_| value),
            Source::Function(f) => VoxelGrid::from_fn(self.dims, self.spacing, f),
        }
    }
}

impl Default for VoxelGridBuilder {
    fn default() -> Self {
        Self::new([2, 2, 2])
    }
}
