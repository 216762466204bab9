//! Slice stacking and intensity normalization.
//!
//! Scan series arrive as 2D slices of `height` rows by `width` columns in
//! row-major order. Stacking them yields a [`VoxelGrid`] whose z axis is the
//! slice index.

use isosurf::{ScalarGrid, Spacing, VoxelGrid};
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

/// How slice rows and columns map onto grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    /// `x` = row, `y` = column, `z` = slice.
    #[default]
    RowColumnSlice,
    /// `x` = column, `y` = row, `z` = slice.
    ColumnRowSlice,
}

impl AxisOrder {
    /// Grid dimensions for a stack of `depth` slices of `height x width`.
    pub fn grid_dims(self, height: usize, width: usize, depth: usize) -> [usize; 3] {
        match self {
            AxisOrder::RowColumnSlice => [height, width, depth],
            AxisOrder::ColumnRowSlice => [width, height, depth],
        }
    }
}

/// Stack row-major slices into a grid.
///
/// `spacing` is given in grid axis order, so with the default
/// [`AxisOrder::RowColumnSlice`] `spacing.x` is the row pitch.
///
/// # Errors
/// - `EmptyStack` if `slices` is empty
/// - `SliceSizeMismatch` if a slice does not hold `height * width` samples
/// - `Extract(EmptyGrid)` if the resulting grid has a dimension below 2
///
/// # Example
///
/// ```ignore
/// let grid = stack_slices(&slices, 512, 512, AxisOrder::default(), Spacing::new(0.7, 0.7, 2.5))?;
/// ```
pub fn stack_slices<S>(
    slices: &[S],
    height: usize,
    width: usize,
    order: AxisOrder,
    spacing: Spacing,
) -> Result<VoxelGrid>
where
    S: AsRef<[f32]>,
{
    if slices.is_empty() {
        return Err(IoError::EmptyStack);
    }

    let expected = height * width;
    for (index, slice) in slices.iter().enumerate() {
        let got = slice.as_ref().len();
        if got != expected {
            return Err(IoError::SliceSizeMismatch {
                index,
                expected,
                got,
            });
        }
    }

    let dims = order.grid_dims(height, width, slices.len());
    let mut values = Vec::with_capacity(expected * slices.len());
    for slice in slices {
        let slice = slice.as_ref();
        match order {
            // x = row varies fastest, so walk each column top to bottom.
            AxisOrder::RowColumnSlice => {
                for col in 0..width {
                    for row in 0..height {
                        values.push(slice[row * width + col]);
                    }
                }
            }
            AxisOrder::ColumnRowSlice => values.extend_from_slice(slice),
        }
    }

    log::debug!(
        "stacked {} slices of {}x{} into {:?} grid",
        slices.len(),
        height,
        width,
        dims
    );
    Ok(VoxelGrid::new(dims, values, spacing)?)
}

/// Map the finite samples onto `[0, 1]` in place.
///
/// Returns the original `(min, max)`. Non-finite samples are left as they
/// are.
///
/// # Errors
/// Returns `FlatVolume` if there are no finite samples or they are all equal.
pub fn normalize_min_max(values: &mut [f32]) -> Result<(f32, f32)> {
    let range = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    let (lo, hi) = match range {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((lo, _)) => return Err(IoError::FlatVolume { value: lo }),
        None => return Err(IoError::FlatVolume { value: f32::NAN }),
    };

    let scale = 1.0 / (hi - lo);
    for v in values.iter_mut().filter(|v| v.is_finite()) {
        *v = ((*v - lo) * scale).clamp(0.0, 1.0);
    }

    Ok((lo, hi))
}

/// Normalize a grid's samples onto `[0, 1]`, keeping its shape and spacing.
///
/// Returns the normalized grid and the original `(min, max)`.
pub fn normalize_grid(grid: VoxelGrid) -> Result<(VoxelGrid, (f32, f32))> {
    let dims = grid.dims();
    let spacing = grid.spacing();
    let mut values = grid.into_values();
    let range = normalize_min_max(&mut values)?;
    Ok((VoxelGrid::new(dims, values, spacing)?, range))
}
