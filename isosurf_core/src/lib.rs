//! # isosurf_core
//!
//! Pure marching cubes algorithms for extracting isosurfaces from sampled
//! scalar volumes.
//!
//! This crate holds the parts of the pipeline with no storage or threading
//! concerns: the canonical cube, the 256-case triangulation table, cell
//! classification, edge interpolation and finite-difference gradients. The
//! `isosurf` crate builds the owned grid, the mesh accumulator and the
//! parallel extraction loop on top of it.
//!
//! ## Features
//!
//! - **no_std compatible**: Works without the standard library; the `alloc`
//!   feature adds the `Vec`-returning helpers
//! - **Static tables**: The case table is plain `const` data
//! - **Grid abstraction**: Any storage implementing [`ScalarGrid`] can be
//!   polygonised
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables standard library support
//! - `alloc`: Enables heap allocation (Vec, etc.) without full std
//!
//! ## Modules
//!
//! - [`types`]: `Point3` and `Spacing`
//! - [`traits`]: The [`ScalarGrid`] storage trait and corner index helpers
//! - [`marching_cubes`]: Tables, [`CubeCase`] and per-cell polygonisation
//! - [`gradient`]: Central-difference gradients on grid nodes
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use isosurf_core::prelude::*;
//!
//! let case = CubeCase::classify(&[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.5);
//! assert_eq!(case.index(), 0b0000_0010);
//! for [e0, e1, e2] in case.triangles() {
//!     // edge indices into EDGE_VERTICES
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

#[cfg(feature = "std")]
mod alloc_prelude {
    pub use std::vec::Vec;
}

#[cfg(all(feature = "alloc", not(feature = "std")))]
mod alloc_prelude {
    pub use alloc::vec::Vec;
}

pub mod error;
pub mod gradient;
pub mod marching_cubes;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::gradient::{edge_normal, node_gradient};
    pub use crate::marching_cubes::{
        edge_fraction, interpolate_vertex, process_cell_no_alloc, CellTriangles, CubeCase,
    };
    pub use crate::traits::{corner_from_index, index_from_corner, ScalarGrid};
    pub use crate::types::{Point3, Spacing};

    #[cfg(any(feature = "std", feature = "alloc"))]
    pub use crate::marching_cubes::process_cell;
}

pub use error::CoreError;
pub use gradient::{edge_normal, node_gradient};
pub use marching_cubes::{
    edge_fraction, interpolate_vertex, process_cell_no_alloc, CellTriangles, CubeCase,
};
pub use traits::{corner_from_index, index_from_corner, ScalarGrid};
pub use types::{Point3, Spacing};

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Dense test grid sampled from a closure at construction time.
    struct FnGrid {
        dims: [usize; 3],
        spacing: Spacing,
        values: [f32; 512],
    }

    impl FnGrid {
        fn new(n: usize, spacing: Spacing, f: impl Fn(f32, f32, f32) -> f32) -> Self {
            assert!(n * n * n <= 512);
            let mut values = [0.0; 512];
            for z in 0..n {
                for y in 0..n {
                    for x in 0..n {
                        values[x + n * (y + n * z)] = f(x as f32, y as f32, z as f32);
                    }
                }
            }
            Self {
                dims: [n, n, n],
                spacing,
                values,
            }
        }
    }

    impl ScalarGrid for FnGrid {
        fn dims(&self) -> [usize; 3] {
            self.dims
        }

        fn spacing(&self) -> Spacing {
            self.spacing
        }

        fn value_at(&self, x: usize, y: usize, z: usize) -> Result<f32, CoreError> {
            self.check_bounds(x, y, z)?;
            let [nx, ny, _] = self.dims;
            Ok(self.values[x + nx * (y + ny * z)])
        }
    }

    #[test]
    fn test_sphere_cells_emit_vertices_near_radius() {
        let c = 3.5;
        let r = 2.5;
        let grid = FnGrid::new(8, Spacing::uniform(1.0), |x, y, z| {
            libm::sqrtf((x - c) * (x - c) + (y - c) * (y - c) + (z - c) * (z - c))
        });

        let mut total = 0;
        for z in 0..7 {
            for y in 0..7 {
                for x in 0..7 {
                    let cell = process_cell_no_alloc(&grid, x, y, z, r, false).unwrap();
                    for tri in cell.triangles() {
                        for v in tri {
                            let d = (*v - Point3::splat(c)).length();
                            assert!((d - r).abs() < libm::sqrtf(3.0), "vertex {:?} at {}", v, d);
                        }
                    }
                    total += cell.len();
                }
            }
        }

        assert!(total > 0, "sphere should produce triangles");
    }

    #[test]
    fn test_spacing_scales_positions() {
        let grid = FnGrid::new(2, Spacing::new(2.0, 3.0, 4.0), |x, _, _| x);
        let cell = process_cell_no_alloc(&grid, 0, 0, 0, 0.5, false).unwrap();

        // Plane x = 0.5 in index space sits at x = 1.0 physically.
        assert_eq!(cell.len(), 2);
        for tri in cell.triangles() {
            for v in tri {
                assert!((v.x - 1.0).abs() < 1e-6);
                assert!(v.y == 0.0 || (v.y - 3.0).abs() < 1e-6);
                assert!(v.z == 0.0 || (v.z - 4.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_normals_follow_increasing_values() {
        let grid = FnGrid::new(3, Spacing::uniform(1.0), |_, y, _| y);
        let cell = process_cell_no_alloc(&grid, 0, 0, 0, 0.5, true).unwrap();

        assert!(!cell.is_empty());
        for normals in cell.normals() {
            for n in normals {
                assert!((n.y - 1.0).abs() < 1e-6, "normal {:?}", n);
            }
        }
    }
}
