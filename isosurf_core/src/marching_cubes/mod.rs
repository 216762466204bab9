//! Marching Cubes cell polygonisation.
//!
//! This module provides the per-cell half of the marching cubes algorithm:
//!
//! - Compile-time lookup tables for the 256 cube cases
//! - [`CubeCase`] classification of a cell's 8 corner samples
//! - Edge interpolation and polygonisation of a single cell
//! - Both allocating and no-alloc variants for flexibility
//!
//! The grid-wide loop lives in the `isosurf` crate.
//!
//! # Example
//!
//! ```ignore
//! use isosurf_core::marching_cubes::{process_cell, process_cell_no_alloc};
//!
//! // Process a cell with allocation
//! let triangles = process_cell(&grid, 3, 4, 5, 0.5)?;
//!
//! // Process a cell without allocation, with per-vertex normals
//! let cell = process_cell_no_alloc(&grid, 3, 4, 5, 0.5, true)?;
//! ```

mod algorithm;
mod classify;
mod tables;

pub use algorithm::{edge_fraction, interpolate_vertex, process_cell_no_alloc, CellTriangles};
pub use classify::{CaseTriangles, CubeCase};
pub use tables::{
    CORNER_OFFSETS, EDGE_TABLE, EDGE_VERTICES, MAX_TRIANGLES_PER_CELL, TRI_TABLE,
};

#[cfg(any(feature = "std", feature = "alloc"))]
pub use algorithm::process_cell;
