//! isosurf_io - volume loading, normalization and mesh export for isosurf.
//!
//! This crate is the I/O side of the isosurf workspace. The extraction core
//! never touches files; everything that reads scan data or writes meshes
//! lives here.
//!
//! # Core Types
//!
//! - [`PipelineConfig`]: TOML description of a load, normalize, extract,
//!   export run
//! - [`RawSample`]: sample encodings understood by [`read_raw_volume`]
//! - [`AxisOrder`]: how slice rows and columns map onto grid axes
//! - [`ObjExportConfig`]: OBJ writer options
//!
//! # Example
//!
//! ```ignore
//! use isosurf_io::{stack_slices, normalize_grid, export_obj_to_file, AxisOrder, ObjExportConfig};
//! use isosurf::{extract, Spacing};
//!
//! let grid = stack_slices(&slices, 512, 512, AxisOrder::default(), Spacing::new(0.7, 0.7, 2.5))?;
//! let (grid, _) = normalize_grid(grid)?;
//! let mesh = extract(&grid, 0.5)?;
//! export_obj_to_file(&mesh, "surface.obj", &ObjExportConfig::default())?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod obj;
pub mod pipeline;
pub mod raw;
pub mod volume;

pub use config::{InputConfig, PipelineConfig};
pub use error::{IoError, Result};
pub use obj::{export_obj_to_file, write_obj, ObjExportConfig};
pub use pipeline::{extract_volume, run_pipeline, PipelineReport};
pub use raw::{read_raw_file, read_raw_volume, RawSample};
pub use volume::{normalize_grid, normalize_min_max, stack_slices, AxisOrder};
