//! # isosurf
//!
//! Isosurface extraction from dense scalar volumes.
//!
//! Given a 3D grid of samples (a stack of scan slices, a sampled distance
//! field) and a threshold, `isosurf` produces a triangle mesh approximating
//! the surface where the field crosses that threshold, using the classic
//! marching cubes case table from `isosurf_core`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use isosurf::{extract, Point3, Spacing, VoxelGrid};
//!
//! // Signed distance to a sphere of radius 10, sampled on a 32³ grid
//! let grid = VoxelGrid::from_fn([32, 32, 32], Spacing::uniform(1.0), |p| {
//!     (p - Point3::splat(15.5)).length() - 10.0
//! })?;
//!
//! let mesh = extract(&grid, 0.0)?;
//! println!("{} triangles", mesh.triangle_count());
//! ```
//!
//! ## Architecture
//!
//! - [`VoxelGrid`]: immutable x-fastest sample buffer with per-axis spacing
//! - [`SurfaceExtractor`]: iterates cells slab by slab, classifies each one
//!   and interpolates the crossed edges
//! - [`MeshAccumulator`]: turns the triangle stream into an indexed
//!   [`Mesh`], optionally welding shared vertices
//!
//! The extractor works on any [`ScalarGrid`], not only `VoxelGrid`.
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Slab-parallel extraction via rayon
//! - `serde`: Serialize/deserialize [`WeldMode`]
//!
//! ## Output Conventions
//!
//! Triangles are wound so their geometric normal points towards samples at
//! or above the isovalue; computed vertex normals are the normalised field
//! gradient and agree with that orientation. Vertices are not shared between
//! triangles unless welding is enabled. Ambiguous cube configurations are
//! triangulated as the table dictates, so a surface through an ambiguous
//! face may show a hole there.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod accumulator;
mod builder;
mod cancel;
mod config;
mod error;
mod extract;
mod grid;
mod mesh;

pub use accumulator::{MeshAccumulator, WeldMode};
pub use builder::VoxelGridBuilder;
pub use cancel::CancelToken;
pub use config::ExtractConfig;
pub use error::{IsosurfError, Result};
pub use extract::{extract, extract_with_stats, ExtractStats, SurfaceExtractor};
pub use grid::VoxelGrid;
pub use mesh::{mesh_to_obj_string, Mesh, MeshStats, ObjElements};

// Re-export the core types used in the public API
pub use isosurf_core::{CoreError, CubeCase, Point3, ScalarGrid, Spacing};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        extract, extract_with_stats, CancelToken, ExtractConfig, IsosurfError, Mesh,
        MeshAccumulator, Point3, ScalarGrid, Spacing, SurfaceExtractor, VoxelGrid,
        VoxelGridBuilder, WeldMode,
    };
}
