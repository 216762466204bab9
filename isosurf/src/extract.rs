//! Surface extraction using marching cubes.
//!
//! Drives `isosurf_core`'s per-cell polygonisation over a whole grid. Cells
//! are grouped into z-slabs; with the `parallel` feature the slabs run on
//! rayon workers, each filling a private buffer, and the buffers are merged
//! in slab order so the output does not depend on scheduling.

use std::time::{Duration, Instant};

use isosurf_core::{process_cell_no_alloc, Point3, ScalarGrid};

use crate::accumulator::MeshAccumulator;
use crate::config::ExtractConfig;
use crate::error::{IsosurfError, Result};
use crate::grid::{validate_dims, validate_spacing};
use crate::mesh::Mesh;

/// Counters gathered during one extraction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtractStats {
    /// Cells classified.
    pub cells_visited: usize,
    /// Cells whose case emitted at least one triangle.
    pub crossed_cells: usize,
    /// Triangles produced by the case table, before welding.
    pub triangles_emitted: usize,
    /// Triangles removed because welding collapsed them.
    pub triangles_dropped: usize,
    /// Wall-clock time of the whole call.
    pub elapsed: Duration,
}

/// Triangles produced by one z-slab of cells.
#[derive(Debug, Default)]
struct Slab {
    positions: Vec<[Point3; 3]>,
    normals: Vec<[Point3; 3]>,
    cells_visited: usize,
    crossed_cells: usize,
}

/// Marching cubes isosurface extractor.
///
/// # Example
///
/// ```ignore
/// use isosurf::{ExtractConfig, SurfaceExtractor, WeldMode};
///
/// let extractor = SurfaceExtractor::new(ExtractConfig::default().with_weld(WeldMode::Exact));
/// let mesh = extractor.extract(&grid, 0.5)?;
/// println!("{} triangles", mesh.triangle_count());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SurfaceExtractor {
    config: ExtractConfig,
}

impl SurfaceExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// The extractor's configuration.
    #[inline]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract the isosurface at `iso_value`.
    ///
    /// A grid the surface never crosses yields an empty mesh. The result is
    /// identical for any thread count.
    ///
    /// # Errors
    /// - `InvalidIsovalue` if `iso_value` is NaN or infinite
    /// - `EmptyGrid` if any grid dimension is below 2
    /// - `InvalidSpacing` or `InvalidTolerance` for a bad grid or weld setup
    /// - `Cancelled` if the configured token fires before the last slab starts
    /// - `ThreadPool` if a dedicated pool could not be created
    /// - `MeshTooLarge` if the mesh needs more vertices than `u32` indices address
    /// - `Internal` if the grid rejects an in-range sample query
    pub fn extract<G>(&self, grid: &G, iso_value: f32) -> Result<Mesh>
    where
        G: ScalarGrid + Sync + ?Sized,
    {
        self.extract_with_stats(grid, iso_value).map(|(mesh, _)| mesh)
    }

    /// Like [`Self::extract`], also returning extraction counters.
    pub fn extract_with_stats<G>(&self, grid: &G, iso_value: f32) -> Result<(Mesh, ExtractStats)>
    where
        G: ScalarGrid + Sync + ?Sized,
    {
        let start = Instant::now();

        if !iso_value.is_finite() {
            return Err(IsosurfError::InvalidIsovalue(iso_value));
        }
        validate_dims(grid.dims())?;
        validate_spacing(grid.spacing())?;
        self.config.validate()?;

        let [nx, ny, nz] = grid.dims();
        log::debug!(
            "extracting isosurface {} from {}x{}x{} grid ({:?})",
            iso_value,
            nx,
            ny,
            nz,
            self.config.weld
        );

        let slabs = self.collect_slabs(grid, iso_value).map_err(|e| {
            if e == IsosurfError::Cancelled {
                log::warn!("extraction cancelled");
            }
            e
        })?;

        let mut accumulator = MeshAccumulator::with_weld(self.config.weld)?;
        if self.config.compute_normals {
            accumulator = accumulator.with_normals();
        }

        let mut stats = ExtractStats::default();
        let total: usize = slabs.iter().map(|s| s.positions.len()).sum();
        accumulator.reserve(total);

        for slab in slabs {
            stats.cells_visited += slab.cells_visited;
            stats.crossed_cells += slab.crossed_cells;
            stats.triangles_emitted += slab.positions.len();

            if self.config.compute_normals {
                for (positions, normals) in slab.positions.into_iter().zip(slab.normals) {
                    accumulator.add_triangle_with_normals(positions, normals)?;
                }
            } else {
                for [p0, p1, p2] in slab.positions {
                    accumulator.add_triangle(p0, p1, p2)?;
                }
            }
        }

        stats.triangles_dropped = accumulator.dropped_triangles();
        let mesh = accumulator.finalize();
        stats.elapsed = start.elapsed();

        log::debug!(
            "extracted {} triangles, {} vertices from {} crossed cells in {:?}",
            mesh.triangle_count(),
            mesh.vertex_count(),
            stats.crossed_cells,
            stats.elapsed
        );

        Ok((mesh, stats))
    }

    /// Polygonise every z-slab, in slab order.
    #[cfg(feature = "parallel")]
    fn collect_slabs<G>(&self, grid: &G, iso_value: f32) -> Result<Vec<Slab>>
    where
        G: ScalarGrid + Sync + ?Sized,
    {
        use rayon::prelude::*;

        let slab_count = grid.cell_dims()[2];
        let run = || {
            (0..slab_count)
                .into_par_iter()
                .map(|z| self.process_slab(grid, z, iso_value))
                .collect::<Result<Vec<_>>>()
        };

        match self.config.threads {
            0 => run(),
            1 => self.collect_slabs_sequential(grid, iso_value),
            threads => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| IsosurfError::ThreadPool(e.to_string()))?;
                pool.install(run)
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_slabs<G>(&self, grid: &G, iso_value: f32) -> Result<Vec<Slab>>
    where
        G: ScalarGrid + Sync + ?Sized,
    {
        if self.config.threads > 1 {
            log::debug!("parallel feature disabled, ignoring threads = {}", self.config.threads);
        }
        self.collect_slabs_sequential(grid, iso_value)
    }

    fn collect_slabs_sequential<G>(&self, grid: &G, iso_value: f32) -> Result<Vec<Slab>>
    where
        G: ScalarGrid + Sync + ?Sized,
    {
        (0..grid.cell_dims()[2])
            .map(|z| self.process_slab(grid, z, iso_value))
            .collect()
    }

    /// Polygonise all cells with minimum corner at depth `z`, x fastest.
    fn process_slab<G>(&self, grid: &G, z: usize, iso_value: f32) -> Result<Slab>
    where
        G: ScalarGrid + Sync + ?Sized,
    {
        if self.config.is_cancelled() {
            return Err(IsosurfError::Cancelled);
        }

        let [cx, cy, _] = grid.cell_dims();
        let with_normals = self.config.compute_normals;
        let mut slab = Slab::default();

        for y in 0..cy {
            for x in 0..cx {
                let cell = process_cell_no_alloc(grid, x, y, z, iso_value, with_normals)?;
                slab.cells_visited += 1;
                if cell.is_empty() {
                    continue;
                }

                slab.crossed_cells += 1;
                slab.positions.extend_from_slice(cell.triangles());
                if with_normals {
                    slab.normals.extend_from_slice(cell.normals());
                }
            }
        }

        Ok(slab)
    }
}

/// Extract the isosurface at `iso_value` with the default configuration.
///
/// Equivalent to `SurfaceExtractor::default().extract(grid, iso_value)`.
pub fn extract<G>(grid: &G, iso_value: f32) -> Result<Mesh>
where
    G: ScalarGrid + Sync + ?Sized,
{
    SurfaceExtractor::default().extract(grid, iso_value)
}

/// Extract with `config`, returning the mesh and extraction counters.
pub fn extract_with_stats<G>(
    grid: &G,
    iso_value: f32,
    config: &ExtractConfig,
) -> Result<(Mesh, ExtractStats)>
where
    G: ScalarGrid + Sync + ?Sized,
{
    SurfaceExtractor::new(config.clone()).extract_with_stats(grid, iso_value)
}
