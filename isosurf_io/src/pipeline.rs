//! End-to-end volume to OBJ pipeline.

use std::path::PathBuf;

use isosurf::{ExtractConfig, ExtractStats, Mesh, MeshStats, ScalarGrid, SurfaceExtractor, VoxelGrid};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::obj::{export_obj_to_file, ObjExportConfig};
use crate::raw::read_raw_file;
use crate::volume::normalize_grid;

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Grid dimensions.
    pub dims: [usize; 3],
    /// Sample range before normalization, if any finite sample exists.
    pub value_range: Option<(f32, f32)>,
    /// Isovalue used for extraction.
    pub isovalue: f32,
    /// Extraction counters.
    pub extract: ExtractStats,
    /// Statistics of the written mesh.
    pub mesh: MeshStats,
    /// Where the mesh was written, if it was.
    pub output: Option<PathBuf>,
}

/// Optionally normalize `grid`, then extract the surface at `isovalue`.
///
/// Returns the mesh, the extraction counters and the original sample range.
pub fn extract_volume(
    grid: VoxelGrid,
    isovalue: f32,
    normalize: bool,
    config: &ExtractConfig,
) -> Result<(Mesh, ExtractStats, Option<(f32, f32)>)> {
    let (grid, range) = if normalize {
        let (grid, range) = normalize_grid(grid)?;
        (grid, Some(range))
    } else {
        let range = grid.value_range();
        (grid, range)
    };

    if let Some((lo, hi)) = range {
        if !normalize && (isovalue < lo || isovalue > hi) {
            log::warn!(
                "isovalue {} lies outside the sample range [{}, {}]",
                isovalue,
                lo,
                hi
            );
        }
    }

    let (mesh, stats) = SurfaceExtractor::new(config.clone()).extract_with_stats(&grid, isovalue)?;
    Ok((mesh, stats, range))
}

/// Run a configured pipeline: read, normalize, extract and write OBJ.
///
/// # Example
///
/// ```ignore
/// let config = PipelineConfig::from_file("pipeline.toml")?;
/// let report = run_pipeline(&config)?;
/// println!("{} triangles", report.mesh.triangle_count);
/// ```
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;

    let grid = read_raw_file(
        &config.input.path,
        config.input.dims,
        config.spacing(),
        config.input.sample,
    )?;
    let dims = grid.dims();

    let (mesh, extract, value_range) = extract_volume(
        grid,
        config.isovalue,
        config.normalize,
        &config.extract_config(),
    )?;

    let export = ObjExportConfig::default()
        .with_comment(format!("isovalue {}", config.isovalue))
        .with_comment(format!("source {}", config.input.path.display()));
    let stats = export_obj_to_file(&mesh, &config.output, &export)?;

    Ok(PipelineReport {
        dims,
        value_range,
        isovalue: config.isovalue,
        extract,
        mesh: stats,
        output: Some(config.output.clone()),
    })
}
