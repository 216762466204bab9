//! Volume to OBJ
//!
//! Extracts an isosurface from a scan volume or a synthetic field and writes
//! it as Wavefront OBJ.
//!
//! # Usage
//!
//! ```bash
//! # From a pipeline file
//! cargo run --release --bin volume_to_obj -- --config pipeline.toml
//!
//! # From a raw volume
//! cargo run --release --bin volume_to_obj -- --input ct.raw --dims 512 512 120 \
//!     --spacing 0.7 0.7 2.5 --sample i16-le --weld exact --normals -o ct.obj
//!
//! # Synthetic field
//! cargo run --release --bin volume_to_obj -- --synthetic gyroid --size 96 -o gyroid.obj
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use instant::Instant;

use demos::{banner, section, synthetic_grid, Shape};
use isosurf::{ExtractConfig, ScalarGrid, WeldMode};
use isosurf_io::{
    export_obj_to_file, extract_volume, run_pipeline, InputConfig, ObjExportConfig,
    PipelineConfig, PipelineReport, RawSample,
};

#[derive(Parser, Debug)]
#[command(name = "volume_to_obj")]
#[command(about = "Extract an isosurface from a volume and write it as OBJ")]
#[command(group(ArgGroup::new("source").required(true).args(["config", "input", "synthetic"])))]
struct Cli {
    /// TOML pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Headerless raw volume file
    #[arg(short, long, requires = "dims")]
    input: Option<PathBuf>,

    /// Raw volume dimensions
    #[arg(long, num_args = 3, value_names = ["NX", "NY", "NZ"])]
    dims: Option<Vec<usize>>,

    /// Raw volume sample spacing
    #[arg(long, num_args = 3, value_names = ["SX", "SY", "SZ"])]
    spacing: Option<Vec<f32>>,

    /// Raw sample encoding
    #[arg(long, value_enum, default_value_t = SampleArg::U8)]
    sample: SampleArg,

    /// Synthetic field instead of a file
    #[arg(long, value_enum)]
    synthetic: Option<Shape>,

    /// Synthetic grid resolution per axis
    #[arg(long, default_value_t = 64)]
    size: usize,

    /// Surface threshold (default: 0.5 for scans, 0.0 for synthetic fields)
    #[arg(long)]
    isovalue: Option<f32>,

    /// Skip min-max normalization of raw samples
    #[arg(long)]
    no_normalize: bool,

    /// Vertex welding
    #[arg(long, value_enum, default_value_t = WeldArg::None)]
    weld: WeldArg,

    /// Tolerance for `--weld hash`
    #[arg(long, default_value_t = 1e-4)]
    tolerance: f32,

    /// Write per-vertex normals
    #[arg(long)]
    normals: bool,

    /// Worker threads (0 = all cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Output OBJ path
    #[arg(short, long, default_value = "surface.obj")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SampleArg {
    U8,
    U16Le,
    I16Le,
    F32Le,
}

impl From<SampleArg> for RawSample {
    fn from(arg: SampleArg) -> Self {
        match arg {
            SampleArg::U8 => RawSample::U8,
            SampleArg::U16Le => RawSample::U16Le,
            SampleArg::I16Le => RawSample::I16Le,
            SampleArg::F32Le => RawSample::F32Le,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WeldArg {
    None,
    Exact,
    Hash,
}

impl Cli {
    fn weld_mode(&self) -> WeldMode {
        match self.weld {
            WeldArg::None => WeldMode::None,
            WeldArg::Exact => WeldMode::Exact,
            WeldArg::Hash => WeldMode::SpatialHash {
                tolerance: self.tolerance,
            },
        }
    }

    fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::default()
            .with_weld(self.weld_mode())
            .with_normals(self.normals)
            .with_threads(self.threads)
    }

    fn raw_pipeline(&self, path: PathBuf) -> Result<PipelineConfig> {
        let dims = triple(self.dims.as_deref(), "--dims")?.context("--input requires --dims")?;
        let spacing = triple(self.spacing.as_deref(), "--spacing")?.unwrap_or([1.0, 1.0, 1.0]);

        let config = PipelineConfig {
            input: InputConfig {
                path,
                dims,
                spacing,
                sample: self.sample.into(),
            },
            isovalue: self.isovalue.unwrap_or(0.5),
            normalize: !self.no_normalize,
            weld: self.weld_mode(),
            normals: self.normals,
            threads: self.threads,
            output: self.output.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn triple<T: Copy>(values: Option<&[T]>, flag: &str) -> Result<Option<[T; 3]>> {
    match values {
        None => Ok(None),
        Some(&[a, b, c]) => Ok(Some([a, b, c])),
        Some(other) => bail!("{} expects 3 values, got {}", flag, other.len()),
    }
}

fn run_synthetic(cli: &Cli, shape: Shape) -> Result<PipelineReport> {
    let start = Instant::now();
    let grid = synthetic_grid(shape, cli.size)?;
    println!(
        "  Sampled {} field on {}³ grid in {:.2?}",
        shape.name(),
        cli.size,
        start.elapsed()
    );

    let dims = grid.dims();
    let isovalue = cli.isovalue.unwrap_or(0.0);
    let (mesh, extract, value_range) =
        extract_volume(grid, isovalue, false, &cli.extract_config())?;

    let export = ObjExportConfig::default()
        .with_comment(format!("isovalue {}", isovalue))
        .with_comment(format!("synthetic {} {}", shape.name(), cli.size));
    let stats = export_obj_to_file(&mesh, &cli.output, &export)?;

    Ok(PipelineReport {
        dims,
        value_range,
        isovalue,
        extract,
        mesh: stats,
        output: Some(cli.output.clone()),
    })
}

fn print_report(report: &PipelineReport) {
    section("Report");
    println!(
        "  Grid:           {} x {} x {}",
        report.dims[0], report.dims[1], report.dims[2]
    );
    if let Some((lo, hi)) = report.value_range {
        println!("  Sample range:   [{:.4}, {:.4}]", lo, hi);
    }
    println!("  Isovalue:       {}", report.isovalue);
    println!("  Cells visited:  {}", report.extract.cells_visited);
    println!("  Crossed cells:  {}", report.extract.crossed_cells);
    println!("  Triangles:      {}", report.mesh.triangle_count);
    println!("  Vertices:       {}", report.mesh.vertex_count);
    if report.extract.triangles_dropped > 0 {
        println!("  Dropped:        {} (collapsed by welding)", report.extract.triangles_dropped);
    }
    println!("  Surface area:   {:.4}", report.mesh.surface_area);
    println!(
        "  Bounds:         ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
        report.mesh.bbox_min.x,
        report.mesh.bbox_min.y,
        report.mesh.bbox_min.z,
        report.mesh.bbox_max.x,
        report.mesh.bbox_max.y,
        report.mesh.bbox_max.z
    );
    println!("  Extraction:     {:.2?}", report.extract.elapsed);
    if let Some(path) = &report.output {
        println!("  Output:         {}", path.display());
    }
    println!();
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    banner("isosurf Volume to OBJ");

    let start = Instant::now();
    let report = if let Some(path) = &cli.config {
        section("Pipeline Config");
        let config = PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        println!("  Input:  {}", config.input.path.display());
        println!("  Output: {}", config.output.display());
        run_pipeline(&config)?
    } else if let Some(path) = &cli.input {
        section("Raw Volume");
        let config = cli.raw_pipeline(path.clone())?;
        println!("  Input:  {}", config.input.path.display());
        println!("  Output: {}", config.output.display());
        run_pipeline(&config)?
    } else if let Some(shape) = cli.synthetic {
        section("Synthetic Field");
        run_synthetic(&cli, shape)?
    } else {
        bail!("one of --config, --input or --synthetic is required");
    };
    println!();

    print_report(&report);
    log::info!("done in {:.2?}", start.elapsed());
    Ok(())
}
