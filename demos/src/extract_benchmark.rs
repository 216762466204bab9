//! Extraction Benchmark
//!
//! Times surface extraction on synthetic fields:
//! 1. Sequential vs parallel cell processing
//! 2. Raw triangle soup vs exact and hashed welding
//! 3. With and without per-vertex normals
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin extract_benchmark -- --sizes 64 128 --iterations 5
//! ```

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use instant::Instant;

use demos::{banner, section, synthetic_grid, Shape};
use isosurf::{ExtractConfig, SurfaceExtractor, VoxelGrid, WeldMode};

#[derive(Parser, Debug)]
#[command(name = "extract_benchmark")]
#[command(about = "Time isosurface extraction on synthetic fields")]
struct Cli {
    /// Field to extract
    #[arg(long, value_enum, default_value_t = Shape::Gyroid)]
    shape: Shape,

    /// Grid resolutions to benchmark
    #[arg(long, num_args = 1.., default_values_t = [32, 64, 128])]
    sizes: Vec<usize>,

    /// Timed runs per configuration
    #[arg(long, default_value_t = 5)]
    iterations: usize,
}

struct Timing {
    best: Duration,
    mean: Duration,
    triangles: usize,
    vertices: usize,
}

fn time_extraction(grid: &VoxelGrid, config: ExtractConfig, iterations: usize) -> Result<Timing> {
    let extractor = SurfaceExtractor::new(config);

    // Warmup
    let mesh = extractor.extract(grid, 0.0)?;

    let iterations = iterations.max(1);
    let mut best = Duration::MAX;
    let mut total = Duration::ZERO;
    for _ in 0..iterations {
        let start = Instant::now();
        let mesh = extractor.extract(grid, 0.0)?;
        let elapsed = start.elapsed();
        std::hint::black_box(&mesh);
        best = best.min(elapsed);
        total += elapsed;
    }

    Ok(Timing {
        best,
        mean: total / iterations as u32,
        triangles: mesh.triangle_count(),
        vertices: mesh.vertex_count(),
    })
}

fn print_row(label: &str, timing: &Timing, baseline: Option<Duration>) {
    let speedup = baseline
        .map(|b| format!("{:.2}x", b.as_secs_f64() / timing.best.as_secs_f64().max(1e-9)))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {:<22} {:>10.2?} {:>10.2?} {:>10} {:>10} {:>8}",
        label, timing.best, timing.mean, timing.triangles, timing.vertices, speedup
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    banner("isosurf Extraction Benchmark");
    println!("  Shape:      {}", cli.shape.name());
    println!("  Iterations: {}", cli.iterations);
    println!("  Threads:    {}", std::thread::available_parallelism().map_or(1, |n| n.get()));
    println!();

    for &size in &cli.sizes {
        section(&format!("{} grid ({}³)", cli.shape.name(), size));

        let start = Instant::now();
        let grid = synthetic_grid(cli.shape, size)?;
        println!("  Sampled in {:.2?}", start.elapsed());
        println!();
        println!(
            "  {:<22} {:>10} {:>10} {:>10} {:>10} {:>8}",
            "configuration", "best", "mean", "triangles", "vertices", "speedup"
        );

        let sequential = time_extraction(&grid, ExtractConfig::default().with_threads(1), cli.iterations)?;
        print_row("sequential", &sequential, None);

        let parallel = time_extraction(&grid, ExtractConfig::default(), cli.iterations)?;
        print_row("parallel", &parallel, Some(sequential.best));

        let exact = time_extraction(
            &grid,
            ExtractConfig::default().with_weld(WeldMode::Exact),
            cli.iterations,
        )?;
        print_row("parallel + exact weld", &exact, Some(sequential.best));

        let hashed = time_extraction(
            &grid,
            ExtractConfig::default().with_weld(WeldMode::SpatialHash { tolerance: 1e-4 }),
            cli.iterations,
        )?;
        print_row("parallel + hash weld", &hashed, Some(sequential.best));

        let normals = time_extraction(
            &grid,
            ExtractConfig::default()
                .with_weld(WeldMode::Exact)
                .with_normals(true),
            cli.iterations,
        )?;
        print_row("exact weld + normals", &normals, Some(sequential.best));

        if parallel.triangles != sequential.triangles {
            log::warn!(
                "parallel produced {} triangles, sequential {}",
                parallel.triangles,
                sequential.triangles
            );
        }
        println!();
    }

    Ok(())
}
