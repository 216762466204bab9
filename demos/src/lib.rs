//! Shared helpers for the isosurf demo binaries.
//!
//! Synthetic fields are signed: negative inside the shape, positive outside,
//! with the surface at `0.0`. They are sampled over the unit cube.

use clap::ValueEnum;
use isosurf::{Point3, Result, Spacing, VoxelGrid};

/// Synthetic test shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// Sphere of radius 0.35 centered in the unit cube.
    Sphere,
    /// Two periods of a gyroid, clipped to a sphere so the surface is closed.
    Gyroid,
    /// Torus in the xy plane, major radius 0.3, minor radius 0.1.
    Torus,
}

impl Shape {
    /// Signed field value at `p` in unit-cube coordinates.
    pub fn sample(self, p: Point3) -> f32 {
        let c = p - Point3::splat(0.5);
        match self {
            Shape::Sphere => c.length() - 0.35,
            Shape::Torus => {
                let ring = (c.x * c.x + c.y * c.y).sqrt() - 0.3;
                (ring * ring + c.z * c.z).sqrt() - 0.1
            }
            Shape::Gyroid => {
                let k = 4.0 * std::f32::consts::PI;
                let (x, y, z) = (p.x * k, p.y * k, p.z * k);
                let gyroid = (x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos()) / k;
                // Thicken the sheet and intersect with the bounding sphere.
                let sheet = gyroid.abs() - 0.02;
                sheet.max(c.length() - 0.45)
            }
        }
    }

    /// Lowercase name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Sphere => "sphere",
            Shape::Gyroid => "gyroid",
            Shape::Torus => "torus",
        }
    }
}

/// Sample `shape` on a `size`^3 grid spanning the unit cube.
pub fn synthetic_grid(shape: Shape, size: usize) -> Result<VoxelGrid> {
    let step = 1.0 / (size.max(2) - 1) as f32;
    VoxelGrid::from_fn([size, size, size], Spacing::uniform(step), |p| shape.sample(p))
}

/// Print a boxed section heading.
pub fn section(title: &str) {
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ {:<59} │", title);
    println!("└─────────────────────────────────────────────────────────────┘");
}

/// Print the program banner.
pub fn banner(title: &str) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("          {}", title);
    println!("═══════════════════════════════════════════════════════════════");
    println!();
}
