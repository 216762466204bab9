//! TOML pipeline configuration.
//!
//! ```toml
//! isovalue = 0.5
//! normalize = true
//! normals = true
//! threads = 0
//! output = "surface.obj"
//! weld = { mode = "exact" }
//!
//! [input]
//! path = "scan.raw"
//! dims = [512, 512, 120]
//! spacing = [0.7, 0.7, 2.5]
//! sample = "i16_le"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use isosurf::{ExtractConfig, Spacing, WeldMode};
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};
use crate::raw::RawSample;

/// Raw volume to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Path of the headerless sample file.
    pub path: PathBuf,
    /// Grid dimensions `[nx, ny, nz]`.
    pub dims: [usize; 3],
    /// Physical sample spacing per axis.
    #[serde(default = "default_spacing")]
    pub spacing: [f32; 3],
    /// Sample encoding.
    #[serde(default)]
    pub sample: RawSample,
}

/// Full configuration of a load, normalize, extract, export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Volume to read.
    pub input: InputConfig,
    /// Surface threshold, applied after normalization.
    #[serde(default = "default_isovalue")]
    pub isovalue: f32,
    /// Min-max normalize samples onto `[0, 1]` before extraction.
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Vertex welding.
    #[serde(default)]
    pub weld: WeldMode,
    /// Compute per-vertex normals.
    #[serde(default)]
    pub normals: bool,
    /// Worker threads (`0` = all cores).
    #[serde(default)]
    pub threads: usize,
    /// Destination OBJ file.
    pub output: PathBuf,
}

fn default_spacing() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_isovalue() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

impl PipelineConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    /// - `Config` if the text is not valid TOML for this schema
    /// - `InvalidConfig` if a value is out of range
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// Relative input and output paths are resolved against the file's
    /// directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent() {
            if config.input.path.is_relative() {
                config.input.path = base.join(&config.input.path);
            }
            if config.output.is_relative() {
                config.output = base.join(&config.output);
            }
        }

        log::debug!("loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges that the TOML schema cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.isovalue.is_finite() {
            return Err(invalid(format!("isovalue must be finite, got {}", self.isovalue)));
        }
        if !self.spacing().is_valid() {
            return Err(invalid(format!(
                "spacing must be finite and positive, got {:?}",
                self.input.spacing
            )));
        }
        if let Err(e) = self.weld.validate() {
            return Err(invalid(e.to_string()));
        }
        Ok(())
    }

    /// Input spacing as a [`Spacing`].
    pub fn spacing(&self) -> Spacing {
        Spacing::from(self.input.spacing)
    }

    /// Extraction options described by this configuration.
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::default()
            .with_weld(self.weld)
            .with_normals(self.normals)
            .with_threads(self.threads)
    }
}

fn invalid(message: String) -> IoError {
    IoError::InvalidConfig { message }
}
