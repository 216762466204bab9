//! Extraction configuration.

use crate::accumulator::WeldMode;
use crate::cancel::CancelToken;
use crate::error::Result;

/// Options for [`SurfaceExtractor`](crate::SurfaceExtractor).
///
/// The default produces a non-welded mesh without normals on rayon's global
/// pool.
///
/// # Example
///
/// ```ignore
/// let config = ExtractConfig::default()
///     .with_weld(WeldMode::Exact)
///     .with_normals(true)
///     .with_threads(4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Vertex merging strategy.
    pub weld: WeldMode,
    /// Attach gradient normals to every vertex.
    pub compute_normals: bool,
    /// Worker threads; `0` uses rayon's global pool and `1` runs inline.
    pub threads: usize,
    /// Optional cancellation flag polled between z-slabs.
    pub cancel: Option<CancelToken>,
}

impl ExtractConfig {
    /// Set the weld mode.
    pub fn with_weld(mut self, weld: WeldMode) -> Self {
        self.weld = weld;
        self
    }

    /// Enable or disable per-vertex normals.
    pub fn with_normals(mut self, enabled: bool) -> Self {
        self.compute_normals = enabled;
        self
    }

    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `InvalidTolerance` for a bad spatial-hash tolerance.
    pub fn validate(&self) -> Result<()> {
        self.weld.validate()
    }

    /// Whether the attached token, if any, has been cancelled.
    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IsosurfError;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert_eq!(config.weld, WeldMode::None);
        assert!(!config.compute_normals);
        assert_eq!(config.threads, 0);
        assert!(!config.is_cancelled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let token = CancelToken::new();
        let config = ExtractConfig::default()
            .with_weld(WeldMode::SpatialHash { tolerance: 1e-3 })
            .with_normals(true)
            .with_threads(2)
            .with_cancel_token(token.clone());

        assert!(config.compute_normals);
        assert_eq!(config.threads, 2);
        assert!(!config.is_cancelled());
        token.cancel();
        assert!(config.is_cancelled());
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        let config = ExtractConfig::default().with_weld(WeldMode::SpatialHash { tolerance: 0.0 });
        assert_eq!(config.validate(), Err(IsosurfError::InvalidTolerance(0.0)));
    }
}
