//! Pipeline configuration, loadable from a JSON file.

use std::path::Path;

use pdfoutline_core::{FeatureParams, HeadingParams, OutlineOptions, OutlineParams, RankOptions};
use pdfoutline_parse::ExtractOptions;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Every tunable of the outline and collection pipelines.
///
/// Missing fields take their defaults, so a config file only needs the
/// values it changes:
///
/// ```json
/// { "max_workers": 4, "heading": { "min_score": 6 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extract: ExtractOptions,
    pub features: FeatureParams,
    pub heading: HeadingParams,
    pub outline: OutlineParams,
    pub rank: RankOptions,
    /// Upper bound on concurrently processed documents.
    pub max_workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            features: FeatureParams::default(),
            heading: HeadingParams::default(),
            outline: OutlineParams::default(),
            rank: RankOptions::default(),
            max_workers: 8,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Io`] if the file cannot be read,
    /// [`PipelineError::Config`] if it is not a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(PipelineError::io(path))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_workers == 0 {
            return Err(PipelineError::Config("max_workers must be at least 1".into()));
        }
        if self.outline.indent_bucket_width <= 0.0 {
            return Err(PipelineError::Config(
                "outline.indent_bucket_width must be positive".into(),
            ));
        }
        if self.extract.y_tolerance < 0.0 {
            return Err(PipelineError::Config("extract.y_tolerance must not be negative".into()));
        }
        Ok(())
    }

    /// The heuristic parameters of the outline stages.
    pub fn outline_options(&self) -> OutlineOptions {
        OutlineOptions {
            features: self.features.clone(),
            heading: self.heading.clone(),
            outline: self.outline.clone(),
        }
    }
}
