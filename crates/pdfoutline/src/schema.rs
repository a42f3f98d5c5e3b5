//! JSON Schema validation of outline documents.

use std::path::Path;

use serde_json::Value;

use crate::error::PipelineError;

const BUILTIN_SCHEMA: &str = include_str!("../schema/outline_schema.json");

/// A compiled output schema, loaded once and shared read-only by every
/// document task.
pub struct OutlineSchema {
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for OutlineSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineSchema").finish_non_exhaustive()
    }
}

impl OutlineSchema {
    /// The schema shipped with the crate: a title string and a list of
    /// `{level: H1|H2|H3, text, page ≥ 1}` entries.
    pub fn builtin() -> Result<Self, PipelineError> {
        let schema: Value = serde_json::from_str(BUILTIN_SCHEMA)?;
        Self::from_value(&schema)
    }

    /// Compile a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if `schema` is not a valid JSON Schema.
    pub fn from_value(schema: &Value) -> Result<Self, PipelineError> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| PipelineError::Config(format!("invalid JSON schema: {e}")))?;
        Ok(Self { validator })
    }

    /// Load and compile a schema file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(PipelineError::io(path))?;
        let schema: Value = serde_json::from_str(&text).map_err(|e| {
            PipelineError::Config(format!("{} is not valid JSON: {e}", path.display()))
        })?;
        Self::from_value(&schema)
    }

    /// Check an instance, collecting every violation with its instance path.
    pub fn validate(&self, instance: &Value) -> Result<(), PipelineError> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|error| {
                let path = error.instance_path.to_string();
                let path = if path.is_empty() { "/".to_string() } else { path };
                format!("{path}: {error}")
            })
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::SchemaValidation(violations))
        }
    }
}
