//! Run configuration.
//!
//! Precedence: CLI flag > environment variable (including `.env`) > built-in
//! default. The built-in defaults reproduce the legacy fixed paths.

use std::path::PathBuf;

use crate::error::ProjectorError;
use crate::extraction::ExtractionMode;
use crate::schema::FieldSchema;
use crate::serialization::OutputEscaping;

pub const DEFAULT_INPUT: &str = "Data/orion-pipeline-2025-01-20.00.json";
pub const DEFAULT_OUTPUT: &str = "output.json";

pub const ENV_INPUT: &str = "ORION_INPUT";
pub const ENV_OUTPUT: &str = "ORION_OUTPUT";
pub const ENV_MODE: &str = "ORION_MODE";
pub const ENV_ESCAPING: &str = "ORION_ESCAPING";
pub const ENV_SCHEMA: &str = "ORION_SCHEMA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: ExtractionMode,
    pub escaping: OutputEscaping,
    /// YAML schema file; `None` selects the built-in orion schema.
    pub schema_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            mode: ExtractionMode::default(),
            escaping: OutputEscaping::default(),
            schema_path: None,
        }
    }
}

impl RunConfig {
    /// Defaults overridden by any `ORION_*` variables present in the environment.
    pub fn from_env() -> Result<Self, ProjectorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`RunConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProjectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(input) = lookup(ENV_INPUT) {
            config.input = PathBuf::from(input);
        }
        if let Some(output) = lookup(ENV_OUTPUT) {
            config.output = PathBuf::from(output);
        }
        if let Some(mode) = lookup(ENV_MODE) {
            config.mode = mode
                .parse()
                .map_err(|e| ProjectorError::Config(format!("{}: {}", ENV_MODE, e)))?;
        }
        if let Some(escaping) = lookup(ENV_ESCAPING) {
            config.escaping = escaping
                .parse()
                .map_err(|e| ProjectorError::Config(format!("{}: {}", ENV_ESCAPING, e)))?;
        }
        if let Some(schema) = lookup(ENV_SCHEMA) {
            config.schema_path = Some(PathBuf::from(schema));
        }

        Ok(config)
    }

    /// The schema this run projects onto.
    pub fn load_schema(&self) -> Result<FieldSchema, ProjectorError> {
        match &self.schema_path {
            Some(path) => {
                tracing::debug!("Loading field schema from {}", path.display());
                Ok(FieldSchema::load_from_file(path)?)
            }
            None => Ok(FieldSchema::orion()),
        }
    }
}
