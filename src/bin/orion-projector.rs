//! orion-projector CLI - project near-JSON telescope records onto the canonical schema
//!
//! With no arguments, reads `Data/orion-pipeline-2025-01-20.00.json` and writes
//! `output.json` in the working directory.

use clap::Parser;
use std::path::PathBuf;
use std::process;

use orion_projector::{ExtractionMode, OutputEscaping, ProjectorError, RunConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orion-projector")]
#[command(version, about = "Project near-JSON telescope records onto a fixed JSON schema", long_about = None)]
struct Cli {
    /// Input file, one record per line [env: ORION_INPUT]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file, overwritten if present [env: ORION_OUTPUT]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extraction mode (lexical, structural) [env: ORION_MODE]
    #[arg(short, long)]
    mode: Option<ExtractionMode>,

    /// String escaping in output (raw, json) [env: ORION_ESCAPING]
    #[arg(short, long)]
    escaping: Option<OutputEscaping>,

    /// YAML field schema replacing the built-in one [env: ORION_SCHEMA]
    #[arg(short, long)]
    schema: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig, ProjectorError> {
        let mut config = RunConfig::from_env()?;

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(escaping) = self.escaping {
            config.escaping = escaping;
        }
        if let Some(schema) = self.schema {
            config.schema_path = Some(schema);
        }

        Ok(config)
    }
}

fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays empty on success
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = cli
        .into_config()
        .and_then(|config| orion_projector::run(&config));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
