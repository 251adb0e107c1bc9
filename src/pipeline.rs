//! Read-project-write loop over line-delimited streams.
//!
//! One input line in, one output line out, in input order. Only opening the
//! streams or an I/O failure mid-stream ends a run early.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::config::RunConfig;
use crate::error::ProjectorError;
use crate::projection::RecordProjector;
use crate::serialization::{OutputEscaping, ProjectedLineWriter};

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub lines: u64,
}

/// Project every line of `reader` into `writer`.
///
/// Lines are split on `\n`; a trailing `\r` is dropped as well. Bytes that are
/// not valid UTF-8 are replaced rather than rejected, so a damaged record still
/// yields an output line.
pub fn project_stream<R: BufRead, W: Write>(
    mut reader: R,
    writer: W,
    projector: &RecordProjector,
    escaping: OutputEscaping,
) -> Result<RunStats, ProjectorError> {
    let mut out = ProjectedLineWriter::new(writer, escaping);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(strip_line_ending(&buf));
        let record = projector.project(&line);
        out.write(&record)?;
    }

    out.flush()?;
    Ok(RunStats {
        lines: out.lines_written(),
    })
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Run a projection from `config.input` to `config.output`.
///
/// The input is opened before the output is created, so a missing input
/// leaves an existing output file untouched.
pub fn run(config: &RunConfig) -> Result<RunStats, ProjectorError> {
    let schema = config.load_schema()?;
    tracing::debug!(
        "Projecting {} fields in {} mode with {} escaping",
        schema.len(),
        config.mode,
        config.escaping
    );

    let input = File::open(&config.input).map_err(|source| ProjectorError::OpenInput {
        path: config.input.clone(),
        source,
    })?;
    let output = File::create(&config.output).map_err(|source| ProjectorError::CreateOutput {
        path: config.output.clone(),
        source,
    })?;

    tracing::info!(
        "Projecting {} -> {}",
        config.input.display(),
        config.output.display()
    );

    let projector = RecordProjector::new(schema, config.mode);
    let stats = project_stream(
        BufReader::new(input),
        BufWriter::new(output),
        &projector,
        config.escaping,
    )?;

    tracing::info!("Projected {} records", stats.lines);
    Ok(stats)
}
