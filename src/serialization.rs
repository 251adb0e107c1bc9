//! Canonical line output for projected records.
//!
//! Each record becomes one compact JSON-like line: keys in schema order,
//! string values quoted, integers bare, a trailing newline.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::projection::ProjectedRecord;
use crate::schema::FieldValue;

/// How extracted string values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEscaping {
    /// Write strings verbatim. A value holding `"` or `\` yields a line that is
    /// not valid JSON; this matches the legacy projector byte for byte.
    #[default]
    Raw,
    /// Escape strings with serde_json. Output differs from the legacy projector
    /// only for values containing characters that need escaping.
    Json,
}

impl fmt::Display for OutputEscaping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputEscaping::Raw => write!(f, "raw"),
            OutputEscaping::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputEscaping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(OutputEscaping::Raw),
            "json" => Ok(OutputEscaping::Json),
            other => Err(format!(
                "Unsupported output escaping: '{}'. Supported values: raw, json",
                other
            )),
        }
    }
}

fn write_record<W: Write>(
    writer: &mut W,
    record: &ProjectedRecord,
    escaping: OutputEscaping,
) -> io::Result<()> {
    writer.write_all(b"{")?;
    for (i, (key, value)) in record.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        write!(writer, "\"{}\":", key)?;
        match (value, escaping) {
            (FieldValue::Int(n), _) => write!(writer, "{}", n)?,
            (FieldValue::String(s), OutputEscaping::Raw) => write!(writer, "\"{}\"", s)?,
            (FieldValue::String(s), OutputEscaping::Json) => {
                serde_json::to_writer(&mut *writer, s)?
            }
        }
    }
    writer.write_all(b"}")
}

/// Render a record as a canonical line, without the trailing newline.
pub fn render_line(record: &ProjectedRecord, escaping: OutputEscaping) -> io::Result<String> {
    let mut buf = Vec::new();
    write_record(&mut buf, record, escaping)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes projected records, one canonical line each.
pub struct ProjectedLineWriter<W: Write> {
    writer: W,
    escaping: OutputEscaping,
    lines_written: u64,
}

impl<W: Write> ProjectedLineWriter<W> {
    pub fn new(writer: W, escaping: OutputEscaping) -> Self {
        Self {
            writer,
            escaping,
            lines_written: 0,
        }
    }

    /// Write a single record followed by a newline.
    pub fn write(&mut self, record: &ProjectedRecord) -> io::Result<()> {
        write_record(&mut self.writer, record, self.escaping)?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
