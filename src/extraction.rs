//! Field extraction from raw record lines.
//!
//! The default extractor is a single-pass lexical scanner, not a JSON parser.
//! It locates a key by plain substring search (quotes included), skips to the
//! value after the next colon and captures up to the next `"`, `,` or `}`.
//!
//! Known approximations of the lexical scanner, kept on purpose because they
//! are observable in its output:
//!
//! - the first occurrence of the quoted key wins, even if it is a string
//!   value elsewhere in the line;
//! - escaped quotes, nested objects and multi-line records are not understood.
//!
//! [`StructuralRecord`] is the strict alternative: it parses the line with
//! serde_json and reads keys from the resulting object.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::schema::{FieldDef, FieldKind, FieldValue, DEFAULT_MAX_LEN};

/// Capture capacity of the scratch buffer used for integer fields.
pub const INT_SCRATCH_LEN: usize = DEFAULT_MAX_LEN;

/// Extract the raw value following `needle` in `line`.
///
/// `needle` is the literal search text, quotes included (e.g. `"Port"`).
/// Returns an empty string when the key or its colon is missing. The result
/// holds at most `max_len - 1` bytes.
pub fn extract_str(line: &str, needle: &str, max_len: usize) -> String {
    let Some(key_pos) = line.find(needle) else {
        return String::new();
    };

    let Some(colon) = line[key_pos..].find(':') else {
        return String::new();
    };

    let value = line[key_pos + colon + 1..].trim_start_matches(|c: char| c == ' ' || c == '"');
    let end = value
        .find(|c: char| c == '"' || c == ',' || c == '}')
        .unwrap_or(value.len());

    truncate(&value[..end], max_len.saturating_sub(1)).to_string()
}

/// Extract the value following `needle` and coerce it with [`parse_int_prefix`].
///
/// A missing key, missing colon or empty capture yields 0.
pub fn extract_int(line: &str, needle: &str) -> i64 {
    let raw = extract_str(line, needle, INT_SCRATCH_LEN);
    if raw.is_empty() {
        return 0;
    }
    parse_int_prefix(&raw)
}

/// Permissive base-10 parse in the manner of C's `atoi`.
///
/// Leading whitespace is skipped, one optional sign is accepted and digits are
/// consumed up to the first non-digit. Text without a digit prefix yields 0.
/// Values past the `i64` range saturate.
pub fn parse_int_prefix(text: &str) -> i64 {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r') {
        i += 1;
    }

    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    // Accumulate towards the sign so that i64::MIN is representable.
    let mut value: i64 = 0;
    while let Some(&b) = bytes.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
        i += 1;
    }

    value
}

/// Cut `s` to at most `max_bytes` bytes without splitting a character.
fn truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// A record view that field values can be extracted from.
pub trait Extractor {
    /// Extract a string field, or `""` when it cannot be found.
    fn extract_string(&self, field: &FieldDef) -> String;

    /// Extract an integer field, or `0` when it cannot be found or parsed.
    fn extract_integer(&self, field: &FieldDef) -> i64;

    /// Extract a field according to its kind.
    fn extract(&self, field: &FieldDef) -> FieldValue {
        match field.kind {
            FieldKind::String => FieldValue::String(self.extract_string(field)),
            FieldKind::Integer => FieldValue::Int(self.extract_integer(field)),
        }
    }
}

/// Lexical view over a raw line. Construction does no work.
#[derive(Debug, Clone, Copy)]
pub struct LexicalRecord<'a> {
    line: &'a str,
}

impl<'a> LexicalRecord<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line }
    }
}

impl Extractor for LexicalRecord<'_> {
    fn extract_string(&self, field: &FieldDef) -> String {
        extract_str(self.line, &field.needle(), field.max_len)
    }

    fn extract_integer(&self, field: &FieldDef) -> i64 {
        extract_int(self.line, &field.needle())
    }
}

/// Structural view over a line parsed as a JSON object.
///
/// A line that is not a JSON object behaves like an object with no keys.
#[derive(Debug, Clone, Default)]
pub struct StructuralRecord {
    object: Map<String, Value>,
}

impl StructuralRecord {
    pub fn parse(line: &str) -> Self {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(object)) => Self { object },
            _ => Self::default(),
        }
    }
}

impl Extractor for StructuralRecord {
    fn extract_string(&self, field: &FieldDef) -> String {
        let text = match self.object.get(&field.key) {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            _ => return String::new(),
        };
        truncate(&text, field.max_len.saturating_sub(1)).to_string()
    }

    fn extract_integer(&self, field: &FieldDef) -> i64 {
        match self.object.get(&field.key) {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    i
                } else if n.as_u64().is_some() {
                    i64::MAX
                } else {
                    // `as` saturates and maps NaN to 0
                    n.as_f64().map(|f| f as i64).unwrap_or(0)
                }
            }
            Some(Value::String(s)) => parse_int_prefix(s),
            _ => 0,
        }
    }
}

/// Which extractor a projector builds for each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Substring scanner, output-compatible with the legacy projector.
    #[default]
    Lexical,
    /// serde_json parse; rejects what is not a JSON object.
    Structural,
}

impl ExtractionMode {
    /// Build the record view for `line`.
    pub fn view<'a>(&self, line: &'a str) -> Box<dyn Extractor + 'a> {
        match self {
            ExtractionMode::Lexical => Box::new(LexicalRecord::new(line)),
            ExtractionMode::Structural => Box::new(StructuralRecord::parse(line)),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Lexical => write!(f, "lexical"),
            ExtractionMode::Structural => write!(f, "structural"),
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(ExtractionMode::Lexical),
            "structural" | "strict" => Ok(ExtractionMode::Structural),
            other => Err(format!(
                "Unsupported extraction mode: '{}'. Supported modes: lexical, structural",
                other
            )),
        }
    }
}
