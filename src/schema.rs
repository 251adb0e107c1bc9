//! Field schema for projected records.
//!
//! A schema is an ordered list of field descriptors. The order is the key order
//! of every projected line, regardless of the order keys appear in the input.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SchemaError;

/// Capture capacity used for integer fields and for string fields that do not
/// declare one.
pub const DEFAULT_MAX_LEN: usize = 64;

/// How an extracted value is coerced and emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
}

/// A single projected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Int(i64),
}

impl FieldValue {
    /// The value a field takes when it cannot be extracted.
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::String => FieldValue::String(String::new()),
            FieldKind::Integer => FieldValue::Int(0),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
        }
    }
}

/// Descriptor of one schema field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDef {
    /// Bare label, e.g. `SourceIP`. The scanner searches for it with quotes.
    pub key: String,
    pub kind: FieldKind,
    /// Capture capacity of a string field, including the reserved terminator
    /// slot, so at most `max_len - 1` bytes are kept. Integer fields always
    /// capture into a 64-byte scratch buffer.
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

fn default_max_len() -> usize {
    DEFAULT_MAX_LEN
}

impl FieldDef {
    pub fn string(key: impl Into<String>, max_len: usize) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::String,
            max_len,
        }
    }

    pub fn integer(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::Integer,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// The literal text searched for in a record, quotes included.
    pub fn needle(&self) -> String {
        format!("\"{}\"", self.key)
    }
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    fields: Vec<FieldDef>,
}

/// Ordered, validated list of fields to project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldDef>,
}

impl FieldSchema {
    /// Build a schema, rejecting empty lists, duplicate or unsearchable keys
    /// and zero capacities.
    pub fn new(fields: Vec<FieldDef>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.key.is_empty() || field.key.contains('"') {
                return Err(SchemaError::InvalidKey(field.key.clone()));
            }
            if field.max_len == 0 {
                return Err(SchemaError::ZeroCapacity(field.key.clone()));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(SchemaError::DuplicateKey(field.key.clone()));
            }
        }

        Ok(Self { fields })
    }

    /// The schema of orion-pipeline telescope records.
    pub fn orion() -> Self {
        Self {
            fields: vec![
                FieldDef::string("SourceIP", 64),
                FieldDef::integer("Port"),
                FieldDef::integer("Traffic"),
                FieldDef::integer("Packets"),
                FieldDef::integer("Bytes"),
                FieldDef::integer("UniqueDests"),
                FieldDef::integer("UniqueDest24s"),
                FieldDef::integer("ASN"),
                FieldDef::string("Prefix", 64),
                FieldDef::string("TCP", 16),
                FieldDef::string("ICMP", 16),
            ],
        }
    }

    /// Parse a schema from YAML of the form:
    ///
    /// ```yaml
    /// fields:
    ///   - key: SourceIP
    ///     kind: string
    ///     max_len: 64
    ///   - key: Port
    ///     kind: integer
    /// ```
    pub fn from_yaml_str(contents: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = serde_yaml::from_str(contents)?;
        Self::new(file.fields)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDef> {
        self.fields.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::orion()
    }
}
