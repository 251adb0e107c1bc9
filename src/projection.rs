//! Record projection onto a fixed field schema.
//!
//! The projector never fails: every schema field is looked up once per line and
//! a field that cannot be extracted takes its zero-value.

use indexmap::IndexMap;

use crate::extraction::ExtractionMode;
use crate::schema::{FieldSchema, FieldValue};

/// A record reduced to the schema's fields, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRecord {
    values: IndexMap<String, FieldValue>,
}

impl ProjectedRecord {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, FieldValue> {
        self.values.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Drives extraction of every schema field for one line at a time.
#[derive(Debug, Clone, Default)]
pub struct RecordProjector {
    schema: FieldSchema,
    mode: ExtractionMode,
}

impl RecordProjector {
    pub fn new(schema: FieldSchema, mode: ExtractionMode) -> Self {
        Self { schema, mode }
    }

    /// Project a single line. `line` must not include its line terminator.
    pub fn project(&self, line: &str) -> ProjectedRecord {
        let record = self.mode.view(line);
        let values = self
            .schema
            .iter()
            .map(|field| (field.key.clone(), record.extract(field)))
            .collect();

        ProjectedRecord { values }
    }
}
