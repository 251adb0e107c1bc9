//! # orion-projector: canonical projection of telescope records
//!
//! Reads line-delimited, near-JSON records and re-emits each one as a compact
//! JSON line with a fixed set of keys in a fixed order:
//!
//! ```text
//! {"SourceIP": "10.0.0.1", "Port": 443, "Traffic": 7200, "ASN": 64512}
//! ```
//!
//! becomes
//!
//! ```text
//! {"SourceIP":"10.0.0.1","Port":443,"Traffic":7200,"Packets":0,"Bytes":0,"UniqueDests":0,"UniqueDest24s":0,"ASN":64512,"Prefix":"","TCP":"","ICMP":""}
//! ```
//!
//! Fields are located by a lexical scan for the quoted key, not by parsing
//! JSON (see [`extraction`]). Every input line yields exactly one output line;
//! fields that cannot be found project as `""` or `0`.
//!
//! ## Example
//!
//! ```
//! use orion_projector::{OutputEscaping, RecordProjector, render_line};
//!
//! let projector = RecordProjector::default();
//! let record = projector.project(r#"{"Port": 22, "TCP": "SYN"}"#);
//! let line = render_line(&record, OutputEscaping::Raw).unwrap();
//! assert!(line.starts_with(r#"{"SourceIP":"","Port":22,"#));
//! ```

pub mod config;
pub mod error;
pub mod extraction;
pub mod pipeline;
pub mod projection;
pub mod schema;
pub mod scoring;
pub mod serialization;

pub use config::RunConfig;
pub use error::{ProjectorError, SchemaError, ScoringError};
pub use extraction::{
    extract_int, extract_str, parse_int_prefix, ExtractionMode, Extractor, LexicalRecord,
    StructuralRecord,
};
pub use pipeline::{project_stream, run, RunStats};
pub use projection::{ProjectedRecord, RecordProjector};
pub use schema::{FieldDef, FieldKind, FieldSchema, FieldValue};
pub use scoring::{argmax_labels, predict, FnModel, Matrix, ModelRegistry, ScoringModel};
pub use serialization::{render_line, OutputEscaping, ProjectedLineWriter};
