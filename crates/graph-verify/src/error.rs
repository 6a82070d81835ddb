//! Errors raised while loading schemas and graphs.
//!
//! Data-quality problems never show up here; they become
//! [`Violation`](crate::report::Violation)s. A `LoadError` means the input
//! could not be read at all.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON parse error on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("N-Triples syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("unknown prefix in `{0}`")]
    UnknownPrefix(String),

    #[error("invalid cardinality for {property}: min {min} exceeds max {max}")]
    InvalidCardinality { property: String, min: u32, max: u32 },

    #[error("invalid cardinality value `{value}` for {property}")]
    InvalidCardinalityValue { property: String, value: String },

    #[error("cannot infer input format of {0}; pass --schema-format/--graph-format")]
    UnknownFormat(PathBuf),

    #[error("{format} is not a supported {what} format")]
    UnsupportedFormat { format: String, what: &'static str },
}

pub type Result<T> = std::result::Result<T, LoadError>;
