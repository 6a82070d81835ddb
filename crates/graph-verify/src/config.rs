//! Input/output formats and loader options.

use std::collections::BTreeSet;
use std::path::Path;

use clap::ValueEnum;

use crate::error::{LoadError, Result};
use crate::model::iri::PrefixMap;
use crate::model::ontology::{crm, standard};

/// Base IRI for entities that are known only by name.
pub const DEFAULT_BASE_URI: &str = "http://graph-verify.example/entity/";

/// Serialization of a schema or graph file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputFormat {
    /// Pick by file extension.
    #[default]
    Auto,
    /// JSON document.
    Json,
    /// N-Triples.
    #[value(name = "ntriples", alias = "nt")]
    NTriples,
    /// JSON lines of extracted ontology triplets (graphs only).
    #[value(alias = "jsonl")]
    Triplets,
}

impl InputFormat {
    /// Replace `Auto` with the format implied by the extension of `path`.
    pub fn resolve(self, path: &Path) -> Result<InputFormat> {
        if self != InputFormat::Auto {
            return Ok(self);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(InputFormat::Json),
            Some("nt") => Ok(InputFormat::NTriples),
            Some("jsonl") | Some("ndjson") => Ok(InputFormat::Triplets),
            _ => Err(LoadError::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InputFormat::Auto => "auto",
            InputFormat::Json => "json",
            InputFormat::NTriples => "ntriples",
            InputFormat::Triplets => "triplets",
        }
    }
}

/// Report serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `[SEVERITY] KIND at <ref>: <message>` lines.
    #[default]
    Text,
    /// JSON summary and violation list.
    Json,
    /// Validation report graph as N-Triples.
    #[value(name = "ntriples", alias = "nt")]
    NTriples,
    /// Validation report graph as Turtle.
    #[value(alias = "ttl")]
    Turtle,
}

/// Options controlling how data graphs are read.
#[derive(Debug, Clone)]
pub struct GraphLoadOptions {
    /// Base IRI for minting entity IRIs from bare names.
    pub base_uri: String,
    /// Namespace for bare class/property names in triplet files.
    pub vocabulary: String,
    /// Prefixes available to JSON documents in addition to their own.
    pub prefixes: PrefixMap,
    /// Predicates skipped when reading N-Triples (annotations).
    pub ignored_predicates: BTreeSet<String>,
}

impl Default for GraphLoadOptions {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            vocabulary: crm::NS.to_string(),
            prefixes: PrefixMap::standard(),
            ignored_predicates: default_ignored_predicates(),
        }
    }
}

/// Annotation predicates with no constraint semantics.
pub fn default_ignored_predicates() -> BTreeSet<String> {
    [
        standard::RDFS_LABEL,
        standard::RDFS_COMMENT,
        standard::RDFS_SEE_ALSO,
        standard::OWL_SAME_AS,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Parse a `PREFIX=IRI` command-line binding.
pub fn parse_prefix_binding(s: &str) -> std::result::Result<(String, String), String> {
    let (prefix, iri) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PREFIX=IRI, got `{s}`"))?;
    let prefix = prefix.trim().trim_end_matches(':');
    if prefix.is_empty() || iri.trim().is_empty() {
        return Err(format!("expected PREFIX=IRI, got `{s}`"));
    }
    Ok((prefix.to_string(), iri.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_format_from_extension() {
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("g.JSON")).unwrap(),
            InputFormat::Json
        );
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("g.nt")).unwrap(),
            InputFormat::NTriples
        );
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("chunks.jsonl")).unwrap(),
            InputFormat::Triplets
        );
        assert!(InputFormat::Auto.resolve(Path::new("g.owl")).is_err());
        assert_eq!(
            InputFormat::Json.resolve(Path::new("g.owl")).unwrap(),
            InputFormat::Json
        );
    }

    #[test]
    fn prefix_binding() {
        assert_eq!(
            parse_prefix_binding("ex=http://example.org/").unwrap(),
            ("ex".to_string(), "http://example.org/".to_string())
        );
        assert_eq!(
            parse_prefix_binding("ex:=http://example.org/").unwrap().0,
            "ex"
        );
        assert!(parse_prefix_binding("nope").is_err());
    }
}
