//! Prefix handling and IRI minting for graph and schema terms.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::ontology::{crm, standard};
use crate::error::{LoadError, Result};

/// Characters that need percent-encoding in a minted IRI segment.
/// Alphanumerics and `-`, `_`, `.`, `~` stay as-is (RFC 3987 unreserved).
const IRI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Namespace prefixes, used both to expand prefixed names read from input
/// documents and to compact IRIs when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    prefixes: BTreeMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The RDF/RDFS/OWL/XSD prefixes plus `crm:`.
    pub fn standard() -> Self {
        let mut map = Self::new();
        map.insert("rdf", standard::RDF);
        map.insert("rdfs", standard::RDFS);
        map.insert("owl", standard::OWL);
        map.insert("xsd", standard::XSD);
        map.insert(crm::PREFIX, crm::NS);
        map
    }

    /// Register (or replace) a prefix.
    pub fn insert(&mut self, prefix: &str, namespace: &str) {
        self.prefixes
            .insert(prefix.to_string(), namespace.to_string());
    }

    /// Register every prefix of `other`, overriding existing entries.
    pub fn extend(&mut self, other: &PrefixMap) {
        for (prefix, ns) in &other.prefixes {
            self.insert(prefix, ns);
        }
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Expand a term to an absolute IRI.
    ///
    /// Registered prefixes win over URI schemes, so `crm:E21_Person`
    /// expands even though `crm` would parse as a scheme. Absolute IRIs and
    /// blank node labels pass through unchanged. Returns `None` for bare
    /// names and for prefixed names with an unregistered prefix.
    pub fn expand(&self, term: &str) -> Option<String> {
        if let Some((prefix, local)) = term.split_once(':') {
            if let Some(ns) = self.prefixes.get(prefix) {
                return Some(format!("{ns}{local}"));
            }
        }
        if is_absolute(term) {
            return Some(term.to_string());
        }
        None
    }

    /// Resolve a term read from an input document.
    ///
    /// Prefixed names and absolute IRIs go through [`expand`](Self::expand).
    /// A bare name is appended to `vocab` when given and kept verbatim
    /// otherwise. A `prefix:local` with an unregistered prefix is an error.
    pub fn resolve(&self, term: &str, vocab: Option<&str>) -> Result<String> {
        let term = term.trim();
        if let Some(iri) = self.expand(term) {
            return Ok(iri);
        }
        if term.contains(':') {
            return Err(LoadError::UnknownPrefix(term.to_string()));
        }
        Ok(match vocab {
            Some(ns) => format!("{ns}{term}"),
            None => term.to_string(),
        })
    }

    /// Compact an IRI to `prefix:local` using the longest matching namespace.
    pub fn compact(&self, iri: &str) -> Option<String> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, ns) in &self.prefixes {
            if iri.starts_with(ns.as_str())
                && best.is_none_or(|(_, prev_ns)| ns.len() > prev_ns.len())
            {
                best = Some((prefix.as_str(), ns.as_str()));
            }
        }
        let (prefix, ns) = best?;
        let local = &iri[ns.len()..];
        if is_local_name(local) {
            Some(format!("{prefix}:{local}"))
        } else {
            None
        }
    }

    /// Format a term for display: compacted when possible, `<iri>` otherwise.
    /// Blank node labels are returned unchanged.
    pub fn format_term(&self, term: &str) -> String {
        if term.starts_with("_:") {
            return term.to_string();
        }
        self.compact(term).unwrap_or_else(|| format!("<{term}>"))
    }
}

/// True for blank node labels and IRIs with a hierarchical or URN scheme.
pub fn is_absolute(term: &str) -> bool {
    term.starts_with("_:")
        || term.contains("://")
        || term.starts_with("urn:")
        || term.starts_with("mailto:")
}

/// Local names we are willing to print in prefixed form.
fn is_local_name(local: &str) -> bool {
    !local.is_empty()
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Generates IRIs for named entities and report nodes.
pub struct IriMinter {
    base_uri: String,
}

impl IriMinter {
    pub fn new(base_uri: &str) -> Self {
        Self {
            base_uri: base_uri.to_string(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Escape a string for use in an IRI segment.
    fn escape(value: &str) -> String {
        utf8_percent_encode(value.trim(), IRI_ENCODE_SET).to_string()
    }

    /// Join `segment` onto the base, inserting `/` unless the base already
    /// ends in a separator.
    fn join(&self, segment: &str) -> String {
        if self.base_uri.ends_with('/') || self.base_uri.ends_with('#') {
            format!("{}{}", self.base_uri, segment)
        } else {
            format!("{}/{}", self.base_uri, segment)
        }
    }

    /// IRI for an entity known only by its name (e.g. "Mona Lisa").
    pub fn entity_iri(&self, name: &str) -> String {
        self.join(&Self::escape(name))
    }

    /// IRI for the report node itself.
    pub fn report_iri(&self) -> String {
        self.join("report")
    }

    /// IRI for the n-th violation of a report.
    pub fn violation_iri(&self, ordinal: usize) -> String {
        self.join(&format!("violation/{ordinal}"))
    }
}
