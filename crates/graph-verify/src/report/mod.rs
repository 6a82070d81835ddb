//! Validation results: violations, their ordering, and the finished report.
//!
//! A [`Report`] is built once by the validator and never mutated afterwards.
//! Rendering lives in [`render`] (text, JSON) and [`rdf`] (triples through a
//! [`TriplesEmitter`](crate::emitter::TriplesEmitter)).

pub mod rdf;
pub mod render;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::iri::PrefixMap;

/// How bad a violation is. Only errors make a graph non-conforming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ViolationKind {
    UnknownClass,
    UnknownProperty,
    DomainMismatch,
    RangeMismatch,
    CardinalityViolation,
    SchemaCycle,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::UnknownClass => "UnknownClass",
            ViolationKind::UnknownProperty => "UnknownProperty",
            ViolationKind::DomainMismatch => "DomainMismatch",
            ViolationKind::RangeMismatch => "RangeMismatch",
            ViolationKind::CardinalityViolation => "CardinalityViolation",
            ViolationKind::SchemaCycle => "SchemaCycle",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a violation points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Subject {
    /// A class declaration in the schema.
    Class { id: String },
    /// A property declaration in the schema.
    Property { id: String },
    /// An entity of the data graph.
    Entity { id: String },
    /// The `index`-th edge of the data graph (0-based), with the edge's
    /// origin when the input recorded one.
    Edge {
        index: usize,
        source: String,
        property: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
    /// All edges of `property` leaving `entity`.
    EntityProperty { entity: String, property: String },
}

impl Subject {
    /// The node this subject is about (class, property, entity or edge source).
    pub fn focus(&self) -> &str {
        match self {
            Subject::Class { id } | Subject::Property { id } | Subject::Entity { id } => id,
            Subject::Edge { source, .. } => source,
            Subject::EntityProperty { entity, .. } => entity,
        }
    }

    /// The property involved, if any.
    pub fn property(&self) -> Option<&str> {
        match self {
            Subject::Property { id } => Some(id),
            Subject::Edge { property, .. } | Subject::EntityProperty { property, .. } => {
                Some(property)
            }
            Subject::Class { .. } | Subject::Entity { .. } => None,
        }
    }

    /// Human-readable reference, compacting IRIs with `prefixes`.
    pub fn describe(&self, prefixes: &PrefixMap) -> String {
        match self {
            Subject::Class { id } => format!("class {}", prefixes.format_term(id)),
            Subject::Property { id } => format!("property {}", prefixes.format_term(id)),
            Subject::Entity { id } => format!("entity {}", prefixes.format_term(id)),
            Subject::Edge {
                index,
                source,
                property,
                origin,
            } => {
                let mut out = format!(
                    "edge[{index}] {} {}",
                    prefixes.format_term(source),
                    prefixes.format_term(property)
                );
                if let Some(origin) = origin {
                    out.push_str(&format!(" (from {origin})"));
                }
                out
            }
            Subject::EntityProperty { entity, property } => format!(
                "entity {} property {}",
                prefixes.format_term(entity),
                prefixes.format_term(property)
            ),
        }
    }
}

/// A single nonconformance between the data graph and the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub subject: Subject,
    pub message: String,
}

impl Violation {
    pub fn error(kind: ViolationKind, subject: Subject, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            subject,
            message: message.into(),
        }
    }

    pub fn warning(kind: ViolationKind, subject: Subject, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            subject,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Valid and total edge counts for one origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OriginSummary {
    pub valid: usize,
    pub total: usize,
}

/// Counts describing what was validated. `errors` and `warnings` count graph
/// violations only; schema diagnostics are counted by the [`Report`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub entities: usize,
    pub edges: usize,
    /// Edges that passed the property, domain and range checks.
    pub valid_edges: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Per-origin breakdown of `valid_edges`, for inputs that record where
    /// each edge came from.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_origin: BTreeMap<String, OriginSummary>,
}

/// Ordered outcome of a validation run.
///
/// Problems of the schema itself are kept apart from the graph's violations:
/// [`violations`](Self::violations), [`len`](Self::len) and iteration cover
/// the graph only, while renderings list the schema diagnostics first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    summary: Summary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    schema_diagnostics: Vec<Violation>,
    violations: Vec<Violation>,
}

impl Report {
    pub fn new(
        violations: Vec<Violation>,
        entities: usize,
        edges: usize,
        valid_edges: usize,
    ) -> Self {
        let errors = violations.iter().filter(|v| v.is_error()).count();
        let summary = Summary {
            entities,
            edges,
            valid_edges,
            errors,
            warnings: violations.len() - errors,
            by_origin: BTreeMap::new(),
        };
        Self {
            summary,
            schema_diagnostics: Vec::new(),
            violations,
        }
    }

    pub fn with_schema_diagnostics(mut self, diagnostics: Vec<Violation>) -> Self {
        self.schema_diagnostics = diagnostics;
        self
    }

    pub fn with_origins(mut self, by_origin: BTreeMap<String, OriginSummary>) -> Self {
        self.summary.by_origin = by_origin;
        self
    }

    /// Graph violations in report order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Problems found while building the schema, in discovery order.
    pub fn schema_diagnostics(&self) -> &[Violation] {
        &self.schema_diagnostics
    }

    /// Schema diagnostics followed by graph violations, in rendering order.
    pub fn entries(&self) -> impl Iterator<Item = &Violation> {
        self.schema_diagnostics.iter().chain(&self.violations)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// True iff any violation or schema diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Errors among violations and schema diagnostics together.
    pub fn error_count(&self) -> usize {
        self.summary.errors + self.schema_diagnostics.iter().filter(|v| v.is_error()).count()
    }

    /// Warnings among violations and schema diagnostics together.
    pub fn warning_count(&self) -> usize {
        self.summary.warnings + self.schema_diagnostics.iter().filter(|v| !v.is_error()).count()
    }

    /// Number of graph violations of `kind`.
    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Line-per-entry text with full IRIs.
    pub fn render(&self) -> String {
        render::render_text(self, &PrefixMap::new())
    }

    /// Line-per-entry text with IRIs compacted by `prefixes`.
    pub fn render_with(&self, prefixes: &PrefixMap) -> String {
        render::render_text(self, prefixes)
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
