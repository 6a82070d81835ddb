//! Constraint validation engine.
//!
//! [`Validator::validate`] runs over one graph in three steps:
//!
//! 1. **Entity typing** -- resolve every asserted class and compute each
//!    entity's effective type set (asserted classes plus all superclasses).
//! 2. **Edge checking** -- property existence, domain and range of every
//!    edge, counting edges per (source, property) on the way.
//! 3. **Cardinality** -- once all edges are counted, compare each count
//!    against the property's bounds.
//!
//! Violations are appended in a fixed order (entity order, edge order, then
//! `(entity, property)` in lexical order), so the same input always yields
//! the same report. The schema's own diagnostics travel in a separate
//! section of the report and never count as graph violations.

mod cardinality;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, info_span};

use crate::graph::{Edge, Graph, Target};
use crate::report::{OriginSummary, Report, Subject, Violation, ViolationKind};
use crate::schema::{ClassId, PropertyDef, RangeSpec, Schema};

/// Edge counts keyed by `(source entity, property)`; the key order is the
/// cardinality reporting order.
pub(crate) type EdgeCounts<'g> = BTreeMap<(&'g str, &'g str), usize>;

/// What the edge pass hands on to the cardinality pass and the summary.
struct EdgeTally<'g> {
    counts: EdgeCounts<'g>,
    valid: usize,
    by_origin: BTreeMap<String, OriginSummary>,
}

/// Validates graphs against one schema. Holds no per-run state, so one
/// validator can be shared between threads.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'s> {
    schema: &'s Schema,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Validate `graph` and return the complete report.
    pub fn validate(&self, graph: &Graph) -> Report {
        let _span = info_span!(
            "validate",
            entities = graph.entities().len(),
            edges = graph.edges().len()
        )
        .entered();

        let mut violations: Vec<Violation> = Vec::new();

        let types = self.type_entities(graph, &mut violations);
        debug!(violations = violations.len(), "entity typing done");

        let tally = self.check_edges(graph, &types, &mut violations);
        debug!(violations = violations.len(), valid_edges = tally.valid, "edge checks done");

        cardinality::check(self.schema, graph, &types, &tally.counts, &mut violations);
        debug!(violations = violations.len(), "cardinality checks done");

        Report::new(
            violations,
            graph.entities().len(),
            graph.edges().len(),
            tally.valid,
        )
        .with_schema_diagnostics(self.schema.diagnostics().to_vec())
        .with_origins(tally.by_origin)
    }

    /// Pass 1: effective type set per entity, indexed like
    /// [`Graph::entities`].
    fn type_entities(&self, graph: &Graph, out: &mut Vec<Violation>) -> Vec<BTreeSet<ClassId>> {
        graph
            .entities()
            .iter()
            .map(|entity| {
                let mut effective = BTreeSet::new();
                let mut reported: HashSet<&str> = HashSet::new();
                for class in &entity.types {
                    match self.schema.class_id(class) {
                        Some(cid) => effective.extend(self.schema.ancestors(cid).iter().copied()),
                        None if reported.insert(class.as_str()) => out.push(Violation::error(
                            ViolationKind::UnknownClass,
                            Subject::Entity {
                                id: entity.id.clone(),
                            },
                            format!("asserted class <{class}> is not declared in the schema"),
                        )),
                        None => {}
                    }
                }
                effective
            })
            .collect()
    }

    /// Pass 2: per-edge checks. Counts edges for the cardinality pass and
    /// tallies the edges that passed every check, overall and per origin.
    fn check_edges<'g>(
        &self,
        graph: &'g Graph,
        types: &[BTreeSet<ClassId>],
        out: &mut Vec<Violation>,
    ) -> EdgeTally<'g> {
        let mut tally = EdgeTally {
            counts: EdgeCounts::new(),
            valid: 0,
            by_origin: BTreeMap::new(),
        };

        for (index, edge) in graph.edges().iter().enumerate() {
            let before = out.len();
            self.check_edge(graph, types, index, edge, out, &mut tally.counts);
            let passed = out.len() == before;
            if passed {
                tally.valid += 1;
            }
            if let Some(origin) = &edge.origin {
                let entry = tally.by_origin.entry(origin.clone()).or_default();
                entry.total += 1;
                if passed {
                    entry.valid += 1;
                }
            }
        }
        tally
    }

    fn check_edge<'g>(
        &self,
        graph: &Graph,
        types: &[BTreeSet<ClassId>],
        index: usize,
        edge: &'g Edge,
        out: &mut Vec<Violation>,
        counts: &mut EdgeCounts<'g>,
    ) {
        let subject = || Subject::Edge {
            index,
            source: edge.source.clone(),
            property: edge.property.clone(),
            origin: edge.origin.clone(),
        };
        let Some(property) = self.schema.resolve_property(&edge.property) else {
            out.push(Violation::error(
                ViolationKind::UnknownProperty,
                subject(),
                format!("property <{}> is not declared in the schema", edge.property),
            ));
            return;
        };
        *counts
            .entry((edge.source.as_str(), edge.property.as_str()))
            .or_insert(0) += 1;

        if let Some(message) = self.domain_problem(graph, types, edge, property) {
            out.push(Violation::error(ViolationKind::DomainMismatch, subject(), message));
        }
        if let Some(message) = self.range_problem(graph, types, edge, property) {
            out.push(Violation::error(ViolationKind::RangeMismatch, subject(), message));
        }
    }

    /// Whether the entity at `pos` counts as an instance of `class` for one
    /// edge: by the class stated alongside the edge if there is one,
    /// otherwise by the entity's effective type set.
    fn is_instance(
        &self,
        types: &[BTreeSet<ClassId>],
        pos: usize,
        stated: Option<&str>,
        class: ClassId,
    ) -> bool {
        match stated {
            Some(stated) => self
                .schema
                .class_id(stated)
                .is_some_and(|cid| self.schema.ancestors(cid).binary_search(&class).is_ok()),
            None => types[pos].contains(&class),
        }
    }

    /// Domain check against every declared domain class. Undeclared domain
    /// classes are skipped (the schema already reported them).
    fn domain_problem(
        &self,
        graph: &Graph,
        types: &[BTreeSet<ClassId>],
        edge: &Edge,
        property: &PropertyDef,
    ) -> Option<String> {
        let required: Vec<(&str, ClassId)> = property
            .domain
            .iter()
            .filter_map(|d| self.schema.class_id(d).map(|cid| (d.as_str(), cid)))
            .collect();
        if required.is_empty() {
            return None;
        }
        let Some(pos) = graph.position(&edge.source) else {
            return Some(format!(
                "unknown source entity <{}>; <{}> requires an instance of {}",
                edge.source,
                edge.property,
                describe_classes(required.iter().map(|(d, _)| *d))
            ));
        };
        let stated = edge.stated.as_ref().map(|s| s.source.as_str());
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, cid)| !self.is_instance(types, pos, stated, *cid))
            .map(|(d, _)| *d)
            .collect();
        if missing.is_empty() {
            return None;
        }
        Some(format!(
            "source <{}> is not an instance of {} ({})",
            edge.source,
            describe_classes(missing.into_iter()),
            describe_types(graph, pos, stated)
        ))
    }

    /// Range check against every range constraint of the property. Problems
    /// with several constraints are joined into one message.
    fn range_problem(
        &self,
        graph: &Graph,
        types: &[BTreeSet<ClassId>],
        edge: &Edge,
        property: &PropertyDef,
    ) -> Option<String> {
        let stated = edge.stated.as_ref().map(|s| s.target.as_str());
        let mut problems = Vec::new();
        for range in &property.range {
            let problem = match (range, &edge.target) {
                (RangeSpec::Class(range), Target::Entity(target)) => {
                    let Some(range_id) = self.schema.class_id(range) else {
                        continue;
                    };
                    let Some(pos) = graph.position(target) else {
                        return Some(format!(
                            "dangling reference: target <{target}> is not an entity of the graph"
                        ));
                    };
                    if self.is_instance(types, pos, stated, range_id) {
                        continue;
                    }
                    format!(
                        "target <{target}> is not an instance of <{range}> ({})",
                        describe_types(graph, pos, stated)
                    )
                }
                (RangeSpec::Class(range), Target::Literal(literal)) => {
                    format!("expected an instance of <{range}>, found {literal}")
                }
                (RangeSpec::Literal(kind), Target::Literal(literal)) => {
                    if literal.kind == *kind {
                        continue;
                    }
                    format!("expected a {kind} literal, found {literal}")
                }
                (RangeSpec::Literal(kind), Target::Entity(target)) => {
                    format!("expected a {kind} literal, found entity <{target}>")
                }
            };
            problems.push(problem);
        }
        (!problems.is_empty()).then(|| problems.join("; "))
    }
}

/// `<A>` or `<A> and <B>`.
fn describe_classes<'a>(classes: impl Iterator<Item = &'a str>) -> String {
    classes
        .map(|c| format!("<{c}>"))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// The classes an endpoint was judged by, for messages.
fn describe_types(graph: &Graph, pos: usize, stated: Option<&str>) -> String {
    if let Some(stated) = stated {
        return format!("stated type: <{stated}>");
    }
    let types = &graph.entities()[pos].types;
    if types.is_empty() {
        return "asserted types: none".to_string();
    }
    let listed = types
        .iter()
        .map(|t| format!("<{t}>"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("asserted types: {listed}")
}

/// Validate `graph` against `schema`.
pub fn validate(schema: &Schema, graph: &Graph) -> Report {
    Validator::new(schema).validate(graph)
}
