//! Report as an RDF graph, written through any [`TriplesEmitter`].
//!
//! Shape of the output (Turtle shown, `gv:` is [`crate::model::ontology::gv`]):
//!
//! ```text
//! <base/report> a gv:ValidationReport ;
//!     gv:conforms false ;
//!     gv:hasViolation <base/violation/1> .
//!
//! <base/violation/1> a gv:Violation ;
//!     gv:ordinal 1 ;
//!     gv:kind "DomainMismatch" ;
//!     gv:severity gv:Error ;
//!     gv:focusNode <entity> ;
//!     gv:path <property> ;
//!     gv:message "..." .
//! ```
//!
//! Schema diagnostics are numbered first and typed `gv:SchemaDiagnostic`
//! instead of `gv:Violation`.

use std::io;

use super::{Report, Severity, Subject};
use crate::emitter::TriplesEmitter;
use crate::model::iri::{IriMinter, PrefixMap};
use crate::model::ontology::{gv, standard};

/// Emit `report` as triples. Extra `prefixes` are registered with the
/// emitter so Turtle output can compact data IRIs too.
pub fn write_report<E: TriplesEmitter>(
    report: &Report,
    emitter: &mut E,
    minter: &IriMinter,
    prefixes: &PrefixMap,
) -> io::Result<()> {
    emitter.add_prefix("rdf", standard::RDF);
    emitter.add_prefix("xsd", standard::XSD);
    for (prefix, ns) in prefixes.iter() {
        emitter.add_prefix(prefix, ns);
    }
    emitter.add_prefix(gv::PREFIX, gv::NS);

    let report_iri = minter.report_iri();
    let summary = report.summary();
    emitter.emit_iri(&report_iri, standard::RDF_TYPE, gv::VALIDATION_REPORT)?;
    emitter.emit_bool(&report_iri, gv::CONFORMS, !report.has_errors())?;
    emitter.emit_int(&report_iri, gv::ENTITY_COUNT, summary.entities as i64)?;
    emitter.emit_int(&report_iri, gv::EDGE_COUNT, summary.edges as i64)?;
    let diagnostics = report.schema_diagnostics().len();
    for ordinal in 1..=diagnostics + report.len() {
        emitter.emit_iri(&report_iri, gv::HAS_VIOLATION, &minter.violation_iri(ordinal))?;
    }

    for (idx, violation) in report.entries().enumerate() {
        let ordinal = idx + 1;
        let node = minter.violation_iri(ordinal);
        let class = if idx < diagnostics {
            gv::SCHEMA_DIAGNOSTIC
        } else {
            gv::VIOLATION
        };
        emitter.emit_iri(&node, standard::RDF_TYPE, class)?;
        emitter.emit_int(&node, gv::ORDINAL, ordinal as i64)?;
        emitter.emit_literal(&node, gv::KIND, violation.kind.as_str())?;
        let severity = match violation.severity {
            Severity::Error => gv::ERROR,
            Severity::Warning => gv::WARNING,
        };
        emitter.emit_iri(&node, gv::SEVERITY, severity)?;
        emit_node(emitter, &node, gv::FOCUS_NODE, violation.subject.focus())?;
        if let Some(property) = violation.subject.property() {
            emit_node(emitter, &node, gv::PATH, property)?;
        }
        if let Subject::Edge { index, origin, .. } = &violation.subject {
            emitter.emit_int(&node, gv::EDGE_INDEX, *index as i64)?;
            if let Some(origin) = origin {
                emitter.emit_literal(&node, gv::ORIGIN, origin)?;
            }
        }
        emitter.emit_literal(&node, gv::MESSAGE, &violation.message)?;
    }
    Ok(())
}

/// Graph ids are usually IRIs, but bare names and blank nodes from the
/// input would produce invalid IRI terms, so those go out as literals.
fn emit_node<E: TriplesEmitter>(
    emitter: &mut E,
    subject: &str,
    predicate: &str,
    id: &str,
) -> io::Result<()> {
    if crate::model::iri::is_absolute(id) && !id.starts_with("_:") {
        emitter.emit_iri(subject, predicate, id)
    } else {
        emitter.emit_literal(subject, predicate, id)
    }
}
