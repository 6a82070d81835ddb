//! Text and JSON renderings of a [`Report`].

use std::fmt::Write;

use super::Report;
use crate::model::iri::PrefixMap;

/// One line per entry: `[SEVERITY] KIND at <ref>: <message>`. Schema
/// diagnostics come first, then graph violations.
///
/// Output depends only on the report contents, so two runs over the same
/// input can be diffed line by line.
pub fn render_text(report: &Report, prefixes: &PrefixMap) -> String {
    let mut out = String::new();
    for v in report.entries() {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "[{}] {} at {}: {}",
            v.severity,
            v.kind,
            v.subject.describe(prefixes),
            v.message
        );
    }
    out
}

/// Short trailer for interactive use; not part of [`render_text`].
pub fn render_summary(report: &Report) -> String {
    let s = report.summary();
    format!(
        "{} error(s), {} warning(s); {} of {} edge(s) valid across {} entit{}",
        report.error_count(),
        report.warning_count(),
        s.valid_edges,
        s.edges,
        s.entities,
        if s.entities == 1 { "y" } else { "ies" }
    )
}

/// Pretty-printed JSON: `{"summary": {...}, "schemaDiagnostics": [...],
/// "violations": [...]}`. Empty diagnostics and an empty `byOrigin` table
/// are left out.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
