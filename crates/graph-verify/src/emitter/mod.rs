pub mod ntriples;
pub mod turtle;

use std::io;

/// Sink for RDF triples in a particular serialization format.
pub trait TriplesEmitter {
    /// Emit a triple with an IRI object.
    fn emit_iri(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()>;
    /// Emit a triple with a plain string literal object.
    fn emit_literal(&mut self, subject: &str, predicate: &str, value: &str) -> io::Result<()>;
    /// Emit a triple with a typed literal object.
    fn emit_typed_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> io::Result<()>;
    /// Register a namespace prefix (only Turtle uses it for output).
    fn add_prefix(&mut self, prefix: &str, iri: &str);
    /// Finish pending statements and flush buffered output.
    fn flush(&mut self) -> io::Result<()>;
    /// Number of triples emitted so far.
    fn triple_count(&self) -> u64;

    /// Emit a triple with an `xsd:boolean` literal object.
    fn emit_bool(&mut self, subject: &str, predicate: &str, value: bool) -> io::Result<()> {
        let val = if value { "true" } else { "false" };
        self.emit_typed_literal(
            subject,
            predicate,
            val,
            crate::model::ontology::standard::XSD_BOOLEAN,
        )
    }

    /// Emit a triple with an `xsd:integer` literal object.
    fn emit_int(&mut self, subject: &str, predicate: &str, value: i64) -> io::Result<()> {
        self.emit_typed_literal(
            subject,
            predicate,
            &value.to_string(),
            crate::model::ontology::standard::XSD_INTEGER,
        )
    }
}

/// Escape a string for a quoted N-Triples/Turtle literal.
pub(crate) fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}
