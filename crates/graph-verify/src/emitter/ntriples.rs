use std::io::{self, Write};

use super::{escape_literal, TriplesEmitter};

/// N-Triples emitter. Streams `<s> <p> <o> .` lines; prefixes are ignored.
pub struct NTriplesEmitter<W: Write> {
    writer: W,
    count: u64,
}

impl<W: Write> NTriplesEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn node(term: &str) -> String {
        if term.starts_with("_:") {
            term.to_string()
        } else {
            format!("<{term}>")
        }
    }
}

impl<W: Write> TriplesEmitter for NTriplesEmitter<W> {
    fn emit_iri(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()> {
        writeln!(
            self.writer,
            "{} <{predicate}> {} .",
            Self::node(subject),
            Self::node(object)
        )?;
        self.count += 1;
        Ok(())
    }

    fn emit_literal(&mut self, subject: &str, predicate: &str, value: &str) -> io::Result<()> {
        let escaped = escape_literal(value);
        writeln!(
            self.writer,
            "{} <{predicate}> \"{escaped}\" .",
            Self::node(subject)
        )?;
        self.count += 1;
        Ok(())
    }

    fn emit_typed_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> io::Result<()> {
        let escaped = escape_literal(value);
        writeln!(
            self.writer,
            "{} <{predicate}> \"{escaped}\"^^<{datatype}> .",
            Self::node(subject)
        )?;
        self.count += 1;
        Ok(())
    }

    fn add_prefix(&mut self, _prefix: &str, _iri: &str) {}

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn triple_count(&self) -> u64 {
        self.count
    }
}
