use std::io::{self, Write};

use super::{escape_literal, TriplesEmitter};
use crate::model::iri::PrefixMap;
use crate::model::ontology::standard;

/// Turtle emitter with prefix support.
///
/// Consecutive triples about the same subject share one statement block
/// (`s p1 o1 ;\n    p2 o2 .`), so a report node reads as a single stanza.
/// The last block is terminated by [`flush`](TriplesEmitter::flush).
pub struct TurtleEmitter<W: Write> {
    writer: W,
    count: u64,
    prefixes: PrefixMap,
    prefix_written: bool,
    open_subject: Option<String>,
}

impl<W: Write> TurtleEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            count: 0,
            prefixes: PrefixMap::new(),
            prefix_written: false,
            open_subject: None,
        }
    }

    /// Write all registered prefixes (called before the first triple).
    fn write_prefixes(&mut self) -> io::Result<()> {
        if self.prefix_written {
            return Ok(());
        }
        self.prefix_written = true;
        // PrefixMap iterates in sorted order.
        for (prefix, iri) in self.prefixes.iter() {
            writeln!(self.writer, "@prefix {prefix}: <{iri}> .")?;
        }
        if !self.prefixes.is_empty() {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn predicate(&self, iri: &str) -> String {
        if iri == standard::RDF_TYPE {
            "a".to_string()
        } else {
            self.prefixes.format_term(iri)
        }
    }

    /// Write `object` under `subject`/`predicate`, continuing the open block
    /// when the subject repeats.
    fn write_statement(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()> {
        self.write_prefixes()?;
        let p = self.predicate(predicate);
        match self.open_subject.as_deref() {
            Some(open) if open == subject => {
                write!(self.writer, " ;\n    {p} {object}")?;
            }
            Some(_) => {
                let s = self.prefixes.format_term(subject);
                write!(self.writer, " .\n\n{s} {p} {object}")?;
                self.open_subject = Some(subject.to_string());
            }
            None => {
                let s = self.prefixes.format_term(subject);
                write!(self.writer, "{s} {p} {object}")?;
                self.open_subject = Some(subject.to_string());
            }
        }
        self.count += 1;
        Ok(())
    }
}

impl<W: Write> TriplesEmitter for TurtleEmitter<W> {
    fn emit_iri(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()> {
        let o = self.prefixes.format_term(object);
        self.write_statement(subject, predicate, &o)
    }

    fn emit_literal(&mut self, subject: &str, predicate: &str, value: &str) -> io::Result<()> {
        let o = format!("\"{}\"", escape_literal(value));
        self.write_statement(subject, predicate, &o)
    }

    fn emit_typed_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> io::Result<()> {
        let o = match datatype {
            standard::XSD_BOOLEAN if value == "true" || value == "false" => value.to_string(),
            standard::XSD_INTEGER if value.parse::<i64>().is_ok() => value.to_string(),
            _ => format!(
                "\"{}\"^^{}",
                escape_literal(value),
                self.prefixes.format_term(datatype)
            ),
        };
        self.write_statement(subject, predicate, &o)
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) {
        self.prefixes.insert(prefix, iri);
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.open_subject.take().is_some() {
            writeln!(self.writer, " .")?;
        }
        self.writer.flush()
    }

    fn triple_count(&self) -> u64 {
        self.count
    }
}
