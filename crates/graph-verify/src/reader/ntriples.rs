//! N-Triples reader on top of `oxttl`.

use std::io::Read;

use oxttl::{NTriplesParser, TurtleParseError, TurtleSyntaxError};

use super::{Term, Triple};
use crate::error::{LoadError, Result};

/// Read every triple from `reader`, stopping at the first syntax error.
pub fn read_triples<R: Read>(reader: R) -> Result<Vec<Triple>> {
    NTriplesParser::new()
        .for_reader(reader)
        .map(|parsed| parsed.map(convert).map_err(load_error))
        .collect()
}

fn convert(triple: oxrdf::Triple) -> Triple {
    Triple {
        subject: term(triple.subject.into()),
        predicate: triple.predicate.into_string(),
        object: term(triple.object),
    }
}

fn term(term: oxrdf::Term) -> Term {
    match term {
        oxrdf::Term::NamedNode(node) => Term::Iri(node.into_string()),
        oxrdf::Term::BlankNode(node) => Term::Blank(format!("_:{}", node.as_str())),
        oxrdf::Term::Literal(literal) => {
            let language = literal.language().map(str::to_string);
            // Language-tagged strings carry rdf:langString; the tag is enough.
            let datatype = match language {
                Some(_) => None,
                None => Some(literal.datatype().as_str().to_string()),
            };
            Term::Literal {
                value: literal.value().to_string(),
                datatype,
                language,
            }
        }
    }
}

fn load_error(err: TurtleParseError) -> LoadError {
    match err {
        TurtleParseError::Io(err) => LoadError::Io(err),
        TurtleParseError::Syntax(err) => syntax_error(&err),
    }
}

fn syntax_error(err: &TurtleSyntaxError) -> LoadError {
    let start = err.location().start;
    LoadError::Syntax {
        line: start.line as usize + 1,
        message: format!("{} (column {})", err.message(), start.column + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(doc: &str) -> Result<Vec<Triple>> {
        read_triples(doc.as_bytes())
    }

    #[test]
    fn parses_iri_triple() {
        let triples = read("<http://a> <http://p> <http://b> .\n").unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, Term::Iri("http://a".into()));
        assert_eq!(triples[0].predicate, "http://p");
        assert_eq!(triples[0].object, Term::Iri("http://b".into()));
    }

    #[test]
    fn parses_typed_and_tagged_literals() {
        let triples = read(concat!(
            "_:b1 <http://p> \"1503\"^^<http://www.w3.org/2001/XMLSchema#gYear> .\n",
            "<http://a> <http://p> \"Gioconda\"@it .\n",
        ))
        .unwrap();
        assert_eq!(triples[0].subject, Term::Blank("_:b1".into()));
        assert_eq!(
            triples[0].object,
            Term::Literal {
                value: "1503".into(),
                datatype: Some("http://www.w3.org/2001/XMLSchema#gYear".into()),
                language: None,
            }
        );
        match &triples[1].object {
            Term::Literal {
                language, datatype, ..
            } => {
                assert_eq!(language.as_deref(), Some("it"));
                assert_eq!(datatype, &None);
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn plain_literal_is_xsd_string() {
        let triples = read("<http://a> <http://p> \"x\" .\n").unwrap();
        match &triples[0].object {
            Term::Literal { datatype, .. } => assert_eq!(
                datatype.as_deref(),
                Some("http://www.w3.org/2001/XMLSchema#string")
            ),
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn unescapes_literal() {
        let triples = read(r#"<http://a> <http://p> "a\"b\\c\n\u00E9" ."#).unwrap();
        match &triples[0].object {
            Term::Literal { value, .. } => assert_eq!(value, "a\"b\\c\n\u{e9}"),
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn malformed_unicode_escape_is_rejected() {
        let err = read("<http://a> <http://p> \"\\u00G1\" .\n").unwrap_err();
        assert!(matches!(err, LoadError::Syntax { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let triples = read("\n   # a comment\n<http://a> <http://p> _:x .\n").unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object, Term::Blank("_:x".into()));
    }

    #[test]
    fn reports_line_number_on_error() {
        let doc = "<http://a> <http://p> <http://b> .\n\n<http://a> <http://p> ?b .\n";
        match read(doc).unwrap_err() {
            LoadError::Syntax { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("column"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
