//! Build a [`Graph`] from JSON documents, N-Triples, or JSON lines of
//! extracted ontology triplets.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::{Edge, Graph, Literal, Target};
use crate::config::{GraphLoadOptions, InputFormat};
use crate::error::{LoadError, Result};
use crate::model::iri::{IriMinter, PrefixMap};
use crate::model::ontology::standard;
use crate::reader::ntriples::read_triples;
use crate::reader::{Term, Triple};
use crate::schema::LiteralKind;

/// Load a graph file, inferring the format from the extension for `Auto`.
pub fn load_graph(path: &Path, format: InputFormat, options: &GraphLoadOptions) -> Result<Graph> {
    let format = format.resolve(path)?;
    let reader = BufReader::new(File::open(path)?);
    let graph = match format {
        InputFormat::Json => from_json_reader(reader, options)?,
        InputFormat::NTriples => from_ntriples(reader, options)?,
        InputFormat::Triplets => from_triplets(reader, options)?,
        InputFormat::Auto => {
            return Err(LoadError::UnsupportedFormat {
                format: format.name().to_string(),
                what: "graph",
            })
        }
    };
    info!(
        path = %path.display(),
        format = format.name(),
        entities = graph.entities().len(),
        edges = graph.edges().len(),
        "loaded graph"
    );
    Ok(graph)
}

// ---------------------------------------------------------------------------
// JSON graph documents
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDocument {
    #[serde(default)]
    prefixes: BTreeMap<String, String>,
    /// Base IRI for bare entity names; bare names stay verbatim without it.
    #[serde(default)]
    base: Option<String>,
    /// Namespace for bare class/property names.
    #[serde(default)]
    vocab: Option<String>,
    #[serde(default)]
    entities: Vec<EntityDocument>,
    #[serde(default)]
    edges: Vec<EdgeDocument>,
}

#[derive(Debug, Deserialize)]
struct EntityDocument {
    id: String,
    #[serde(default, alias = "classes")]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeDocument {
    source: String,
    property: String,
    target: TargetDocument,
    #[serde(default)]
    origin: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TargetDocument {
    Entity(String),
    Literal(LiteralDocument),
}

#[derive(Debug, Deserialize)]
struct LiteralDocument {
    kind: LiteralKind,
    value: serde_json::Value,
}

pub fn from_json_str(content: &str, options: &GraphLoadOptions) -> Result<Graph> {
    let doc: GraphDocument = serde_json::from_str(content)?;
    from_document(doc, options)
}

pub fn from_json_reader<R: BufRead>(reader: R, options: &GraphLoadOptions) -> Result<Graph> {
    let doc: GraphDocument = serde_json::from_reader(reader)?;
    from_document(doc, options)
}

/// Resolves entity ids: prefixed/absolute as usual, bare names minted under
/// the base IRI when there is one.
struct EntityNames<'a> {
    prefixes: &'a PrefixMap,
    minter: Option<IriMinter>,
}

impl EntityNames<'_> {
    fn resolve(&self, name: &str) -> Result<String> {
        match &self.minter {
            Some(minter) if self.prefixes.expand(name).is_none() && !name.contains(':') => {
                Ok(minter.entity_iri(name))
            }
            _ => self.prefixes.resolve(name, None),
        }
    }
}

fn from_document(doc: GraphDocument, options: &GraphLoadOptions) -> Result<Graph> {
    let mut prefixes = options.prefixes.clone();
    for (prefix, ns) in &doc.prefixes {
        prefixes.insert(prefix, ns);
    }
    let vocab = doc.vocab.as_deref();
    let names = EntityNames {
        prefixes: &prefixes,
        minter: doc.base.as_deref().map(IriMinter::new),
    };

    let mut graph = Graph::new();
    for entity in &doc.entities {
        let id = names.resolve(&entity.id)?;
        let types = entity
            .types
            .iter()
            .map(|t| prefixes.resolve(t, vocab))
            .collect::<Result<Vec<_>>>()?;
        graph.add_entity(&id, types);
    }

    for edge in &doc.edges {
        let source = names.resolve(&edge.source)?;
        let property = prefixes.resolve(&edge.property, vocab)?;
        let target = match &edge.target {
            TargetDocument::Entity(id) => Target::Entity(names.resolve(id)?),
            TargetDocument::Literal(lit) => Target::Literal(Literal::new(
                lit.kind,
                match &lit.value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            )),
        };
        let mut resolved = Edge::new(source, property, target);
        resolved.origin = edge.origin.clone();
        graph.add_edge(resolved);
    }
    Ok(graph)
}

// ---------------------------------------------------------------------------
// N-Triples
// ---------------------------------------------------------------------------

pub fn from_ntriples<R: BufRead>(reader: R, options: &GraphLoadOptions) -> Result<Graph> {
    let triples = read_triples(reader)?;
    Ok(from_triples(&triples, options))
}

/// Interpret statements as a data graph.
///
/// `rdf:type` statements assert classes; every other statement becomes an
/// edge unless its predicate is ignored. Subjects become entities in order
/// of first appearance. Objects do not, so a reference to a node that is
/// never described stays dangling.
pub fn from_triples(triples: &[Triple], options: &GraphLoadOptions) -> Graph {
    let mut graph = Graph::new();
    let mut skipped = 0usize;
    for triple in triples {
        let Some(subject) = triple.subject.as_node() else {
            continue;
        };
        graph.ensure_entity(subject);

        if triple.predicate == standard::RDF_TYPE {
            match triple.object.as_node() {
                Some(class) => graph.add_type(subject, class),
                None => debug!(entity = subject, "ignoring literal rdf:type object"),
            }
            continue;
        }
        if options.ignored_predicates.contains(&triple.predicate) {
            skipped += 1;
            continue;
        }

        let target = match &triple.object {
            Term::Iri(id) | Term::Blank(id) => Target::Entity(id.clone()),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                let kind = match (datatype, language) {
                    (_, Some(_)) | (None, None) => LiteralKind::String,
                    (Some(dt), None) => LiteralKind::from_datatype(dt),
                };
                Target::Literal(Literal::new(kind, value.clone()))
            }
        };
        graph.add_edge(Edge::new(subject, triple.predicate.clone(), target));
    }
    if skipped > 0 {
        debug!(skipped, "skipped annotation statements");
    }
    graph
}

// ---------------------------------------------------------------------------
// Extracted triplets (JSON lines)
// ---------------------------------------------------------------------------

/// One line of a triplets file: the triplets extracted from one text chunk.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChunkRecord {
    #[serde(default)]
    chunk_id: Option<String>,
    #[serde(default)]
    triplets: Option<Vec<Option<TripletRecord>>>,
}

#[derive(Debug, Deserialize)]
struct TripletRecord {
    domain: NamedEntity,
    property: String,
    range: NamedEntity,
}

#[derive(Debug, Deserialize)]
struct NamedEntity {
    class: String,
    name: String,
}

/// Read ontology triplets, one chunk per line.
///
/// Entity IRIs are minted from names under `options.base_uri`; classes and
/// properties resolve against `options.vocabulary`. Every mention asserts
/// its class for the named entity, so the same name used with two classes
/// ends up with both. Each edge also keeps the classes its own triplet
/// stated, which is what the domain and range checks look at, and the
/// chunk id as its origin.
pub fn from_triplets<R: BufRead>(reader: R, options: &GraphLoadOptions) -> Result<Graph> {
    let minter = IriMinter::new(&options.base_uri);
    let vocab = Some(options.vocabulary.as_str());
    let prefixes = &options.prefixes;
    let mut graph = Graph::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ChunkRecord = serde_json::from_str(&line).map_err(|source| {
            LoadError::JsonLine {
                line: idx + 1,
                source,
            }
        })?;
        let Some(triplets) = record.triplets else {
            debug!(chunk = record.chunk_id.as_deref().unwrap_or(""), "chunk without triplets");
            continue;
        };
        for triplet in triplets.into_iter().flatten() {
            let source = minter.entity_iri(&triplet.domain.name);
            let target = minter.entity_iri(&triplet.range.name);
            let source_class = prefixes.resolve(&triplet.domain.class, vocab)?;
            let target_class = prefixes.resolve(&triplet.range.class, vocab)?;
            graph.add_type(&source, &source_class);
            graph.add_type(&target, &target_class);

            let property = prefixes.resolve(&triplet.property, vocab)?;
            let mut edge = Edge::to_entity(source, property, target)
                .with_stated_types(source_class, target_class);
            edge.origin = record.chunk_id.clone();
            graph.add_edge(edge);
        }
    }
    Ok(graph)
}
