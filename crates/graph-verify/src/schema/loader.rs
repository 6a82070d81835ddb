//! Build a [`Schema`] from a JSON schema document or an RDFS/OWL ontology in
//! N-Triples.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Cardinality, LiteralKind, PropertyDef, RangeSpec, Schema, SchemaBuilder};
use crate::config::InputFormat;
use crate::error::{LoadError, Result};
use crate::model::iri::PrefixMap;
use crate::model::ontology::standard;
use crate::reader::ntriples::read_triples;
use crate::reader::{Term, Triple};

/// Load a schema file, inferring the format from the extension for `Auto`.
pub fn load_schema(path: &Path, format: InputFormat) -> Result<Schema> {
    let format = format.resolve(path)?;
    let reader = BufReader::new(File::open(path)?);
    let schema = match format {
        InputFormat::Json => from_json_reader(reader)?,
        InputFormat::NTriples => from_ntriples(reader)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                format: other.name().to_string(),
                what: "schema",
            })
        }
    };
    info!(
        path = %path.display(),
        format = format.name(),
        classes = schema.class_count(),
        properties = schema.property_count(),
        diagnostics = schema.diagnostics().len(),
        "loaded schema"
    );
    Ok(schema)
}

// ---------------------------------------------------------------------------
// JSON schema documents
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaDocument {
    #[serde(default)]
    prefixes: BTreeMap<String, String>,
    /// Namespace for bare class/property names.
    #[serde(default)]
    vocab: Option<String>,
    #[serde(default)]
    classes: Vec<ClassDocument>,
    #[serde(default)]
    properties: Vec<PropertyDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassDocument {
    id: String,
    #[serde(default, alias = "superclasses")]
    sub_class_of: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyDocument {
    id: String,
    #[serde(default)]
    domain: OneOrMany<String>,
    #[serde(default)]
    range: OneOrMany<RangeDocument>,
    #[serde(default)]
    min: u32,
    #[serde(default)]
    max: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RangeDocument {
    Class(String),
    Literal(LiteralKind),
}

/// A single value or a list; several domains or ranges all apply.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }
}

pub fn from_json_str(content: &str) -> Result<Schema> {
    let doc: SchemaDocument = serde_json::from_str(content)?;
    from_document(doc)
}

pub fn from_json_reader<R: BufRead>(reader: R) -> Result<Schema> {
    let doc: SchemaDocument = serde_json::from_reader(reader)?;
    from_document(doc)
}

fn from_document(doc: SchemaDocument) -> Result<Schema> {
    let mut prefixes = PrefixMap::standard();
    for (prefix, ns) in &doc.prefixes {
        prefixes.insert(prefix, ns);
    }
    let vocab = doc.vocab.as_deref();
    let resolve = |term: &str| prefixes.resolve(term, vocab);

    let mut builder = SchemaBuilder::new();
    for class in &doc.classes {
        let id = resolve(&class.id)?;
        builder.declare_class(&id);
        for sup in &class.sub_class_of {
            builder.add_superclass(&id, &resolve(sup)?);
        }
    }

    for prop in &doc.properties {
        let id = resolve(&prop.id)?;
        if let Some(max) = prop.max {
            if prop.min > max {
                return Err(LoadError::InvalidCardinality {
                    property: id,
                    min: prop.min,
                    max,
                });
            }
        }
        let mut def = PropertyDef::new(id).with_cardinality(prop.min, prop.max);
        for domain in prop.domain.as_slice() {
            def = def.with_domain(resolve(domain)?);
        }
        for range in prop.range.as_slice() {
            def = def.with_range(match range {
                RangeDocument::Class(class) => RangeSpec::Class(resolve(class)?),
                RangeDocument::Literal(kind) => RangeSpec::Literal(*kind),
            });
        }
        builder.property(def);
    }

    Ok(builder.build())
}

// ---------------------------------------------------------------------------
// RDFS/OWL ontologies in N-Triples
// ---------------------------------------------------------------------------

/// `owl:Restriction` node contents.
#[derive(Debug, Default)]
struct Restriction {
    on_property: Option<String>,
    min: Option<u32>,
    max: Option<u32>,
}

/// Superclasses that every class has implicitly.
fn is_top_class(iri: &str) -> bool {
    iri == "http://www.w3.org/2002/07/owl#Thing"
        || iri == "http://www.w3.org/2000/01/rdf-schema#Resource"
}

fn is_class_type(iri: &str) -> bool {
    iri == standard::RDFS_CLASS || iri == standard::OWL_CLASS
}

fn is_property_type(iri: &str) -> bool {
    iri == standard::RDF_PROPERTY
        || iri == standard::OWL_OBJECT_PROPERTY
        || iri == standard::OWL_DATATYPE_PROPERTY
        || iri == standard::OWL_FUNCTIONAL_PROPERTY
}

pub fn from_ntriples<R: BufRead>(reader: R) -> Result<Schema> {
    let triples = read_triples(reader)?;
    from_triples(&triples)
}

/// Interpret RDFS/OWL statements as a schema.
///
/// Classes: `rdfs:Class`/`owl:Class` instances and `rdfs:subClassOf`
/// subjects. Properties: `rdf:Property`/`owl:*Property` instances and
/// subjects of `rdfs:domain`/`rdfs:range`. Several domain or range
/// statements for one property all apply. Cardinality comes from
/// `owl:FunctionalProperty` and restriction nodes (`owl:onProperty` with
/// `owl:minCardinality`, `owl:maxCardinality` or `owl:cardinality`).
pub fn from_triples(triples: &[Triple]) -> Result<Schema> {
    let mut builder = SchemaBuilder::new();
    let mut property_order: Vec<String> = Vec::new();
    let mut property_seen: HashSet<String> = HashSet::new();
    let mut domains: HashMap<String, Vec<String>> = HashMap::new();
    let mut ranges: HashMap<String, Vec<String>> = HashMap::new();
    let mut functional: HashSet<String> = HashSet::new();
    let mut restrictions: BTreeMap<String, Restriction> = BTreeMap::new();

    let mut note_property = |id: &str, order: &mut Vec<String>| {
        if property_seen.insert(id.to_string()) {
            order.push(id.to_string());
        }
    };

    for triple in triples {
        let Some(subject) = triple.subject.as_node() else {
            continue;
        };
        match triple.predicate.as_str() {
            standard::RDF_TYPE => match triple.object.as_iri() {
                Some(ty) if is_class_type(ty) && !triple.subject.is_blank() => {
                    builder.declare_class(subject);
                }
                Some(ty) if is_property_type(ty) => {
                    note_property(subject, &mut property_order);
                    if ty == standard::OWL_FUNCTIONAL_PROPERTY {
                        functional.insert(subject.to_string());
                    }
                }
                _ => {}
            },
            standard::RDFS_SUBCLASS_OF if !triple.subject.is_blank() => {
                match &triple.object {
                    Term::Iri(sup) if is_top_class(sup) => builder.declare_class(subject),
                    Term::Iri(sup) => builder.add_superclass(subject, sup),
                    // Restriction nodes are constraints, not superclasses.
                    Term::Blank(_) => builder.declare_class(subject),
                    Term::Literal { .. } => {
                        warn!(class = subject, "ignoring literal rdfs:subClassOf object");
                    }
                }
            }
            standard::RDFS_DOMAIN => {
                note_property(subject, &mut property_order);
                match triple.object.as_iri() {
                    Some(domain) => domains
                        .entry(subject.to_string())
                        .or_default()
                        .push(domain.to_string()),
                    None => debug!(property = subject, "ignoring non-IRI rdfs:domain"),
                }
            }
            standard::RDFS_RANGE => {
                note_property(subject, &mut property_order);
                match triple.object.as_iri() {
                    Some(range) => ranges
                        .entry(subject.to_string())
                        .or_default()
                        .push(range.to_string()),
                    None => debug!(property = subject, "ignoring non-IRI rdfs:range"),
                }
            }
            standard::OWL_ON_PROPERTY => {
                if let Some(prop) = triple.object.as_iri() {
                    restrictions.entry(subject.to_string()).or_default().on_property =
                        Some(prop.to_string());
                }
            }
            standard::OWL_MIN_CARDINALITY
            | standard::OWL_MAX_CARDINALITY
            | standard::OWL_CARDINALITY => {
                let n = cardinality_value(subject, &triple.object)?;
                let r = restrictions.entry(subject.to_string()).or_default();
                match triple.predicate.as_str() {
                    standard::OWL_MIN_CARDINALITY => r.min = Some(n),
                    standard::OWL_MAX_CARDINALITY => r.max = Some(n),
                    _ => {
                        r.min = Some(n);
                        r.max = Some(n);
                    }
                }
            }
            _ => {}
        }
    }

    // Fold restrictions into per-property bounds: the tightest bound wins.
    let mut bounds: HashMap<String, Cardinality> = HashMap::new();
    for id in &functional {
        bounds.insert(id.clone(), Cardinality::new(0, Some(1)));
    }
    for (node, r) in &restrictions {
        let Some(prop) = &r.on_property else {
            debug!(node = %node, "cardinality restriction without owl:onProperty");
            continue;
        };
        note_property(prop, &mut property_order);
        let card = bounds.entry(prop.clone()).or_default();
        if let Some(min) = r.min {
            card.min = card.min.max(min);
        }
        if let Some(max) = r.max {
            card.max = Some(card.max.map_or(max, |m| m.min(max)));
        }
    }

    for id in property_order {
        let cardinality = bounds.remove(&id).unwrap_or_default();
        if let Some(max) = cardinality.max {
            if cardinality.min > max {
                return Err(LoadError::InvalidCardinality {
                    property: id,
                    min: cardinality.min,
                    max,
                });
            }
        }
        let mut def = PropertyDef::new(id.as_str());
        def.cardinality = cardinality;
        for domain in domains.remove(&id).unwrap_or_default() {
            def = def.with_domain(domain);
        }
        for range in ranges.remove(&id).unwrap_or_default() {
            def = def.with_range(if LiteralKind::is_datatype(&range) {
                RangeSpec::Literal(LiteralKind::from_datatype(&range))
            } else {
                RangeSpec::Class(range)
            });
        }
        builder.property(def);
    }

    Ok(builder.build())
}

fn cardinality_value(node: &str, object: &Term) -> Result<u32> {
    let value = match object {
        Term::Literal { value, .. } => value.trim(),
        other => {
            return Err(LoadError::InvalidCardinalityValue {
                property: node.to_string(),
                value: other.to_string(),
            })
        }
    };
    value
        .parse::<u32>()
        .map_err(|_| LoadError::InvalidCardinalityValue {
            property: node.to_string(),
            value: value.to_string(),
        })
}
