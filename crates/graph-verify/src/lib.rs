//! Knowledge-graph conformance checking against CIDOC-CRM style schemas.
//!
//! A [`Schema`] (class hierarchy plus property domain, range and cardinality
//! rules) and a [`Graph`] (typed entities and labeled edges) go into a
//! [`Validator`], which produces a [`Report`] listing every
//! [`Violation`] in a deterministic order.
//!
//! ```
//! use graph_verify::{Edge, Graph, PropertyDef, Schema, Validator};
//!
//! let mut schema = Schema::builder();
//! schema.class("Actor", &[]);
//! schema.class("Person", &["Actor"]);
//! schema.class("Place", &[]);
//! schema.property(PropertyDef::object("residence", "Person", "Place"));
//! let schema = schema.build();
//!
//! let mut graph = Graph::new();
//! graph.add_entity("leonardo", ["Person"]);
//! graph.add_entity("vinci", ["Place"]);
//! graph.add_edge(Edge::to_entity("vinci", "residence", "leonardo"));
//!
//! let report = Validator::new(&schema).validate(&graph);
//! assert!(report.has_errors());
//! assert_eq!(report.len(), 2); // domain and range both fail
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod graph;
pub mod logging;
pub mod model;
pub mod reader;
pub mod report;
pub mod schema;
pub mod validate;

pub use error::LoadError;
pub use graph::{Edge, Entity, Graph, Literal, StatedTypes, Target};
pub use report::{OriginSummary, Report, Severity, Subject, Violation, ViolationKind};
pub use schema::{Cardinality, ClassDef, LiteralKind, PropertyDef, RangeSpec, Schema, SchemaBuilder};
pub use validate::{validate, Validator};
