//! In-memory data graph: typed entities and labeled edges.
//!
//! A pure container. Nothing here checks anything against a schema; see
//! [`crate::validate`].

pub mod loader;

use std::collections::HashMap;
use std::fmt;

use crate::schema::LiteralKind;

/// A node of the data graph with its asserted classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    /// Asserted classes in the order they were read.
    pub types: Vec<String>,
}

/// A literal value together with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub value: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} literal {:?}", self.kind, self.value)
    }
}

/// Where an edge points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Entity(String),
    Literal(Literal),
}

/// Classes stated for both ends of one edge by the statement that produced
/// it, independent of what other statements say about the same entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatedTypes {
    pub source: String,
    pub target: String,
}

/// A directed labeled edge `source --property--> target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub property: String,
    pub source: String,
    pub target: Target,
    /// Provenance label, such as the chunk a triplet was extracted from.
    pub origin: Option<String>,
    /// When set, domain and range are checked against these classes instead
    /// of the entities' merged type sets.
    pub stated: Option<StatedTypes>,
}

impl Edge {
    pub fn new(source: impl Into<String>, property: impl Into<String>, target: Target) -> Self {
        Self {
            property: property.into(),
            source: source.into(),
            target,
            origin: None,
            stated: None,
        }
    }

    pub fn to_entity(
        source: impl Into<String>,
        property: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::new(source, property, Target::Entity(target.into()))
    }

    pub fn to_literal(
        source: impl Into<String>,
        property: impl Into<String>,
        literal: Literal,
    ) -> Self {
        Self::new(source, property, Target::Literal(literal))
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_stated_types(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.stated = Some(StatedTypes {
            source: source.into(),
            target: target.into(),
        });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity. A repeated id replaces the earlier entity's classes
    /// but keeps its position.
    pub fn add_entity<S: Into<String>>(&mut self, id: &str, types: impl IntoIterator<Item = S>) {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        match self.index.get(id) {
            Some(&pos) => self.entities[pos].types = types,
            None => {
                self.index.insert(id.to_string(), self.entities.len());
                self.entities.push(Entity {
                    id: id.to_string(),
                    types,
                });
            }
        }
    }

    /// Make sure `id` exists, with no classes if it is new.
    pub fn ensure_entity(&mut self, id: &str) -> usize {
        if let Some(&pos) = self.index.get(id) {
            return pos;
        }
        let pos = self.entities.len();
        self.index.insert(id.to_string(), pos);
        self.entities.push(Entity {
            id: id.to_string(),
            types: Vec::new(),
        });
        pos
    }

    /// Assert one more class for `id`, creating the entity if needed.
    pub fn add_type(&mut self, id: &str, class: &str) {
        let pos = self.ensure_entity(id);
        let types = &mut self.entities[pos].types;
        if !types.iter().any(|t| t == class) {
            types.push(class.to_string());
        }
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.position(id).map(|pos| &self.entities[pos])
    }

    /// Index of `id` in [`entities`](Self::entities).
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.edges.is_empty()
    }
}
