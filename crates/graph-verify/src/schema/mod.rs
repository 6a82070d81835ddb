//! In-memory schema: class hierarchy and property constraints.
//!
//! Classes live in an arena indexed by [`ClassId`]. The ancestor closure of
//! every class is computed once in [`SchemaBuilder::build`], so
//! [`Schema::is_subclass_of`] and effective-type lookups are plain slice
//! searches afterwards.
//!
//! Building never fails. Superclass cycles and dangling class references
//! become [`Violation`]s available from [`Schema::diagnostics`].

pub mod loader;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ontology::standard;
use crate::report::{Subject, Violation, ViolationKind};

/// Dense index of a class in the schema arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A class declaration. `superclasses` only lists declared classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub id: String,
    pub superclasses: Vec<String>,
}

/// Kind of value a data property points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    String,
    Number,
    Date,
}

impl LiteralKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LiteralKind::String => "string",
            LiteralKind::Number => "number",
            LiteralKind::Date => "date",
        }
    }

    /// True for IRIs that name a literal datatype rather than a class.
    pub fn is_datatype(iri: &str) -> bool {
        iri.starts_with(standard::XSD)
            || iri == standard::RDFS_LITERAL
            || iri == standard::RDF_LANG_STRING
    }

    /// Map an XSD datatype to its kind. Anything that is neither numeric
    /// nor date-like reads as a string.
    pub fn from_datatype(iri: &str) -> LiteralKind {
        match iri {
            standard::XSD_INTEGER
            | standard::XSD_INT
            | standard::XSD_LONG
            | standard::XSD_NON_NEGATIVE_INTEGER
            | standard::XSD_DECIMAL
            | standard::XSD_DOUBLE
            | standard::XSD_FLOAT => LiteralKind::Number,
            standard::XSD_DATE
            | standard::XSD_DATE_TIME
            | standard::XSD_G_YEAR
            | standard::XSD_G_YEAR_MONTH => LiteralKind::Date,
            _ => LiteralKind::String,
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a property's target must be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    /// Object property: target entity must be an instance of this class.
    Class(String),
    /// Data property: target must be a literal of this kind.
    Literal(LiteralKind),
}

impl RangeSpec {
    pub fn class(&self) -> Option<&str> {
        match self {
            RangeSpec::Class(class) => Some(class),
            RangeSpec::Literal(_) => None,
        }
    }
}

/// Allowed number of edges of one property per source entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cardinality {
    pub min: u32,
    /// `None` is unbounded.
    pub max: Option<u32>,
}

impl Cardinality {
    pub const UNBOUNDED: Cardinality = Cardinality { min: 0, max: None };

    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn exactly(n: u32) -> Self {
        Self::new(n, Some(n))
    }

    pub fn allows(&self, count: usize) -> bool {
        count >= self.min as usize && self.max.is_none_or(|max| count <= max as usize)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

/// A property declaration.
///
/// Domains and ranges are conjunctions: a source must be an instance of
/// every listed domain class and a target must satisfy every range. Empty
/// lists leave that side unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub id: String,
    pub domain: Vec<String>,
    pub range: Vec<RangeSpec>,
    pub cardinality: Cardinality,
}

impl PropertyDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain: Vec::new(),
            range: Vec::new(),
            cardinality: Cardinality::UNBOUNDED,
        }
    }

    /// Property linking instances of `domain` to instances of `range`.
    pub fn object(
        id: impl Into<String>,
        domain: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self::new(id)
            .with_domain(domain)
            .with_range(RangeSpec::Class(range.into()))
    }

    /// Property linking instances of `domain` to literals of `kind`.
    pub fn data(id: impl Into<String>, domain: impl Into<String>, kind: LiteralKind) -> Self {
        Self::new(id)
            .with_domain(domain)
            .with_range(RangeSpec::Literal(kind))
    }

    /// Add a domain class. Duplicates are ignored.
    pub fn with_domain(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.domain.contains(&class) {
            self.domain.push(class);
        }
        self
    }

    /// Add a range constraint. Duplicates are ignored.
    pub fn with_range(mut self, range: RangeSpec) -> Self {
        if !self.range.contains(&range) {
            self.range.push(range);
        }
        self
    }

    pub fn with_cardinality(mut self, min: u32, max: Option<u32>) -> Self {
        self.cardinality = Cardinality::new(min, max);
        self
    }
}

/// Immutable schema model. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Schema {
    classes: Vec<ClassDef>,
    class_index: HashMap<String, ClassId>,
    /// Sorted ancestor set per class, the class itself included.
    ancestors: Vec<Vec<ClassId>>,
    properties: Vec<PropertyDef>,
    property_index: HashMap<String, usize>,
    diagnostics: Vec<Violation>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn resolve_class(&self, id: &str) -> Option<&ClassDef> {
        self.class_id(id).map(|cid| self.class(cid))
    }

    pub fn class_id(&self, id: &str) -> Option<ClassId> {
        self.class_index.get(id).copied()
    }

    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// `id` and all of its transitive superclasses, sorted by [`ClassId`].
    pub fn ancestors(&self, id: ClassId) -> &[ClassId] {
        &self.ancestors[id.index()]
    }

    /// Reflexive, transitive subclass test. False if either class is unknown.
    pub fn is_subclass_of(&self, sub: &str, sup: &str) -> bool {
        match (self.class_id(sub), self.class_id(sup)) {
            (Some(a), Some(b)) => self.ancestors(a).binary_search(&b).is_ok(),
            _ => false,
        }
    }

    pub fn resolve_property(&self, id: &str) -> Option<&PropertyDef> {
        self.property_index.get(id).map(|&idx| &self.properties[idx])
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.iter()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Problems found while building the schema, in discovery order.
    pub fn diagnostics(&self) -> &[Violation] {
        &self.diagnostics
    }

    pub fn has_cycles(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|v| v.kind == ViolationKind::SchemaCycle)
    }
}

/// Collects declarations, then [`build`](Self::build)s a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    classes: Vec<ClassDef>,
    class_pos: HashMap<String, usize>,
    properties: Vec<PropertyDef>,
    property_pos: HashMap<String, usize>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class. Repeated declarations merge their superclasses.
    pub fn class(&mut self, id: &str, superclasses: &[&str]) {
        self.declare_class(id);
        for sup in superclasses {
            self.add_superclass(id, sup);
        }
    }

    /// Declare a class without superclasses. No-op if already declared.
    pub fn declare_class(&mut self, id: &str) {
        if !self.class_pos.contains_key(id) {
            self.class_pos.insert(id.to_string(), self.classes.len());
            self.classes.push(ClassDef {
                id: id.to_string(),
                superclasses: Vec::new(),
            });
        }
    }

    /// Record `id rdfs:subClassOf sup`, declaring `id` if needed.
    pub fn add_superclass(&mut self, id: &str, sup: &str) {
        self.declare_class(id);
        let def = &mut self.classes[self.class_pos[id]];
        if !def.superclasses.iter().any(|s| s == sup) {
            def.superclasses.push(sup.to_string());
        }
    }

    /// Declare a property. A later declaration with the same id replaces the
    /// earlier one in place.
    pub fn property(&mut self, def: PropertyDef) {
        match self.property_pos.get(&def.id) {
            Some(&idx) => self.properties[idx] = def,
            None => {
                self.property_pos.insert(def.id.clone(), self.properties.len());
                self.properties.push(def);
            }
        }
    }

    pub fn build(self) -> Schema {
        let SchemaBuilder {
            mut classes,
            class_pos,
            properties,
            property_pos,
        } = self;
        let mut diagnostics = Vec::new();

        let class_index: HashMap<String, ClassId> = class_pos
            .into_iter()
            .map(|(id, pos)| (id, ClassId(pos as u32)))
            .collect();

        // Direct superclass edges, dropping references to undeclared classes.
        let mut parents: Vec<Vec<ClassId>> = Vec::with_capacity(classes.len());
        for def in &mut classes {
            let mut direct = Vec::new();
            def.superclasses.retain(|sup| match class_index.get(sup) {
                Some(&cid) => {
                    direct.push(cid);
                    true
                }
                None => {
                    diagnostics.push(Violation::warning(
                        ViolationKind::UnknownClass,
                        Subject::Class { id: def.id.clone() },
                        format!("superclass <{sup}> is not declared in the schema"),
                    ));
                    false
                }
            });
            parents.push(direct);
        }

        diagnostics.extend(find_cycles(&classes, &parents));
        let ancestors = (0..classes.len())
            .map(|idx| closure(ClassId(idx as u32), &parents))
            .collect();

        for def in &properties {
            for domain in &def.domain {
                if !class_index.contains_key(domain) {
                    diagnostics.push(Violation::warning(
                        ViolationKind::UnknownClass,
                        Subject::Property { id: def.id.clone() },
                        format!("domain class <{domain}> is not declared in the schema"),
                    ));
                }
            }
            for range in def.range.iter().filter_map(RangeSpec::class) {
                if !class_index.contains_key(range) {
                    diagnostics.push(Violation::warning(
                        ViolationKind::UnknownClass,
                        Subject::Property { id: def.id.clone() },
                        format!("range class <{range}> is not declared in the schema"),
                    ));
                }
            }
        }

        Schema {
            classes,
            class_index,
            ancestors,
            properties,
            property_index: property_pos,
            diagnostics,
        }
    }
}

/// All ancestors of `start` (itself included), sorted. Terminates on cyclic
/// hierarchies because every class is visited once.
fn closure(start: ClassId, parents: &[Vec<ClassId>]) -> Vec<ClassId> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(cid) = stack.pop() {
        if seen.insert(cid) {
            stack.extend(parents[cid.index()].iter().copied());
        }
    }
    seen.into_iter().collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search over superclass edges. Reaching a class that is still
/// in progress closes a cycle; each distinct cycle is reported once,
/// anchored at its lexically smallest member.
fn find_cycles(classes: &[ClassDef], parents: &[Vec<ClassId>]) -> Vec<Violation> {
    let mut marks = vec![Mark::Unvisited; classes.len()];
    let mut seen_cycles: HashSet<Vec<ClassId>> = HashSet::new();
    let mut found = Vec::new();

    for root in 0..classes.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        // (class, index of next parent to visit)
        let mut stack: Vec<(ClassId, usize)> = vec![(ClassId(root as u32), 0)];
        marks[root] = Mark::InProgress;

        while let Some(top) = stack.last_mut() {
            let cid = top.0;
            let Some(&parent) = parents[cid.index()].get(top.1) else {
                marks[cid.index()] = Mark::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;
            match marks[parent.index()] {
                Mark::Unvisited => {
                    marks[parent.index()] = Mark::InProgress;
                    stack.push((parent, 0));
                }
                Mark::InProgress => {
                    let start = stack
                        .iter()
                        .position(|(c, _)| *c == parent)
                        .unwrap_or(0);
                    let cycle = normalize_cycle(
                        stack[start..].iter().map(|(c, _)| *c).collect(),
                        classes,
                    );
                    if seen_cycles.insert(cycle.clone()) {
                        found.push(cycle_violation(&cycle, classes));
                    }
                }
                Mark::Done => {}
            }
        }
    }
    found
}

/// Rotate so the member with the smallest id comes first.
fn normalize_cycle(mut cycle: Vec<ClassId>, classes: &[ClassDef]) -> Vec<ClassId> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| classes[a.index()].id.cmp(&classes[b.index()].id))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    cycle.rotate_left(pivot);
    cycle
}

fn cycle_violation(cycle: &[ClassId], classes: &[ClassDef]) -> Violation {
    let mut path: Vec<String> = cycle
        .iter()
        .map(|cid| format!("<{}>", classes[cid.index()].id))
        .collect();
    path.push(path[0].clone());
    Violation::error(
        ViolationKind::SchemaCycle,
        Subject::Class {
            id: classes[cycle[0].index()].id.clone(),
        },
        format!("superclass cycle: {}", path.join(" -> ")),
    )
}
