//! Cardinality finalization. Runs after every edge has been counted.

use std::collections::{BTreeMap, BTreeSet};

use super::EdgeCounts;
use crate::graph::Graph;
use crate::report::{Subject, Violation, ViolationKind};
use crate::schema::{ClassId, Schema};

/// Check counted `(entity, property)` pairs against declared bounds.
///
/// Pairs with at least one edge are always checked. A property with
/// `min > 0` is also checked for every instance of its domain, which is how
/// missing edges are found; without a domain there is no such set of
/// entities and only the upper bound can be violated.
pub(super) fn check(
    schema: &Schema,
    graph: &Graph,
    types: &[BTreeSet<ClassId>],
    counts: &EdgeCounts<'_>,
    out: &mut Vec<Violation>,
) {
    let mut pairs: BTreeMap<(&str, &str), usize> =
        counts.iter().map(|(&key, &n)| (key, n)).collect();

    for property in schema.properties().filter(|p| p.cardinality.min > 0) {
        let domain: Vec<ClassId> = property
            .domain
            .iter()
            .filter_map(|d| schema.class_id(d))
            .collect();
        if domain.is_empty() {
            continue;
        }
        for (pos, entity) in graph.entities().iter().enumerate() {
            if domain.iter().all(|cid| types[pos].contains(cid)) {
                pairs
                    .entry((entity.id.as_str(), property.id.as_str()))
                    .or_insert(0);
            }
        }
    }

    for ((entity, property_id), count) in pairs {
        let Some(property) = schema.resolve_property(property_id) else {
            continue;
        };
        let bounds = property.cardinality;
        let message = if count < bounds.min as usize {
            format!(
                "too few <{property_id}> edges: found {count}, expected at least {} ({bounds})",
                bounds.min
            )
        } else {
            match bounds.max {
                Some(max) if count > max as usize => format!(
                    "too many <{property_id}> edges: found {count}, \
                     expected at most {max} ({bounds})"
                ),
                _ => continue,
            }
        };
        out.push(Violation::error(
            ViolationKind::CardinalityViolation,
            Subject::EntityProperty {
                entity: entity.to_string(),
                property: property_id.to_string(),
            },
            message,
        ));
    }
}
