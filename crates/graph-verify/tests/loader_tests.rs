use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use graph_verify::config::{GraphLoadOptions, InputFormat};
use graph_verify::graph::loader::{self as graph_loader, load_graph};
use graph_verify::model::iri::PrefixMap;
use graph_verify::schema::loader::{self as schema_loader, load_schema};
use graph_verify::{
    Cardinality, Edge, Graph, LiteralKind, LoadError, RangeSpec, Target, Validator,
    ViolationKind,
};

const CRM: &str = "http://erlangen-crm.org/240307/";
const EX: &str = "http://example.org/museum/";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn crm(local: &str) -> String {
    format!("{CRM}{local}")
}

fn ex(local: &str) -> String {
    format!("{EX}{local}")
}

// --- JSON schema ---

#[test]
fn load_json_schema_fixture() {
    let schema = load_schema(&fixture("crm_schema.json"), InputFormat::Auto)
        .expect("Failed to load schema fixture");

    assert_eq!(schema.class_count(), 19);
    assert_eq!(schema.property_count(), 8);
    assert!(schema.diagnostics().is_empty());

    assert!(schema.is_subclass_of(&crm("E22_Human-Made_Object"), &crm("E18_Physical_Thing")));
    assert!(schema.is_subclass_of(&crm("E21_Person"), &crm("E1_CRM_Entity")));
    assert!(!schema.is_subclass_of(&crm("E53_Place"), &crm("E39_Actor")));
    // Multiple inheritance.
    assert!(schema.is_subclass_of(&crm("E12_Production"), &crm("E7_Activity")));
    assert!(schema.is_subclass_of(&crm("E12_Production"), &crm("E63_Beginning_of_Existence")));

    let p90 = schema.resolve_property(&crm("P90_has_value")).unwrap();
    assert_eq!(p90.cardinality, Cardinality::exactly(1));
    assert_eq!(p90.range, vec![RangeSpec::Literal(LiteralKind::Number)]);
    let p4 = schema.resolve_property(&crm("P4_has_time-span")).unwrap();
    assert_eq!(p4.cardinality, Cardinality::new(0, Some(1)));
}

#[test]
fn json_schema_duplicate_class_merges_superclasses() {
    let schema = schema_loader::from_json_str(
        r#"{"classes": [
            {"id": "A"}, {"id": "B"},
            {"id": "C", "subClassOf": ["A"]},
            {"id": "C", "superclasses": ["B"]}
        ]}"#,
    )
    .unwrap();
    assert_eq!(schema.class_count(), 3);
    assert!(schema.is_subclass_of("C", "A"));
    assert!(schema.is_subclass_of("C", "B"));
}

#[test]
fn json_schema_duplicate_property_last_wins() {
    let schema = schema_loader::from_json_str(
        r#"{"classes": [{"id": "A"}, {"id": "B"}],
            "properties": [
                {"id": "p", "domain": "A"},
                {"id": "q"},
                {"id": "p", "domain": "B", "max": 1}
            ]}"#,
    )
    .unwrap();
    let ids: Vec<_> = schema.properties().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p", "q"]);
    let p = schema.resolve_property("p").unwrap();
    assert_eq!(p.domain, vec!["B"]);
    assert_eq!(p.cardinality.max, Some(1));
}

#[test]
fn json_schema_cycle_becomes_diagnostic() {
    let schema = schema_loader::from_json_str(
        r#"{"classes": [
            {"id": "A", "subClassOf": ["B"]},
            {"id": "B", "subClassOf": ["A"]}
        ]}"#,
    )
    .unwrap();
    assert!(schema.has_cycles());
    assert_eq!(schema.diagnostics().len(), 1);
    assert!(schema.is_subclass_of("A", "B"));
    assert!(schema.is_subclass_of("B", "A"));
}

#[test]
fn malformed_json_schema_is_an_error() {
    let err = schema_loader::from_json_str(r#"{"classes": [{"subClassOf": []}]}"#).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
}

// --- N-Triples schema ---

#[test]
fn load_ntriples_schema_fixture() {
    let schema = load_schema(&fixture("crm_schema.nt"), InputFormat::Auto)
        .expect("Failed to load N-Triples schema");

    assert_eq!(schema.class_count(), 6);
    assert!(schema.diagnostics().is_empty(), "{:?}", schema.diagnostics());
    // owl:Thing is implicit, not a declared superclass.
    assert!(schema
        .resolve_class(&crm("E1_CRM_Entity"))
        .unwrap()
        .superclasses
        .is_empty());
    // The restriction node is not a superclass either.
    assert_eq!(
        schema.resolve_class(&crm("E7_Activity")).unwrap().superclasses,
        vec![crm("E1_CRM_Entity")]
    );

    let ids: Vec<_> = schema.properties().map(|p| p.id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            crm("P14_carried_out_by"),
            crm("P4_has_time-span"),
            crm("P82a_begin_of_the_begin"),
            crm("P3_has_note"),
        ]
    );

    let p14 = schema.resolve_property(&crm("P14_carried_out_by")).unwrap();
    assert_eq!(p14.cardinality, Cardinality::new(1, None));
    assert_eq!(p14.domain, vec![crm("E7_Activity")]);
    assert_eq!(p14.range, vec![RangeSpec::Class(crm("E39_Actor"))]);

    let p4 = schema.resolve_property(&crm("P4_has_time-span")).unwrap();
    assert_eq!(p4.cardinality, Cardinality::new(0, Some(1)));

    let p82a = schema.resolve_property(&crm("P82a_begin_of_the_begin")).unwrap();
    assert_eq!(p82a.range, vec![RangeSpec::Literal(LiteralKind::Date)]);
    let p3 = schema.resolve_property(&crm("P3_has_note")).unwrap();
    assert_eq!(p3.range, vec![RangeSpec::Literal(LiteralKind::String)]);
}

#[test]
fn ntriples_schema_rejects_bad_cardinality_literal() {
    let input = "_:r <http://www.w3.org/2002/07/owl#onProperty> <http://x/p> .\n\
                 _:r <http://www.w3.org/2002/07/owl#maxCardinality> \"many\" .\n";
    let err = schema_loader::from_ntriples(Cursor::new(input)).unwrap_err();
    assert!(matches!(err, LoadError::InvalidCardinalityValue { .. }));
}

#[test]
fn ntriples_schema_keeps_every_domain() {
    let input = "\
<http://x/Person> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://x/Place> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://x/p> <http://www.w3.org/2000/01/rdf-schema#domain> <http://x/Person> .
<http://x/p> <http://www.w3.org/2000/01/rdf-schema#domain> <http://x/Place> .
<http://x/p> <http://www.w3.org/2000/01/rdf-schema#range> <http://x/Place> .
";
    let schema = schema_loader::from_ntriples(Cursor::new(input)).unwrap();
    let p = schema.resolve_property("http://x/p").unwrap();
    assert_eq!(p.domain, vec!["http://x/Person", "http://x/Place"]);

    let mut graph = Graph::new();
    graph.add_entity("http://x/ada", ["http://x/Person"]);
    graph.add_entity("http://x/paris", ["http://x/Place"]);
    graph.add_edge(Edge::to_entity("http://x/ada", "http://x/p", "http://x/paris"));
    let report = Validator::new(&schema).validate(&graph);
    assert_eq!(report.len(), 1, "{}", report.render());
    assert_eq!(report.violations()[0].kind, ViolationKind::DomainMismatch);
    assert_eq!(
        report.violations()[0].message,
        "source <http://x/ada> is not an instance of <http://x/Place> \
         (asserted types: <http://x/Person>)"
    );
}

#[test]
fn ntriples_syntax_error_reports_line() {
    let input = "<http://x/a> <http://x/b> <http://x/c> .\n<http://x/a> oops\n";
    let err = schema_loader::from_ntriples(Cursor::new(input)).unwrap_err();
    match err {
        LoadError::Syntax { line, .. } => assert_eq!(line, 2),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

// --- JSON graph ---

#[test]
fn load_json_graph_fixture() {
    let graph = load_graph(
        &fixture("museum_valid.json"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .expect("Failed to load graph fixture");

    assert_eq!(graph.entities().len(), 6);
    assert_eq!(graph.edges().len(), 8);
    assert_eq!(graph.entities()[0].id, ex("mona_lisa"));
    assert_eq!(graph.entities()[0].types, vec![crm("E22_Human-Made_Object")]);
    assert_eq!(
        graph.edges()[6].target,
        Target::Literal(graph_verify::Literal::new(LiteralKind::Number, "77"))
    );
}

#[test]
fn json_graph_duplicate_entity_keeps_position() {
    let graph = graph_loader::from_json_str(
        r#"{"entities": [
            {"id": "a", "types": ["X"]},
            {"id": "b", "types": ["Y"]},
            {"id": "a", "classes": ["Z"]}
        ]}"#,
        &GraphLoadOptions::default(),
    )
    .unwrap();
    assert_eq!(graph.entities().len(), 2);
    assert_eq!(graph.entities()[0].id, "a");
    assert_eq!(graph.entities()[0].types, vec!["Z".to_string()]);
}

#[test]
fn json_graph_unknown_prefix_is_an_error() {
    let err = graph_loader::from_json_str(
        r#"{"entities": [{"id": "zz:a", "types": []}]}"#,
        &GraphLoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::UnknownPrefix(ref t) if t == "zz:a"));
}

// --- N-Triples graph ---

#[test]
fn load_ntriples_graph_fixture() {
    let graph = load_graph(
        &fixture("museum_graph.nt"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .unwrap();

    let ids: Vec<_> = graph.entities().iter().map(|e| e.id.clone()).collect();
    assert_eq!(
        ids,
        vec![ex("battle"), ex("napoleon"), ex("ts"), ex("paris"), ex("march")]
    );
    // rdfs:label is skipped by default.
    assert_eq!(graph.edges().len(), 4);
    assert_eq!(graph.entity(&ex("napoleon")).unwrap().types, vec![crm("E21_Person")]);
    assert_eq!(
        graph.edges()[2].target,
        Target::Literal(graph_verify::Literal::new(
            LiteralKind::Date,
            "1805-12-02T00:00:00"
        ))
    );
    // Language-tagged literals are strings.
    assert_eq!(
        graph.edges()[3].target,
        Target::Literal(graph_verify::Literal::new(LiteralKind::String, "Capitale"))
    );
}

#[test]
fn ntriples_graph_keeps_annotations_when_asked() {
    let options = GraphLoadOptions {
        ignored_predicates: BTreeSet::new(),
        ..GraphLoadOptions::default()
    };
    let graph = load_graph(&fixture("museum_graph.nt"), InputFormat::NTriples, &options).unwrap();
    assert_eq!(graph.edges().len(), 5);
}

#[test]
fn ntriples_objects_do_not_become_entities() {
    let input = "<http://x/a> <http://x/knows> <http://x/b> .\n";
    let graph = graph_loader::from_ntriples(Cursor::new(input), &GraphLoadOptions::default())
        .unwrap();
    assert_eq!(graph.entities().len(), 1);
    assert!(graph.entity("http://x/b").is_none());
}

// --- Triplets ---

#[test]
fn load_triplets_fixture() {
    let graph = load_graph(
        &fixture("museum_triplets.jsonl"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .unwrap();

    let ids: Vec<_> = graph.entities().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "http://graph-verify.example/entity/Production%20of%20Mona%20Lisa",
            "http://graph-verify.example/entity/Mona%20Lisa",
            "http://graph-verify.example/entity/Leonardo%20da%20Vinci",
            "http://graph-verify.example/entity/Louvre",
        ]
    );
    // Null chunks and null triplets are skipped.
    assert_eq!(graph.edges().len(), 3);
    assert_eq!(graph.edges()[0].property, crm("P108_has_produced"));
    assert_eq!(
        graph.entities()[1].types,
        vec![crm("E22_Human-Made_Object")]
    );
    let origins: Vec<_> = graph.edges().iter().map(|e| e.origin.as_deref()).collect();
    assert_eq!(origins, vec![Some("c1"), Some("c1"), Some("c3")]);
    let stated = graph.edges()[2].stated.as_ref().unwrap();
    assert_eq!(stated.source, crm("E22_Human-Made_Object"));
    assert_eq!(stated.target, crm("E21_Person"));
}

#[test]
fn triplets_bad_line_reports_line_number() {
    let input = "{\"chunkId\": \"a\", \"triplets\": []}\n{not json}\n";
    let err = graph_loader::from_triplets(Cursor::new(input), &GraphLoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::JsonLine { line: 2, .. }));
}

#[test]
fn triplets_use_custom_base_and_vocabulary() {
    let input = r#"{"chunkId": "a", "triplets": [{"domain": {"class": "Person", "name": "Ada"}, "property": "knows", "range": {"class": "Person", "name": "Charles"}}]}"#;
    let options = GraphLoadOptions {
        base_uri: "http://example.org/people#".to_string(),
        vocabulary: "http://example.org/vocab/".to_string(),
        ..GraphLoadOptions::default()
    };
    let graph = graph_loader::from_triplets(Cursor::new(input), &options).unwrap();
    assert_eq!(graph.entities()[0].id, "http://example.org/people#Ada");
    assert_eq!(graph.entities()[0].types, vec!["http://example.org/vocab/Person".to_string()]);
    assert_eq!(graph.edges()[0].property, "http://example.org/vocab/knows");
}

// --- Fixtures end to end ---

#[test]
fn valid_fixture_conforms() {
    let schema = load_schema(&fixture("crm_schema.json"), InputFormat::Auto).unwrap();
    let graph = load_graph(
        &fixture("museum_valid.json"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .unwrap();
    let report = Validator::new(&schema).validate(&graph);
    assert!(report.is_empty(), "unexpected violations:\n{}", report.render());
    assert_eq!(report.summary().valid_edges, 8);
}

#[test]
fn invalid_fixture_reports_in_order() {
    let schema = load_schema(&fixture("crm_schema.json"), InputFormat::Auto).unwrap();
    let graph = load_graph(
        &fixture("museum_invalid.json"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .unwrap();
    let report = Validator::new(&schema).validate(&graph);

    let kinds: Vec<_> = report.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::UnknownClass,
            ViolationKind::DomainMismatch,
            ViolationKind::RangeMismatch,
            ViolationKind::RangeMismatch,
            ViolationKind::UnknownProperty,
            ViolationKind::CardinalityViolation,
            ViolationKind::CardinalityViolation,
            ViolationKind::CardinalityViolation,
        ]
    );
    let summary = report.summary();
    assert_eq!(summary.entities, 7);
    assert_eq!(summary.edges, 8);
    assert_eq!(summary.valid_edges, 4);
    assert_eq!(summary.errors, 8);

    let mut prefixes = PrefixMap::standard();
    prefixes.insert("ex", EX);
    let text = report.render_with(&prefixes);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines[0],
        "[ERROR] UnknownClass at entity ex:louvre: asserted class <http://erlangen-crm.org/240307/E99_Museum> is not declared in the schema"
    );
    assert!(lines[1].starts_with("[ERROR] DomainMismatch at edge[3] ex:louvre crm:P14_carried_out_by"));
    assert!(lines[2].contains("dangling reference: target <http://example.org/museum/paris>"));
    assert!(lines[3].ends_with("expected a number literal, found string literal \"77 cm\""));
    assert!(lines[5].starts_with("[ERROR] CardinalityViolation at entity ex:height property crm:P90_has_value: too many"));
    assert!(lines[6].contains("crm:P108_has_produced: too few"));
    assert!(lines[7].contains("crm:P4_has_time-span: too many"));
}

#[test]
fn ntriples_fixtures_report_missing_performer() {
    let schema = load_schema(&fixture("crm_schema.nt"), InputFormat::Auto).unwrap();
    let graph = load_graph(
        &fixture("museum_graph.nt"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .unwrap();
    let report = Validator::new(&schema).validate(&graph);
    assert_eq!(report.len(), 1, "{}", report.render());
    let v = &report.violations()[0];
    assert_eq!(v.kind, ViolationKind::CardinalityViolation);
    assert_eq!(v.subject.focus(), ex("march"));
    assert!(v.message.starts_with("too few"));
}

#[test]
fn triplets_fixture_flags_person_as_location() {
    let schema = load_schema(&fixture("crm_schema.json"), InputFormat::Auto).unwrap();
    let graph = load_graph(
        &fixture("museum_triplets.jsonl"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .unwrap();
    let report = Validator::new(&schema).validate(&graph);
    assert_eq!(report.len(), 1, "{}", report.render());
    assert_eq!(report.violations()[0].kind, ViolationKind::RangeMismatch);
    assert_eq!(
        report.violations()[0].subject.property(),
        Some(crm("P53_has_former_or_current_location").as_str())
    );

    let by_origin = &report.summary().by_origin;
    assert_eq!(by_origin.len(), 2);
    assert_eq!((by_origin["c1"].valid, by_origin["c1"].total), (2, 2));
    assert_eq!((by_origin["c3"].valid, by_origin["c3"].total), (0, 1));
    assert!(report.render().contains(" (from c3): "));
}

#[test]
fn triplets_are_judged_by_their_own_classes() {
    // "Paris" is an object in one chunk and a place in the next; the edge
    // from the second chunk must not borrow the first chunk's class.
    let input = concat!(
        r#"{"chunkId": "a", "triplets": [{"#,
        r#""domain": {"class": "E22_Human-Made_Object", "name": "Paris"}, "#,
        r#""property": "P53_has_former_or_current_location", "#,
        r#""range": {"class": "E53_Place", "name": "Louvre"}}]}"#,
        "\n",
        r#"{"chunkId": "b", "triplets": [{"#,
        r#""domain": {"class": "E53_Place", "name": "Paris"}, "#,
        r#""property": "P53_has_former_or_current_location", "#,
        r#""range": {"class": "E53_Place", "name": "Louvre"}}]}"#,
        "\n",
    );
    let schema = load_schema(&fixture("crm_schema.json"), InputFormat::Auto).unwrap();
    let graph =
        graph_loader::from_triplets(Cursor::new(input), &GraphLoadOptions::default()).unwrap();
    assert_eq!(
        graph.entities()[0].types,
        vec![crm("E22_Human-Made_Object"), crm("E53_Place")]
    );

    let report = Validator::new(&schema).validate(&graph);
    let kinds: Vec<_> = report.iter().map(|v| v.kind).collect();
    assert_eq!(kinds, vec![ViolationKind::DomainMismatch], "{}", report.render());
    assert_eq!(
        report.violations()[0].message,
        format!(
            "source <http://graph-verify.example/entity/Paris> is not an instance of <{}> \
             (stated type: <{}>)",
            crm("E18_Physical_Thing"),
            crm("E53_Place")
        )
    );
    assert_eq!(
        report.violations()[0].subject.describe(&PrefixMap::new()),
        format!(
            "edge[1] <http://graph-verify.example/entity/Paris> <{}> (from b)",
            crm("P53_has_former_or_current_location")
        )
    );
    let by_origin = &report.summary().by_origin;
    assert_eq!((by_origin["a"].valid, by_origin["a"].total), (1, 1));
    assert_eq!((by_origin["b"].valid, by_origin["b"].total), (0, 1));
}

#[test]
fn unknown_extension_is_an_error() {
    let err = load_graph(
        Path::new("/nonexistent/graph.xml"),
        InputFormat::Auto,
        &GraphLoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::UnknownFormat(_)));
}

#[test]
fn load_nonexistent_file_gives_error() {
    let result = load_schema(Path::new("/nonexistent/schema.json"), InputFormat::Auto);
    assert!(matches!(result, Err(LoadError::Io(_))));
}
