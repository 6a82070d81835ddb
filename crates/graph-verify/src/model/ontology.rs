//! RDF vocabulary constants used by the loaders and the report emitters.
//!
//! - `standard` -- RDF/RDFS/OWL/XSD terms read from ontologies and data graphs
//! - `crm` -- the Erlangen CIDOC-CRM namespace used as the default vocabulary
//! - `gv` -- terms of the validation report graph written by the emitters

/// Standard RDF/RDFS/OWL/XSD namespace URIs
pub mod standard {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    pub const RDFS_LITERAL: &str = "http://www.w3.org/2000/01/rdf-schema#Literal";

    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const OWL_FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";
    pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    pub const OWL_MIN_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#minCardinality";
    pub const OWL_MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";
    pub const OWL_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#cardinality";
    pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";

    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const XSD_NON_NEGATIVE_INTEGER: &str =
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const XSD_G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
    pub const XSD_G_YEAR_MONTH: &str = "http://www.w3.org/2001/XMLSchema#gYearMonth";
}

/// Erlangen CRM, the OWL rendering of CIDOC-CRM (`crm:` prefix)
pub mod crm {
    pub const PREFIX: &str = "crm";
    pub const NS: &str = "http://erlangen-crm.org/240307/";
}

/// Validation report vocabulary (`gv:` prefix)
pub mod gv {
    pub const PREFIX: &str = "gv";
    pub const NS: &str = "http://graph-verify.example/report/";

    // Classes
    pub const VALIDATION_REPORT: &str = "http://graph-verify.example/report/ValidationReport";
    pub const VIOLATION: &str = "http://graph-verify.example/report/Violation";
    pub const SCHEMA_DIAGNOSTIC: &str = "http://graph-verify.example/report/SchemaDiagnostic";

    // Severities
    pub const ERROR: &str = "http://graph-verify.example/report/Error";
    pub const WARNING: &str = "http://graph-verify.example/report/Warning";

    // Report properties
    pub const CONFORMS: &str = "http://graph-verify.example/report/conforms";
    pub const HAS_VIOLATION: &str = "http://graph-verify.example/report/hasViolation";
    pub const ENTITY_COUNT: &str = "http://graph-verify.example/report/entityCount";
    pub const EDGE_COUNT: &str = "http://graph-verify.example/report/edgeCount";

    // Violation properties
    pub const KIND: &str = "http://graph-verify.example/report/kind";
    pub const SEVERITY: &str = "http://graph-verify.example/report/severity";
    pub const FOCUS_NODE: &str = "http://graph-verify.example/report/focusNode";
    pub const PATH: &str = "http://graph-verify.example/report/path";
    pub const EDGE_INDEX: &str = "http://graph-verify.example/report/edgeIndex";
    pub const ORIGIN: &str = "http://graph-verify.example/report/origin";
    pub const MESSAGE: &str = "http://graph-verify.example/report/message";
    pub const ORDINAL: &str = "http://graph-verify.example/report/ordinal";
}
