//! Vocabulary constants for tabular data packages
//!
//! Every IRI the inspection pipeline matches against lives here, grouped by
//! vocabulary:
//! - `rdf`, `rdfs`, `xsd` - RDF core
//! - `csvw` - CSV on the Web metadata (http://www.w3.org/ns/csvw#)
//! - `qb` - RDF Data Cube (http://purl.org/linked-data/cube#)
//! - `skos` - concept schemes and concepts
//! - `dcat`, `dcterms` - catalogue metadata
//! - `void` - dataset dependency declarations
//! - `sdmx_attribute` - SDMX content-oriented guidelines attributes
//! - `formats` - W3C unique URIs for serialization formats
//! - `prefixes` - the well-known prefix table used for compact IRIs

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:first IRI (RDF list head)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest IRI (RDF list tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// rdf:nil IRI (RDF list terminator)
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// RDFS namespace
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    /// rdfs:seeAlso IRI
    pub const SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
}

/// XSD datatype constants
pub mod xsd {
    /// XSD namespace
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}

/// CSV on the Web metadata vocabulary
pub mod csvw {
    /// CSVW namespace
    pub const NS: &str = "http://www.w3.org/ns/csvw#";

    /// The context IRI metadata documents reference in `@context`
    pub const CONTEXT: &str = "http://www.w3.org/ns/csvw";

    // Classes
    pub const TABLE_GROUP: &str = "http://www.w3.org/ns/csvw#TableGroup";
    pub const TABLE: &str = "http://www.w3.org/ns/csvw#Table";
    pub const SCHEMA: &str = "http://www.w3.org/ns/csvw#Schema";
    pub const COLUMN_CLASS: &str = "http://www.w3.org/ns/csvw#Column";

    // Structure
    pub const TABLE_PROP: &str = "http://www.w3.org/ns/csvw#table";
    pub const URL: &str = "http://www.w3.org/ns/csvw#url";
    pub const TABLE_SCHEMA: &str = "http://www.w3.org/ns/csvw#tableSchema";
    pub const COLUMN: &str = "http://www.w3.org/ns/csvw#column";

    // Column properties
    pub const NAME: &str = "http://www.w3.org/ns/csvw#name";
    pub const TITLE: &str = "http://www.w3.org/ns/csvw#title";
    pub const PROPERTY_URL: &str = "http://www.w3.org/ns/csvw#propertyUrl";
    pub const VALUE_URL: &str = "http://www.w3.org/ns/csvw#valueUrl";
    pub const ABOUT_URL: &str = "http://www.w3.org/ns/csvw#aboutUrl";
    pub const REQUIRED: &str = "http://www.w3.org/ns/csvw#required";
    pub const VIRTUAL: &str = "http://www.w3.org/ns/csvw#virtual";
    pub const SUPPRESS_OUTPUT: &str = "http://www.w3.org/ns/csvw#suppressOutput";
    pub const DATATYPE: &str = "http://www.w3.org/ns/csvw#datatype";

    /// Datatype of `propertyUrl`/`valueUrl`/`aboutUrl` literals
    pub const URI_TEMPLATE: &str = "http://www.w3.org/ns/csvw#uriTemplate";
}

/// RDF Data Cube vocabulary
pub mod qb {
    /// Data Cube namespace
    pub const NS: &str = "http://purl.org/linked-data/cube#";

    pub const DATA_SET: &str = "http://purl.org/linked-data/cube#DataSet";
    pub const DATA_STRUCTURE_DEFINITION: &str =
        "http://purl.org/linked-data/cube#DataStructureDefinition";
    pub const COMPONENT_SPECIFICATION: &str =
        "http://purl.org/linked-data/cube#ComponentSpecification";

    /// qb:dataSet, linking observations (and virtual columns) to their dataset
    pub const DATA_SET_PROP: &str = "http://purl.org/linked-data/cube#dataSet";
    pub const STRUCTURE: &str = "http://purl.org/linked-data/cube#structure";
    pub const COMPONENT: &str = "http://purl.org/linked-data/cube#component";
    pub const DIMENSION: &str = "http://purl.org/linked-data/cube#dimension";
    pub const ATTRIBUTE: &str = "http://purl.org/linked-data/cube#attribute";
    pub const MEASURE: &str = "http://purl.org/linked-data/cube#measure";
    pub const COMPONENT_REQUIRED: &str = "http://purl.org/linked-data/cube#componentRequired";

    /// The measure-type dimension of standard-shape cubes
    pub const MEASURE_TYPE: &str = "http://purl.org/linked-data/cube#measureType";
}

/// SKOS vocabulary
pub mod skos {
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";

    pub const CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";
    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
}

/// DCAT catalogue vocabulary
pub mod dcat {
    pub const NS: &str = "http://www.w3.org/ns/dcat#";

    pub const DATASET: &str = "http://www.w3.org/ns/dcat#Dataset";
    pub const LANDING_PAGE: &str = "http://www.w3.org/ns/dcat#landingPage";
    pub const THEME: &str = "http://www.w3.org/ns/dcat#theme";
    pub const KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/dcat#contactPoint";
}

/// Dublin Core terms
pub mod dcterms {
    pub const NS: &str = "http://purl.org/dc/terms/";

    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const ISSUED: &str = "http://purl.org/dc/terms/issued";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
    pub const LICENSE: &str = "http://purl.org/dc/terms/license";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";

    /// Media type of a distribution (used as an explicit dependency format)
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
}

/// VoID dataset descriptions
pub mod void {
    pub const NS: &str = "http://rdfs.org/ns/void#";

    pub const DATASET: &str = "http://rdfs.org/ns/void#Dataset";
    pub const DATA_DUMP: &str = "http://rdfs.org/ns/void#dataDump";
    pub const URI_SPACE: &str = "http://rdfs.org/ns/void#uriSpace";
    pub const SUBSET: &str = "http://rdfs.org/ns/void#subset";
    pub const FEATURE: &str = "http://rdfs.org/ns/void#feature";
}

/// SDMX attribute concepts
pub mod sdmx_attribute {
    pub const NS: &str = "http://purl.org/linked-data/sdmx/2009/attribute#";

    /// The unit-of-measure attribute
    pub const UNIT_MEASURE: &str = "http://purl.org/linked-data/sdmx/2009/attribute#unitMeasure";
}

/// W3C format IRIs (http://www.w3.org/ns/formats/)
pub mod formats {
    pub const TURTLE: &str = "http://www.w3.org/ns/formats/Turtle";
    pub const JSON_LD: &str = "http://www.w3.org/ns/formats/JSON-LD";
}

/// Well-known prefixes
///
/// The prefix half of the CSVW initial context, plus the SDMX namespaces that
/// statistical metadata leans on. Used to expand compact IRIs that appear in
/// URI templates, where JSON-LD context processing does not reach.
pub mod prefixes {
    pub const WELL_KNOWN: &[(&str, &str)] = &[
        ("csvw", super::csvw::NS),
        ("dcat", super::dcat::NS),
        ("dc", super::dcterms::NS),
        ("dcterms", super::dcterms::NS),
        ("foaf", "http://xmlns.com/foaf/0.1/"),
        ("owl", "http://www.w3.org/2002/07/owl#"),
        ("prov", "http://www.w3.org/ns/prov#"),
        ("qb", super::qb::NS),
        ("rdf", super::rdf::NS),
        ("rdfs", super::rdfs::NS),
        ("schema", "http://schema.org/"),
        ("sdmx-attribute", super::sdmx_attribute::NS),
        ("sdmx-dimension", "http://purl.org/linked-data/sdmx/2009/dimension#"),
        ("sdmx-measure", "http://purl.org/linked-data/sdmx/2009/measure#"),
        ("skos", super::skos::NS),
        ("vcard", "http://www.w3.org/2006/vcard/ns#"),
        ("void", super::void::NS),
        ("xsd", super::xsd::NS),
    ];

    /// Look up the namespace for a prefix.
    pub fn namespace(prefix: &str) -> Option<&'static str> {
        WELL_KNOWN
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, ns)| *ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_lookup() {
        assert_eq!(prefixes::namespace("qb"), Some(qb::NS));
        assert_eq!(prefixes::namespace("sdmx-attribute"), Some(sdmx_attribute::NS));
        assert_eq!(prefixes::namespace("nope"), None);
    }

    #[test]
    fn constants_live_in_their_namespace() {
        assert!(qb::MEASURE_TYPE.starts_with(qb::NS));
        assert!(csvw::PROPERTY_URL.starts_with(csvw::NS));
        assert!(sdmx_attribute::UNIT_MEASURE.starts_with(sdmx_attribute::NS));
        assert!(void::DATA_DUMP.starts_with(void::NS));
    }
}
