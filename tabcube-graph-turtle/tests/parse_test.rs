//! Parsing realistic catalogue and code-list documents

use pretty_assertions::assert_eq;
use tabcube_graph_ir::{Graph, GraphCollectorSink, Term};
use tabcube_graph_turtle::{parse, TurtleError};
use tabcube_vocab::{dcat, dcterms, rdf, skos, void};

fn parse_graph(input: &str, base: &str) -> Graph {
    let mut sink = GraphCollectorSink::new();
    parse(input, Some(base), &mut sink).unwrap();
    sink.finish()
}

#[test]
fn catalogue_with_dependencies() {
    let graph = parse_graph(
        r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dcterms: <http://purl.org/dc/terms/> .
        @prefix void: <http://rdfs.org/ns/void#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

        <#dataset> a dcat:Dataset ;
            dcterms:title "Regional trade"@en ;
            dcterms:issued "2023-06-01T09:30:00"^^xsd:dateTime ;
            dcat:keyword "trade", "exports" .

        <#areas> a void:Dataset ;
            void:dataDump <../codelists/areas.csv-metadata.json> ;
            void:uriSpace "http://example.org/def/area/" .
        "#,
        "file:///data/trade/trade.csv-metadata.ttl",
    );

    let dataset = Term::iri("file:///data/trade/trade.csv-metadata.ttl#dataset");
    let areas = Term::iri("file:///data/trade/trade.csv-metadata.ttl#areas");

    assert!(graph
        .iter()
        .any(|t| t.s == dataset && t.p == Term::iri(rdf::TYPE) && t.o == Term::iri(dcat::DATASET)));
    let keywords = graph
        .iter()
        .filter(|t| t.s == dataset && t.p == Term::iri(dcat::KEYWORD))
        .count();
    assert_eq!(keywords, 2);
    assert!(graph.iter().any(|t| t.s == dataset
        && t.p == Term::iri(dcterms::TITLE)
        && t.o == Term::lang_string("Regional trade", "en")));

    let dump = graph
        .iter()
        .find(|t| t.s == areas && t.p == Term::iri(void::DATA_DUMP))
        .map(|t| t.o.clone());
    assert_eq!(dump, Some(Term::iri("file:///data/codelists/areas.csv-metadata.json")));
}

#[test]
fn concept_scheme() {
    let graph = parse_graph(
        r#"
        PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
        PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>

        <http://example.org/def/area> a skos:ConceptScheme ;
            rdfs:label 'Areas' .
        "#,
        "file:///data/codelists/areas.ttl",
    );

    assert_eq!(graph.len(), 2);
    assert_eq!(
        graph.iter().next().map(|t| t.o.clone()),
        Some(Term::iri(skos::CONCEPT_SCHEME))
    );
}

#[test]
fn lexer_errors_surface() {
    let mut sink = GraphCollectorSink::new();
    let err = parse("<http://e/s> <http://e/p> <unterminated", None, &mut sink).unwrap_err();
    assert!(matches!(err, TurtleError::Lexer { line: 1, column: 27, .. }));
}
