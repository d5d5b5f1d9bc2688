//! End-to-end conversion of CSVW metadata documents

use pretty_assertions::assert_eq;
use serde_json::json;
use tabcube_graph_ir::{Graph, GraphCollectorSink, Term};
use tabcube_graph_json_ld::{parse, parse_str, Context, JsonLdError, ParseOptions};
use tabcube_vocab::{csvw, dcterms, qb, rdf};

const BASE: &str = "file:///data/cube/observations.csv-metadata.json";

fn metadata_graph(doc: serde_json::Value) -> Graph {
    let mut sink = GraphCollectorSink::new();
    parse(
        &doc,
        &ParseOptions {
            base: Some(BASE.to_string()),
            ..Default::default()
        },
        &mut sink,
    )
    .unwrap();
    sink.finish()
}

fn objects<'g>(graph: &'g Graph, subject: &Term, predicate: &str) -> Vec<&'g Term> {
    graph
        .iter()
        .filter(|t| &t.s == subject && t.p.as_iri() == Some(predicate))
        .map(|t| &t.o)
        .collect()
}

#[test]
fn table_group_with_relative_references() {
    let graph = metadata_graph(json!({
        "@context": ["http://www.w3.org/ns/csvw", {"@language": "en"}],
        "@id": "#tables",
        "@type": "TableGroup",
        "tables": [{
            "@id": "#table",
            "url": "observations.csv",
            "tableSchema": "../schemas/observations.json",
            "dc:title": "Observations"
        }]
    }));

    let group = Term::iri(format!("{BASE}#tables"));
    let table = Term::iri(format!("{BASE}#table"));

    assert_eq!(objects(&graph, &group, rdf::TYPE), vec![&Term::iri(csvw::TABLE_GROUP)]);
    assert_eq!(objects(&graph, &group, csvw::TABLE_PROP), vec![&table]);
    assert_eq!(
        objects(&graph, &table, csvw::URL),
        vec![&Term::iri("file:///data/cube/observations.csv")]
    );
    assert_eq!(
        objects(&graph, &table, csvw::TABLE_SCHEMA),
        vec![&Term::iri("file:///data/schemas/observations.json")]
    );
    assert_eq!(
        objects(&graph, &table, dcterms::TITLE),
        vec![&Term::lang_string("Observations", "en")]
    );
}

#[test]
fn inline_schema_columns_are_ordered() {
    let graph = metadata_graph(json!({
        "@context": "http://www.w3.org/ns/csvw",
        "url": "observations.csv",
        "tableSchema": {
            "columns": [
                {"name": "area", "titles": "Area", "propertyUrl": "http://example.org/dimension/area"},
                {"name": "value", "titles": "Value", "required": true},
                {"name": "dataset", "virtual": true, "propertyUrl": "qb:dataSet", "valueUrl": "#dataset"}
            ]
        }
    }));

    let mut columns: Vec<_> = graph
        .iter()
        .filter(|t| t.p.as_iri() == Some(csvw::COLUMN))
        .collect();
    columns.sort_by_key(|t| t.list_index);
    assert_eq!(columns.len(), 3);

    let names: Vec<String> = columns
        .iter()
        .map(|c| objects(&graph, &c.o, csvw::NAME)[0].lexical().unwrap())
        .collect();
    assert_eq!(names, vec!["area", "value", "dataset"]);

    let value_column = &columns[1].o;
    assert_eq!(objects(&graph, value_column, csvw::REQUIRED)[0].as_bool(), Some(true));

    let dataset_column = &columns[2].o;
    let property = objects(&graph, dataset_column, csvw::PROPERTY_URL)[0];
    let (_, datatype, _) = property.as_literal().unwrap();
    assert!(datatype.is_uri_template());
    assert_eq!(property.lexical().as_deref(), Some("qb:dataSet"));
}

#[test]
fn root_id_names_an_external_schema() {
    let schema_url = "file:///data/schemas/observations.json";
    let mut sink = GraphCollectorSink::new().with_blank_prefix("s1-");
    parse_str(
        r##"{"columns": [{"name": "area", "titles": "Area"}], "aboutUrl": "#obs/{area}"}"##,
        &ParseOptions {
            base: Some(schema_url.to_string()),
            default_context: Some(Context::csvw().unwrap()),
            root_id: Some(schema_url.to_string()),
        },
        &mut sink,
    )
    .unwrap();
    let graph = sink.finish();

    let schema = Term::iri(schema_url);
    let column = objects(&graph, &schema, csvw::COLUMN)[0];
    assert_eq!(column.as_blank().map(|b| b.as_str().starts_with("s1-")), Some(true));
    assert_eq!(
        objects(&graph, &schema, csvw::ABOUT_URL)[0].lexical().as_deref(),
        Some("#obs/{area}")
    );
}

#[test]
fn cube_vocabulary_in_metadata() {
    let graph = metadata_graph(json!({
        "@context": "http://www.w3.org/ns/csvw",
        "@id": "#dataset",
        "@type": ["qb:DataSet", "dcat:Dataset"],
        "qb:structure": {
            "@id": "#structure",
            "@type": "qb:DataStructureDefinition",
            "qb:component": [
                {"qb:dimension": {"@id": "http://example.org/dimension/area"}},
                {"qb:measure": {"@id": "http://example.org/measure/count"}}
            ]
        }
    }));

    let dataset = Term::iri(format!("{BASE}#dataset"));
    assert_eq!(
        objects(&graph, &dataset, rdf::TYPE),
        vec![&Term::iri(qb::DATA_SET), &Term::iri(tabcube_vocab::dcat::DATASET)]
    );
    let structure = Term::iri(format!("{BASE}#structure"));
    assert_eq!(objects(&graph, &structure, qb::COMPONENT).len(), 2);
}

#[test]
fn invalid_json_is_reported() {
    let mut sink = GraphCollectorSink::new();
    let err = parse_str("{ not json", &ParseOptions::default(), &mut sink).unwrap_err();
    assert!(matches!(err, JsonLdError::Json(_)));
}
