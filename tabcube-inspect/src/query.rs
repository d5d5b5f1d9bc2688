//! The fixed query set
//!
//! Resolution, classification and extraction only ever ask the store the
//! questions below. Each returns plain rows; callers never walk triples
//! themselves.

use crate::store::{GraphStore, Pattern, Scope};
use tabcube_graph_ir::Term;
use tabcube_vocab::{csvw, dcterms, void};

/// Separator for multi-valued fields flattened into one scalar
pub const LIST_DELIMITER: char = '|';

/// Join values into one `|`-delimited scalar, skipping blank nodes
pub fn group_concat<'a>(values: impl IntoIterator<Item = &'a Term>) -> String {
    let parts: Vec<String> = values.into_iter().filter_map(Term::lexical).collect();
    parts.join(&LIST_DELIMITER.to_string())
}

/// Split a `|`-delimited scalar back into its ordered parts
///
/// An empty scalar is an empty list, not a list of one empty string.
pub fn split_list(concatenated: &str) -> Vec<String> {
    if concatenated.is_empty() {
        return Vec::new();
    }
    concatenated
        .split(LIST_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// `?table csvw:tableSchema ?schema` where `?schema` is an IRI nothing
/// describes yet
pub fn external_table_schemas(store: &GraphStore, graph: &str) -> Vec<String> {
    let scope = Scope::Graph(graph);
    let mut schemas: Vec<String> = store
        .matches(scope, Pattern::any().predicate(csvw::TABLE_SCHEMA))
        .into_iter()
        .filter(|q| !store.describes(scope, &q.triple.o))
        .filter_map(|q| q.triple.o.as_iri().map(str::to_string))
        .collect();
    schemas.sort();
    schemas.dedup();
    schemas
}

/// One `void:Dataset` dependency declaration
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRow {
    pub dependency: Term,
    pub data_dump: String,
    pub uri_space: Option<String>,
    /// The dataset declaring this one as a `void:subset`
    pub dataset: Option<String>,
    /// `void:feature` IRI, if any
    pub feature: Option<String>,
    /// `dcterms:format` media type, if any
    pub media_type: Option<String>,
}

/// `?dep a void:Dataset ; void:dataDump ?location`
///
/// `void:uriSpace`, the parent `void:subset` and the format are optional.
pub fn dataset_dependencies(store: &GraphStore, graph: &str) -> Vec<DependencyRow> {
    let scope = Scope::Graph(graph);
    let mut rows = Vec::new();
    for quad in store.instances(scope, void::DATASET) {
        let dependency = &quad.triple.s;
        let parent = Pattern::any().predicate(void::SUBSET).object(dependency);
        let dataset = store
            .matches(scope, parent)
            .first()
            .and_then(|q| q.triple.s.lexical());

        for dump in store.objects(scope, dependency, void::DATA_DUMP) {
            let Some(data_dump) = dump.lexical() else {
                continue;
            };
            rows.push(DependencyRow {
                dependency: dependency.clone(),
                data_dump,
                uri_space: store.value(scope, dependency, void::URI_SPACE),
                dataset: dataset.clone(),
                feature: store.value(scope, dependency, void::FEATURE),
                media_type: store.value(scope, dependency, dcterms::FORMAT),
            });
        }
    }
    rows
}

/// `ASK { ?s a <class> }`
pub fn has_instance(store: &GraphStore, scope: Scope<'_>, class: &str) -> bool {
    let class = Term::iri(class);
    store.ask(
        scope,
        Pattern::any()
            .predicate(tabcube_vocab::rdf::TYPE)
            .object(&class),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcube_graph_ir::Graph;
    use tabcube_vocab::rdf;

    #[test]
    fn list_fields_split() {
        assert_eq!(split_list(""), Vec::<String>::new());
        assert_eq!(split_list("a|b|c"), vec!["a", "b", "c"]);
        assert_eq!(split_list("only"), vec!["only"]);
    }

    #[test]
    fn concat_then_split_keeps_order() {
        let values = [Term::string("economy"), Term::blank("b0"), Term::iri("http://e/trade")];
        let joined = group_concat(&values);
        assert_eq!(joined, "economy|http://e/trade");
        assert_eq!(split_list(&joined), vec!["economy", "http://e/trade"]);
        assert_eq!(group_concat(std::iter::empty()), "");
    }

    #[test]
    fn dependency_rows() {
        let mut g = Graph::new();
        let dep = Term::iri("http://e/dep/area");
        g.add_triple(dep.clone(), Term::iri(rdf::TYPE), Term::iri(void::DATASET));
        g.add_triple(dep.clone(), Term::iri(void::DATA_DUMP), Term::iri("file:///defs/area.ttl"));
        g.add_triple(dep.clone(), Term::iri(void::URI_SPACE), Term::string("http://e/def/area/"));
        g.add_triple(Term::iri("http://e/ds"), Term::iri(void::SUBSET), dep.clone());

        let mut store = GraphStore::new();
        store.insert("file:///meta.json", g);

        let rows = dataset_dependencies(&store, "file:///meta.json");
        assert_eq!(
            rows,
            vec![DependencyRow {
                dependency: dep,
                data_dump: "file:///defs/area.ttl".to_string(),
                uri_space: Some("http://e/def/area/".to_string()),
                dataset: Some("http://e/ds".to_string()),
                feature: None,
                media_type: None,
            }]
        );
    }

    #[test]
    fn only_undescribed_schemas_are_external() {
        let mut g = Graph::new();
        g.add_triple(Term::iri("http://e/t1"), Term::iri(csvw::TABLE_SCHEMA), Term::iri("file:///s.json"));
        g.add_triple(Term::iri("http://e/t2"), Term::iri(csvw::TABLE_SCHEMA), Term::blank("inline"));
        g.add_triple(Term::blank("inline"), Term::iri(csvw::COLUMN), Term::blank("c"));

        let mut store = GraphStore::new();
        store.insert("file:///meta.json", g);
        assert_eq!(external_table_schemas(&store, "file:///meta.json"), vec!["file:///s.json"]);
    }
}
