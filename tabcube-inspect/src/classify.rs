//! Document classification

use crate::query::has_instance;
use crate::store::{GraphStore, Scope};
use serde::Serialize;
use std::fmt;
use tabcube_vocab::{qb, skos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    StructuredDataset,
    ConceptList,
    Unrecognized,
}

/// Classify the document loaded as graph `primary`
///
/// Only the primary graph counts: a dataset whose dependencies define
/// concept schemes is still a dataset, and a concept list that imports a
/// cube definition is not one. When the primary graph declares both, it is a
/// dataset.
pub fn classify(store: &GraphStore, primary: &str) -> Classification {
    let scope = Scope::Graph(primary);
    let is_dataset = has_instance(store, scope, qb::DATA_SET);
    let is_concept_list = has_instance(store, scope, skos::CONCEPT_SCHEME);

    let classification = match (is_dataset, is_concept_list) {
        (true, _) => Classification::StructuredDataset,
        (false, true) => Classification::ConceptList,
        (false, false) => Classification::Unrecognized,
    };
    tracing::debug!(graph = %primary, ?classification, "classified document");
    classification
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StructuredDataset => "structured dataset",
            Self::ConceptList => "concept list",
            Self::Unrecognized => "unrecognized",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabcube_graph_ir::{Graph, Term};
    use tabcube_vocab::rdf;

    fn typed(classes: &[&str]) -> Graph {
        let mut g = Graph::new();
        for (i, class) in classes.iter().enumerate() {
            g.add_triple(
                Term::iri(format!("http://e/node{i}")),
                Term::iri(rdf::TYPE),
                Term::iri(*class),
            );
        }
        g
    }

    fn classify_primary(primary: &[&str], dependency: &[&str]) -> Classification {
        let mut store = GraphStore::new();
        store.insert("file:///meta.json", typed(primary));
        store.insert("file:///dep.ttl", typed(dependency));
        classify(&store, "file:///meta.json")
    }

    #[test]
    fn exactly_one_result() {
        assert_eq!(classify_primary(&[qb::DATA_SET], &[]), Classification::StructuredDataset);
        assert_eq!(classify_primary(&[skos::CONCEPT_SCHEME], &[]), Classification::ConceptList);
        assert_eq!(classify_primary(&[], &[]), Classification::Unrecognized);
    }

    #[test]
    fn dataset_wins_a_tie() {
        assert_eq!(
            classify_primary(&[skos::CONCEPT_SCHEME, qb::DATA_SET], &[]),
            Classification::StructuredDataset
        );
    }

    #[test]
    fn dependencies_do_not_count() {
        assert_eq!(
            classify_primary(&[], &[qb::DATA_SET, skos::CONCEPT_SCHEME]),
            Classification::Unrecognized
        );
        assert_eq!(
            classify_primary(&[skos::CONCEPT_SCHEME], &[qb::DATA_SET]),
            Classification::ConceptList
        );
    }
}
