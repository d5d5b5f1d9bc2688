//! Catalogue metadata (DCAT / Dublin Core)

use crate::error::{InspectError, InspectResult};
use crate::query::{group_concat, split_list};
use crate::resolver::ResolvedDocument;
use crate::store::{GraphStore, Scope};
use serde::Serialize;
use std::collections::HashSet;
use tabcube_graph_ir::Term;
use tabcube_vocab::{dcat, dcterms, rdfs, skos};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CatalogueMetadata {
    /// The dataset or concept scheme described
    pub subject: String,
    pub title: String,
    pub description: Option<String>,
    /// `rdfs:comment`
    pub summary: Option<String>,
    pub issued: Option<String>,
    pub modified: Option<String>,
    pub license: Option<String>,
    pub creator: Option<String>,
    pub publisher: Option<String>,
    pub landing_pages: Vec<String>,
    pub themes: Vec<String>,
    pub keywords: Vec<String>,
    pub contact_point: Option<String>,
    pub identifier: Option<String>,
    /// Named graph the record was found in
    pub graph: String,
}

fn catalogue_record(store: &GraphStore, graph: &str, subject: &Term) -> Option<CatalogueMetadata> {
    let scope = Scope::Graph(graph);
    let value = |predicate| store.value(scope, subject, predicate);
    let list = |predicate| split_list(&group_concat(store.objects(scope, subject, predicate)));

    Some(CatalogueMetadata {
        subject: subject.lexical().unwrap_or_else(|| subject.to_string()),
        title: value(dcterms::TITLE).or_else(|| value(rdfs::LABEL))?,
        description: value(dcterms::DESCRIPTION),
        summary: value(rdfs::COMMENT),
        issued: value(dcterms::ISSUED),
        modified: value(dcterms::MODIFIED),
        license: value(dcterms::LICENSE),
        creator: value(dcterms::CREATOR),
        publisher: value(dcterms::PUBLISHER),
        landing_pages: list(dcat::LANDING_PAGE),
        themes: list(dcat::THEME),
        keywords: list(dcat::KEYWORD),
        contact_point: value(dcat::CONTACT_POINT),
        identifier: value(dcterms::IDENTIFIER),
        graph: graph.to_string(),
    })
}

/// One record per titled `dcat:Dataset` or `skos:ConceptScheme`, over all graphs
///
/// Records come out in graph load order, so the primary document's come first.
pub fn extract_catalogue(store: &GraphStore) -> InspectResult<Vec<CatalogueMetadata>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let typed = store
        .instances(Scope::Union, dcat::DATASET)
        .into_iter()
        .chain(store.instances(Scope::Union, skos::CONCEPT_SCHEME));
    let mut quads: Vec<_> = typed.collect();
    // Keep load order across both classes
    let order: Vec<&str> = store.names().collect();
    quads.sort_by_key(|q| order.iter().position(|n| *n == q.graph));

    for quad in quads {
        if !seen.insert((quad.graph, &quad.triple.s)) {
            continue;
        }
        match catalogue_record(store, quad.graph, &quad.triple.s) {
            Some(record) => records.push(record),
            None => tracing::debug!(subject = %quad.triple.s, graph = %quad.graph, "untitled catalogue entry"),
        }
    }
    tracing::debug!(records = records.len(), "extracted catalogue metadata");
    Ok(records)
}

/// The catalogue record declared in the primary document
pub fn primary_catalogue(store: &GraphStore, doc: &ResolvedDocument) -> InspectResult<CatalogueMetadata> {
    extract_catalogue(store)?
        .into_iter()
        .find(|record| record.graph == doc.location)
        .ok_or_else(|| InspectError::MissingMetadata {
            what: "catalogue metadata (dcterms:title)".to_string(),
            subject: doc.location.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcube_vocab::rdf;

    fn dataset_graph(subject: &str, title: &str) -> tabcube_graph_ir::Graph {
        let mut g = tabcube_graph_ir::Graph::new();
        let s = Term::iri(subject);
        g.add_triple(s.clone(), Term::iri(rdf::TYPE), Term::iri(dcat::DATASET));
        g.add_triple(s.clone(), Term::iri(dcterms::TITLE), Term::string(title));
        g.add_triple(s.clone(), Term::iri(dcat::KEYWORD), Term::string("trade"));
        g.add_triple(s.clone(), Term::iri(dcat::KEYWORD), Term::string("exports"));
        g.add_triple(s.clone(), Term::iri(dcat::KEYWORD), Term::string("goods"));
        g.add_triple(s, Term::iri(rdfs::COMMENT), Term::string("Monthly trade."));
        g
    }

    #[test]
    fn records_per_graph() {
        let mut store = GraphStore::new();
        store.insert("file:///meta.json", dataset_graph("http://e/ds", "Trade"));
        store.insert("file:///dep.json", dataset_graph("http://e/other", "Other"));

        let records = extract_catalogue(&store).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Trade");
        assert_eq!(records[0].graph, "file:///meta.json");
        assert_eq!(records[0].keywords, vec!["trade", "exports", "goods"]);
        assert_eq!(records[0].summary.as_deref(), Some("Monthly trade."));
        assert_eq!(records[0].themes, Vec::<String>::new());
        assert_eq!(records[1].graph, "file:///dep.json");
    }

    #[test]
    fn untitled_entries_are_skipped() {
        let mut g = tabcube_graph_ir::Graph::new();
        g.add_triple(Term::iri("http://e/ds"), Term::iri(rdf::TYPE), Term::iri(dcat::DATASET));
        let mut store = GraphStore::new();
        store.insert("file:///meta.json", g);
        assert!(extract_catalogue(&store).unwrap().is_empty());
    }
}
