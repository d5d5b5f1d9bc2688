//! RDF graph - a bag of triples plus the base and prefixes seen while parsing

use crate::{Term, Triple};
use std::collections::{BTreeMap, HashSet};

/// A collection of RDF triples
///
/// Insertion order is preserved; callers that need set semantics call
/// [`Graph::dedupe`].
#[derive(Clone, Debug, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    /// Base IRI the document was parsed against
    pub base: Option<String>,
    /// Prefix mappings declared by the document
    pub prefixes: BTreeMap<String, String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Default::default()
        }
    }

    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = Some(base.into());
    }

    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn add_triple(&mut self, s: Term, p: Term, o: Term) {
        self.add(Triple::new(s, p, o));
    }

    /// Add the `index`-th member of the list held by `(s, p)`
    pub fn add_list_item(&mut self, s: Term, p: Term, o: Term, index: i32) {
        self.add(Triple::with_list_index(s, p, o, index));
    }

    /// Move every triple of `other` into this graph
    ///
    /// Prefixes are merged; this graph's base is kept. Blank node labels are
    /// not rewritten, so `other` must have been built with labels that cannot
    /// collide (see `GraphCollectorSink::with_blank_prefix`).
    pub fn append(&mut self, other: Graph) {
        for (prefix, ns) in other.prefixes {
            self.prefixes.entry(prefix).or_insert(ns);
        }
        self.triples.extend(other.triples);
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Remove duplicate triples, keeping the first occurrence of each
    ///
    /// Declaration order survives; `@list` members are ordered by their
    /// list index, not by position.
    pub fn dedupe(&mut self) {
        let mut seen = HashSet::with_capacity(self.triples.len());
        self.triples.retain(|t| seen.insert(t.clone()));
    }

    /// Distinct subjects, in first-seen order
    pub fn subjects(&self) -> Vec<&Term> {
        let mut seen = Vec::new();
        for triple in &self.triples {
            if !seen.contains(&&triple.s) {
                seen.push(&triple.s);
            }
        }
        seen
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        self.triples.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.add_triple(
            Term::iri("http://example.org/table"),
            Term::iri("http://www.w3.org/ns/csvw#url"),
            Term::iri("file:///data/obs.csv"),
        );
        graph.add_triple(
            Term::iri("http://example.org/dataset"),
            Term::iri("http://purl.org/dc/terms/title"),
            Term::string("Observations"),
        );
        graph.add_triple(
            Term::iri("http://example.org/table"),
            Term::iri("http://www.w3.org/ns/csvw#tableSchema"),
            Term::blank("b1"),
        );
        graph
    }

    #[test]
    fn subjects_in_first_seen_order() {
        let graph = sample();
        let subjects: Vec<_> = graph.subjects().iter().filter_map(|s| s.as_iri()).collect();
        assert_eq!(
            subjects,
            vec!["http://example.org/table", "http://example.org/dataset"]
        );
    }

    #[test]
    fn dedupe_removes_duplicates() {
        let mut graph = sample();
        let copy = graph.clone();
        graph.extend(copy);
        assert_eq!(graph.len(), 6);
        graph.dedupe();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.triples(), sample().triples());
    }

    #[test]
    fn dedupe_keeps_declaration_order() {
        let mut graph = Graph::new();
        let s = Term::iri("http://example.org/dataset");
        let p = Term::iri("http://www.w3.org/ns/dcat#keyword");
        for keyword in ["zeta", "alpha", "zeta", "mid"] {
            graph.add_triple(s.clone(), p.clone(), Term::string(keyword));
        }
        graph.dedupe();

        let keywords: Vec<_> = graph.iter().filter_map(|t| t.o.lexical()).collect();
        assert_eq!(keywords, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn append_keeps_base_and_merges_prefixes() {
        let mut graph = Graph::with_base("file:///data/meta.json");
        graph.add_prefix("ex", "http://example.org/");

        let mut other = sample();
        other.set_base("file:///data/schema.json");
        other.add_prefix("ex", "http://other.example/");
        other.add_prefix("qb", "http://purl.org/linked-data/cube#");

        graph.append(other);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.base.as_deref(), Some("file:///data/meta.json"));
        assert_eq!(graph.prefixes["ex"], "http://example.org/");
        assert_eq!(graph.prefixes.len(), 2);
    }

    #[test]
    fn list_items_keep_their_index() {
        let mut graph = Graph::new();
        let s = Term::blank("schema");
        let p = Term::iri("http://www.w3.org/ns/csvw#column");
        graph.add_list_item(s.clone(), p.clone(), Term::blank("c1"), 1);
        graph.add_list_item(s.clone(), p.clone(), Term::blank("c0"), 0);
        graph.add_list_item(s, p, Term::blank("c1"), 1);
        graph.dedupe();

        let order: Vec<_> = graph.iter().filter_map(|t| t.list_index).collect();
        assert_eq!(order, vec![1, 0]);
        assert!(graph.iter().all(|t| t.is_list_element()));
    }
}
