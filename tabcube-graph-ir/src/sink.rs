//! GraphSink trait for event-driven graph construction
//!
//! Parsers intern terms through the sink and then emit triples by [`TermId`],
//! so a parser never needs to know what the sink builds.

use crate::{Datatype, Graph, LiteralValue, Term, Triple};
use std::collections::HashMap;

/// Opaque term handle, valid only within one sink session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TermId(u32);

impl TermId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Event interface for RDF graph construction
///
/// # Example
///
/// ```
/// use tabcube_graph_ir::{Datatype, GraphCollectorSink, GraphSink};
///
/// let mut sink = GraphCollectorSink::new();
/// let table = sink.term_iri("file:///data/obs.csv-metadata.json");
/// let title = sink.term_iri("http://www.w3.org/ns/csvw#title");
/// let value = sink.term_literal("Observations", Datatype::xsd_string(), None);
/// sink.emit_triple(table, title, value);
///
/// assert_eq!(sink.finish().len(), 1);
/// ```
pub trait GraphSink {
    /// A base IRI was declared (`@base` in Turtle or JSON-LD)
    fn on_base(&mut self, base_iri: &str);

    /// A prefix was declared
    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str);

    /// Intern an expanded IRI
    fn term_iri(&mut self, iri: &str) -> TermId;

    /// Intern a blank node
    ///
    /// The same label always yields the same node within one session; `None`
    /// yields a fresh node.
    fn term_blank(&mut self, label: Option<&str>) -> TermId;

    /// Intern a literal from its lexical form
    fn term_literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId;

    /// Intern a literal from a native value
    fn term_literal_value(&mut self, value: LiteralValue, datatype: Datatype) -> TermId;

    fn emit_triple(&mut self, subject: TermId, predicate: TermId, object: TermId);

    /// Emit the `index`-th member of an ordered list held by `(subject, predicate)`
    ///
    /// Sinks without list support may ignore the index.
    fn emit_list_item(&mut self, subject: TermId, predicate: TermId, object: TermId, index: i32) {
        let _ = index;
        self.emit_triple(subject, predicate, object);
    }
}

/// A sink that collects triples into a [`Graph`]
#[derive(Debug, Default)]
pub struct GraphCollectorSink {
    graph: Graph,
    terms: Vec<Term>,
    blank_prefix: String,
    blank_counter: u32,
    blank_labels: HashMap<String, TermId>,
}

impl GraphCollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            graph: Graph::with_base(base),
            ..Default::default()
        }
    }

    /// Prefix every blank node label this sink produces
    ///
    /// Used when several documents are parsed separately and then appended
    /// into one graph: distinct prefixes keep their blank nodes apart.
    pub fn with_blank_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_prefix = prefix.into();
        self
    }

    /// Consume the sink and return the graph
    pub fn finish(self) -> Graph {
        self.graph
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn term(&self, id: TermId) -> Term {
        self.terms[id.0 as usize].clone()
    }

    fn intern(&mut self, term: Term) -> TermId {
        let id = TermId(self.terms.len() as u32);
        self.terms.push(term);
        id
    }
}

impl GraphSink for GraphCollectorSink {
    fn on_base(&mut self, base_iri: &str) {
        self.graph.set_base(base_iri);
    }

    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str) {
        self.graph.add_prefix(prefix, namespace_iri);
    }

    fn term_iri(&mut self, iri: &str) -> TermId {
        self.intern(Term::iri(iri))
    }

    fn term_blank(&mut self, label: Option<&str>) -> TermId {
        match label {
            Some(label) => {
                if let Some(&id) = self.blank_labels.get(label) {
                    return id;
                }
                let id = self.intern(Term::blank(format!("{}{}", self.blank_prefix, label)));
                self.blank_labels.insert(label.to_string(), id);
                id
            }
            None => {
                self.blank_counter += 1;
                // Anonymous labels use a character Turtle and JSON-LD labels
                // cannot contain, so they never clash with a named label.
                let label = format!("{}.b{}", self.blank_prefix, self.blank_counter);
                self.intern(Term::blank(label))
            }
        }
    }

    fn term_literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId {
        let term = match language {
            Some(lang) => Term::lang_string(value, lang),
            None => Term::typed(value, datatype),
        };
        self.intern(term)
    }

    fn term_literal_value(&mut self, value: LiteralValue, datatype: Datatype) -> TermId {
        self.intern(Term::Literal {
            value,
            datatype,
            language: None,
        })
    }

    fn emit_triple(&mut self, subject: TermId, predicate: TermId, object: TermId) {
        let triple = Triple::new(self.term(subject), self.term(predicate), self.term(object));
        self.graph.add(triple);
    }

    fn emit_list_item(&mut self, subject: TermId, predicate: TermId, object: TermId, index: i32) {
        let triple = Triple::with_list_index(
            self.term(subject),
            self.term(predicate),
            self.term(object),
            index,
        );
        self.graph.add(triple);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_triples() {
        let mut sink = GraphCollectorSink::new();
        let s = sink.term_iri("http://example.org/dataset");
        let p = sink.term_iri("http://purl.org/dc/terms/title");
        let o = sink.term_literal("Trade", Datatype::xsd_string(), None);
        sink.emit_triple(s, p, o);

        let graph = sink.finish();
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.s.as_iri(), Some("http://example.org/dataset"));
        assert_eq!(triple.o, Term::string("Trade"));
    }

    #[test]
    fn blank_labels_are_stable() {
        let mut sink = GraphCollectorSink::new();
        let a = sink.term_blank(Some("col"));
        let b = sink.term_blank(Some("col"));
        let c = sink.term_blank(Some("other"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(sink.term_blank(None), sink.term_blank(None));
    }

    #[test]
    fn blank_prefix_applies_to_all_labels() {
        let mut sink = GraphCollectorSink::new().with_blank_prefix("schema1");
        let named = sink.term_blank(Some("x"));
        let anon = sink.term_blank(None);
        let p = sink.term_iri("http://example.org/p");
        sink.emit_triple(named, p, anon);

        let graph = sink.finish();
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.s, Term::blank("schema1x"));
        assert_eq!(triple.o, Term::blank("schema1.b1"));
    }

    #[test]
    fn language_literals() {
        let mut sink = GraphCollectorSink::new();
        let s = sink.term_iri("http://example.org/c");
        let p = sink.term_iri("http://www.w3.org/2000/01/rdf-schema#label");
        let o = sink.term_literal("Region", Datatype::rdf_lang_string(), Some("en"));
        sink.emit_triple(s, p, o);

        let graph = sink.finish();
        let (_, datatype, lang) = graph.iter().next().unwrap().o.as_literal().unwrap();
        assert!(datatype.is_lang_string());
        assert_eq!(lang, Some("en"));
    }

    #[test]
    fn list_items_keep_index() {
        let mut sink = GraphCollectorSink::new();
        let s = sink.term_blank(None);
        let p = sink.term_iri("http://www.w3.org/ns/csvw#column");
        let second = sink.term_blank(None);
        let first = sink.term_blank(None);
        sink.emit_list_item(s, p, second, 1);
        sink.emit_list_item(s, p, first, 0);

        let graph = sink.finish();
        let indices: Vec<_> = graph.iter().map(|t| t.list_index).collect();
        assert_eq!(indices, vec![Some(1), Some(0)]);
    }
}
