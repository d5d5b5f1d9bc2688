//! Named-graph store
//!
//! One [`Graph`] per loaded document, keyed by canonical location, with a
//! per-graph subject index. Only the resolver writes; everything else gets a
//! shared reference.
//!
//! Blank node labels are unique across the whole store: the resolver gives
//! every parsed document its own blank prefix, so a blank node found in the
//! union can be followed without tracking which graph it came from.

use std::collections::HashMap;
use tabcube_graph_ir::{Graph, Term, Triple};
use tabcube_vocab::rdf;

/// Which graphs a query runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    Union,
    Graph(&'a str),
}

impl Scope<'_> {
    pub fn includes(&self, graph: &str) -> bool {
        match self {
            Scope::Union => true,
            Scope::Graph(name) => *name == graph,
        }
    }
}

/// A triple and the named graph it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad<'a> {
    pub graph: &'a str,
    pub triple: &'a Triple,
}

/// A triple pattern; `None` positions match anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Pattern<'a> {
    pub subject: Option<&'a Term>,
    pub predicate: Option<&'a str>,
    pub object: Option<&'a Term>,
}

impl<'a> Pattern<'a> {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: &'a Term) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn predicate(mut self, predicate: &'a str) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn object(mut self, object: &'a Term) -> Self {
        self.object = Some(object);
        self
    }

    fn accepts(&self, triple: &Triple) -> bool {
        self.subject.map_or(true, |s| &triple.s == s)
            && self.predicate.map_or(true, |p| triple.p.as_iri() == Some(p))
            && self.object.map_or(true, |o| &triple.o == o)
    }
}

#[derive(Debug)]
struct NamedGraph {
    name: String,
    graph: Graph,
    by_subject: HashMap<Term, Vec<usize>>,
}

impl NamedGraph {
    fn new(name: String, graph: Graph) -> Self {
        let mut named = Self {
            name,
            graph,
            by_subject: HashMap::new(),
        };
        named.reindex();
        named
    }

    fn reindex(&mut self) {
        self.by_subject.clear();
        for (i, triple) in self.graph.iter().enumerate() {
            self.by_subject.entry(triple.s.clone()).or_default().push(i);
        }
    }
}

#[derive(Debug, Default)]
pub struct GraphStore {
    graphs: Vec<NamedGraph>,
    index: HashMap<String, usize>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named graph, merging into it if the name already exists
    pub(crate) fn insert(&mut self, name: &str, mut graph: Graph) {
        graph.dedupe();
        match self.index.get(name) {
            Some(&i) => {
                let named = &mut self.graphs[i];
                named.graph.append(graph);
                named.graph.dedupe();
                named.reindex();
            }
            None => {
                tracing::debug!(graph = %name, triples = graph.len(), "added named graph");
                self.index.insert(name.to_string(), self.graphs.len());
                self.graphs.push(NamedGraph::new(name.to_string(), graph));
            }
        }
    }

    /// Whether a graph with this name exists and holds at least one triple
    pub fn has_content(&self, name: &str) -> bool {
        self.graph(name).is_some_and(|g| !g.is_empty())
    }

    /// Graph names in load order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.graphs.iter().map(|g| g.name.as_str())
    }

    pub fn graph(&self, name: &str) -> Option<&Graph> {
        self.index.get(name).map(|&i| &self.graphs[i].graph)
    }

    /// Number of named graphs
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Total triples across all graphs
    pub fn triple_count(&self) -> usize {
        self.graphs.iter().map(|g| g.graph.len()).sum()
    }

    fn scoped(&self, scope: Scope<'_>) -> Vec<&NamedGraph> {
        self.graphs.iter().filter(|g| scope.includes(&g.name)).collect()
    }

    /// All quads matching `pattern`, in graph load order then triple order
    pub fn matches<'s>(&'s self, scope: Scope<'_>, pattern: Pattern<'_>) -> Vec<Quad<'s>> {
        let mut out = Vec::new();
        for named in self.scoped(scope) {
            let triples = named.graph.triples();
            match pattern.subject {
                Some(s) => {
                    for &i in named.by_subject.get(s).into_iter().flatten() {
                        if pattern.accepts(&triples[i]) {
                            out.push(Quad {
                                graph: &named.name,
                                triple: &triples[i],
                            });
                        }
                    }
                }
                None => out.extend(triples.iter().filter(|t| pattern.accepts(t)).map(|triple| Quad {
                    graph: &named.name,
                    triple,
                })),
            }
        }
        out
    }

    pub fn ask(&self, scope: Scope<'_>, pattern: Pattern<'_>) -> bool {
        self.scoped(scope).into_iter().any(|named| match pattern.subject {
            Some(s) => named
                .by_subject
                .get(s)
                .is_some_and(|ids| ids.iter().any(|&i| pattern.accepts(&named.graph.triples()[i]))),
            None => named.graph.iter().any(|t| pattern.accepts(t)),
        })
    }

    pub fn objects<'s>(&'s self, scope: Scope<'_>, subject: &Term, predicate: &str) -> Vec<&'s Term> {
        self.matches(scope, Pattern::any().subject(subject).predicate(predicate))
            .into_iter()
            .map(|q| &q.triple.o)
            .collect()
    }

    pub fn subjects<'s>(&'s self, scope: Scope<'_>, predicate: &str, object: &Term) -> Vec<&'s Term> {
        self.matches(scope, Pattern::any().predicate(predicate).object(object))
            .into_iter()
            .map(|q| &q.triple.s)
            .collect()
    }

    /// Subjects typed `class`, each with the graph it was declared in
    pub fn instances<'s>(&'s self, scope: Scope<'_>, class: &str) -> Vec<Quad<'s>> {
        let class = Term::iri(class);
        self.matches(scope, Pattern::any().predicate(rdf::TYPE).object(&class))
    }

    pub fn has_type(&self, scope: Scope<'_>, subject: &Term, class: &str) -> bool {
        let class = Term::iri(class);
        self.ask(
            scope,
            Pattern::any().subject(subject).predicate(rdf::TYPE).object(&class),
        )
    }

    /// First object of `(subject, predicate)`, as its lexical form
    pub fn value(&self, scope: Scope<'_>, subject: &Term, predicate: &str) -> Option<String> {
        self.objects(scope, subject, predicate)
            .into_iter()
            .find_map(Term::lexical)
    }

    /// Whether anything is said about `subject`
    pub fn describes(&self, scope: Scope<'_>, subject: &Term) -> bool {
        self.ask(scope, Pattern::any().subject(subject))
    }

    /// Members of the ordered list held by `(subject, predicate)`
    ///
    /// Handles both indexed JSON-LD list items and `rdf:first`/`rdf:rest`
    /// collections; any other objects come back in triple order.
    pub fn list_items<'s>(&'s self, scope: Scope<'_>, subject: &Term, predicate: &str) -> Vec<&'s Term> {
        let quads = self.matches(scope, Pattern::any().subject(subject).predicate(predicate));

        if quads.iter().any(|q| q.triple.is_list_element()) {
            let mut indexed: Vec<_> = quads
                .iter()
                .map(|q| (q.triple.list_index.unwrap_or(i32::MAX), &q.triple.o))
                .collect();
            indexed.sort_by_key(|(i, _)| *i);
            return indexed.into_iter().map(|(_, o)| o).collect();
        }

        let mut items = Vec::new();
        for quad in quads {
            let head = &quad.triple.o;
            if head.as_iri() == Some(rdf::NIL) {
                continue;
            }
            if self.objects(scope, head, rdf::FIRST).is_empty() {
                items.push(head);
            } else {
                self.walk_collection(scope, head, &mut items);
            }
        }
        items
    }

    fn walk_collection<'s>(&'s self, scope: Scope<'_>, head: &Term, items: &mut Vec<&'s Term>) {
        let mut cell = head.clone();
        let mut seen = std::collections::HashSet::new();
        while cell.as_iri() != Some(rdf::NIL) && seen.insert(cell.clone()) {
            items.extend(self.objects(scope, &cell, rdf::FIRST));
            match self.objects(scope, &cell, rdf::REST).first() {
                Some(&next) => cell = next.clone(),
                None => break,
            }
        }
    }
}
