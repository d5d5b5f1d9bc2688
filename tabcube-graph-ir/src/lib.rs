//! Format-agnostic RDF graph intermediate representation
//!
//! Parsers (JSON-LD, Turtle) emit into a [`GraphSink`]; the inspection core
//! reads the resulting [`Graph`]s. The representation is deliberately small:
//!
//! 1. **Expanded IRIs only** - prefixes are resolved by the parser, never
//!    stored on terms.
//! 2. **Explicit datatypes** - every literal carries one; plain strings are
//!    `xsd:string`, language-tagged strings are `rdf:langString`.
//! 3. **Bag semantics** - a `Graph` keeps duplicates until `dedupe()` is
//!    called.
//!
//! # Example
//!
//! ```
//! use tabcube_graph_ir::{Graph, Term};
//!
//! let mut graph = Graph::new();
//! graph.add_triple(
//!     Term::iri("http://example.org/dataset"),
//!     Term::iri("http://purl.org/dc/terms/title"),
//!     Term::string("Population by region"),
//! );
//! assert_eq!(graph.len(), 1);
//! ```

pub mod datatype;
mod graph;
pub mod iri;
mod sink;
mod term;
mod triple;

pub use datatype::Datatype;
pub use graph::Graph;
pub use sink::{GraphCollectorSink, GraphSink, TermId};
pub use term::{BlankId, LiteralValue, Term};
pub use triple::Triple;
