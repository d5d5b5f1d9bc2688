//! Turtle parser for catalogue and code-list documents
//!
//! Emits to any `tabcube_graph_ir::GraphSink`. Relative IRIs are resolved
//! against the document location passed to [`parse`], so a parsed graph only
//! ever holds absolute IRIs.
//!
//! # Example
//!
//! ```
//! use tabcube_graph_ir::GraphCollectorSink;
//! use tabcube_graph_turtle::parse;
//!
//! let turtle = r#"
//!     @prefix dcterms: <http://purl.org/dc/terms/> .
//!     <#dataset> dcterms:title "Population estimates" .
//! "#;
//!
//! let mut sink = GraphCollectorSink::new();
//! parse(turtle, Some("file:///data/catalogue.ttl"), &mut sink).unwrap();
//! let graph = sink.finish();
//!
//! let triple = graph.iter().next().unwrap();
//! assert_eq!(triple.s.as_iri(), Some("file:///data/catalogue.ttl#dataset"));
//! ```

pub mod error;
pub mod lex;
mod parser;

pub use error::{Result, TurtleError};
pub use lex::{tokenize, Token, TokenKind};
pub use parser::parse;
