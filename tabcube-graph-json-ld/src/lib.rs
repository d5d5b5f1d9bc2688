//! JSON-LD to RDF conversion for tabular metadata
//!
//! This library provides:
//! - Context processing, with the CSVW context bundled for offline use
//! - IRI expansion against the active context and base IRI
//! - A [`GraphSink`] adapter that turns a compacted document into triples
//!
//! # Example
//!
//! ```
//! use tabcube_graph_ir::GraphCollectorSink;
//! use tabcube_graph_json_ld::{parse_str, ParseOptions};
//!
//! let mut sink = GraphCollectorSink::new();
//! parse_str(
//!     r#"{
//!         "@context": "http://www.w3.org/ns/csvw",
//!         "url": "observations.csv",
//!         "dc:title": "Observations"
//!     }"#,
//!     &ParseOptions {
//!         base: Some("file:///data/observations.csv-metadata.json".to_string()),
//!         ..Default::default()
//!     },
//!     &mut sink,
//! )
//! .unwrap();
//!
//! assert_eq!(sink.finish().len(), 2);
//! ```

pub mod adapter;
pub mod context;
pub mod error;

pub use adapter::ParseOptions;
pub use context::{Container, Context, TermDefinition, TypeMapping, CSVW_CONTEXT_JSON};
pub use error::{JsonLdError, Result};

use serde_json::Value as JsonValue;
use tabcube_graph_ir::GraphSink;

/// Convert a parsed JSON document to sink events
pub fn parse<S: GraphSink>(doc: &JsonValue, options: &ParseOptions, sink: &mut S) -> Result<()> {
    adapter::to_graph_events(doc, options, sink)
}

/// Parse JSON text and convert it to sink events
pub fn parse_str<S: GraphSink>(input: &str, options: &ParseOptions, sink: &mut S) -> Result<()> {
    let doc: JsonValue = serde_json::from_str(input)?;
    parse(&doc, options, sink)
}
