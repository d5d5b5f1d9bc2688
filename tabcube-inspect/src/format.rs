//! Document serialization formats
//!
//! A dependency's format comes from, in order: an explicit declaration
//! (`void:feature` format IRI or `dcterms:format` media type), the file
//! extension, then the format of the document that referenced it.

use crate::error::{InspectError, InspectResult};
use serde::Serialize;
use std::fmt;
use tabcube_graph_ir::{iri, Graph, GraphCollectorSink};
use tabcube_graph_json_ld::{Context, ParseOptions};
use tabcube_vocab::formats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    JsonLd,
    Turtle,
}

impl DocumentFormat {
    /// `http://www.w3.org/ns/formats/...` IRI
    pub fn from_feature_iri(feature: &str) -> Option<Self> {
        match feature {
            formats::JSON_LD => Some(Self::JsonLd),
            formats::TURTLE => Some(Self::Turtle),
            _ => None,
        }
    }

    /// Media type, ignoring parameters such as `charset`
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/ld+json" | "application/json" | "application/csvm+json" => {
                Some(Self::JsonLd)
            }
            "text/turtle" | "application/x-turtle" => Some(Self::Turtle),
            _ => None,
        }
    }

    /// From the last path segment of a location
    pub fn from_extension(location: &str) -> Option<Self> {
        let path = iri::IriParts::parse(location).path;
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "json" | "jsonld" => Some(Self::JsonLd),
            "ttl" => Some(Self::Turtle),
            _ => None,
        }
    }

    /// Guess from content when nothing else says
    pub fn sniff(text: &str) -> Self {
        match text.trim_start().chars().next() {
            Some('{') | Some('[') => Self::JsonLd,
            _ => Self::Turtle,
        }
    }

    /// Parse `text` into a graph, using `location` as the base IRI
    ///
    /// Blank node labels get `blank_prefix` so that graphs from different
    /// documents never share a blank node.
    pub fn parse(self, text: &str, location: &str, blank_prefix: &str) -> InspectResult<Graph> {
        let mut sink = GraphCollectorSink::with_base(location).with_blank_prefix(blank_prefix);
        match self {
            Self::JsonLd => {
                let options = ParseOptions {
                    base: Some(location.to_string()),
                    ..Default::default()
                };
                tabcube_graph_json_ld::parse_str(text, &options, &mut sink)
                    .map_err(|e| InspectError::parse(location, e))?;
            }
            Self::Turtle => {
                tabcube_graph_turtle::parse(text, Some(location), &mut sink)
                    .map_err(|e| InspectError::parse(location, e))?;
            }
        }
        Ok(sink.finish())
    }
}

/// Parse an external CSVW table schema
///
/// Schema files usually carry no `@context`, so the CSVW context applies by
/// default, and their top-level node takes the identity `schema` that the
/// referencing table used.
pub fn parse_table_schema(text: &str, schema: &str, blank_prefix: &str) -> InspectResult<Graph> {
    let location = iri::strip_fragment(schema);
    let context = Context::csvw().map_err(|e| InspectError::parse(location, e))?;
    let options = ParseOptions {
        base: Some(location.to_string()),
        default_context: Some(context),
        root_id: Some(schema.to_string()),
    };
    let mut sink = GraphCollectorSink::with_base(location).with_blank_prefix(blank_prefix);
    tabcube_graph_json_ld::parse_str(text, &options, &mut sink)
        .map_err(|e| InspectError::parse(location, e))?;
    Ok(sink.finish())
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonLd => f.write_str("JSON-LD"),
            Self::Turtle => f.write_str("Turtle"),
        }
    }
}
