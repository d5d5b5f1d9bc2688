//! Inspection error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving, classifying or extracting a document
#[derive(Debug, Error)]
pub enum InspectError {
    /// The raw content of a document could not be read
    #[error("Cannot read '{location}': {source}")]
    UnreadableDocument {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A document was read but is not valid JSON-LD or Turtle
    #[error("Cannot parse '{location}': {message}")]
    Parse { location: String, message: String },

    /// The primary document is neither a dataset nor a concept list
    #[error("'{location}' is neither a qb:DataSet nor a skos:ConceptScheme")]
    Unrecognized { location: String },

    /// Measures of one table are bound in both pivoted and standard layout
    #[error("Table '{table}' mixes pivoted and standard measure bindings")]
    ShapeConflict { table: String },

    /// A qb:component has no dimension, attribute or measure
    #[error("Component '{component}' of '{dataset}' has no qb:dimension, qb:attribute or qb:measure")]
    MalformedComponent { component: String, dataset: String },

    #[error("Concept '{notation}' names unknown parent '{parent}'")]
    UnknownParent { notation: String, parent: String },

    #[error("Notation '{notation}' appears more than once")]
    DuplicateNotation { notation: String },

    /// `row` counts data rows from 1, not counting the header
    #[error("Row {row} of '{table}' has no notation")]
    EmptyNotation { table: String, row: usize },

    #[error("Column '{column}' not found in '{table}'")]
    MissingColumn { column: String, table: String },

    /// Required metadata could not be located in the graph
    #[error("Missing {what} for '{subject}'")]
    MissingMetadata { what: String, subject: String },

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("CSV error in '{location}': {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    /// Transport failure from a remote document source
    #[error("Cannot fetch '{location}': {message}")]
    Fetch { location: String, message: String },
}

/// Result type for inspection operations
pub type InspectResult<T> = Result<T, InspectError>;

impl InspectError {
    pub fn parse(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error came from reading or transferring raw content
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::UnreadableDocument { .. } | Self::Fetch { .. })
    }
}
