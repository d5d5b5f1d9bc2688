use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonLdError {
    #[error("Invalid context: {message}")]
    InvalidContext { message: String },

    /// Only the bundled CSVW context can be referenced by IRI
    #[error("Remote context '{iri}' is not available offline")]
    RemoteContext { iri: String },

    #[error("Cyclic IRI mapping for term '{term}'")]
    CyclicIriMapping { term: String },

    #[error("Invalid JSON-LD structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JsonLdError>;
