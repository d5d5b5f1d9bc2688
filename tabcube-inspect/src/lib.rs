//! Inspection of CSVW tabular data packages
//!
//! A package is a CSVW metadata document whose embedded nodes use the RDF
//! Data Cube, SKOS, DCAT and VoID vocabularies. Inspection runs in stages:
//!
//! 1. **Resolve** ([`Resolver`]) the primary document, its external table
//!    schemas and its `void:Dataset` dependencies into a [`GraphStore`],
//!    one named graph per document.
//! 2. **Classify** ([`classify`]) the primary graph as a structured dataset,
//!    a concept list, or neither.
//! 3. **Extract** typed records: catalogue metadata, structural components
//!    and cube shape for datasets; the concept hierarchy for concept lists.
//!
//! Downstream code only sees the typed results in [`InspectedDocument`].
//!
//! # Example
//!
//! ```no_run
//! use tabcube_inspect::{inspect, FileSource, InspectedDocument};
//!
//! let doc = inspect(FileSource::new(), "out/trade.csv-metadata.json")?;
//! if let InspectedDocument::Dataset(dataset) = &doc {
//!     for table in &dataset.tables {
//!         println!("{}: {:?}", table.table.url, table.shape);
//!     }
//! }
//! # Ok::<(), tabcube_inspect::InspectError>(())
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod hierarchy;
pub mod location;
pub mod query;
pub mod resolver;
pub mod shape;
pub mod source;
pub mod store;
pub mod tabular;

pub use classify::{classify, Classification};
pub use config::InspectConfig;
pub use error::{InspectError, InspectResult};
pub use extract::{
    concept_columns, extract_catalogue, extract_components, extract_tables, primary_catalogue,
    CatalogueMetadata, ComponentRole, ConceptColumns, StructuralComponent, TableIdentifier,
};
pub use format::DocumentFormat;
pub use hierarchy::{build_hierarchy, ConceptNode, ConceptTree};
pub use resolver::{DependencyReference, DependencyRole, ResolvedDocument, Resolver};
pub use shape::{detect_shape, CubeShape};
pub use source::{source_from_config, DocumentSource, FallbackTable, FileSource};
pub use store::{GraphStore, Pattern, Quad, Scope};
pub use tabular::Table;

#[cfg(feature = "http")]
pub use source::HttpSource;

use serde::Serialize;

/// One CSV table of a dataset, with its components and shape
#[derive(Debug, Clone, Serialize)]
pub struct TableInspection {
    pub table: TableIdentifier,
    pub components: Vec<StructuralComponent>,
    pub shape: Option<CubeShape>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInspection {
    pub location: String,
    pub catalogue: CatalogueMetadata,
    pub dependencies: Vec<DependencyReference>,
    pub tables: Vec<TableInspection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConceptListInspection {
    pub location: String,
    pub catalogue: CatalogueMetadata,
    pub dependencies: Vec<DependencyReference>,
    pub table: TableIdentifier,
    pub columns: ConceptColumns,
    pub hierarchy: ConceptTree,
}

/// The typed result of inspecting a recognized document
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InspectedDocument {
    Dataset(DatasetInspection),
    ConceptList(ConceptListInspection),
}

impl InspectedDocument {
    pub fn classification(&self) -> Classification {
        match self {
            Self::Dataset(_) => Classification::StructuredDataset,
            Self::ConceptList(_) => Classification::ConceptList,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Dataset(d) => &d.location,
            Self::ConceptList(c) => &c.location,
        }
    }

    pub fn catalogue(&self) -> &CatalogueMetadata {
        match self {
            Self::Dataset(d) => &d.catalogue,
            Self::ConceptList(c) => &c.catalogue,
        }
    }
}

fn inspect_dataset(doc: ResolvedDocument) -> InspectResult<DatasetInspection> {
    let store = &doc.store;
    let catalogue = primary_catalogue(store, &doc)?;
    let mut tables = Vec::new();
    for table in extract_tables(store, &doc) {
        let components = extract_components(store, &doc, &table)?;
        let shape = detect_shape(store, &doc, &table)?;
        tables.push(TableInspection {
            table,
            components,
            shape,
        });
    }
    Ok(DatasetInspection {
        location: doc.location.clone(),
        catalogue,
        tables,
        dependencies: doc.dependencies,
    })
}

fn inspect_concept_list<S: DocumentSource + ?Sized>(
    source: &S,
    doc: ResolvedDocument,
) -> InspectResult<ConceptListInspection> {
    let store = &doc.store;
    let catalogue = primary_catalogue(store, &doc)?;
    let table = extract_tables(store, &doc)
        .into_iter()
        .next()
        .ok_or_else(|| InspectError::MissingMetadata {
            what: "csvw:Table".to_string(),
            subject: doc.location.clone(),
        })?;
    let columns = concept_columns(store, &doc, &table)?;
    let rows = Table::load(source, &table.url)?;
    let hierarchy = build_hierarchy(&rows, &columns.parent, &columns.label, &columns.notation)?;
    Ok(ConceptListInspection {
        location: doc.location.clone(),
        catalogue,
        dependencies: doc.dependencies,
        table,
        columns,
        hierarchy,
    })
}

/// Resolve, classify and extract the document at `location`
///
/// The classification picks exactly one extraction path. An unrecognized
/// document is an error.
pub fn inspect<S: DocumentSource>(source: S, location: &str) -> InspectResult<InspectedDocument> {
    let doc = Resolver::new(&source).resolve(location)?;
    let classification = classify(&doc.store, doc.primary_graph());
    tracing::info!(location = %doc.location, %classification, "inspecting document");

    match classification {
        Classification::StructuredDataset => inspect_dataset(doc).map(InspectedDocument::Dataset),
        Classification::ConceptList => {
            inspect_concept_list(&source, doc).map(InspectedDocument::ConceptList)
        }
        Classification::Unrecognized => Err(InspectError::Unrecognized {
            location: doc.location,
        }),
    }
}
