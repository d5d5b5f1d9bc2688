//! Component extraction
//!
//! Fixed pattern queries that turn a resolved graph store into typed
//! records: catalogue metadata, the CSV tables a document describes, and the
//! structural components of each table.

mod catalogue;
mod components;
mod table;
pub mod template;

pub use catalogue::{extract_catalogue, primary_catalogue, CatalogueMetadata};
pub use components::{extract_components, render_property, ComponentRole, StructuralComponent};
pub(crate) use components::{is_observation_column, structure_measures};
pub use table::{concept_columns, extract_tables, table_columns, Column, ConceptColumns, TableIdentifier};
