//! CSV tables and their columns

use super::template;
use crate::error::{InspectError, InspectResult};
use crate::resolver::ResolvedDocument;
use crate::store::{GraphStore, Pattern, Scope};
use serde::Serialize;
use tabcube_graph_ir::Term;
use tabcube_vocab::{csvw, qb, rdfs, skos};

/// A CSV table and the cube definition that governs it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableIdentifier {
    /// Resolved `csvw:url`
    pub url: String,
    #[serde(skip)]
    pub node: Term,
    /// The `qb:DataSet` the table's observations belong to
    pub dataset: Option<String>,
    /// The dataset's `qb:structure`
    pub structure: Option<String>,
}

/// One `csvw:column` of a table schema, with its templates expanded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    pub name: Option<String>,
    pub title: Option<String>,
    pub property_url: Option<String>,
    pub value_url: Option<String>,
    pub datatype: Option<String>,
    pub required: bool,
    pub is_virtual: bool,
    pub suppressed: bool,
}

impl Column {
    /// CSV header for this column: its first title, else its name
    pub fn header(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }

    /// `propertyUrl` contains a substitution variable
    pub fn has_templated_property(&self) -> bool {
        self.property_url.as_deref().is_some_and(template::is_template)
    }

    /// `propertyUrl` is exactly `property`, with no substitution
    pub fn binds(&self, property: &str) -> bool {
        self.property_url.as_deref() == Some(property)
    }
}

fn flag(store: &GraphStore, node: &Term, predicate: &str) -> bool {
    store
        .objects(Scope::Union, node, predicate)
        .into_iter()
        .find_map(Term::as_bool)
        .unwrap_or(false)
}

/// Columns of `table`, in declaration order
pub fn table_columns(store: &GraphStore, doc: &ResolvedDocument, table: &Term) -> Vec<Column> {
    let Some(schema) = store.objects(Scope::Union, table, csvw::TABLE_SCHEMA).into_iter().next() else {
        return Vec::new();
    };
    let expand = |t: String| template::expand(&t, &doc.location);

    store
        .list_items(Scope::Union, schema, csvw::COLUMN)
        .into_iter()
        .map(|node| Column {
            name: store.value(Scope::Union, node, csvw::NAME),
            title: store.value(Scope::Union, node, csvw::TITLE),
            property_url: store.value(Scope::Union, node, csvw::PROPERTY_URL).map(expand),
            value_url: store.value(Scope::Union, node, csvw::VALUE_URL).map(expand),
            datatype: store.value(Scope::Union, node, csvw::DATATYPE),
            required: flag(store, node, csvw::REQUIRED),
            is_virtual: flag(store, node, csvw::VIRTUAL),
            suppressed: flag(store, node, csvw::SUPPRESS_OUTPUT),
        })
        .collect()
}

/// Every CSV table the primary document describes
///
/// A table's dataset is the `valueUrl` of its virtual `qb:dataSet` column;
/// without one, a primary graph declaring exactly one `qb:DataSet` lends it
/// to every table.
pub fn extract_tables(store: &GraphStore, doc: &ResolvedDocument) -> Vec<TableIdentifier> {
    let primary = Scope::Graph(doc.primary_graph());
    let sole_dataset = {
        let datasets = store.instances(primary, qb::DATA_SET);
        match datasets.as_slice() {
            [only] => only.triple.s.lexical(),
            _ => None,
        }
    };

    let tables: Vec<TableIdentifier> = store
        .matches(primary, Pattern::any().predicate(csvw::URL))
        .into_iter()
        .filter_map(|quad| {
            let url = quad.triple.o.lexical()?;
            let node = quad.triple.s.clone();
            let dataset = table_columns(store, doc, &node)
                .into_iter()
                .find(|c| c.is_virtual && c.binds(qb::DATA_SET_PROP))
                .and_then(|c| c.value_url)
                .or_else(|| sole_dataset.clone());
            let structure = dataset.as_ref().and_then(|ds| {
                store.value(Scope::Union, &Term::iri(ds), qb::STRUCTURE)
            });
            Some(TableIdentifier {
                url,
                node,
                dataset,
                structure,
            })
        })
        .collect();
    tracing::debug!(graph = %doc.location, tables = tables.len(), "extracted tables");
    tables
}

/// CSV headers of a concept list's label, notation and parent columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptColumns {
    pub label: String,
    pub notation: String,
    pub parent: String,
}

/// Locate the concept-list columns of `table` by the property they bind
pub fn concept_columns(
    store: &GraphStore,
    doc: &ResolvedDocument,
    table: &TableIdentifier,
) -> InspectResult<ConceptColumns> {
    let columns = table_columns(store, doc, &table.node);
    let header_for = |property: &str| {
        columns
            .iter()
            .find(|c| c.binds(property))
            .and_then(Column::header)
            .map(str::to_string)
            .ok_or_else(|| InspectError::MissingColumn {
                column: property.to_string(),
                table: table.url.clone(),
            })
    };
    Ok(ConceptColumns {
        label: header_for(rdfs::LABEL)?,
        notation: header_for(skos::NOTATION)?,
        parent: header_for(skos::BROADER)?,
    })
}
