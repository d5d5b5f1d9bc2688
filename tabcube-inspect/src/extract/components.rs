//! Structural components of a cube table

use super::table::{table_columns, Column, TableIdentifier};
use crate::error::{InspectError, InspectResult};
use crate::location::relative_reference;
use crate::resolver::ResolvedDocument;
use crate::store::{GraphStore, Scope};
use serde::Serialize;
use std::fmt;
use tabcube_graph_ir::Term;
use tabcube_vocab::{qb, rdfs, sdmx_attribute};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentRole {
    Dimension,
    Attribute,
    Measure,
    Unit,
    Observation,
    Suppressed,
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dimension => "Dimension",
            Self::Attribute => "Attribute",
            Self::Measure => "Measure",
            Self::Unit => "Unit",
            Self::Observation => "Observations",
            Self::Suppressed => "Suppressed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralComponent {
    /// The component property; local files relative to the inspected document
    pub property: String,
    pub label: Option<String>,
    /// CSV column bound to the property, if any
    pub column_title: Option<String>,
    pub role: ComponentRole,
    pub required: bool,
}

/// Render `property` for display next to `document`
///
/// `file:` properties become relative references; anything else is kept.
pub fn render_property(document: &str, property: &str) -> String {
    if tabcube_graph_ir::iri::scheme_of(property) == Some("file") {
        relative_reference(document, property)
    } else {
        property.to_string()
    }
}

/// Role and property of one `qb:ComponentSpecification`
fn component_role(store: &GraphStore, component: &Term) -> Option<(ComponentRole, String)> {
    let first = |predicate| {
        store
            .objects(Scope::Union, component, predicate)
            .into_iter()
            .find_map(Term::lexical)
    };
    if let Some(dimension) = first(qb::DIMENSION) {
        let role = if dimension == qb::MEASURE_TYPE {
            ComponentRole::Measure
        } else {
            ComponentRole::Dimension
        };
        return Some((role, dimension));
    }
    if let Some(attribute) = first(qb::ATTRIBUTE) {
        let role = if attribute == sdmx_attribute::UNIT_MEASURE {
            ComponentRole::Unit
        } else {
            ComponentRole::Attribute
        };
        return Some((role, attribute));
    }
    first(qb::MEASURE).map(|measure| (ComponentRole::Measure, measure))
}

/// Measure properties declared by `structure` (`qb:measure`)
pub(crate) fn structure_measures(store: &GraphStore, structure: &str) -> Vec<String> {
    let structure = Term::iri(structure);
    store
        .objects(Scope::Union, &structure, qb::COMPONENT)
        .into_iter()
        .flat_map(|c| store.objects(Scope::Union, c, qb::MEASURE))
        .filter_map(Term::lexical)
        .collect()
}

/// A column that carries observation values
///
/// Not virtual, typed, and bound to a measure or to a template.
pub(crate) fn is_observation_column(column: &Column, measures: &[String]) -> bool {
    !column.is_virtual
        && column.datatype.is_some()
        && (column.has_templated_property()
            || measures.iter().any(|m| column.binds(m)))
}

/// The structural components of `table`
///
/// Components of the table's data structure definition come first, in
/// declaration order, followed by observation and suppressed columns in
/// column order.
pub fn extract_components(
    store: &GraphStore,
    doc: &ResolvedDocument,
    table: &TableIdentifier,
) -> InspectResult<Vec<StructuralComponent>> {
    let dataset = table.dataset.as_deref().ok_or_else(|| InspectError::MissingMetadata {
        what: "qb:DataSet".to_string(),
        subject: table.url.clone(),
    })?;
    let structure = table.structure.as_deref().ok_or_else(|| InspectError::MissingMetadata {
        what: "qb:structure".to_string(),
        subject: dataset.to_string(),
    })?;

    let columns = table_columns(store, doc, &table.node);
    let column_for = |property: &str| columns.iter().find(|c| c.binds(property));
    let label_of = |node: &Term| store.value(Scope::Union, node, rdfs::LABEL);

    let mut components = Vec::new();
    let structure_node = Term::iri(structure);
    for component in store.objects(Scope::Union, &structure_node, qb::COMPONENT) {
        let (role, property) =
            component_role(store, component).ok_or_else(|| InspectError::MalformedComponent {
                component: component.lexical().unwrap_or_else(|| component.to_string()),
                dataset: dataset.to_string(),
            })?;
        let column = column_for(&property);
        let required = store
            .objects(Scope::Union, component, qb::COMPONENT_REQUIRED)
            .into_iter()
            .find_map(Term::as_bool)
            .or(column.map(|c| c.required))
            .unwrap_or(false);

        components.push(StructuralComponent {
            label: label_of(component).or_else(|| label_of(&Term::iri(&property))),
            column_title: column.and_then(Column::header).map(str::to_string),
            property: render_property(&doc.location, &property),
            role,
            required,
        });
    }

    let measures = structure_measures(store, structure);
    for column in &columns {
        let role = if column.suppressed {
            ComponentRole::Suppressed
        } else if is_observation_column(column, &measures) {
            ComponentRole::Observation
        } else {
            continue;
        };
        let property = column
            .property_url
            .clone()
            .or_else(|| column.name.clone())
            .unwrap_or_default();
        components.push(StructuralComponent {
            label: None,
            column_title: column.header().map(str::to_string),
            property: render_property(&doc.location, &property),
            role,
            required: column.required,
        });
    }

    tracing::debug!(table = %table.url, components = components.len(), "extracted components");
    Ok(components)
}
