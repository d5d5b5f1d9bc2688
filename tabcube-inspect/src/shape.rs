//! Cube shape detection
//!
//! A **pivoted** table has one column per measure, each with that measure as
//! its fixed `propertyUrl`. A **standard** table has a single observation
//! column whose `propertyUrl` is a template over a measure-type column. One
//! table must use one layout for all of its measures.

use crate::error::{InspectError, InspectResult};
use crate::extract::{is_observation_column, structure_measures, table_columns, TableIdentifier};
use crate::resolver::ResolvedDocument;
use crate::store::GraphStore;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CubeShape {
    Pivoted,
    Standard,
}

impl fmt::Display for CubeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pivoted => "pivoted",
            Self::Standard => "standard",
        })
    }
}

/// Fold per-measure shapes into the table's shape
///
/// No shapes gives `None`; any disagreement is a conflict naming `table`.
pub fn reduce_shapes(
    table: &str,
    shapes: impl IntoIterator<Item = CubeShape>,
) -> InspectResult<Option<CubeShape>> {
    let mut shapes = shapes.into_iter();
    let Some(first) = shapes.next() else {
        return Ok(None);
    };
    if shapes.all(|s| s == first) {
        Ok(Some(first))
    } else {
        Err(InspectError::ShapeConflict {
            table: table.to_string(),
        })
    }
}

/// Shape of `table`, from how each of its measures is bound
pub fn detect_shape(
    store: &GraphStore,
    doc: &ResolvedDocument,
    table: &TableIdentifier,
) -> InspectResult<Option<CubeShape>> {
    let Some(structure) = table.structure.as_deref() else {
        return Ok(None);
    };
    let measures = structure_measures(store, structure);
    let columns = table_columns(store, doc, &table.node);
    let templated = columns
        .iter()
        .any(|c| is_observation_column(c, &measures) && c.has_templated_property());

    let mut shapes = Vec::with_capacity(measures.len());
    for measure in &measures {
        if columns
            .iter()
            .any(|c| c.binds(measure) && is_observation_column(c, &measures))
        {
            shapes.push(CubeShape::Pivoted);
        } else if templated {
            shapes.push(CubeShape::Standard);
        } else {
            tracing::warn!(table = %table.url, measure = %measure, "measure has no observation column");
        }
    }

    let shape = reduce_shapes(&table.url, shapes)?;
    tracing::debug!(table = %table.url, ?shape, "detected cube shape");
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_tables;
    use crate::format::DocumentFormat;
    use CubeShape::{Pivoted, Standard};

    const LOCATION: &str = "file:///data/trade.csv-metadata.json";

    fn shape_of(columns: &str) -> InspectResult<Option<CubeShape>> {
        let json = format!(
            r##"{{
              "@context": "http://www.w3.org/ns/csvw",
              "url": "trade.csv",
              "tableSchema": {{"columns": [
                {columns},
                {{"name": "virt", "virtual": true, "propertyUrl": "qb:dataSet", "valueUrl": "#dataset"}}
              ]}},
              "rdfs:seeAlso": [
                {{"@id": "#dataset", "@type": "qb:DataSet", "qb:structure": {{"@id": "#structure"}}}},
                {{"@id": "#structure", "qb:component": [
                  {{"qb:measure": {{"@id": "http://e/measure/exports"}}}}
                ]}}
              ]
            }}"##
        );
        let graph = DocumentFormat::JsonLd.parse(&json, LOCATION, "g0-").unwrap();
        let mut store = GraphStore::new();
        store.insert(LOCATION, graph);
        let doc = ResolvedDocument {
            location: LOCATION.to_string(),
            format: DocumentFormat::JsonLd,
            store,
            dependencies: Vec::new(),
        };
        let table = extract_tables(&doc.store, &doc).remove(0);
        detect_shape(&doc.store, &doc, &table)
    }

    #[test]
    fn typed_measure_column_is_pivoted() {
        let shape = shape_of(
            r#"{"name": "exports", "propertyUrl": "http://e/measure/exports", "datatype": "decimal"}"#,
        );
        assert_eq!(shape.unwrap(), Some(Pivoted));
    }

    #[test]
    fn untyped_measure_column_is_not_an_observation() {
        let shape = shape_of(r#"{"name": "exports", "propertyUrl": "http://e/measure/exports"}"#);
        assert_eq!(shape.unwrap(), None);
    }

    #[test]
    fn templated_observation_is_standard() {
        let shape = shape_of(
            r#"{"name": "value", "propertyUrl": "http://e/measure/{measure_type}", "datatype": "decimal"}"#,
        );
        assert_eq!(shape.unwrap(), Some(Standard));
    }

    #[test]
    fn all_or_nothing() {
        assert_eq!(reduce_shapes("obs.csv", []).unwrap(), None);
        assert_eq!(reduce_shapes("obs.csv", [Standard, Standard]).unwrap(), Some(Standard));
        assert_eq!(reduce_shapes("obs.csv", [Pivoted, Pivoted, Pivoted]).unwrap(), Some(Pivoted));

        let err = reduce_shapes("obs.csv", [Pivoted, Standard]).unwrap_err();
        assert!(matches!(err, InspectError::ShapeConflict { ref table } if table == "obs.csv"));
    }
}
