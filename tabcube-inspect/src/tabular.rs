//! CSV table loading
//!
//! Only what the hierarchy builder needs: headers and string cells. No
//! datatype conversion happens here.

use crate::error::{InspectError, InspectResult};
use crate::source::DocumentSource;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Where the table was read from, for error messages
    pub location: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a headered CSV table
    ///
    /// Rows may be ragged; missing trailing cells read as empty.
    pub fn from_reader<R: Read>(location: impl Into<String>, reader: R) -> InspectResult<Self> {
        let location = location.into();
        let csv_err = |source| InspectError::Csv {
            location: location.clone(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        tracing::debug!(location = %location, rows = rows.len(), "loaded table");
        Ok(Self {
            location,
            headers,
            rows,
        })
    }

    pub fn parse(location: impl Into<String>, text: &str) -> InspectResult<Self> {
        Self::from_reader(location, text.as_bytes())
    }

    /// Load the CSV at `location` through `source`
    pub fn load<S: DocumentSource + ?Sized>(source: &S, location: &str) -> InspectResult<Self> {
        let text = source.fetch(location)?;
        Self::parse(location, &text)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> InspectResult<usize> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| InspectError::MissingColumn {
                column: header.to_string(),
                table: self.location.clone(),
            })
    }

    /// Cell at `column` of `row`; empty if the row is short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headers_and_ragged_rows() {
        let table = Table::parse(
            "file:///codes.csv",
            "\u{feff}Label, Notation ,Parent Notation\nAll,all\nNorth,n,all\n",
        )
        .unwrap();
        assert_eq!(table.headers, vec!["Label", "Notation", "Parent Notation"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(1, 2), "all");
        assert_eq!(table.column_index("Notation").unwrap(), 1);
    }

    #[test]
    fn missing_columns_name_the_table() {
        let table = Table::parse("file:///codes.csv", "Label\nAll\n").unwrap();
        let err = table.column_index("Notation").unwrap_err();
        assert!(matches!(
            err,
            InspectError::MissingColumn { ref column, ref table } if column == "Notation" && table == "file:///codes.csv"
        ));
    }
}
