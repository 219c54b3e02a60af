//! Untyped rows and tables as read from a CSV log.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::records::RecordKind;

/// One CSV row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column's value, returning the previous one.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(column.into(), value.into())
    }

    /// Get a column's value.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Column names present in this row, sorted.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a row from a header and a record of the same length.
    #[must_use]
    pub fn from_record(headers: &csv::StringRecord, record: &csv::StringRecord) -> Self {
        headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect()
    }

    /// Lay the row out in `columns` order.
    ///
    /// Returns the names of any columns the row lacks.
    pub fn to_record(&self, columns: &[&str]) -> Result<csv::StringRecord, Vec<String>> {
        let missing: Vec<String> = columns
            .iter()
            .filter(|c| !self.0.contains_key(**c))
            .map(|c| (*c).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }
        Ok(columns
            .iter()
            .map(|c| self.get(c).unwrap_or_default())
            .collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// All rows of one record kind, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    kind: RecordKind,
    rows: Vec<Row>,
}

impl Table {
    /// Create a table.
    #[must_use]
    pub fn new(kind: RecordKind, rows: Vec<Row>) -> Self {
        Self { kind, rows }
    }

    /// An empty table with the canonical header of `kind`.
    #[must_use]
    pub fn empty(kind: RecordKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// The record kind.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// The canonical column names.
    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        self.kind.columns()
    }

    /// The rows, in file order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The most recently appended row.
    #[must_use]
    pub fn last(&self) -> Option<&Row> {
        self.rows.last()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
