//! Dataset entity: a rectangular table whose rows keep stable identifiers

use super::cell::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identifier of a row, assigned once when the dataset is loaded.
///
/// Filtering, renaming and slicing never re-index rows, so a `RowId` seen in a
/// relevance map always addresses the same source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub usize);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One row of a [`Dataset`]. Absent columns read as [`Cell::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    values: HashMap<String, Cell>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.values.get(column)
    }

    /// Trimmed, non-blank text of a column; `None` for null, blank or missing.
    pub fn text(&self, column: &str) -> Option<String> {
        self.values.get(column).and_then(Cell::non_blank)
    }

    /// Text of a column, empty when null or missing.
    pub fn text_or_empty(&self, column: &str) -> String {
        self.text(column).unwrap_or_default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: Cell) {
        self.values.insert(column.into(), value);
    }

    pub fn values(&self) -> &HashMap<String, Cell> {
        &self.values
    }
}

/// A table of named columns.
///
/// All transforms return a new `Dataset` (or consume `self`); none of them
/// renumber rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from positional rows; ids are assigned in input order.
    ///
    /// Cells beyond the column count are ignored, missing trailing cells are null.
    pub fn from_table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        let mut dataset = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for cells in rows {
            dataset.push_cells(cells);
        }
        dataset
    }

    /// Append a row built from positional cells and return its id.
    pub fn push_cells(&mut self, cells: Vec<Cell>) -> RowId {
        let id = self.next_id();
        let mut row = Row::new(id);
        for (column, cell) in self.columns.iter().zip(cells) {
            row.set(column.clone(), cell);
        }
        self.rows.push(row);
        id
    }

    /// Append a row built from named values and return its id.
    ///
    /// Unknown column names are added to the column list in first-seen order.
    pub fn push_named(&mut self, values: impl IntoIterator<Item = (String, Cell)>) -> RowId {
        let id = self.next_id();
        let mut row = Row::new(id);
        for (column, cell) in values {
            if !self.columns.contains(&column) {
                self.columns.push(column.clone());
            }
            row.set(column, cell);
        }
        self.rows.push(row);
        id
    }

    fn next_id(&self) -> RowId {
        RowId(self.rows.iter().map(|r| r.id.0 + 1).max().unwrap_or(0))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(Row::id).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Same columns, no rows.
    pub fn empty_like(&self) -> Self {
        Self::new(self.columns.clone())
    }

    /// Rows satisfying `predicate`, in their original order.
    pub fn filter(&self, predicate: impl Fn(&Row) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Rows with the given ids, in the order of `ids`. Unknown ids are skipped.
    pub fn select(&self, ids: &[RowId]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: ids.iter().filter_map(|id| self.row(*id)).cloned().collect(),
        }
    }

    /// Rename columns according to `mapping` (source → target).
    ///
    /// A mapping whose target already exists as a column is skipped so that
    /// already-canonical data is never overwritten.
    pub fn rename_columns(mut self, mapping: &[(&str, &str)]) -> Self {
        for (source, target) in mapping {
            if source == target || !self.has_column(source) || self.has_column(target) {
                continue;
            }
            for column in self.columns.iter_mut() {
                if column.as_str() == *source {
                    *column = target.to_string();
                }
            }
            for row in self.rows.iter_mut() {
                if let Some(cell) = row.values.remove(*source) {
                    row.values.insert(target.to_string(), cell);
                }
            }
        }
        self
    }

    /// Apply `f` to every cell of every column.
    pub fn map_cells(mut self, f: impl Fn(&Cell) -> Cell) -> Self {
        for row in self.rows.iter_mut() {
            for cell in row.values.values_mut() {
                *cell = f(cell);
            }
        }
        self
    }

    /// Add (or replace) a column whose value is derived from each row.
    pub fn derive_column(mut self, column: &str, f: impl Fn(&Row) -> Cell) -> Self {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        for row in self.rows.iter_mut() {
            let value = f(row);
            row.values.insert(column.to_string(), value);
        }
        self
    }

    /// Cells of one column in row order. Missing cells read as null.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        static NULL: Cell = Cell::Null;
        self.rows
            .iter()
            .map(move |r| r.values.get(column).unwrap_or(&NULL))
    }
}
