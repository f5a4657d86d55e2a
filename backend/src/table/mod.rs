//! In-memory record table.
//!
//! A [`Table`] keeps its column order separately from its rows, so stages can
//! add and drop columns by name while the order stays reproducible. Rows are
//! JSON objects: text, numbers, booleans, or `null` for a missing value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StageError, StageResult};

/// One row of a table, keyed by column name.
pub type Record = Map<String, Value>;

static NULL: Value = Value::Null;

/// Ordered columns plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Build a table from rows. Cells for columns a row lacks become `null`.
    pub fn from_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut table = Self::new(columns);
        for record in records {
            table.push_record(record);
        }
        table
    }

    /// Append a row, filling absent columns with `null` and ignoring keys
    /// that are not columns of this table.
    pub fn push_record(&mut self, mut record: Record) {
        let mut row = Map::new();
        for column in &self.columns {
            row.insert(column.clone(), record.remove(column).unwrap_or(Value::Null));
        }
        self.records.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Fail with `MissingColumn` unless `name` is present.
    pub fn require_column(&self, stage: &str, name: &str) -> StageResult<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(StageError::missing_column(stage, name))
        }
    }

    /// Values of one column, top to bottom.
    pub fn column_values<'a>(
        &'a self,
        stage: &str,
        name: &'a str,
    ) -> StageResult<impl Iterator<Item = &'a Value> + 'a> {
        self.require_column(stage, name)?;
        Ok(self
            .records
            .iter()
            .map(move |row| row.get(name).unwrap_or(&NULL)))
    }

    /// Set a column from one value per row.
    ///
    /// A new column is appended after the existing ones; an existing column
    /// keeps its position and has its values replaced.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.records.len(), "column length mismatch");

        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
        for (row, value) in self.records.iter_mut().zip(values) {
            row.insert(name.to_string(), value);
        }
    }

    /// Remove a column. Returns whether it was present; removing an absent
    /// column is a no-op.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != name);
        if self.columns.len() == before {
            return false;
        }
        for row in &mut self.records {
            row.remove(name);
        }
        true
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Self {
            columns: self.columns.clone(),
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    /// Count occurrences of each value of a column, most frequent first
    /// (ties ordered by value). Nulls are not counted.
    pub fn value_counts(&self, stage: &str, name: &str) -> StageResult<Vec<(String, usize)>> {
        let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        for value in self.column_values(stage, name)? {
            if let Some(text) = cell_text(value) {
                *counts.entry(text).or_default() += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }
}

/// Text form of a cell, `None` for null.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Numeric form of a cell, if it is a number or numeric text.
pub fn cell_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
