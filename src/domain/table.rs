// ============================================================
// TABLE MODEL
// ============================================================
// Immutable in-memory table: normalized headers plus rows of scalars.
// No I/O here; loaders live in infrastructure::spreadsheet.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::shared::text::normalize_header;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Build a cell from raw text, mapping blank strings to `Empty`
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }

    /// Numeric view of the cell. Text cells are parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Empty => None,
        }
    }
}

/// Integral floats print without a fractional part so that codes read back
/// from spreadsheets (`1.0`) compare and export as `1`.
fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            CellValue::Empty => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            CellValue::Empty => serializer.serialize_none(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::from_text(&value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

/// One table row. Shares the owning table's column list, which stays the
/// single source of truth for the row's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    pub fn get_at(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// (column, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Immutable table with normalized, unique column names
#[derive(Debug, Clone)]
pub struct Table {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from columns that are already normalized.
    /// Records are padded with `Empty` or truncated to the column count.
    pub fn new(columns: Vec<String>, records: Vec<Vec<CellValue>>) -> Self {
        let columns: Arc<[String]> = columns.into();
        let width = columns.len();
        let rows = records
            .into_iter()
            .map(|mut values| {
                values.resize(width, CellValue::Empty);
                Row {
                    columns: Arc::clone(&columns),
                    values,
                }
            })
            .collect();

        Self { columns, rows }
    }

    /// Build a table from raw spreadsheet headers.
    ///
    /// Headers are normalized exactly once here. Blank headers become
    /// `unnamed_<n>` and repeated names get the first free `_<k>` suffix so
    /// every column stays addressable.
    pub fn from_raw_headers(headers: &[String], records: Vec<Vec<CellValue>>) -> Self {
        let mut emitted: HashSet<String> = HashSet::new();
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let mut base = normalize_header(raw);
                if base.is_empty() {
                    base = format!("unnamed_{}", idx);
                }
                let mut name = base.clone();
                let mut suffix = 1;
                while emitted.contains(&name) {
                    name = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                emitted.insert(name.clone());
                name
            })
            .collect();

        Self::new(columns, records)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Values of one column in row order; empty iterator for unknown columns
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a CellValue> + 'a {
        let index = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| index.and_then(|idx| row.get_at(idx)))
    }

    /// A column is textual when it holds at least one text cell.
    pub fn is_textual(&self, column: &str) -> bool {
        self.column_values(column).any(CellValue::is_text)
    }

    /// Distinct non-empty values of a column, first-seen order, compared by
    /// their display form.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for value in self.column_values(column) {
            let text = value.to_string();
            if text.trim().is_empty() {
                continue;
            }
            if !out.contains(&text) {
                out.push(text);
            }
        }
        out
    }

    /// Return a copy of this table with one more column filled with `fill`
    pub fn with_column(&self, name: &str, fill: CellValue) -> Table {
        let mut columns: Vec<String> = self.columns.to_vec();
        columns.push(name.to_string());
        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut values = row.values.clone();
                values.push(fill.clone());
                values
            })
            .collect();
        Table::new(columns, records)
    }

    /// Rows selected by a predicate, cloned in table order
    pub fn filter_rows<F>(&self, mut predicate: F) -> Vec<Row>
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }
}
