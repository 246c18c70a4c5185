//! Table store
//!
//! Holds one dataset for the life of the process. The load outcome is
//! decided once at construction (`Loaded` or `Failed` with a diagnostic
//! reason) and never changes afterwards; construction itself never fails.
//! All query primitives take `&self`, so a store can be shared across
//! threads behind an `Arc` without locking.

use std::path::Path;

use serde::Serialize;
use tracing::{error, info, warn};

use super::column_resolver::ColumnResolver;
use crate::domain::dataset::{
    DatasetKind, CATEGORY_ALIASES, CODE_ALIASES, DESCRIPTION_ALIASES, SYNTHESIZED_CATEGORY_COLUMN,
};
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Row, Table};
use crate::infrastructure::spreadsheet;

/// Minimum number of non-whitespace characters for text lookups
pub const MIN_TERM_CHARS: usize = 2;

#[derive(Debug, Clone)]
enum StoreState {
    Loaded(Table),
    Failed(String),
}

/// Load diagnostics for reporting
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub dataset: DatasetKind,
    pub loaded: bool,
    pub rows: usize,
    pub columns: Vec<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TableStore {
    kind: DatasetKind,
    state: StoreState,
}

impl TableStore {
    /// Load a dataset file. Failures are recorded, not returned.
    pub fn load(kind: DatasetKind, path: &Path) -> Self {
        let outcome = spreadsheet::load_table(path).and_then(|table| Self::prepare(kind, table));
        let store = Self::from_outcome(kind, outcome);

        if let Some(reason) = store.failure_reason() {
            error!(
                dataset = kind.label(),
                path = %path.display(),
                reason,
                "Dataset failed to load"
            );
        }
        store
    }

    /// Build a store from an in-memory table, applying the same validation as `load`
    pub fn from_table(kind: DatasetKind, table: Table) -> Self {
        Self::from_outcome(kind, Self::prepare(kind, table))
    }

    /// A store that records `reason` as its load failure
    pub fn failed(kind: DatasetKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            state: StoreState::Failed(reason.into()),
        }
    }

    fn from_outcome(kind: DatasetKind, outcome: Result<Table>) -> Self {
        match outcome {
            Ok(table) => {
                info!(
                    dataset = kind.label(),
                    rows = table.len(),
                    columns = ?table.columns(),
                    "Dataset loaded"
                );
                Self {
                    kind,
                    state: StoreState::Loaded(table),
                }
            }
            Err(e) => Self::failed(kind, e.to_string()),
        }
    }

    /// Validate the minimum column contract and apply the category soft default
    fn prepare(kind: DatasetKind, table: Table) -> Result<Table> {
        if table.is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} dataset has no rows",
                kind.label()
            )));
        }

        let resolver = ColumnResolver::new(table.columns());
        for required in kind.required_columns() {
            resolver.require(required.aliases, required.label)?;
        }

        if kind.synthesizes_category() && resolver.resolve(CATEGORY_ALIASES).is_none() {
            warn!(
                dataset = kind.label(),
                column = SYNTHESIZED_CATEGORY_COLUMN,
                "No category column found, adding an empty one"
            );
            return Ok(table.with_column(SYNTHESIZED_CATEGORY_COLUMN, CellValue::Empty));
        }

        Ok(table)
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, StoreState::Loaded(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            StoreState::Failed(reason) => Some(reason.as_str()),
            StoreState::Loaded(_) => None,
        }
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus {
            dataset: self.kind,
            loaded: self.is_loaded(),
            rows: self.table().map(Table::len).unwrap_or(0),
            columns: self.columns().to_vec(),
            reason: self.failure_reason().map(str::to_string),
        }
    }

    /// The loaded table, or `DataUnavailable` with the recorded reason
    pub fn table(&self) -> Result<&Table> {
        match &self.state {
            StoreState::Loaded(table) => Ok(table),
            StoreState::Failed(reason) => Err(AppError::DataUnavailable(format!(
                "{} dataset is not available: {}",
                self.kind.label(),
                reason
            ))),
        }
    }

    /// Ordered normalized column names; empty when the dataset failed to load
    pub fn columns(&self) -> &[String] {
        match &self.state {
            StoreState::Loaded(table) => table.columns(),
            StoreState::Failed(_) => &[],
        }
    }

    pub fn list_all(&self) -> Result<Vec<Row>> {
        Ok(self.table()?.rows().to_vec())
    }

    /// Rows whose code equals `code`. Duplicated codes return every match.
    pub fn find_by_code(&self, code: i64) -> Result<Vec<Row>> {
        if code <= 0 {
            return Err(AppError::InvalidArgument(format!(
                "code must be a positive integer, got {}",
                code
            )));
        }

        let table = self.table()?;
        let column = ColumnResolver::new(table.columns()).require(CODE_ALIASES, "code")?;
        let index = table.column_index(column);

        Ok(table.filter_rows(|row| {
            index
                .and_then(|idx| row.get_at(idx))
                .map_or(false, |cell| code_matches(cell, code))
        }))
    }

    /// Case-insensitive substring search on the description column
    pub fn find_by_name_substring(&self, term: &str) -> Result<Vec<Row>> {
        let needle = validate_term(term, "search term")?;

        let table = self.table()?;
        let column =
            ColumnResolver::new(table.columns()).require(DESCRIPTION_ALIASES, "description")?;
        let index = table.column_index(column);

        Ok(table.filter_rows(|row| {
            index
                .and_then(|idx| row.get_at(idx))
                .map_or(false, |cell| cell.to_string().to_lowercase().contains(&needle))
        }))
    }

    /// Case-insensitive exact match on the category column
    pub fn find_by_category(&self, value: &str) -> Result<Vec<Row>> {
        let wanted = validate_term(value, "category")?;

        let table = self.table()?;
        let column = self.category_column()?;
        let index = table.column_index(column);

        Ok(table.filter_rows(|row| {
            index
                .and_then(|idx| row.get_at(idx))
                .map_or(false, |cell| cell.to_string().trim().to_lowercase() == wanted)
        }))
    }

    /// Resolved category column name
    pub fn category_column(&self) -> Result<&str> {
        let table = self.table()?;
        ColumnResolver::new(table.columns()).require(CATEGORY_ALIASES, "category")
    }
}

/// Trimmed, lower-cased term with at least [`MIN_TERM_CHARS`] visible characters
fn validate_term(term: &str, label: &str) -> Result<String> {
    let visible = term.chars().filter(|c| !c.is_whitespace()).count();
    if visible < MIN_TERM_CHARS {
        return Err(AppError::InvalidArgument(format!(
            "{} must have at least {} characters",
            label, MIN_TERM_CHARS
        )));
    }
    Ok(term.trim().to_lowercase())
}

/// Codes may be stored as numbers, text or float-like text (`"1.0"`)
fn code_matches(cell: &CellValue, code: i64) -> bool {
    if cell.to_string().trim() == code.to_string() {
        return true;
    }
    cell.as_number().map_or(false, |n| n == code as f64)
}
