//! Column resolver
//!
//! Matches loose column names (any mix of accents, case, spacing or hyphens)
//! against the normalized headers of a loaded table:
//! - `"Código"`, `"codigo"`, `" CODIGO "` all resolve to a `código` column
//! - `"categoria producto"` resolves to `categoría_producto`
//!
//! Table column order decides precedence, not candidate order: the first
//! table column whose folded form is in the candidate set wins.

use std::collections::HashSet;

use crate::domain::error::{AppError, Result};
use crate::shared::text::column_key;

/// Resolver over one table's ordered column list
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver<'a> {
    columns: &'a [String],
}

impl<'a> ColumnResolver<'a> {
    pub fn new(columns: &'a [String]) -> Self {
        Self { columns }
    }

    /// First table column matching any candidate, or `None`
    pub fn resolve<S: AsRef<str>>(&self, candidates: &[S]) -> Option<&'a str> {
        let keys: HashSet<String> = candidates
            .iter()
            .map(|c| column_key(c.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();

        self.columns
            .iter()
            .find(|column| keys.contains(&column_key(column)))
            .map(String::as_str)
    }

    /// Like [`resolve`](Self::resolve) but turns a miss into a `SchemaError`
    pub fn require<S: AsRef<str>>(&self, candidates: &[S], label: &str) -> Result<&'a str> {
        self.resolve(candidates).ok_or_else(|| {
            let wanted: Vec<&str> = candidates.iter().map(|c| c.as_ref()).collect();
            AppError::SchemaError(format!(
                "No {} column found (tried {:?}); available columns: {:?}",
                label, wanted, self.columns
            ))
        })
    }

    /// First table column whose folded name contains any of `needles`
    pub fn find_containing(&self, needles: &[&str]) -> Option<&'a str> {
        let needles: Vec<String> = needles.iter().map(|n| column_key(n)).collect();
        self.columns
            .iter()
            .find(|column| {
                let key = column_key(column);
                needles.iter().any(|n| key.contains(n.as_str()))
            })
            .map(String::as_str)
    }
}
