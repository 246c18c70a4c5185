// ============================================================
// EXPORT GENERATOR
// ============================================================
// Category-filtered CSV exports, written to disk or returned as an
// in-memory stream. Output is UTF-8 with a BOM and the table's normalized
// header row; a filter with no matches still yields a header-only file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::column_resolver::ColumnResolver;
use super::table_store::TableStore;
use crate::domain::dataset::CATEGORY_ALIASES;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Row, Table};
use crate::infrastructure::csv::CsvWriter;
use crate::infrastructure::storage;
use crate::shared::text::sanitize_file_component;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Export knobs shared by both destinations
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Column to filter on; the category aliases are tried when absent
    pub column_hint: Option<String>,
    /// Prepend an unnamed column with each row's 0-based source position
    pub include_index: bool,
}

impl ExportOptions {
    pub fn with_column_hint(mut self, hint: impl Into<String>) -> Self {
        self.column_hint = Some(hint.into());
        self
    }

    pub fn with_index(mut self, include_index: bool) -> Self {
        self.include_index = include_index;
        self
    }
}

#[derive(Debug, Clone)]
pub enum ExportDestination {
    /// Write under `dir` (the configured exports directory when `None`)
    File {
        dir: Option<PathBuf>,
        filename: Option<String>,
    },
    /// Keep the CSV in memory
    Buffer,
}

/// In-memory export with a suggested download name
#[derive(Debug, Clone, Serialize)]
pub struct ExportStream {
    pub filename: String,
    pub content_type: &'static str,
    pub rows: usize,
    #[serde(skip)]
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum ExportArtifact {
    File(PathBuf),
    Buffer(ExportStream),
}

/// Rows selected for one export
struct Selection<'t> {
    table: &'t Table,
    column: &'t str,
    rows: Vec<(usize, &'t Row)>,
}

pub struct ExportGenerator {
    store: Arc<TableStore>,
    exports_dir: PathBuf,
}

impl ExportGenerator {
    pub fn new(store: Arc<TableStore>, exports_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            exports_dir: exports_dir.into(),
        }
    }

    pub fn exports_dir(&self) -> &Path {
        &self.exports_dir
    }

    pub fn export_by_category(
        &self,
        value: &str,
        options: &ExportOptions,
        destination: ExportDestination,
    ) -> Result<ExportArtifact> {
        match destination {
            ExportDestination::File { dir, filename } => self
                .export_to_file(value, options, dir.as_deref(), filename.as_deref())
                .map(ExportArtifact::File),
            ExportDestination::Buffer => self
                .export_to_buffer(value, options)
                .map(ExportArtifact::Buffer),
        }
    }

    /// Write the export to disk and return its absolute path
    pub fn export_to_file(
        &self,
        value: &str,
        options: &ExportOptions,
        dir: Option<&Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let selection = self.select(value, options.column_hint.as_deref())?;

        let filename = match filename {
            Some(name) => validate_filename(name)?,
            None => format!(
                "export_categoria_{}_{}.csv",
                selection.column,
                sanitize_file_component(value)
            ),
        };
        let dir = dir.unwrap_or(&self.exports_dir);

        let bytes = render(&selection, options)?;
        let path = storage::write_file(dir, &filename, &bytes).map_err(|e| {
            AppError::IoError(format!(
                "Failed to write export {}: {}",
                dir.join(&filename).display(),
                e
            ))
        })?;

        info!(
            column = selection.column,
            value,
            rows = selection.rows.len(),
            path = %path.display(),
            "Export written"
        );
        Ok(path)
    }

    /// Build the export in memory without touching the filesystem
    pub fn export_to_buffer(&self, value: &str, options: &ExportOptions) -> Result<ExportStream> {
        let selection = self.select(value, options.column_hint.as_deref())?;
        let content = render(&selection, options)?;

        debug!(
            column = selection.column,
            value,
            rows = selection.rows.len(),
            bytes = content.len(),
            "Export buffered"
        );
        Ok(ExportStream {
            filename: format!("categoria_{}.csv", sanitize_file_component(value)),
            content_type: CSV_CONTENT_TYPE,
            rows: selection.rows.len(),
            content,
        })
    }

    fn select<'t>(&'t self, value: &str, hint: Option<&str>) -> Result<Selection<'t>> {
        let table = self.store.table().map_err(|_| {
            AppError::ValidationError("No inventory data loaded to export".to_string())
        })?;

        let resolver = ColumnResolver::new(table.columns());
        let column = match hint.map(str::trim).filter(|h| !h.is_empty()) {
            Some(hint) => resolver.resolve(&[hint]).ok_or_else(|| {
                AppError::SchemaError(format!(
                    "Column '{}' does not exist; available columns: {:?}",
                    hint,
                    table.columns()
                ))
            })?,
            None => resolver.require(CATEGORY_ALIASES, "category")?,
        };

        let index = table
            .column_index(column)
            .ok_or_else(|| AppError::SchemaError(format!("Column '{}' does not exist", column)))?;

        let rows = if table.is_textual(column) {
            let wanted = value.trim().to_lowercase();
            select_rows(table, index, |cell| cell.to_string().trim().to_lowercase() == wanted)
        } else {
            match value.trim().parse::<f64>() {
                Ok(wanted) => select_rows(table, index, |cell| cell.as_number() == Some(wanted)),
                Err(_) => Vec::new(),
            }
        };

        Ok(Selection {
            table,
            column,
            rows,
        })
    }
}

fn select_rows<F>(table: &Table, index: usize, matches: F) -> Vec<(usize, &Row)>
where
    F: Fn(&CellValue) -> bool,
{
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get_at(index).map_or(false, &matches))
        .collect()
}

fn render(selection: &Selection<'_>, options: &ExportOptions) -> Result<Vec<u8>> {
    CsvWriter::new()
        .with_index(options.include_index)
        .write(selection.table.columns(), selection.rows.iter().copied())
}

/// Caller-supplied names must be a plain file name
fn validate_filename(name: &str) -> Result<String> {
    let name = name.trim();
    let plain = Path::new(name)
        .file_name()
        .map_or(false, |f| f.to_string_lossy() == name);
    if name.is_empty() || !plain {
        return Err(AppError::ValidationError(format!(
            "Invalid export file name: '{}'",
            name
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::sample_store;
    use crate::domain::dataset::DatasetKind;
    use crate::infrastructure::csv::UTF8_BOM;
    use std::fs;
    use tempfile::TempDir;

    fn generator(dir: &Path) -> ExportGenerator {
        ExportGenerator::new(Arc::new(sample_store()), dir)
    }

    fn records(bytes: &[u8]) -> Vec<Vec<String>> {
        assert!(bytes.starts_with(UTF8_BOM));
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&bytes[UTF8_BOM.len()..])
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_buffer_export_filters_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let stream = generator(dir.path())
            .export_to_buffer("  vitamins ", &ExportOptions::default())
            .unwrap();

        assert_eq!(stream.filename, "categoria_vitamins.csv");
        assert_eq!(stream.rows, 2);
        let rows = records(&stream.content);
        assert_eq!(rows[0], vec!["código", "descripción", "categoría", "precio"]);
        assert_eq!(rows[1][1], "Vitamin C");
        assert_eq!(rows[2][1], "Vitamin D");
        // nothing written
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_export_default_name() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("exports");
        let path = generator(&out)
            .export_to_file("Proteins", &ExportOptions::default(), None, None)
            .unwrap();

        assert!(path.is_absolute());
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "export_categoria_categoría_proteins.csv"
        );
        let rows = records(&fs::read(&path).unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "2");
    }

    #[test]
    fn test_file_export_explicit_name_and_index() {
        let dir = TempDir::new().unwrap();
        let options = ExportOptions::default().with_index(true);
        let artifact = generator(dir.path())
            .export_by_category(
                "Proteins",
                &options,
                ExportDestination::File {
                    dir: None,
                    filename: Some("proteinas.csv".into()),
                },
            )
            .unwrap();

        let ExportArtifact::File(path) = artifact else {
            panic!("expected a file export");
        };
        assert!(path.ends_with("proteinas.csv"));
        let rows = records(&fs::read(&path).unwrap());
        assert_eq!(rows[0][0], "");
        assert_eq!(rows[1][0], "1");
    }

    #[test]
    fn test_rejects_path_like_file_names() {
        let dir = TempDir::new().unwrap();
        let result = generator(dir.path()).export_to_file(
            "Proteins",
            &ExportOptions::default(),
            None,
            Some("../escape.csv"),
        );
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_no_matches_yields_header_only() {
        let dir = TempDir::new().unwrap();
        let stream = generator(dir.path())
            .export_to_buffer("Inexistente", &ExportOptions::default())
            .unwrap();
        assert_eq!(stream.rows, 0);
        assert_eq!(records(&stream.content).len(), 1);
    }

    #[test]
    fn test_numeric_column_hint() {
        let dir = TempDir::new().unwrap();
        let g = generator(dir.path());
        let options = ExportOptions::default().with_column_hint("Precio");

        let stream = g.export_to_buffer("45000", &options).unwrap();
        assert_eq!(stream.rows, 1);
        assert_eq!(g.export_to_buffer("45000.0", &options).unwrap().rows, 1);
        assert_eq!(g.export_to_buffer("barato", &options).unwrap().rows, 0);
    }

    #[test]
    fn test_unknown_hint_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let options = ExportOptions::default().with_column_hint("marca");
        let result = generator(dir.path()).export_to_buffer("x", &options);
        assert!(matches!(result, Err(AppError::SchemaError(_))));
    }

    #[test]
    fn test_unloaded_store_is_validation_error() {
        let store = TableStore::failed(DatasetKind::Inventory, "missing file");
        let g = ExportGenerator::new(Arc::new(store), "unused");
        let result = g.export_to_buffer("Vitamins", &ExportOptions::default());
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_sanitized_stream_name() {
        let dir = TempDir::new().unwrap();
        let stream = generator(dir.path())
            .export_to_buffer("Vitaminas y Minerales!", &ExportOptions::default())
            .unwrap();
        assert_eq!(stream.filename, "categoria_vitaminas_y_minerales.csv");
    }
}
