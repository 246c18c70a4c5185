//! Spreadsheet loading.
//!
//! Reads the first worksheet of an Excel/ODS workbook (via calamine) or a
//! delimited text file into a [`Table`]. The first row is the header row;
//! fully blank rows are skipped.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Table};
use crate::infrastructure::csv::CsvParser;

/// File formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Workbook,
    Delimited,
}

impl SpreadsheetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SpreadsheetFormat::Workbook),
            "csv" | "tsv" | "txt" => Ok(SpreadsheetFormat::Delimited),
            other => Err(AppError::ValidationError(format!(
                "Unsupported spreadsheet format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Load a dataset file into a table with normalized headers
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(AppError::IoError(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let table = match SpreadsheetFormat::from_path(path)? {
        SpreadsheetFormat::Workbook => load_workbook(path)?,
        SpreadsheetFormat::Delimited => CsvParser::parse_file_auto_detect(path)?,
    };

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "Loaded spreadsheet"
    );
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::ParseError(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read worksheet range: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => Vec::new(),
    };

    let records: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|values| values.iter().any(|v| !v.is_empty()))
        .collect();

    debug!(headers = ?headers, records = records.len(), "Parsed worksheet");
    Ok(Table::from_raw_headers(&headers, records))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_value(other).to_string(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::from_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("inventario.XLSX")).unwrap(),
            SpreadsheetFormat::Workbook
        );
        assert_eq!(
            SpreadsheetFormat::from_path(Path::new("data/imagen.csv")).unwrap(),
            SpreadsheetFormat::Delimited
        );
        assert!(SpreadsheetFormat::from_path(Path::new("notes.pdf")).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_table(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(matches!(err, AppError::IoError(_)));
    }

    #[test]
    fn test_load_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventario.csv");
        fs::write(&path, "Código;Descripción;Categoría\n1;Vitamina C;Vitaminas\n").unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns(), &["código", "descripción", "categoría"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::String("  ".into())), CellValue::Empty);
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
    }
}
