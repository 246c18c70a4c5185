// ============================================================
// CSV PARSER
// ============================================================
// Read delimited text into a Table with encoding and delimiter detection

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Table};

/// CSV parser with encoding detection
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse CSV content into a table. The first record is the header row.
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            if record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            records.push(Self::parse_record(&record));
        }

        Ok(Table::from_raw_headers(&headers, records))
    }

    /// Numeric-looking fields become numbers, blanks become `Empty`
    fn parse_record(record: &StringRecord) -> Vec<CellValue> {
        record
            .iter()
            .map(|value| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    CellValue::Empty
                } else if let Ok(n) = trimmed.parse::<f64>() {
                    if n.is_finite() {
                        CellValue::Number(n)
                    } else {
                        CellValue::Text(value.to_string())
                    }
                } else {
                    CellValue::Text(value.to_string())
                }
            })
            .collect()
    }

    /// Decode raw bytes: UTF-8 (BOM stripped) first, Windows-1252 as fallback
    pub fn decode(bytes: &[u8]) -> String {
        let (text, _, had_errors) = UTF_8.decode(bytes);
        if !had_errors {
            return text.into_owned();
        }

        debug!("CSV input is not valid UTF-8, decoding as Windows-1252");
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        text.into_owned()
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }

    /// Parse CSV file with automatic encoding and delimiter detection
    pub fn parse_file_auto_detect(path: &Path) -> Result<Table> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let content = Self::decode(&bytes);
        let delimiter = Self::detect_delimiter(&content);

        Self::default().with_delimiter(delimiter).parse_content(&content)
    }
}
