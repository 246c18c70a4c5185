// ============================================================
// CSV WRITER
// ============================================================
// Serialize table rows to spreadsheet-friendly CSV bytes

use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::table::Row;

/// UTF-8 byte-order mark; spreadsheet tools use it to detect the encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV writer producing UTF-8 output with a leading BOM
pub struct CsvWriter {
    include_index: bool,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self {
            include_index: false,
        }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an unnamed column holding each row's position in the source table
    pub fn with_index(mut self, include_index: bool) -> Self {
        self.include_index = include_index;
        self
    }

    /// Write the header row and the given `(source_index, row)` pairs
    pub fn write<'a, I>(&self, columns: &[String], rows: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = (usize, &'a Row)>,
    {
        let mut buffer = UTF8_BOM.to_vec();
        {
            let mut writer = WriterBuilder::new().from_writer(&mut buffer);

            let mut header: Vec<&str> = Vec::with_capacity(columns.len() + 1);
            if self.include_index {
                header.push("");
            }
            header.extend(columns.iter().map(String::as_str));
            writer.write_record(&header)?;

            for (index, row) in rows {
                let mut record: Vec<String> = Vec::with_capacity(columns.len() + 1);
                if self.include_index {
                    record.push(index.to_string());
                }
                record.extend(row.values().iter().map(|v| v.to_string()));
                writer.write_record(&record)?;
            }

            writer
                .flush()
                .map_err(|e| AppError::IoError(format!("Failed to flush CSV output: {}", e)))?;
        }

        Ok(buffer)
    }
}
