// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing with encoding detection, and CSV export serialization

mod csv_parser;
mod csv_writer;

pub use csv_parser::CsvParser;
pub use csv_writer::{CsvWriter, UTF8_BOM};
