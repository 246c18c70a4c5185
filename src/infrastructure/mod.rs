pub mod config;
pub mod csv;
pub mod spreadsheet;
pub mod storage;
