//! Natural-language and structured queries over a spreadsheet product
//! inventory, with category-filtered CSV exports.

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use app::{init_tracing, InventoryApp};
pub use application::{
    ExportArtifact, ExportDestination, ExportOptions, ExportStream, StoreStatus, TableStore,
};
pub use domain::error::{AppError, Result};
pub use domain::{CellValue, DatasetKind, Intent, QueryResult, Question, Row, Table};
pub use infrastructure::config::EngineConfig;
