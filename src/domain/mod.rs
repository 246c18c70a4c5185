pub mod dataset;
pub mod error;
pub mod intent;
pub mod query_result;
pub mod question;
pub mod table;

pub use dataset::DatasetKind;
pub use intent::Intent;
pub use query_result::QueryResult;
pub use question::Question;
pub use table::{CellValue, Row, Table};
