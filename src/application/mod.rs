pub mod use_cases;

pub use use_cases::column_resolver::ColumnResolver;
pub use use_cases::export_generator::{
    ExportArtifact, ExportDestination, ExportGenerator, ExportOptions, ExportStream,
};
pub use use_cases::intent_classifier::IntentClassifier;
pub use use_cases::query_dispatcher::QueryDispatcher;
pub use use_cases::table_store::{StoreStatus, TableStore};
