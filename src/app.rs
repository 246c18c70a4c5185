use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::use_cases::examples_catalog::{self, QueryCatalog};
use crate::application::use_cases::export_generator::{
    ExportArtifact, ExportDestination, ExportGenerator, ExportOptions, ExportStream,
};
use crate::application::use_cases::query_dispatcher::QueryDispatcher;
use crate::application::use_cases::table_store::{StoreStatus, TableStore};
use crate::domain::dataset::DatasetKind;
use crate::domain::error::{AppError, Result};
use crate::domain::query_result::QueryResult;
use crate::domain::question::Question;
use crate::domain::table::Row;
use crate::infrastructure::config::EngineConfig;

/// Install the global fmt subscriber. Later calls are no-ops.
pub fn init_tracing(filter: &str) {
    let filter = if filter.trim().is_empty() { "info" } else { filter };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Entry point for embedding the engine: owns both dataset stores, the
/// question dispatcher and the export generator.
pub struct InventoryApp {
    config: EngineConfig,
    inventory: Arc<TableStore>,
    images: Arc<TableStore>,
    dispatcher: QueryDispatcher,
    exporter: ExportGenerator,
}

impl InventoryApp {
    /// Load configuration, initialize logging and both datasets
    pub fn bootstrap(config_path: Option<&Path>) -> Result<Self> {
        let config = EngineConfig::load(config_path)?;
        init_tracing(&config.log_filter);
        Self::from_config(config)
    }

    /// Build from an explicit configuration. Missing dataset files do not
    /// fail construction; the affected store reports itself unavailable.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let validation = config.validate();
        for warning in &validation.warnings {
            warn!(warning = %warning, "Configuration warning");
        }
        if !validation.valid {
            error!(errors = ?validation.errors, "Invalid configuration");
            return Err(AppError::ValidationError(validation.errors.join("; ")));
        }

        let inventory = TableStore::load(DatasetKind::Inventory, &config.inventory_path);
        let images = TableStore::load(DatasetKind::Images, &config.images_path);
        Ok(Self::from_stores(config, inventory, images))
    }

    /// Build from stores constructed by the caller
    pub fn from_stores(config: EngineConfig, inventory: TableStore, images: TableStore) -> Self {
        let inventory = Arc::new(inventory);
        let images = Arc::new(images);

        let dispatcher = QueryDispatcher::new(Arc::clone(&inventory))
            .with_fallback_limit(config.search_fallback_limit);
        let exporter = ExportGenerator::new(Arc::clone(&inventory), config.exports_dir.clone());

        info!(
            inventory_loaded = inventory.is_loaded(),
            images_loaded = images.is_loaded(),
            "Inventory engine ready"
        );

        Self {
            config,
            inventory,
            images,
            dispatcher,
            exporter,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> Vec<StoreStatus> {
        vec![self.inventory.status(), self.images.status()]
    }

    // ----- natural-language queries -----

    pub fn classify_and_answer(&self, question: &str) -> Result<QueryResult> {
        let question = Question::parse(question)?;
        self.dispatcher.answer(question.as_str())
    }

    pub fn examples(&self) -> QueryCatalog {
        examples_catalog::catalog()
    }

    // ----- inventory lookups -----

    pub fn list_all(&self) -> Result<Vec<Row>> {
        self.inventory.list_all()
    }

    pub fn find_by_code(&self, code: i64) -> Result<Vec<Row>> {
        self.inventory.find_by_code(code)
    }

    pub fn find_by_name(&self, term: &str) -> Result<Vec<Row>> {
        self.inventory.find_by_name_substring(term)
    }

    pub fn find_by_category(&self, category: &str) -> Result<Vec<Row>> {
        self.inventory.find_by_category(category)
    }

    pub fn inventory_columns(&self) -> Vec<String> {
        self.inventory.columns().to_vec()
    }

    // ----- exports -----

    /// Export to the configured exports directory and return the file path
    pub fn export_by_category(&self, value: &str, column_hint: Option<&str>) -> Result<PathBuf> {
        self.exporter
            .export_to_file(value, &hint_options(column_hint), None, None)
    }

    pub fn export_by_category_stream(
        &self,
        value: &str,
        column_hint: Option<&str>,
    ) -> Result<ExportStream> {
        self.exporter.export_to_buffer(value, &hint_options(column_hint))
    }

    /// Export with full control over options and destination
    pub fn export_with(
        &self,
        value: &str,
        options: &ExportOptions,
        destination: ExportDestination,
    ) -> Result<ExportArtifact> {
        self.exporter.export_by_category(value, options, destination)
    }

    // ----- image metadata -----

    pub fn list_images(&self) -> Result<Vec<Row>> {
        self.images.list_all()
    }

    pub fn find_image_by_code(&self, code: i64) -> Result<Vec<Row>> {
        self.images.find_by_code(code)
    }

    pub fn image_columns(&self) -> Vec<String> {
        self.images.columns().to_vec()
    }
}

fn hint_options(column_hint: Option<&str>) -> ExportOptions {
    match column_hint {
        Some(hint) => ExportOptions::default().with_column_hint(hint),
        None => ExportOptions::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::Intent;
    use std::fs;
    use tempfile::TempDir;

    fn write_datasets(dir: &Path) -> EngineConfig {
        let inventory = dir.join("inventario.csv");
        fs::write(
            &inventory,
            "Código,Descripción,Categoría,Precio\n1,Vitamin C,Vitamins,15000\n2,Whey Protein,Proteins,45000\n",
        )
        .unwrap();
        let images = dir.join("imagen.csv");
        fs::write(&images, "Codigo;URL\n1;https://cdn.example/1.png\n").unwrap();

        EngineConfig {
            inventory_path: inventory,
            images_path: images,
            exports_dir: dir.join("exports"),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let dir = TempDir::new().unwrap();
        let app = InventoryApp::from_config(write_datasets(dir.path())).unwrap();

        let priciest = app.classify_and_answer("¿Cuál es el producto más caro?").unwrap();
        assert_eq!(priciest.intent, Intent::Price);
        assert_eq!(priciest.data["código"], 2);

        let range = app.classify_and_answer("productos entre 10000 y 50000").unwrap();
        assert_eq!(range.intent, Intent::Filter);
        assert_eq!(range.data["cantidad"], 2);

        let count = app.classify_and_answer("cuántos productos hay").unwrap();
        assert_eq!(count.intent, Intent::Count);
        assert_eq!(count.data["cantidad"], 2);

        let path = app.export_by_category("Vitamins", None).unwrap();
        assert!(path.is_absolute());
        assert!(path.starts_with(fs::canonicalize(dir.path()).unwrap()));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Vitamin C"));
        assert!(!content.contains("Whey"));
    }

    #[test]
    fn test_question_length_is_checked() {
        let dir = TempDir::new().unwrap();
        let app = InventoryApp::from_config(write_datasets(dir.path())).unwrap();
        assert!(matches!(
            app.classify_and_answer("  ¿? "),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_image_dataset() {
        let dir = TempDir::new().unwrap();
        let app = InventoryApp::from_config(write_datasets(dir.path())).unwrap();

        assert_eq!(app.image_columns(), vec!["codigo", "url"]);
        assert_eq!(app.list_images().unwrap().len(), 1);
        assert_eq!(app.find_image_by_code(1).unwrap().len(), 1);
        assert!(app.find_image_by_code(2).unwrap().is_empty());
    }

    #[test]
    fn test_missing_files_leave_stores_unavailable() {
        let dir = TempDir::new().unwrap();
        let config = EngineConfig {
            inventory_path: dir.path().join("nope.xlsx"),
            images_path: dir.path().join("nope.csv"),
            exports_dir: dir.path().join("exports"),
            ..EngineConfig::default()
        };
        let app = InventoryApp::from_config(config).unwrap();

        assert!(app.status().iter().all(|s| !s.loaded));
        assert!(app.inventory_columns().is_empty());
        assert!(matches!(app.list_all(), Err(AppError::DataUnavailable(_))));
        assert!(matches!(
            app.classify_and_answer("cuántos productos hay"),
            Err(AppError::DataUnavailable(_))
        ));
        assert!(matches!(
            app.export_by_category_stream("Vitamins", None),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            search_fallback_limit: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            InventoryApp::from_config(config),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let dir = TempDir::new().unwrap();
        let app = Arc::new(InventoryApp::from_config(write_datasets(dir.path())).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let app = Arc::clone(&app);
                std::thread::spawn(move || app.find_by_name("whey").unwrap().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
