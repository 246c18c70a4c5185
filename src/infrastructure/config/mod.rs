//! Engine configuration.
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `INVENTARIO_`-prefixed environment variables (a `.env` file is loaded
//! first when present):
//!
//! ```toml
//! inventory_path = "files/data/inventario_vitalix_plus.xlsx"
//! images_path = "files/data/imagen.xlsx"
//! exports_dir = "files/exports"
//! search_fallback_limit = 10
//! log_filter = "info"
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::spreadsheet::SpreadsheetFormat;

pub const ENV_PREFIX: &str = "INVENTARIO_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Inventory spreadsheet (xlsx/xls/ods/csv)
    pub inventory_path: PathBuf,

    /// Image metadata spreadsheet
    pub images_path: PathBuf,

    /// Default directory for file-backed exports
    pub exports_dir: PathBuf,

    /// Rows returned when a search finds nothing specific
    pub search_fallback_limit: usize,

    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from("files/data/inventario.xlsx"),
            images_path: PathBuf::from("files/data/imagen.xlsx"),
            exports_dir: PathBuf::from("files/exports"),
            search_fallback_limit: 10,
            log_filter: "info".to_string(),
        }
    }
}

/// Validation result for configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl EngineConfig {
    /// Provider chain without the `.env` side effect
    pub fn figment(toml_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));
        if let Some(path) = toml_path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load(toml_path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment(toml_path))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (label, path) in [
            ("inventory_path", &self.inventory_path),
            ("images_path", &self.images_path),
        ] {
            if path.as_os_str().is_empty() {
                errors.push(format!("{} must not be empty", label));
                continue;
            }
            if let Err(e) = SpreadsheetFormat::from_path(path) {
                errors.push(format!("{}: {}", label, e));
            } else if !path.exists() {
                warnings.push(format!(
                    "{} does not exist: {} (dataset will be unavailable)",
                    label,
                    path.display()
                ));
            }
        }

        if self.exports_dir.as_os_str().is_empty() {
            errors.push("exports_dir must not be empty".to_string());
        }

        if self.search_fallback_limit == 0 {
            errors.push("search_fallback_limit must be at least 1".to_string());
        }
        if self.search_fallback_limit > 500 {
            warnings.push("search_fallback_limit over 500 may produce very large answers".to_string());
        }

        if self.log_filter.trim().is_empty() {
            warnings.push("log_filter is empty, falling back to 'info'".to_string());
        }

        ConfigValidation {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
