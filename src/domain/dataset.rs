// ============================================================
// DATASET CONTRACTS
// ============================================================
// Alias sets for the semantic columns and the minimum column contract of
// each dataset the engine loads.

use serde::{Deserialize, Serialize};

/// Product code column
pub const CODE_ALIASES: &[&str] = &["codigo", "código", "code", "id"];

/// Product description / name column
pub const DESCRIPTION_ALIASES: &[&str] =
    &["descripcion", "descripción", "description", "nombre", "name"];

/// Category column
pub const CATEGORY_ALIASES: &[&str] = &[
    "categoria",
    "categoría",
    "category",
    "tipo",
    "type",
    "clase",
    "class",
    "categoria_producto",
];

/// Substrings that mark a price-like column (`precio_venta`, `valor_unitario`, ...)
pub const PRICE_SYNONYMS: &[&str] = &["precio", "valor", "costo", "price", "value", "cost"];

/// Name of the column appended when an inventory has no category column
pub const SYNTHESIZED_CATEGORY_COLUMN: &str = "categoria";

/// A semantic column a dataset must provide
#[derive(Debug, Clone, Copy)]
pub struct RequiredColumn {
    pub label: &'static str,
    pub aliases: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Inventory,
    Images,
}

impl DatasetKind {
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Inventory => "inventory",
            DatasetKind::Images => "images",
        }
    }

    /// Columns that must resolve for the load to succeed
    pub fn required_columns(&self) -> &'static [RequiredColumn] {
        const INVENTORY: &[RequiredColumn] = &[
            RequiredColumn {
                label: "code",
                aliases: CODE_ALIASES,
            },
            RequiredColumn {
                label: "description",
                aliases: DESCRIPTION_ALIASES,
            },
        ];
        const IMAGES: &[RequiredColumn] = &[RequiredColumn {
            label: "code",
            aliases: CODE_ALIASES,
        }];

        match self {
            DatasetKind::Inventory => INVENTORY,
            DatasetKind::Images => IMAGES,
        }
    }

    /// Whether a missing category column is synthesized instead of failing
    pub fn synthesizes_category(&self) -> bool {
        matches!(self, DatasetKind::Inventory)
    }
}
