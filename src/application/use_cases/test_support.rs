//! Shared fixtures for use-case tests.

use crate::application::use_cases::table_store::TableStore;
use crate::domain::dataset::DatasetKind;
use crate::domain::table::{CellValue, Table};

fn headers() -> Vec<String> {
    ["Código", "Descripción", "Categoría", "Precio"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// The two-product inventory used by the end-to-end scenario
pub fn scenario_table() -> Table {
    Table::from_raw_headers(
        &headers(),
        vec![
            vec![1.0.into(), "Vitamin C".into(), "Vitamins".into(), 15000.0.into()],
            vec![2.0.into(), "Whey Protein".into(), "Proteins".into(), 45000.0.into()],
        ],
    )
}

/// Four products: a zero price, a missing category and duplicate categories
pub fn inventory_table() -> Table {
    Table::from_raw_headers(
        &headers(),
        vec![
            vec![1.0.into(), "Vitamin C".into(), "Vitamins".into(), 15000.0.into()],
            vec![2.0.into(), "Whey Protein".into(), "Proteins".into(), 45000.0.into()],
            vec![3.0.into(), "Vitamin D".into(), "Vitamins".into(), 0.0.into()],
            vec![4.0.into(), "Omega 3".into(), CellValue::Empty, 22000.0.into()],
        ],
    )
}

pub fn scenario_store() -> TableStore {
    TableStore::from_table(DatasetKind::Inventory, scenario_table())
}

pub fn sample_store() -> TableStore {
    TableStore::from_table(DatasetKind::Inventory, inventory_table())
}
