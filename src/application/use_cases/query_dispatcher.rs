//! Query dispatcher
//!
//! Classifies a question, extracts its parameters and answers it from the
//! inventory store. Every answer is a [`QueryResult`] with a Spanish
//! summary and an intent-specific JSON payload:
//!
//! | intent       | payload keys                                                 |
//! |--------------|--------------------------------------------------------------|
//! | `count`      | `cantidad`, plus `categoria` and `productos` when filtered   |
//! | `categories` | `categorias`, `total`                                        |
//! | `price`      | product row, or `precio_minimo` / `precio_maximo`            |
//! | `statistics` | `total_productos`, `precio_*`, `productos_por_categoria`     |
//! | `filter`     | `cantidad`, `rango`, `productos`                             |
//! | `search`     | `cantidad`, `categoria` or `termino_busqueda`, `productos`   |
//!
//! An unavailable inventory surfaces as `DataUnavailable`; "not enough
//! input" and "no price data" are ordinary answers, not errors.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::column_resolver::ColumnResolver;
use super::intent_classifier::IntentClassifier;
use super::question_parsing::{
    contains_any, format_money, price_bounds, search_tokens, CHEAP_WORDS, EXPENSIVE_WORDS,
};
use super::table_store::{TableStore, MIN_TERM_CHARS};
use crate::domain::dataset::{CATEGORY_ALIASES, DESCRIPTION_ALIASES, PRICE_SYNONYMS};
use crate::domain::error::Result;
use crate::domain::intent::Intent;
use crate::domain::query_result::QueryResult;
use crate::domain::table::{Row, Table};

/// Rows returned by a search that matched nothing specific
pub const DEFAULT_FALLBACK_LIMIT: usize = 10;

pub struct QueryDispatcher {
    store: Arc<TableStore>,
    classifier: IntentClassifier,
    fallback_limit: usize,
}

impl QueryDispatcher {
    pub fn new(store: Arc<TableStore>) -> Self {
        Self {
            store,
            classifier: IntentClassifier::default(),
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
        }
    }

    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = limit.max(1);
        self
    }

    /// Classify and answer a question
    pub fn answer(&self, question: &str) -> Result<QueryResult> {
        let question = question.to_lowercase();
        let intent = self.classifier.classify(&question);
        info!(intent = %intent, question = %question, "Answering question");
        self.dispatch(intent, &question)
    }

    /// Answer a question for an already chosen intent
    pub fn dispatch(&self, intent: Intent, question: &str) -> Result<QueryResult> {
        let question = question.to_lowercase();
        match intent {
            Intent::Count => self.count(&question),
            Intent::Search => self.search(&question),
            Intent::Price => self.price(&question),
            Intent::Categories => self.categories(),
            Intent::Statistics => self.statistics(),
            Intent::Filter => self.filter(&question),
        }
    }

    /// First known category whose lower-cased value occurs in the question
    pub fn extract_category(&self, question: &str) -> Result<Option<String>> {
        let table = self.store.table()?;
        let Some(column) = ColumnResolver::new(table.columns()).resolve(CATEGORY_ALIASES) else {
            return Ok(None);
        };

        let question = question.to_lowercase();
        let found = table.distinct_values(column).into_iter().find(|value| {
            let needle = value.trim().to_lowercase();
            needle.chars().filter(|c| !c.is_whitespace()).count() >= MIN_TERM_CHARS
                && question.contains(&needle)
        });

        debug!(category = ?found, "Category extraction");
        Ok(found)
    }

    fn count(&self, question: &str) -> Result<QueryResult> {
        let table = self.store.table()?;

        if let Some(category) = self.extract_category(question)? {
            let rows = self.store.find_by_category(&category)?;
            return Ok(QueryResult::new(
                Intent::Count,
                format!(
                    "Hay {} producto(s) en la categoría '{}'",
                    rows.len(),
                    category
                ),
                json!({ "cantidad": rows.len(), "categoria": category, "productos": rows }),
            ));
        }

        Ok(QueryResult::new(
            Intent::Count,
            format!("Hay {} productos en total en el inventario", table.len()),
            json!({ "cantidad": table.len() }),
        ))
    }

    fn categories(&self) -> Result<QueryResult> {
        let table = self.store.table()?;
        let categories = ColumnResolver::new(table.columns())
            .resolve(CATEGORY_ALIASES)
            .map(|column| table.distinct_values(column))
            .unwrap_or_default();

        if categories.is_empty() {
            return Ok(QueryResult::new(
                Intent::Categories,
                "No se encontraron categorías en el inventario",
                json!({ "categorias": [], "total": 0 }),
            ));
        }

        Ok(QueryResult::new(
            Intent::Categories,
            format!(
                "Las categorías disponibles son: {}",
                categories.join(", ")
            ),
            json!({ "total": categories.len(), "categorias": categories }),
        ))
    }

    fn price(&self, question: &str) -> Result<QueryResult> {
        let table = self.store.table()?;
        let Some(priced) = priced_rows(table) else {
            return Ok(QueryResult::empty(
                Intent::Price,
                "No se encontró información de precios en el inventario",
            ));
        };
        if priced.is_empty() {
            return Ok(QueryResult::empty(
                Intent::Price,
                "No hay precios registrados en el inventario",
            ));
        }

        if contains_any(question, EXPENSIVE_WORDS) {
            let (row, price) = first_extreme(priced.iter().copied(), |candidate, best| {
                candidate > best
            })
            .unwrap_or(priced[0]);
            return Ok(QueryResult::new(
                Intent::Price,
                format!(
                    "El producto más caro es '{}' con un precio de {}",
                    product_name(table, row),
                    format_money(price)
                ),
                json!(row),
            ));
        }

        let positive: Vec<(&Row, f64)> = priced.iter().copied().filter(|(_, p)| *p > 0.0).collect();

        if contains_any(question, CHEAP_WORDS) {
            let Some((row, price)) =
                first_extreme(positive.iter().copied(), |candidate, best| candidate < best)
            else {
                return Ok(no_positive_prices(Intent::Price));
            };
            return Ok(QueryResult::new(
                Intent::Price,
                format!(
                    "El producto más económico es '{}' con un precio de {}",
                    product_name(table, row),
                    format_money(price)
                ),
                json!(row),
            ));
        }

        let max = priced
            .iter()
            .map(|(_, p)| *p)
            .fold(f64::NEG_INFINITY, f64::max);
        let Some(min) = positive.iter().map(|(_, p)| *p).reduce(f64::min) else {
            return Ok(no_positive_prices(Intent::Price));
        };

        Ok(QueryResult::new(
            Intent::Price,
            format!(
                "Los precios van desde {} hasta {}",
                format_money(min),
                format_money(max)
            ),
            json!({ "precio_minimo": min, "precio_maximo": max }),
        ))
    }

    fn statistics(&self) -> Result<QueryResult> {
        let table = self.store.table()?;
        let mut data = Map::new();
        let mut lines = vec![
            "Estadísticas del inventario:".to_string(),
            format!("• Total de productos: {}", table.len()),
        ];
        data.insert("total_productos".into(), json!(table.len()));

        if let Some(priced) = priced_rows(table) {
            let mut positive: Vec<f64> = priced.iter().map(|(_, p)| *p).filter(|p| *p > 0.0).collect();
            if positive.is_empty() {
                data.insert("sin_precios_positivos".into(), Value::Bool(true));
                lines.push("• No hay productos con precio mayor a cero".to_string());
            } else {
                positive.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let mean = positive.iter().sum::<f64>() / positive.len() as f64;
                let median = median(&positive);
                data.insert("precio_promedio".into(), json!(mean));
                data.insert("precio_mediana".into(), json!(median));
                data.insert("precio_minimo".into(), json!(positive[0]));
                data.insert("precio_maximo".into(), json!(positive[positive.len() - 1]));
                lines.push(format!("• Precio promedio: {}", format_money(mean)));
                lines.push(format!("• Precio mediana: {}", format_money(median)));
            }
        }

        let counts = category_counts(table);
        if !counts.is_empty() {
            lines.push(format!("• Categorías: {}", counts.len()));
            let counts: Map<String, Value> =
                counts.into_iter().map(|(k, v)| (k, json!(v))).collect();
            data.insert("productos_por_categoria".into(), Value::Object(counts));
        }

        Ok(QueryResult::new(Intent::Statistics, lines.join("\n"), Value::Object(data)))
    }

    fn filter(&self, question: &str) -> Result<QueryResult> {
        let Some((low, high)) = price_bounds(question) else {
            return Ok(QueryResult::empty(
                Intent::Filter,
                "Por favor especifica un rango de precios, por ejemplo: 'productos entre 10000 y 50000'",
            ));
        };

        let table = self.store.table()?;
        let Some(priced) = priced_rows(table) else {
            return Ok(QueryResult::empty(
                Intent::Filter,
                "No se encontró información de precios para filtrar",
            ));
        };

        let rows: Vec<&Row> = priced
            .iter()
            .filter(|(_, p)| *p >= low && *p <= high)
            .map(|(row, _)| *row)
            .collect();
        debug!(low, high, matched = rows.len(), "Price range filter");

        Ok(QueryResult::new(
            Intent::Filter,
            format!(
                "Encontré {} producto(s) entre {} y {}",
                rows.len(),
                format_money(low),
                format_money(high)
            ),
            json!({
                "cantidad": rows.len(),
                "rango": { "minimo": low, "maximo": high },
                "productos": rows,
            }),
        ))
    }

    fn search(&self, question: &str) -> Result<QueryResult> {
        let table = self.store.table()?;

        if let Some(category) = self.extract_category(question)? {
            let rows = self.store.find_by_category(&category)?;
            return Ok(QueryResult::new(
                Intent::Search,
                format!(
                    "Encontré {} producto(s) en la categoría '{}'",
                    rows.len(),
                    category
                ),
                json!({ "cantidad": rows.len(), "categoria": category, "productos": rows }),
            ));
        }

        if let Some(term) = search_tokens(question).into_iter().next() {
            let rows = self.store.find_by_name_substring(&term)?;
            if !rows.is_empty() {
                return Ok(QueryResult::new(
                    Intent::Search,
                    format!(
                        "Encontré {} producto(s) relacionado(s) con '{}'",
                        rows.len(),
                        term
                    ),
                    json!({ "cantidad": rows.len(), "termino_busqueda": term, "productos": rows }),
                ));
            }
            debug!(term = %term, "No products matched, showing inventory sample");
        }

        let sample: Vec<&Row> = table.rows().iter().take(self.fallback_limit).collect();
        Ok(QueryResult::new(
            Intent::Search,
            format!(
                "Mostrando todos los productos del inventario ({} en total)",
                table.len()
            ),
            json!({ "cantidad": table.len(), "productos": sample }),
        ))
    }
}

/// Rows with a numeric price, or `None` when no price column exists
fn priced_rows(table: &Table) -> Option<Vec<(&Row, f64)>> {
    let column = ColumnResolver::new(table.columns()).find_containing(PRICE_SYNONYMS)?;
    let index = table.column_index(column)?;
    Some(
        table
            .rows()
            .iter()
            .filter_map(|row| row.get_at(index).and_then(|c| c.as_number()).map(|p| (row, p)))
            .collect(),
    )
}

/// First row whose price beats every earlier one under `better`
fn first_extreme<'t, I, F>(rows: I, better: F) -> Option<(&'t Row, f64)>
where
    I: Iterator<Item = (&'t Row, f64)>,
    F: Fn(f64, f64) -> bool,
{
    rows.fold(None, |best, candidate| match best {
        Some((_, price)) if !better(candidate.1, price) => best,
        _ => Some(candidate),
    })
}

fn no_positive_prices(intent: Intent) -> QueryResult {
    QueryResult::new(
        intent,
        "No hay productos con precio mayor a cero",
        json!({ "sin_precios_positivos": true }),
    )
}

fn product_name(table: &Table, row: &Row) -> String {
    ColumnResolver::new(table.columns())
        .resolve(DESCRIPTION_ALIASES)
        .and_then(|column| row.get(column))
        .map(|cell| cell.to_string())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Producto".to_string())
}

/// Median of an ascending, non-empty slice
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Product count per non-empty category, first-seen order
fn category_counts(table: &Table) -> Vec<(String, usize)> {
    let Some(column) = ColumnResolver::new(table.columns()).resolve(CATEGORY_ALIASES) else {
        return Vec::new();
    };

    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in table.column_values(column) {
        let key = value.to_string();
        if key.trim().is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}
