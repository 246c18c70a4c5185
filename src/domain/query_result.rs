use serde::Serialize;
use serde_json::Value;

use super::intent::Intent;

/// Structured answer to a natural-language question.
///
/// `data` changes shape per intent (object for most, empty list for the
/// "need more input" and "no price data" answers).
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub summary: String,
    pub intent: Intent,
    pub data: Value,
}

impl QueryResult {
    pub fn new(intent: Intent, summary: impl Into<String>, data: Value) -> Self {
        Self {
            summary: summary.into(),
            intent,
            data,
        }
    }

    /// Answer with no payload
    pub fn empty(intent: Intent, summary: impl Into<String>) -> Self {
        Self::new(intent, summary, Value::Array(Vec::new()))
    }
}
