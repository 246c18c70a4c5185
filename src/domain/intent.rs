use serde::{Deserialize, Serialize};
use std::fmt;

/// Query intents, in declaration order.
///
/// The order is part of the classifier contract: when two intents reach the
/// same keyword score, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Count,
    Search,
    Price,
    Categories,
    Statistics,
    Filter,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Count,
        Intent::Search,
        Intent::Price,
        Intent::Categories,
        Intent::Statistics,
        Intent::Filter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Count => "count",
            Intent::Search => "search",
            Intent::Price => "price",
            Intent::Categories => "categories",
            Intent::Statistics => "statistics",
            Intent::Filter => "filter",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Intent::Statistics).unwrap(), "\"statistics\"");
        let back: Intent = serde_json::from_str("\"filter\"").unwrap();
        assert_eq!(back, Intent::Filter);
    }

    #[test]
    fn test_declaration_order() {
        let names: Vec<&str> = Intent::ALL.iter().map(Intent::as_str).collect();
        assert_eq!(
            names,
            vec!["count", "search", "price", "categories", "statistics", "filter"]
        );
    }
}
