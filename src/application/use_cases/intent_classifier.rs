//! Rule-based intent classifier
//!
//! Scores a question against a fixed, ordered list of (intent, triggers)
//! pairs. The score of an intent is the number of its triggers that occur
//! as substrings of the lower-cased question. The strictly highest score
//! wins; ties go to the intent declared first; a question with no trigger
//! at all is routed to `Search`.
//!
//! Triggers are lower-case and accent-sensitive as written, so both the
//! accented and plain spellings are listed.

use serde::Serialize;
use tracing::debug;

use crate::domain::intent::Intent;

/// Intent selected when nothing matches
pub const DEFAULT_INTENT: Intent = Intent::Search;

/// One routing rule
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub triggers: &'static [&'static str],
}

/// Routing table, in tie-break order
pub const INTENT_RULES: [IntentRule; 6] = [
    IntentRule {
        intent: Intent::Count,
        triggers: &["cuántos", "cuantos", "cantidad", "total", "número", "numero", "hay"],
    },
    IntentRule {
        intent: Intent::Search,
        triggers: &["buscar", "encontrar", "dame", "muestra", "ver", "lista"],
    },
    IntentRule {
        intent: Intent::Price,
        triggers: &["precio", "costo", "valor", "caro", "barato", "económico", "economico"],
    },
    IntentRule {
        intent: Intent::Categories,
        triggers: &[
            "categoría",
            "categoria",
            "categorías",
            "categorias",
            "tipo",
            "tipos",
            "clase",
        ],
    },
    IntentRule {
        intent: Intent::Statistics,
        triggers: &[
            "promedio",
            "media",
            "estadística",
            "estadistica",
            "análisis",
            "analisis",
        ],
    },
    IntentRule {
        intent: Intent::Filter,
        triggers: &["entre", "rango", "mayor", "menor", "desde", "hasta"],
    },
];

/// Score of one intent for one question
#[derive(Debug, Clone, Serialize)]
pub struct IntentScore {
    pub intent: Intent,
    pub score: usize,
    pub matched: Vec<&'static str>,
}

pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(INTENT_RULES.to_vec())
    }
}

impl IntentClassifier {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Per-intent scores in rule order
    pub fn scores(&self, question: &str) -> Vec<IntentScore> {
        let question = question.to_lowercase();
        self.rules
            .iter()
            .map(|rule| {
                let matched: Vec<&'static str> = rule
                    .triggers
                    .iter()
                    .copied()
                    .filter(|trigger| question.contains(trigger))
                    .collect();
                IntentScore {
                    intent: rule.intent,
                    score: matched.len(),
                    matched,
                }
            })
            .collect()
    }

    pub fn classify(&self, question: &str) -> Intent {
        let scores = self.scores(question);

        let mut best: Option<&IntentScore> = None;
        for candidate in &scores {
            if candidate.score > best.map_or(0, |b| b.score) {
                best = Some(candidate);
            }
        }

        let intent = best.map_or(DEFAULT_INTENT, |b| b.intent);
        debug!(
            intent = %intent,
            scores = ?scores.iter().map(|s| (s.intent.as_str(), s.score)).collect::<Vec<_>>(),
            "Classified question"
        );
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keywords_defaults_to_search() {
        let classifier = IntentClassifier::default();
        assert_eq!(classifier.classify("hola"), Intent::Search);
        assert_eq!(classifier.classify("productos"), Intent::Search);
        assert_eq!(classifier.classify("omega 3"), Intent::Search);
    }

    #[test]
    fn test_scenario_questions() {
        let classifier = IntentClassifier::default();
        assert_eq!(classifier.classify("¿Cuál es el producto más caro?"), Intent::Price);
        assert_eq!(classifier.classify("productos entre 10000 y 50000"), Intent::Filter);
        assert_eq!(classifier.classify("cuántos productos hay"), Intent::Count);
    }

    #[test]
    fn test_uppercase_input() {
        let classifier = IntentClassifier::default();
        assert_eq!(classifier.classify("¿CUÁNTOS PRODUCTOS HAY?"), Intent::Count);
        assert_eq!(classifier.classify("ESTADÍSTICAS del inventario"), Intent::Statistics);
    }

    #[test]
    fn test_strict_winner_regardless_of_word_order() {
        let classifier = IntentClassifier::default();
        // categories scores 4 ("categoría", "categorías", "tipo", "tipos"), search 1 ("lista")
        let a = "lista de tipos y categorías";
        let b = "categorías y tipos: lista";
        assert_eq!(classifier.classify(a), Intent::Categories);
        assert_eq!(classifier.classify(b), Intent::Categories);
    }

    #[test]
    fn test_ties_follow_declaration_order() {
        let classifier = IntentClassifier::default();
        // count: "cantidad"; price: "precio" → tie, count declared first
        assert_eq!(classifier.classify("cantidad y precio"), Intent::Count);
        // price: "barato"; filter: "rango" → tie, price declared first
        assert_eq!(classifier.classify("rango barato"), Intent::Price);
    }

    #[test]
    fn test_scores_report_matches() {
        let classifier = IntentClassifier::default();
        let scores = classifier.scores("¿Cuál es el precio promedio?");
        let price = scores.iter().find(|s| s.intent == Intent::Price).unwrap();
        let stats = scores.iter().find(|s| s.intent == Intent::Statistics).unwrap();

        assert_eq!(price.matched, vec!["precio"]);
        assert_eq!(stats.matched, vec!["promedio"]);
        // tie → price wins by declaration order
        assert_eq!(classifier.classify("¿Cuál es el precio promedio?"), Intent::Price);
    }
}
