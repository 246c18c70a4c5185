// ============================================================
// QUESTION PARSING
// ============================================================
// Parameter extraction from raw question text: numeric literals, search
// tokens and vocabulary checks. Pure functions, no table access.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Words that ask for the most expensive product
pub const EXPENSIVE_WORDS: &[&str] = &[
    "caro", "mayor", "máximo", "maximo", "expensive", "highest", "maximum",
];

/// Words that ask for the cheapest product
pub const CHEAP_WORDS: &[&str] = &[
    "barato", "menor", "económico", "economico", "mínimo", "minimo", "cheap", "lowest", "minimum",
];

/// Articles, prepositions and the action verbs of the question itself
pub const SEARCH_STOP_WORDS: &[&str] = &[
    "buscar", "busca", "dame", "muestra", "muéstrame", "ver", "lista", "encontrar", "quiero",
    "productos", "producto", "de", "del", "la", "el", "los", "las", "un", "una", "con", "por",
    "para",
];

/// Shortest token used as a name search term
pub const MIN_TOKEN_CHARS: usize = 3;

/// All integer or decimal literals in order of appearance
pub fn extract_numbers(question: &str) -> Vec<f64> {
    NUMBER_PATTERN
        .find_iter(question)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// The two smallest numbers in the question as `(low, high)`
pub fn price_bounds(question: &str) -> Option<(f64, f64)> {
    let mut numbers = extract_numbers(question);
    if numbers.len() < 2 {
        return None;
    }
    numbers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some((numbers[0], numbers[1]))
}

/// Whitespace tokens without edge punctuation, stop words or short words
pub fn search_tokens(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|word| !SEARCH_STOP_WORDS.contains(&word.as_str()))
        .collect()
}

pub fn contains_any(question: &str, words: &[&str]) -> bool {
    words.iter().any(|w| question.contains(w))
}

/// `$45,000` style amount, rounded to whole units
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
