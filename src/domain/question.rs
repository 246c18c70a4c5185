use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::{AppError, Result};

pub const MIN_QUESTION_CHARS: u64 = 3;
pub const MAX_QUESTION_CHARS: u64 = 500;

/// A natural-language question, trimmed and length-checked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[validate(length(min = 3, max = 500))]
    pub text: String,
}

impl Question {
    pub fn parse(raw: &str) -> Result<Self> {
        let question = Self {
            text: raw.trim().to_string(),
        };
        question.validate().map_err(|_| {
            AppError::InvalidArgument(format!(
                "question must be between {} and {} characters",
                MIN_QUESTION_CHARS, MAX_QUESTION_CHARS
            ))
        })?;
        Ok(question)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let q = Question::parse("   cuántos productos hay  ").unwrap();
        assert_eq!(q.as_str(), "cuántos productos hay");
    }

    #[test]
    fn test_length_bounds_count_characters() {
        assert!(Question::parse("  ab  ").is_err());
        assert!(Question::parse("¿ñ?").is_ok());
        assert!(Question::parse(&"á".repeat(500)).is_ok());
        assert!(matches!(
            Question::parse(&"a".repeat(501)),
            Err(AppError::InvalidArgument(_))
        ));
    }
}
