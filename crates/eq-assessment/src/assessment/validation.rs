use serde::{Deserialize, Serialize};

use super::domain::Category;

pub const MINIMUM_WORDS: usize = 5;

/// Why a free-text answer was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResponseProblem {
    #[error("Response cannot be empty.")]
    Empty,
    #[error("Response is too short. Please elaborate.")]
    TooShort,
}

/// Validation failure attributed to a single category, as surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseIssue {
    pub category: Category,
    pub message: String,
}

impl ResponseIssue {
    pub fn new(category: Category, problem: ResponseProblem) -> Self {
        Self {
            category,
            message: problem.to_string(),
        }
    }
}

/// Checks that an answer exists and carries at least a handful of words.
pub fn validate_response(text: Option<&str>) -> Result<(), ResponseProblem> {
    let text = match text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ResponseProblem::Empty),
    };

    if word_count(text) < MINIMUM_WORDS {
        return Err(ResponseProblem::TooShort);
    }

    Ok(())
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_missing_answers_are_rejected() {
        assert_eq!(validate_response(None), Err(ResponseProblem::Empty));
        assert_eq!(validate_response(Some("")), Err(ResponseProblem::Empty));
        assert_eq!(
            ResponseProblem::Empty.to_string(),
            "Response cannot be empty."
        );
    }

    #[test]
    fn short_answers_ask_for_more_detail() {
        assert_eq!(validate_response(Some("ok")), Err(ResponseProblem::TooShort));
        assert_eq!(
            validate_response(Some("   \n\t ")),
            Err(ResponseProblem::TooShort)
        );
        assert_eq!(
            validate_response(Some("I would stay calm")),
            Err(ResponseProblem::TooShort)
        );
        assert_eq!(
            ResponseProblem::TooShort.to_string(),
            "Response is too short. Please elaborate."
        );
    }

    #[test]
    fn five_words_are_enough() {
        assert_eq!(validate_response(Some("I would stay very calm")), Ok(()));
        assert_eq!(
            validate_response(Some("  I   would\nstay very\tcalm  ")),
            Ok(())
        );
    }

    #[test]
    fn issue_carries_category_and_message() {
        let issue = ResponseIssue::new(Category::ConflictResolution, ResponseProblem::TooShort);
        assert_eq!(issue.category, Category::ConflictResolution);
        assert_eq!(issue.message, "Response is too short. Please elaborate.");
    }
}
