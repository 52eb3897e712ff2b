use serde::{Deserialize, Serialize};

use super::super::domain::{Category, UserProfile};
use super::super::sentiment::SentimentResult;
use super::super::validation::word_count;
use super::ScoreComponent;

/// Below this confidence a polarized label is treated as neutral.
pub const CONFIDENCE_THRESHOLD: f64 = 0.75;

/// Base score when the label matches no known scheme.
const UNRECOGNIZED_BASE: f64 = 60.0;

pub const HIGH_EQ_KEYWORDS: [&str; 14] = [
    "listen",
    "understand",
    "perspective",
    "calm",
    "breathe",
    "reflect",
    "empathy",
    "solution",
    "team",
    "growth",
    "learn",
    "ask",
    "support",
    "sorry",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

/// Upper-cased model label, or `NEUTRAL` when the model was not confident enough.
pub(crate) fn normalize_label(label: &str, confidence: f64) -> String {
    if confidence < CONFIDENCE_THRESHOLD {
        "NEUTRAL".to_string()
    } else {
        label.to_uppercase()
    }
}

/// Accepts bucket-indexed (`LABEL_0`..`LABEL_2`) and named label schemes, negative first.
pub(crate) fn polarity_of(normalized_label: &str) -> Option<Polarity> {
    if normalized_label.contains('0') || normalized_label == "NEGATIVE" {
        Some(Polarity::Negative)
    } else if normalized_label.contains('1') || normalized_label == "NEUTRAL" {
        Some(Polarity::Neutral)
    } else if normalized_label.contains('2') || normalized_label == "POSITIVE" {
        Some(Polarity::Positive)
    } else {
        None
    }
}

pub(crate) fn base_score(polarity: Option<Polarity>, confidence: f64) -> f64 {
    match polarity {
        Some(Polarity::Negative) => 50.0 - confidence * 30.0,
        Some(Polarity::Neutral) => 50.0 + confidence * 15.0,
        Some(Polarity::Positive) => 60.0 + confidence * 25.0,
        None => UNRECOGNIZED_BASE,
    }
}

pub(crate) fn length_adjustment(words: usize) -> f64 {
    if words < 15 {
        -10.0
    } else if words > 80 {
        10.0
    } else if words > 40 {
        5.0
    } else {
        0.0
    }
}

/// Flat bonus when any keyword appears, no matter how many do.
pub(crate) fn keyword_bonus(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    if HIGH_EQ_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        5.0
    } else {
        0.0
    }
}

pub(crate) fn demographic_adjustment(
    category: Category,
    polarity: Option<Polarity>,
    profile: &UserProfile,
) -> f64 {
    match category {
        Category::EmotionalRegulation
            if profile.age > 40 && polarity != Some(Polarity::Positive) =>
        {
            -5.0
        }
        Category::EmpathyCulturalAwareness
            if profile.gender.to_lowercase() == "male" && polarity == Some(Polarity::Positive) =>
        {
            2.0
        }
        _ => 0.0,
    }
}

/// Rounds the exact binary value to one decimal place, ties to even. Scaling by ten
/// first would round values such as 80.25 up instead of down.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Scores one category. The returned raw score is clamped but not yet rounded.
pub(crate) fn score_category(
    category: Category,
    sentiment: &SentimentResult,
    response: Option<&str>,
    profile: &UserProfile,
) -> (ScoreComponent, f64) {
    let confidence = sentiment.confidence;
    let label = normalize_label(&sentiment.label, confidence);
    let polarity = polarity_of(&label);
    let base = base_score(polarity, confidence);

    let (words, length, keywords) = match response {
        Some(text) => {
            let words = word_count(text);
            (Some(words), length_adjustment(words), keyword_bonus(text))
        }
        None => (None, 0.0, 0.0),
    };
    let demographic = demographic_adjustment(category, polarity, profile);

    let raw = (base + length + keywords + demographic).clamp(0.0, 100.0);

    let component = ScoreComponent {
        category,
        label,
        polarity,
        confidence,
        word_count: words,
        base: round_one_decimal(base),
        length_adjustment: length,
        keyword_bonus: keywords,
        demographic_adjustment: demographic,
        score: round_one_decimal(raw),
    };

    (component, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_confidence_forces_neutral() {
        assert_eq!(normalize_label("negative", 0.74), "NEUTRAL");
        assert_eq!(normalize_label("LABEL_2", 0.1), "NEUTRAL");
        assert_eq!(normalize_label("negative", 0.75), "NEGATIVE");
    }

    #[test]
    fn label_schemes_resolve_in_priority_order() {
        assert_eq!(polarity_of("LABEL_0"), Some(Polarity::Negative));
        assert_eq!(polarity_of("LABEL_1"), Some(Polarity::Neutral));
        assert_eq!(polarity_of("LABEL_2"), Some(Polarity::Positive));
        assert_eq!(polarity_of("NEGATIVE"), Some(Polarity::Negative));
        assert_eq!(polarity_of("NEUTRAL"), Some(Polarity::Neutral));
        assert_eq!(polarity_of("POSITIVE"), Some(Polarity::Positive));
        assert_eq!(polarity_of("LABEL_10"), Some(Polarity::Negative));
        assert_eq!(polarity_of("JOY"), None);
    }

    #[test]
    fn base_scores_span_documented_ranges() {
        assert_eq!(base_score(Some(Polarity::Negative), 1.0), 20.0);
        assert_eq!(base_score(Some(Polarity::Negative), 0.0), 50.0);
        assert_eq!(base_score(Some(Polarity::Neutral), 1.0), 65.0);
        assert_eq!(base_score(Some(Polarity::Positive), 1.0), 85.0);
        assert_eq!(base_score(None, 0.9), 60.0);
    }

    #[test]
    fn length_adjustment_is_a_priority_chain() {
        assert_eq!(length_adjustment(0), -10.0);
        assert_eq!(length_adjustment(14), -10.0);
        assert_eq!(length_adjustment(15), 0.0);
        assert_eq!(length_adjustment(40), 0.0);
        assert_eq!(length_adjustment(41), 5.0);
        assert_eq!(length_adjustment(80), 5.0);
        assert_eq!(length_adjustment(81), 10.0);
    }

    #[test]
    fn keyword_bonus_applies_once() {
        assert_eq!(keyword_bonus("I would Listen first"), 5.0);
        assert_eq!(
            keyword_bonus("listen, understand, stay calm, breathe, then support the team"),
            5.0
        );
        assert_eq!(keyword_bonus("I'd ask questions"), 5.0);
        assert_eq!(keyword_bonus("I would walk away"), 0.0);
    }

    #[test]
    fn keywords_match_inside_words() {
        assert_eq!(keyword_bonus("Misunderstandings happen"), 5.0);
        assert_eq!(keyword_bonus("a basket of apples"), 5.0, "'ask' inside 'basket'");
    }

    #[test]
    fn regulation_penalty_applies_to_older_non_positive_respondents() {
        let older = UserProfile::new(41, "Female", "Teacher");
        let boundary = UserProfile::new(40, "Female", "Teacher");

        assert_eq!(
            demographic_adjustment(Category::EmotionalRegulation, Some(Polarity::Neutral), &older),
            -5.0
        );
        assert_eq!(
            demographic_adjustment(Category::EmotionalRegulation, None, &older),
            -5.0
        );
        assert_eq!(
            demographic_adjustment(
                Category::EmotionalRegulation,
                Some(Polarity::Positive),
                &older
            ),
            0.0
        );
        assert_eq!(
            demographic_adjustment(
                Category::EmotionalRegulation,
                Some(Polarity::Negative),
                &boundary
            ),
            0.0
        );
    }

    #[test]
    fn empathy_bonus_requires_positive_label() {
        let profile = UserProfile::new(30, "MALE", "Other");
        assert_eq!(
            demographic_adjustment(
                Category::EmpathyCulturalAwareness,
                Some(Polarity::Positive),
                &profile
            ),
            2.0
        );
        assert_eq!(
            demographic_adjustment(
                Category::EmpathyCulturalAwareness,
                Some(Polarity::Neutral),
                &profile
            ),
            0.0
        );
        assert_eq!(
            demographic_adjustment(Category::SelfAwareness, Some(Polarity::Positive), &profile),
            0.0
        );
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_one_decimal(72.25), 72.2);
        assert_eq!(round_one_decimal(80.25), 80.2);
        assert_eq!(round_one_decimal(79.25), 79.2);
        assert_eq!(round_one_decimal(59.15), 59.1);
        assert_eq!(round_one_decimal(87.35), 87.3);
        assert_eq!(round_one_decimal(13.000000000000004), 13.0);
        assert_eq!(round_one_decimal(64.04), 64.0);
    }
}
