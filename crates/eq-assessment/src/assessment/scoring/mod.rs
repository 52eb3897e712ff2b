mod rules;

pub use rules::{Polarity, CONFIDENCE_THRESHOLD, HIGH_EQ_KEYWORDS};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{Category, ResponseRecord, UserProfile};
use super::sentiment::SentimentResult;
use rules::{round_one_decimal, score_category};

/// Per-category scores plus their average, stored as one flat document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(flatten)]
    pub categories: BTreeMap<Category, f64>,
    #[serde(rename = "Overall")]
    pub overall: f64,
}

impl ScoreRecord {
    pub fn get(&self, category: Category) -> Option<f64> {
        self.categories.get(&category).copied()
    }
}

/// Audit trail for a single category score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub category: Category,
    pub label: String,
    pub polarity: Option<Polarity>,
    pub confidence: f64,
    pub word_count: Option<usize>,
    pub base: f64,
    pub length_adjustment: f64,
    pub keyword_bonus: f64,
    pub demographic_adjustment: f64,
    pub score: f64,
}

/// Scores and the trail that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub record: ScoreRecord,
    pub components: Vec<ScoreComponent>,
}

/// Stateless calculator turning classifier output and answers into scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCalculator;

impl ScoreCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(
        &self,
        sentiments: &BTreeMap<Category, SentimentResult>,
        responses: &ResponseRecord,
        profile: &UserProfile,
    ) -> ScoreRecord {
        self.score_card(sentiments, responses, profile).record
    }

    /// Overall always divides by the full category count, so a missing sentiment drags
    /// the average down rather than being skipped.
    pub fn score_card(
        &self,
        sentiments: &BTreeMap<Category, SentimentResult>,
        responses: &ResponseRecord,
        profile: &UserProfile,
    ) -> ScoreCard {
        let mut categories = BTreeMap::new();
        let mut components = Vec::with_capacity(Category::ALL.len());
        let mut overall_sum = 0.0;

        for category in Category::ALL {
            let Some(sentiment) = sentiments.get(&category) else {
                continue;
            };

            let response = responses.get(&category).map(String::as_str);
            let (component, raw) = score_category(category, sentiment, response, profile);

            info!(
                category = %category,
                label = %component.label,
                confidence = component.confidence,
                score = component.score,
                "category scored"
            );

            categories.insert(category, component.score);
            overall_sum += raw;
            components.push(component);
        }

        let overall = round_one_decimal(overall_sum / Category::ALL.len() as f64);
        info!(overall, "overall score calculated");

        ScoreCard {
            record: ScoreRecord {
                categories,
                overall,
            },
            components,
        }
    }
}
