use std::fmt;

use serde::{Deserialize, Serialize};

use super::scoring::ScoreRecord;

/// Qualitative band derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "High EQ")]
    High,
    #[serde(rename = "Above Average EQ")]
    AboveAverage,
    #[serde(rename = "Average EQ")]
    Average,
    #[serde(rename = "Developing EQ")]
    Developing,
}

impl Rating {
    pub const ALL: [Rating; 4] = [
        Rating::High,
        Rating::AboveAverage,
        Rating::Average,
        Rating::Developing,
    ];

    pub fn from_overall(overall: f64) -> Self {
        if overall >= 80.0 {
            Rating::High
        } else if overall >= 60.0 {
            Rating::AboveAverage
        } else if overall >= 40.0 {
            Rating::Average
        } else {
            Rating::Developing
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::High => "High EQ",
            Rating::AboveAverage => "Above Average EQ",
            Rating::Average => "Average EQ",
            Rating::Developing => "Developing EQ",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|rating| rating.label().eq_ignore_ascii_case(trimmed))
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            Rating::High => "You demonstrate exceptional emotional intelligence. You are likely very good at understanding yourself and others, and navigating complex social situations effectively.",
            Rating::AboveAverage => "You have strong emotional intelligence skills. You generally handle situations well but may have specific areas for growth.",
            Rating::Average => "Your emotional intelligence is average. You are functional in social settings but might struggle with high-stress or complex interpersonal dynamics.",
            Rating::Developing => "You may find emotional situations challenging. Focusing on self-awareness and empathy exercises could be very beneficial.",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub rating: Rating,
    pub feedback: String,
    pub breakdown: ScoreRecord,
}

pub fn interpret(scores: &ScoreRecord) -> Interpretation {
    let rating = Rating::from_overall(scores.overall);
    Interpretation {
        rating,
        feedback: rating.feedback().to_string(),
        breakdown: scores.clone(),
    }
}
