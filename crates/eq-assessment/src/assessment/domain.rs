use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed assessment dimensions, ordered the way questions are asked and scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Self-awareness")]
    SelfAwareness,
    #[serde(rename = "Emotional regulation")]
    EmotionalRegulation,
    #[serde(rename = "Conflict resolution")]
    ConflictResolution,
    #[serde(rename = "Emotional resilience")]
    EmotionalResilience,
    #[serde(rename = "Empathy / cultural awareness")]
    EmpathyCulturalAwareness,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::SelfAwareness,
        Category::EmotionalRegulation,
        Category::ConflictResolution,
        Category::EmotionalResilience,
        Category::EmpathyCulturalAwareness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::SelfAwareness => "Self-awareness",
            Category::EmotionalRegulation => "Emotional regulation",
            Category::ConflictResolution => "Conflict resolution",
            Category::EmotionalResilience => "Emotional resilience",
            Category::EmpathyCulturalAwareness => "Empathy / cultural awareness",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profession groups with dedicated scenarios; anything else folds into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Profession {
    #[serde(rename = "IT Professional")]
    ItProfessional,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Teacher")]
    Teacher,
    #[serde(rename = "Law Enforcement & Social Work")]
    LawEnforcementSocialWork,
    #[serde(rename = "Business & Management")]
    BusinessManagement,
    #[serde(rename = "Creative & Media")]
    CreativeMedia,
    #[serde(rename = "Other")]
    Other,
}

impl Profession {
    pub const KNOWN: [Profession; 6] = [
        Profession::ItProfessional,
        Profession::Healthcare,
        Profession::Teacher,
        Profession::LawEnforcementSocialWork,
        Profession::BusinessManagement,
        Profession::CreativeMedia,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Profession::ItProfessional => "IT Professional",
            Profession::Healthcare => "Healthcare",
            Profession::Teacher => "Teacher",
            Profession::LawEnforcementSocialWork => "Law Enforcement & Social Work",
            Profession::BusinessManagement => "Business & Management",
            Profession::CreativeMedia => "Creative & Media",
            Profession::Other => "Other",
        }
    }

    /// Exact match against the known labels; unexpected values are not an error.
    pub fn from_label(value: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|profession| profession.label() == value)
            .unwrap_or(Profession::Other)
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seniority derived from the respondent's age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeniorityBand {
    Junior,
    #[serde(rename = "Mid-Senior")]
    MidSenior,
    Senior,
}

impl SeniorityBand {
    pub fn from_age(age: u32) -> Self {
        if age < 30 {
            SeniorityBand::Junior
        } else if age <= 45 {
            SeniorityBand::MidSenior
        } else {
            SeniorityBand::Senior
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeniorityBand::Junior => "Junior",
            SeniorityBand::MidSenior => "Mid-Senior",
            SeniorityBand::Senior => "Senior",
        }
    }
}

/// Demographics captured with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub gender: String,
    pub profession: Profession,
}

impl UserProfile {
    pub fn new(age: u32, gender: impl Into<String>, profession: &str) -> Self {
        Self {
            age,
            gender: gender.into(),
            profession: Profession::from_label(profession),
        }
    }

    pub fn seniority(&self) -> SeniorityBand {
        SeniorityBand::from_age(self.age)
    }
}

/// Prompt shown for a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuestion {
    pub category: Category,
    pub prompt: String,
}

/// Free-text answers keyed by category.
pub type ResponseRecord = BTreeMap<Category, String>;
