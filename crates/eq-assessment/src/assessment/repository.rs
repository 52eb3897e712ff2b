use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Profession;
use super::interpretation::Rating;
use super::scoring::ScoreRecord;

/// Sequential identifier assigned by the repository on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub u64);

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scored assessment ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssessmentResult {
    pub age: u32,
    pub gender: String,
    pub profession: Profession,
    pub scenario_used: String,
    pub scores: ScoreRecord,
    pub overall_score: f64,
    pub rating: Rating,
}

/// Persisted assessment. Never modified after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: ResultId,
    pub age: u32,
    pub gender: String,
    pub profession: Profession,
    pub scenario_used: String,
    pub created_at: DateTime<Utc>,
    pub scores: ScoreRecord,
    pub overall_score: f64,
    pub rating: Rating,
}

impl AssessmentResult {
    pub fn from_new(id: ResultId, created_at: DateTime<Utc>, result: NewAssessmentResult) -> Self {
        Self {
            id,
            age: result.age,
            gender: result.gender,
            profession: result.profession,
            scenario_used: result.scenario_used,
            created_at,
            scores: result.scores,
            overall_score: result.overall_score,
            rating: result.rating,
        }
    }

    pub fn summary_view(&self) -> ResultSummaryView {
        ResultSummaryView {
            id: self.id,
            profession: self.profession.label(),
            age: self.age,
            gender: self.gender.clone(),
            overall_score: self.overall_score,
            rating: self.rating.label(),
            created_at: self.created_at,
        }
    }
}

/// Listing row exposing the columns reviewers sort and filter on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummaryView {
    pub id: ResultId,
    pub profession: &'static str,
    pub age: u32,
    pub gender: String,
    pub overall_score: f64,
    pub rating: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Optional narrowing applied when listing results. Query values are read as labels:
/// unknown professions fold to `Other` and blank values mean no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResultFilter {
    #[serde(default, deserialize_with = "deserialize_profession_filter")]
    pub profession: Option<Profession>,
    #[serde(default, deserialize_with = "deserialize_rating_filter")]
    pub rating: Option<Rating>,
    /// Case-insensitive match against profession and rating labels.
    #[serde(default)]
    pub search: Option<String>,
}

impl ResultFilter {
    pub fn matches(&self, result: &AssessmentResult) -> bool {
        if self
            .profession
            .is_some_and(|profession| profession != result.profession)
        {
            return false;
        }
        if self.rating.is_some_and(|rating| rating != result.rating) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                result.profession.label().to_lowercase().contains(&term)
                    || result.rating.label().to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn deserialize_profession_filter<'de, D>(deserializer: D) -> Result<Option<Profession>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(non_blank(raw).map(|label| Profession::from_label(&label)))
}

fn deserialize_rating_filter<'de, D>(deserializer: D) -> Result<Option<Rating>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    non_blank(raw)
        .map(|label| {
            Rating::from_label(&label)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown rating '{label}'")))
        })
        .transpose()
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ResultRepository: Send + Sync {
    fn insert(&self, result: NewAssessmentResult) -> Result<AssessmentResult, RepositoryError>;
    fn fetch(&self, id: ResultId) -> Result<Option<AssessmentResult>, RepositoryError>;
    /// Matching results, newest first.
    fn list(&self, filter: &ResultFilter) -> Result<Vec<AssessmentResult>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResultRepository {
    records: Arc<Mutex<Vec<AssessmentResult>>>,
}

impl InMemoryResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records. A poisoned lock still holds every completed insert,
    /// since a push cannot be observed half done, so the count is read through it.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultRepository for InMemoryResultRepository {
    fn insert(&self, result: NewAssessmentResult) -> Result<AssessmentResult, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let id = ResultId(guard.len() as u64 + 1);
        let stored = AssessmentResult::from_new(id, Utc::now(), result);
        guard.push(stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: ResultId) -> Result<Option<AssessmentResult>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    fn list(&self, filter: &ResultFilter) -> Result<Vec<AssessmentResult>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(newest_first(guard.iter().filter(|record| filter.matches(record))))
    }
}

pub(crate) fn newest_first<'a>(
    records: impl Iterator<Item = &'a AssessmentResult>,
) -> Vec<AssessmentResult> {
    let mut matching: Vec<_> = records.cloned().collect();
    matching.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then(right.id.cmp(&left.id))
    });
    matching
}
