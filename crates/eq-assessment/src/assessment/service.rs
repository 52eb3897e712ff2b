use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::scenario_for_profession;
use super::domain::{
    Category, CategoryQuestion, Profession, ResponseRecord, SeniorityBand, UserProfile,
};
use super::interpretation::{interpret, Interpretation};
use super::questions::generate_questions;
use super::repository::{
    AssessmentResult, NewAssessmentResult, RepositoryError, ResultFilter, ResultId,
    ResultRepository,
};
use super::scoring::{ScoreCalculator, ScoreComponent};
use super::sentiment::{ClassifierError, SentimentAnalyzer};
use super::validation::{validate_response, ResponseIssue};

const DEFAULT_GENDER: &str = "Other";

/// Scenario and questions presented before the respondent answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentPrompt {
    pub profession: Profession,
    pub seniority: SeniorityBand,
    pub scenario: String,
    pub questions: Vec<CategoryQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub age: u32,
    pub profession: String,
}

/// Completed questionnaire as received from the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub age: u32,
    #[serde(default)]
    pub gender: String,
    pub profession: String,
    #[serde(default)]
    pub responses: ResponseRecord,
}

/// Stored result with its interpretation and, right after scoring, the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub result: AssessmentResult,
    pub interpretation: Interpretation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ScoreComponent>,
}

impl AssessmentReport {
    pub fn from_result(result: AssessmentResult) -> Self {
        let interpretation = interpret(&result.scores);
        Self {
            result,
            interpretation,
            components: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("{} response(s) failed validation", .0.len())]
    Validation(Vec<ResponseIssue>),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service composing the scenario catalog, classifier, calculator, and repository.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    analyzer: Arc<SentimentAnalyzer>,
    calculator: ScoreCalculator,
}

impl<R> AssessmentService<R>
where
    R: ResultRepository + 'static,
{
    pub fn new(repository: Arc<R>, analyzer: Arc<SentimentAnalyzer>) -> Self {
        Self {
            repository,
            analyzer,
            calculator: ScoreCalculator::new(),
        }
    }

    pub fn analyzer(&self) -> &Arc<SentimentAnalyzer> {
        &self.analyzer
    }

    /// Scenario and questions for a prospective respondent.
    pub fn start(&self, age: u32, profession: &str) -> Result<AssessmentPrompt, AssessmentError> {
        ensure_age(age)?;
        let name = profession.trim();
        let profession = Profession::from_label(name);
        let scenario = scenario_for_profession(profession, age);
        let display = if name.is_empty() { profession.label() } else { name };

        Ok(AssessmentPrompt {
            profession,
            seniority: SeniorityBand::from_age(age),
            scenario: scenario.to_string(),
            questions: generate_questions(display),
        })
    }

    /// Validate, classify, score, interpret, and persist a submission.
    pub async fn submit(&self, submission: Submission) -> Result<AssessmentReport, AssessmentError> {
        ensure_age(submission.age)?;

        let gender = match submission.gender.trim() {
            "" => DEFAULT_GENDER.to_string(),
            trimmed => trimmed.to_string(),
        };
        let profile = UserProfile::new(submission.age, gender, &submission.profession);
        let responses = submission.responses;

        let issues: Vec<ResponseIssue> = Category::ALL
            .into_iter()
            .filter_map(|category| {
                validate_response(responses.get(&category).map(String::as_str))
                    .err()
                    .map(|problem| ResponseIssue::new(category, problem))
            })
            .collect();
        if !issues.is_empty() {
            return Err(AssessmentError::Validation(issues));
        }

        let scenario = scenario_for_profession(profile.profession, profile.age);

        let mut sentiments = BTreeMap::new();
        for category in Category::ALL {
            let text = responses.get(&category).map(String::as_str).unwrap_or_default();
            let sentiment = self.analyzer.analyze(text).await?;
            sentiments.insert(category, sentiment);
        }

        let card = self
            .calculator
            .score_card(&sentiments, &responses, &profile);
        let interpretation = interpret(&card.record);

        let stored = self.repository.insert(NewAssessmentResult {
            age: profile.age,
            gender: profile.gender.clone(),
            profession: profile.profession,
            scenario_used: scenario.to_string(),
            overall_score: card.record.overall,
            scores: card.record,
            rating: interpretation.rating,
        })?;

        info!(
            result_id = %stored.id,
            profession = %stored.profession,
            overall = stored.overall_score,
            rating = %stored.rating,
            "assessment stored"
        );

        Ok(AssessmentReport {
            result: stored,
            interpretation,
            components: card.components,
        })
    }

    pub fn get(&self, id: ResultId) -> Result<AssessmentReport, AssessmentError> {
        let result = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(AssessmentReport::from_result(result))
    }

    pub fn list(&self, filter: &ResultFilter) -> Result<Vec<AssessmentResult>, AssessmentError> {
        Ok(self.repository.list(filter)?)
    }
}

fn ensure_age(age: u32) -> Result<(), AssessmentError> {
    if age == 0 {
        return Err(AssessmentError::InvalidProfile(
            "age must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
