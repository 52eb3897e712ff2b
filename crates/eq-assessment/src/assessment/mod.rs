//! Scenario-based emotional intelligence assessment.
//!
//! The pipeline runs catalog → questions → validation → sentiment → scoring →
//! interpretation → repository. Everything except the sentiment classifier is
//! deterministic, so scoring can be exercised without a model.

pub mod catalog;
pub mod domain;
pub mod interpretation;
pub mod questions;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod sentiment;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{scenario_for, scenario_for_profession};
pub use domain::{
    Category, CategoryQuestion, Profession, ResponseRecord, SeniorityBand, UserProfile,
};
pub use interpretation::{interpret, Interpretation, Rating};
pub use questions::generate_questions;
pub use repository::{
    AssessmentResult, InMemoryResultRepository, NewAssessmentResult, RepositoryError,
    ResultFilter, ResultId, ResultRepository, ResultSummaryView,
};
pub use router::assessment_router;
pub use scoring::{ScoreCalculator, ScoreCard, ScoreComponent, ScoreRecord};
pub use sentiment::{
    ClassifierError, InferenceApiLoader, LabelScore, LoadStatus, ModelLoader, SentimentAnalyzer,
    SentimentModel, SentimentResult,
};
pub use service::{
    AssessmentError, AssessmentPrompt, AssessmentReport, AssessmentService, StartRequest,
    Submission,
};
pub use store::{export_csv, JsonFileResultRepository, StoreError};
pub use validation::{validate_response, ResponseIssue, ResponseProblem};
