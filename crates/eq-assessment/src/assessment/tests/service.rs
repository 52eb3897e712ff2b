use std::sync::Arc;

use super::common::*;
use crate::assessment::domain::{Category, Profession, SeniorityBand};
use crate::assessment::interpretation::Rating;
use crate::assessment::repository::{
    RepositoryError, ResultFilter, ResultId, ResultRepository,
};
use crate::assessment::sentiment::{ClassifierError, LoadStatus};
use crate::assessment::service::{AssessmentError, Submission};

#[test]
fn start_returns_scenario_and_ordered_questions() {
    let prompt = service().start(25, "IT Professional").expect("prompt");

    assert_eq!(prompt.profession, Profession::ItProfessional);
    assert_eq!(prompt.seniority, SeniorityBand::Junior);
    assert!(prompt.scenario.contains("messy and inefficient"));
    let categories: Vec<_> = prompt.questions.iter().map(|q| q.category).collect();
    assert_eq!(categories, Category::ALL.to_vec());
    assert!(prompt.questions[0].prompt.contains("IT Professional"));
}

#[test]
fn start_folds_unknown_profession_into_other() {
    let prompt = service().start(50, "Astronaut").expect("prompt");
    assert_eq!(prompt.profession, Profession::Other);
    assert_eq!(prompt.seniority, SeniorityBand::Senior);
    assert!(prompt.questions[2].prompt.starts_with("As a Astronaut,"));
}

#[test]
fn start_with_blank_profession_names_the_generic_label() {
    let prompt = service().start(30, "   ").expect("prompt");
    assert_eq!(prompt.profession, Profession::Other);
    assert!(prompt.questions[0].prompt.contains("this Other scenario"));
}

#[test]
fn start_rejects_zero_age() {
    let error = service().start(0, "Teacher").expect_err("age 0 is invalid");
    assert!(matches!(error, AssessmentError::InvalidProfile(_)));
}

#[tokio::test]
async fn submission_is_scored_and_stored() {
    let (service, repository) = service_with(Arc::new(ScriptedLoader::for_fixtures()));

    let report = service.submit(submission()).await.expect("scored");

    assert_eq!(report.result.id, ResultId(1));
    assert_eq!(report.result.overall_score, 63.3);
    assert_eq!(report.result.rating, Rating::AboveAverage);
    assert_eq!(report.interpretation.rating, Rating::AboveAverage);
    assert_eq!(report.result.gender, "Male");
    assert_eq!(report.result.profession, Profession::ItProfessional);
    assert!(report.result.scenario_used.contains("missing deadlines"));
    assert_eq!(report.components.len(), 5);
    assert_eq!(repository.len(), 1);
    assert_eq!(service.analyzer().status(), LoadStatus::Ready);

    let fetched = service.get(report.result.id).expect("stored");
    assert_eq!(fetched.result, report.result);
    assert!(fetched.components.is_empty());
}

#[tokio::test]
async fn validation_reports_every_bad_answer_before_classifying() {
    let loader = Arc::new(ScriptedLoader::for_fixtures());
    let (service, repository) = service_with(loader.clone());

    let mut submission = submission();
    submission
        .responses
        .insert(Category::SelfAwareness, String::new());
    submission
        .responses
        .insert(Category::ConflictResolution, "too short".to_string());
    submission.responses.remove(&Category::EmotionalResilience);

    let error = service.submit(submission).await.expect_err("invalid");

    let issues = match error {
        AssessmentError::Validation(issues) => issues,
        other => panic!("expected validation error, got {other:?}"),
    };
    let flagged: Vec<_> = issues.iter().map(|issue| issue.category).collect();
    assert_eq!(
        flagged,
        vec![
            Category::SelfAwareness,
            Category::ConflictResolution,
            Category::EmotionalResilience,
        ]
    );
    assert_eq!(issues[0].message, "Response cannot be empty.");
    assert_eq!(issues[1].message, "Response is too short. Please elaborate.");
    assert_eq!(loader.attempts(), 0);
    assert!(repository.is_empty());
}

#[tokio::test]
async fn unavailable_classifier_stores_nothing() {
    let loader = Arc::new(ScriptedLoader::unavailable());
    let (service, repository) = service_with(loader.clone());

    let error = service.submit(submission()).await.expect_err("no model");
    assert!(matches!(error, AssessmentError::Classifier(_)));
    assert!(repository.is_empty());
    assert_eq!(loader.attempts(), 2, "primary then fallback");

    let error = service.submit(submission()).await.expect_err("still no model");
    assert!(matches!(
        error,
        AssessmentError::Classifier(ClassifierError::Unavailable(_))
    ));
    assert_eq!(loader.attempts(), 2, "failed load is not retried");
    assert_eq!(service.analyzer().status(), LoadStatus::Failed);
}

#[tokio::test]
async fn blank_gender_defaults_to_other() {
    let (service, _) = service_with(Arc::new(ScriptedLoader::for_fixtures()));

    let report = service
        .submit(Submission {
            gender: "   ".to_string(),
            ..submission()
        })
        .await
        .expect("scored");

    assert_eq!(report.result.gender, "Other");
    assert_eq!(
        report.result.scores.get(Category::EmpathyCulturalAwareness),
        Some(100.0),
        "clamped either way"
    );
}

#[test]
fn missing_result_is_not_found() {
    let error = service().get(ResultId(42)).expect_err("absent");
    assert!(matches!(
        error,
        AssessmentError::Repository(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn listing_filters_by_profession_and_rating() {
    let (service, repository) = service_with(Arc::new(ScriptedLoader::for_fixtures()));

    service.submit(submission()).await.expect("first");
    service
        .submit(Submission {
            profession: "Teacher".to_string(),
            ..submission()
        })
        .await
        .expect("second");
    assert_eq!(repository.len(), 2);

    let everything = service.list(&ResultFilter::default()).expect("list");
    assert_eq!(everything.len(), 2);
    assert_eq!(everything[0].id, ResultId(2), "newest first");

    let teachers = service
        .list(&ResultFilter {
            profession: Some(Profession::Teacher),
            ..ResultFilter::default()
        })
        .expect("list");
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0].profession, Profession::Teacher);

    let high = service
        .list(&ResultFilter {
            rating: Some(Rating::High),
            ..ResultFilter::default()
        })
        .expect("list");
    assert!(high.is_empty());

    let searched = repository
        .list(&ResultFilter {
            search: Some("above".to_string()),
            ..ResultFilter::default()
        })
        .expect("list");
    assert_eq!(searched.len(), 2);
}
