use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{Category, ResponseRecord, UserProfile};
use crate::assessment::repository::InMemoryResultRepository;
use crate::assessment::sentiment::{
    ClassifierError, LabelScore, ModelLoader, SentimentAnalyzer, SentimentModel, SentimentResult,
};
use crate::assessment::service::{AssessmentService, Submission};

/// Word that matches none of the high-EQ keywords.
const FILLER: &str = "steady";

pub(super) fn filler(words: usize) -> String {
    vec![FILLER; words].join(" ")
}

pub(super) fn with_keyword(keyword: &str, words: usize) -> String {
    let mut text = keyword.to_string();
    if words > 1 {
        text.push(' ');
        text.push_str(&filler(words - 1));
    }
    text
}

pub(super) fn sentiment(label: &str, confidence: f64) -> SentimentResult {
    SentimentResult {
        label: label.to_string(),
        confidence,
    }
}

pub(super) fn profile(age: u32, gender: &str) -> UserProfile {
    UserProfile::new(age, gender, "IT Professional")
}

/// Answers for every category, each long enough to pass validation.
pub(super) fn responses() -> ResponseRecord {
    let mut responses = BTreeMap::new();
    responses.insert(Category::SelfAwareness, with_keyword("reflect", 20));
    responses.insert(
        Category::EmotionalRegulation,
        format!("pause {}", filler(9)),
    );
    responses.insert(Category::ConflictResolution, filler(10));
    responses.insert(Category::EmotionalResilience, with_keyword("team", 45));
    responses.insert(
        Category::EmpathyCulturalAwareness,
        with_keyword("perspective", 90),
    );
    responses
}

/// Classifier output paired with `responses()`.
pub(super) fn sentiments() -> BTreeMap<Category, SentimentResult> {
    let mut sentiments = BTreeMap::new();
    sentiments.insert(Category::SelfAwareness, sentiment("LABEL_2", 0.9));
    sentiments.insert(Category::EmotionalRegulation, sentiment("LABEL_1", 0.8));
    sentiments.insert(Category::ConflictResolution, sentiment("NEGATIVE", 0.9));
    sentiments.insert(Category::EmotionalResilience, sentiment("POSITIVE", 0.6));
    sentiments.insert(Category::EmpathyCulturalAwareness, sentiment("POSITIVE", 0.99));
    sentiments
}

pub(super) fn submission() -> Submission {
    Submission {
        age: 45,
        gender: "Male".to_string(),
        profession: "IT Professional".to_string(),
        responses: responses(),
    }
}

/// Replays canned labels keyed by the exact response text.
pub(super) struct ScriptedModel {
    outputs: HashMap<String, LabelScore>,
}

#[async_trait]
impl SentimentModel for ScriptedModel {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
        self.outputs
            .get(text)
            .cloned()
            .map(|output| vec![output])
            .ok_or_else(|| ClassifierError::Inference(format!("no scripted output for '{text}'")))
    }
}

pub(super) struct ScriptedLoader {
    outputs: HashMap<String, LabelScore>,
    available: bool,
    pub(super) attempts: AtomicUsize,
}

impl ScriptedLoader {
    pub(super) fn for_fixtures() -> Self {
        let responses = responses();
        let outputs = sentiments()
            .into_iter()
            .map(|(category, result)| {
                (
                    responses[&category].clone(),
                    LabelScore {
                        label: result.label,
                        score: result.confidence,
                    },
                )
            })
            .collect();
        Self {
            outputs,
            available: true,
            attempts: AtomicUsize::new(0),
        }
    }

    pub(super) fn unavailable() -> Self {
        Self {
            outputs: HashMap::new(),
            available: false,
            attempts: AtomicUsize::new(0),
        }
    }

    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for ScriptedLoader {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn SentimentModel>, ClassifierError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.available {
            return Err(ClassifierError::Load {
                model: model_id.to_string(),
                reason: "offline".to_string(),
            });
        }
        Ok(Arc::new(ScriptedModel {
            outputs: self.outputs.clone(),
        }))
    }
}

pub(super) fn analyzer(loader: Arc<ScriptedLoader>) -> Arc<SentimentAnalyzer> {
    Arc::new(SentimentAnalyzer::new(loader, "primary-model", "fallback-model"))
}

pub(super) fn service_with(
    loader: Arc<ScriptedLoader>,
) -> (
    Arc<AssessmentService<InMemoryResultRepository>>,
    Arc<InMemoryResultRepository>,
) {
    let repository = Arc::new(InMemoryResultRepository::new());
    let service = Arc::new(AssessmentService::new(
        repository.clone(),
        analyzer(loader),
    ));
    (service, repository)
}

pub(super) fn service() -> Arc<AssessmentService<InMemoryResultRepository>> {
    service_with(Arc::new(ScriptedLoader::for_fixtures())).0
}

pub(super) async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn json_body(value: &Value) -> Body {
    Body::from(serde_json::to_vec(value).expect("serializes"))
}
