//! Sentiment classification seam.
//!
//! The classifier is an external collaborator: `ModelLoader` produces a `SentimentModel`,
//! and `SentimentAnalyzer` owns the one shared handle for the whole process. The first
//! caller pays for loading (primary model, then fallback); concurrent first callers wait on
//! the same load instead of starting their own.

mod inference;

pub use inference::{InferenceApiLoader, InferenceApiModel};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Longest input, in characters, forwarded to the classifier.
pub const MAX_INPUT_CHARS: usize = 512;

/// Raw label/confidence pair as reported by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Top classification retained for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub confidence: f64,
}

#[async_trait]
pub trait SentimentModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError>;
}

#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn SentimentModel>, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("failed to load sentiment model '{model}': {reason}")]
    Load { model: String, reason: String },
    #[error("sentiment classifier unavailable: {0}")]
    Unavailable(String),
    #[error("sentiment inference failed: {0}")]
    Inference(String),
    #[error("sentiment model returned no labels")]
    EmptyOutput,
}

/// Observable lifecycle of the shared classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

enum LoadState {
    Unloaded,
    Ready,
    Failed(String),
}

/// Lazily loaded, process-wide classifier handle.
pub struct SentimentAnalyzer {
    loader: Arc<dyn ModelLoader>,
    primary_model: String,
    fallback_model: String,
    model: OnceLock<Arc<dyn SentimentModel>>,
    failed: AtomicBool,
    state: Mutex<LoadState>,
}

impl SentimentAnalyzer {
    pub fn new(
        loader: Arc<dyn ModelLoader>,
        primary_model: impl Into<String>,
        fallback_model: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            primary_model: primary_model.into(),
            fallback_model: fallback_model.into(),
            model: OnceLock::new(),
            failed: AtomicBool::new(false),
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    /// Terminal states are read without the load lock, so a caller holding it
    /// never hides a permanent failure.
    pub fn status(&self) -> LoadStatus {
        if self.model.get().is_some() {
            return LoadStatus::Ready;
        }
        if self.failed.load(Ordering::Acquire) {
            return LoadStatus::Failed;
        }
        match self.state.try_lock() {
            Err(_) => LoadStatus::Loading,
            Ok(state) => match *state {
                LoadState::Unloaded => LoadStatus::Unloaded,
                LoadState::Ready => LoadStatus::Ready,
                LoadState::Failed(_) => LoadStatus::Failed,
            },
        }
    }

    /// Shared model handle, loading it on first use. A failed load is permanent.
    pub async fn model(&self) -> Result<Arc<dyn SentimentModel>, ClassifierError> {
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }

        let mut state = self.state.lock().await;
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }
        if let LoadState::Failed(reason) = &*state {
            return Err(ClassifierError::Unavailable(reason.clone()));
        }

        match self.load_with_fallback().await {
            Ok(model) => {
                let model = self.model.get_or_init(|| model).clone();
                *state = LoadState::Ready;
                Ok(model)
            }
            Err(err) => {
                *state = LoadState::Failed(err.to_string());
                self.failed.store(true, Ordering::Release);
                Err(err)
            }
        }
    }

    /// Classify a single answer, keeping the highest scoring label.
    pub async fn analyze(&self, text: &str) -> Result<SentimentResult, ClassifierError> {
        let model = self.model().await?;
        let truncated = truncate_input(text);
        debug!(
            model = model.model_id(),
            chars = truncated.chars().count(),
            "classifying response"
        );

        let output = model.classify(truncated).await?;
        let top = output
            .into_iter()
            .max_by(|left, right| left.score.total_cmp(&right.score))
            .ok_or(ClassifierError::EmptyOutput)?;

        debug!(label = %top.label, score = top.score, "model output");
        Ok(SentimentResult {
            label: top.label,
            confidence: top.score,
        })
    }

    async fn load_with_fallback(&self) -> Result<Arc<dyn SentimentModel>, ClassifierError> {
        info!(model = %self.primary_model, "loading primary sentiment model");
        let primary_error = match self.loader.load(&self.primary_model).await {
            Ok(model) => {
                info!(model = %self.primary_model, "primary sentiment model loaded");
                return Ok(model);
            }
            Err(err) => err,
        };

        warn!(
            model = %self.primary_model,
            fallback = %self.fallback_model,
            error = %primary_error,
            "primary sentiment model failed to load, falling back"
        );

        match self.loader.load(&self.fallback_model).await {
            Ok(model) => {
                info!(model = %self.fallback_model, "fallback sentiment model loaded");
                Ok(model)
            }
            Err(fallback_error) => {
                error!(
                    primary_error = %primary_error,
                    fallback_error = %fallback_error,
                    "failed to load both primary and fallback sentiment models"
                );
                Err(ClassifierError::Unavailable(format!(
                    "primary: {primary_error}; fallback: {fallback_error}"
                )))
            }
        }
    }
}

/// First `MAX_INPUT_CHARS` characters of `text`, never splitting a code point.
pub fn truncate_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
