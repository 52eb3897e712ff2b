use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClassifierError, LabelScore, ModelLoader, SentimentModel};
use crate::config::ClassifierConfig;

const WARM_UP_TEXT: &str = "Thank you for taking the time to listen.";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// Text-classification endpoints answer either per input (nested) or flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct InferenceErrorBody {
    error: String,
}

/// Loads models hosted behind a Hugging Face style inference endpoint.
#[derive(Clone)]
pub struct InferenceApiLoader {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl InferenceApiLoader {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ClassifierError::Inference(format!("http client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.inference_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl ModelLoader for InferenceApiLoader {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn SentimentModel>, ClassifierError> {
        let model = InferenceApiModel {
            client: self.client.clone(),
            endpoint: format!("{}/models/{}", self.base_url, model_id),
            api_token: self.api_token.clone(),
            model_id: model_id.to_string(),
        };

        // The first request blocks until the hosted weights are resident.
        model
            .request(WARM_UP_TEXT, true)
            .await
            .map_err(|err| ClassifierError::Load {
                model: model_id.to_string(),
                reason: err.to_string(),
            })?;

        Ok(Arc::new(model))
    }
}

pub struct InferenceApiModel {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    model_id: String,
}

impl InferenceApiModel {
    async fn request(
        &self,
        text: &str,
        wait_for_model: bool,
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        let body = InferenceRequest {
            inputs: text,
            options: InferenceOptions { wait_for_model },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ClassifierError::Inference(err.to_string()))?;
        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|err| ClassifierError::Inference(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<InferenceErrorBody>(&payload)
                .map(|body| body.error)
                .unwrap_or(payload);
            return Err(ClassifierError::Inference(format!(
                "status {}: {}",
                status.as_u16(),
                message
            )));
        }

        debug!(model = %self.model_id, "inference endpoint responded");
        parse_output(&payload)
    }
}

#[async_trait]
impl SentimentModel for InferenceApiModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
        self.request(text, false).await
    }
}

/// Labels for the single submitted input, highest confidence first.
fn parse_output(payload: &str) -> Result<Vec<LabelScore>, ClassifierError> {
    let parsed: InferenceResponse = serde_json::from_str(payload)
        .map_err(|err| ClassifierError::Inference(format!("unexpected payload: {err}")))?;

    let mut labels = match parsed {
        InferenceResponse::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
        InferenceResponse::Flat(labels) => labels,
    };
    if labels.is_empty() {
        return Err(ClassifierError::EmptyOutput);
    }

    labels.sort_by(|left, right| right.score.total_cmp(&left.score));
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_output_sorted_by_score() {
        let payload = r#"[[{"label":"LABEL_0","score":0.05},{"label":"LABEL_2","score":0.9},{"label":"LABEL_1","score":0.05}]]"#;
        let labels = parse_output(payload).expect("parses");
        assert_eq!(labels[0].label, "LABEL_2");
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn parses_flat_output() {
        let payload = r#"[{"label":"NEGATIVE","score":0.98}]"#;
        let labels = parse_output(payload).expect("parses");
        assert_eq!(
            labels,
            vec![LabelScore {
                label: "NEGATIVE".to_string(),
                score: 0.98
            }]
        );
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(matches!(
            parse_output("[[]]"),
            Err(ClassifierError::EmptyOutput)
        ));
        assert!(matches!(
            parse_output("[]"),
            Err(ClassifierError::EmptyOutput)
        ));
    }

    #[test]
    fn garbage_payload_is_an_inference_error() {
        assert!(matches!(
            parse_output(r#"{"error":"Model is loading"}"#),
            Err(ClassifierError::Inference(_))
        ));
    }

    #[test]
    fn loader_strips_trailing_slash() {
        let config = ClassifierConfig {
            primary_model: "primary".to_string(),
            fallback_model: "fallback".to_string(),
            inference_url: "http://localhost:8081/".to_string(),
            api_token: None,
            timeout_secs: 5,
        };
        let loader = InferenceApiLoader::new(&config).expect("client builds");
        assert_eq!(loader.base_url, "http://localhost:8081");
    }
}
