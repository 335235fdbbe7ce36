//! The inference seam: one image-plus-instruction request in, raw text out.
//!
//! `WatsonxClient` is the production transport. Everything downstream talks
//! to the `VisionClient` trait so tests swap in a mock.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::error::InferenceError;
use super::prompt::{ChatMessage, ChatRequest};
use crate::config::{ApiCredential, ExtractionConfig, GenerationParams};

/// Chat API version pin.
const API_VERSION: &str = "2024-10-08";

/// One inference call against the vision service. No retry: the caller
/// decides what a failed item means.
pub trait VisionClient: Send + Sync {
    fn chat(&self, request: &ChatRequest) -> Result<String, InferenceError>;
}

// ═══════════════════════════════════════════════════════════
// WatsonxClient
// ═══════════════════════════════════════════════════════════

/// watsonx.ai chat client. One blocking POST per image; the configured
/// timeout is the only bound on the call.
pub struct WatsonxClient {
    endpoint: String,
    credential: ApiCredential,
    project_id: String,
    model_id: String,
    params: GenerationParams,
    timeout_secs: u64,
    http: reqwest::blocking::Client,
}

impl WatsonxClient {
    /// Build a client from a validated session configuration.
    pub fn new(config: &ExtractionConfig) -> Result<Self, InferenceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint_url.trim_end_matches('/').to_string(),
            credential: config.credential.clone(),
            project_id: config.project_id.clone(),
            model_id: config.model.as_model_id().to_string(),
            params: config.params,
            timeout_secs: config.timeout_secs,
            http,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/ml/v1/text/chat?version={API_VERSION}", self.endpoint)
    }
}

/// Request body: the user turn plus model/project scoping and decoding
/// parameters.
#[derive(Serialize)]
struct WatsonxChatBody<'a> {
    model_id: &'a str,
    project_id: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl VisionClient for WatsonxClient {
    fn chat(&self, request: &ChatRequest) -> Result<String, InferenceError> {
        let url = self.chat_url();
        let body = WatsonxChatBody {
            model_id: &self.model_id,
            project_id: &self.project_id,
            messages: &request.messages,
            max_tokens: self.params.max_new_tokens,
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            top_k: self.params.top_k,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.credential.expose())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    InferenceError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    InferenceError::Timeout(self.timeout_secs)
                } else {
                    InferenceError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(InferenceError::AuthRejected);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .map_err(|e| InferenceError::MalformedCompletion(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(InferenceError::EmptyCompletion);
        }

        tracing::debug!(model = %self.model_id, chars = content.len(), "Completion received");
        Ok(content)
    }
}

// ═══════════════════════════════════════════════════════════
// MockVisionClient (testing)
// ═══════════════════════════════════════════════════════════

/// Mock inference client. Either repeats one canned response or plays a
/// per-call script, and counts calls so tests can assert how many requests
/// actually went out.
pub struct MockVisionClient {
    script: Mutex<VecDeque<Result<String, InferenceError>>>,
    fallback: Result<String, InferenceError>,
    calls: Mutex<usize>,
}

impl MockVisionClient {
    /// A client that returns the same response for every call.
    pub fn new(response: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(response.to_string()),
            calls: Mutex::new(0),
        }
    }

    /// A client that always fails the same way.
    pub fn failing(error: InferenceError) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(error),
            calls: Mutex::new(0),
        }
    }

    /// A client that plays the given results in order, then repeats the
    /// last one.
    pub fn scripted(results: Vec<Result<String, InferenceError>>) -> Self {
        let fallback = results
            .last()
            .cloned()
            .unwrap_or_else(|| Err(InferenceError::EmptyCompletion));
        Self {
            script: Mutex::new(results.into()),
            fallback,
            calls: Mutex::new(0),
        }
    }

    /// Number of `chat` calls made so far.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl VisionClient for MockVisionClient {
    fn chat(&self, _request: &ChatRequest) -> Result<String, InferenceError> {
        *self.calls.lock().unwrap() += 1;
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisionModel;
    use crate::pipeline::prompt;
    use crate::pipeline::ImageContentType;

    fn test_config() -> ExtractionConfig {
        ExtractionConfig {
            endpoint_url: "https://us-south.ml.cloud.ibm.com/".to_string(),
            credential: ApiCredential::new("key"),
            project_id: "proj".to_string(),
            ..ExtractionConfig::default()
        }
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = WatsonxClient::new(&test_config()).unwrap();
        assert_eq!(client.endpoint, "https://us-south.ml.cloud.ibm.com");
        assert_eq!(
            client.chat_url(),
            format!("https://us-south.ml.cloud.ibm.com/ml/v1/text/chat?version={API_VERSION}")
        );
    }

    #[test]
    fn client_scopes_by_model_and_project() {
        let mut config = test_config();
        config.model = VisionModel::Llama3_2_90bVision;
        let client = WatsonxClient::new(&config).unwrap();
        assert_eq!(client.model_id, "meta-llama/llama-3-2-90b-vision-instruct");
        assert_eq!(client.project_id, "proj");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn request_body_carries_decoding_params() {
        let config = test_config();
        let request = prompt::build_request(b"img", ImageContentType::Jpeg);
        let body = WatsonxChatBody {
            model_id: config.model.as_model_id(),
            project_id: &config.project_id,
            messages: &request.messages,
            max_tokens: config.params.max_new_tokens,
            temperature: config.params.temperature,
            top_p: config.params.top_p,
            top_k: config.params.top_k,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["top_p"], 1.0);
        assert_eq!(value["top_k"], 50);
        assert_eq!(value["model_id"], "meta-llama/llama-3-2-11b-vision-instruct");
    }

    #[test]
    fn completion_envelope_decodes_first_choice() {
        let payload = r#"{"choices":[{"message":{"role":"assistant","content":"{\"Name\": null}"}}]}"#;
        let completion: ChatCompletion = serde_json::from_str(payload).unwrap();
        let content = completion.choices[0].message.content.as_deref();
        assert_eq!(content, Some("{\"Name\": null}"));
    }

    #[test]
    fn mock_repeats_canned_response() {
        let mock = MockVisionClient::new("{}");
        let request = prompt::build_request(b"x", ImageContentType::Jpeg);
        assert_eq!(mock.chat(&request).unwrap(), "{}");
        assert_eq!(mock.chat(&request).unwrap(), "{}");
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn scripted_mock_plays_results_in_order() {
        let mock = MockVisionClient::scripted(vec![
            Ok("first".to_string()),
            Err(InferenceError::Timeout(60)),
        ]);
        let request = prompt::build_request(b"x", ImageContentType::Jpeg);
        assert_eq!(mock.chat(&request).unwrap(), "first");
        assert!(matches!(
            mock.chat(&request),
            Err(InferenceError::Timeout(60))
        ));
        // Script exhausted: the last result repeats.
        assert!(mock.chat(&request).is_err());
    }

    #[test]
    fn failing_mock_always_fails() {
        let mock = MockVisionClient::failing(InferenceError::AuthRejected);
        let request = prompt::build_request(b"x", ImageContentType::Jpeg);
        assert!(matches!(
            mock.chat(&request),
            Err(InferenceError::AuthRejected)
        ));
    }
}
