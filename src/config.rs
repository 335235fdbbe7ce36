//! Session configuration: service coordinates, credential, model choice,
//! and generation parameters.
//!
//! Defaults can come from environment variables (convenient for server
//! deployments) and are overridable per session. The service URL, API key,
//! and project ID are mandatory preconditions for running extraction;
//! `validate()` reports every absence at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pipeline::error::ConfigError;

pub const APP_NAME: &str = "Namecard Scanner";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables honored as session defaults.
pub const ENV_API_KEY: &str = "WATSONX_APIKEY";
pub const ENV_PROJECT_ID: &str = "WATSONX_PROJECT_ID";
pub const ENV_URL: &str = "WATSONX_URL";

/// Default service endpoint (us-south region).
pub const DEFAULT_ENDPOINT_URL: &str = "https://us-south.ml.cloud.ibm.com";

pub fn default_log_filter() -> &'static str {
    "namecard_scanner=info"
}

// ═══════════════════════════════════════════════════════════
// ApiCredential
// ═══════════════════════════════════════════════════════════

/// API credential. `Debug` is redacted so the secret never reaches logs or
/// config snapshots; only the auth-header builder reads it in clear.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The clear secret, for building the authorization header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "ApiCredential(<unset>)")
        } else {
            write!(f, "ApiCredential(***)")
        }
    }
}

impl From<&str> for ApiCredential {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for ApiCredential {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

// ═══════════════════════════════════════════════════════════
// VisionModel
// ═══════════════════════════════════════════════════════════

/// Vision-capable models the service offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionModel {
    /// 11B vision-instruct model, the default.
    #[default]
    Llama3_2_11bVision,
    /// 90B vision-instruct model for harder cards (dense layouts, stylized
    /// typefaces).
    Llama3_2_90bVision,
}

impl VisionModel {
    /// Service-side model identifier.
    pub fn as_model_id(&self) -> &'static str {
        match self {
            Self::Llama3_2_11bVision => "meta-llama/llama-3-2-11b-vision-instruct",
            Self::Llama3_2_90bVision => "meta-llama/llama-3-2-90b-vision-instruct",
        }
    }

    pub fn all() -> &'static [VisionModel] {
        &[Self::Llama3_2_11bVision, Self::Llama3_2_90bVision]
    }
}

impl fmt::Display for VisionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_model_id())
    }
}

// ═══════════════════════════════════════════════════════════
// GenerationParams
// ═══════════════════════════════════════════════════════════

/// Decoding parameters for the inference call. The defaults force
/// near-greedy decoding: the task is extractive, not creative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.0,
            top_p: 1.0,
            top_k: 50,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// ExtractionConfig
// ═══════════════════════════════════════════════════════════

/// Everything a batch run needs to reach the vision service. Owned by the
/// session; read-only to the pipeline.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub endpoint_url: String,
    pub credential: ApiCredential,
    pub project_id: String,
    pub model: VisionModel,
    pub params: GenerationParams,
    /// Bound on each inference call in seconds. The HTTP request is the only
    /// blocking operation in the pipeline, so this is the only timeout that
    /// matters.
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            credential: ApiCredential::default(),
            project_id: String::new(),
            model: VisionModel::default(),
            params: GenerationParams::default(),
            timeout_secs: 60,
        }
    }
}

impl ExtractionConfig {
    /// Defaults with environment overrides applied. Server deployments set
    /// the `WATSONX_*` variables once instead of entering settings per
    /// session; every value stays overridable afterwards.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.trim().is_empty() {
                config.credential = ApiCredential::new(key);
            }
        }
        if let Ok(project) = std::env::var(ENV_PROJECT_ID) {
            if !project.trim().is_empty() {
                config.project_id = project;
            }
        }
        if let Ok(url) = std::env::var(ENV_URL) {
            if !url.trim().is_empty() {
                config.endpoint_url = url;
            }
        }
        config
    }

    /// Run precondition: every mandatory setting present. Reports all
    /// absences at once so the operator can fix them in one pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.endpoint_url.trim().is_empty() {
            missing.push("service URL".to_string());
        }
        if self.credential.is_empty() {
            missing.push("API key".to_string());
        }
        if self.project_id.trim().is_empty() {
            missing.push("project ID".to_string());
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingSettings(missing))
        }
    }
}
