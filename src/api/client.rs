use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{ModelStatus, PredictRequest, PredictionResult};
use crate::config::ApiSettings;
use crate::diagnosis::features::FeatureRecord;
use crate::http_client::{self, RetryPolicy};

const MAX_RESPONSE_BYTES: usize = 1024 * 1024;
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;
const API_KEY_HEADER: &str = "x-api-key";

pub const HEALTH_PATH: &str = "/health";
pub const MODEL_STATUS_PATH: &str = "/models/status";
pub const TRAIN_PATH: &str = "/train";
pub const PREDICT_PATH: &str = "/predict";

type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// The four backend operations, as seen by the UI controller.
pub trait DiagnosisApi: Send + Sync {
    fn check_health(&self) -> Result<serde_json::Value, ApiError>;
    fn model_status(&self) -> Result<ModelStatus, ApiError>;
    fn train_model(&self) -> Result<serde_json::Value, ApiError>;
    fn predict(&self, features: &FeatureRecord) -> Result<PredictionResult, ApiError>;
    /// Use `key` for later training calls. A blank key clears it.
    fn set_api_key(&self, key: &str);
}

/// Blocking client for the diagnosis backend.
///
/// Every call shares one policy: a whole-request timeout, retries with
/// exponential backoff on timeouts and unreachable hosts only, and error
/// normalization into [`ApiError`]. Calls are independent; nothing is cached.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    /// Shared by clones, so a key entered in the UI reaches the job threads.
    api_key: Arc<RwLock<Option<String>>>,
    agent: ureq::Agent,
    retry: RetryPolicy,
    sleeper: Sleeper,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key().map(|_| "<set>"))
            .field("retry", &self.retry)
            .finish()
    }
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: Arc::new(RwLock::new(clean_key(
                settings.api_key.as_deref().unwrap_or_default(),
            ))),
            agent: http_client::build_agent(settings.timeout()),
            retry: RetryPolicy::new(settings.max_retries, settings.backoff_base()),
            sleeper: Arc::new(std::thread::sleep),
        }
    }

    /// Replace how the client waits between attempts.
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Use `key` for subsequent training calls. An empty key clears it.
    pub fn set_api_key(&self, key: &str) {
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = clean_key(key);
    }

    fn api_key(&self) -> Option<String> {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn check_health(&self) -> Result<serde_json::Value, ApiError> {
        self.send(Method::Get, HEALTH_PATH, None, false)
    }

    pub fn model_status(&self) -> Result<ModelStatus, ApiError> {
        self.send(Method::Get, MODEL_STATUS_PATH, None, false)
    }

    /// Trigger training and block until the backend reports completion.
    pub fn train_model(&self) -> Result<serde_json::Value, ApiError> {
        if self.api_key().is_none() {
            tracing::warn!("Training requested without an API key configured");
        }
        let body = serde_json::json!({});
        self.send(Method::Post, TRAIN_PATH, Some(&body), true)
    }

    pub fn predict(&self, features: &FeatureRecord) -> Result<PredictionResult, ApiError> {
        let body = serde_json::to_value(PredictRequest { features })
            .map_err(|err| ApiError::Unknown(format!("Failed to encode features: {err}")))?;
        self.send(Method::Post, PREDICT_PATH, Some(&body), false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        with_key: bool,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut attempts = 0;
        let result = self.retry.run(
            |attempt| {
                attempts = attempt;
                tracing::debug!(method = method.as_str(), %url, attempt, "Sending request");
                self.attempt(method, &url, body, with_key)
            },
            |err: &ApiError| {
                let retry = err.is_retryable();
                if retry {
                    tracing::warn!(%url, "Request failed ({err}); retrying");
                }
                retry
            },
            |delay| (self.sleeper)(delay),
        );
        if let Err(err) = &result {
            tracing::error!(method = method.as_str(), %url, attempts, "Request failed: {err}");
        }
        result
    }

    fn attempt<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        with_key: bool,
    ) -> Result<T, ApiError> {
        let mut request = self
            .agent
            .request(method.as_str(), url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");
        if with_key && let Some(key) = self.api_key() {
            request = request.set(API_KEY_HEADER, &key);
        }
        let outcome = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        let response = match outcome {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_body(response, MAX_ERROR_BODY_BYTES)
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                    .unwrap_or_default();
                return Err(ApiError::from_status(code, &body));
            }
            Err(ureq::Error::Transport(err)) => return Err(ApiError::from_transport(&err)),
        };
        let bytes = http_client::read_body(response, MAX_RESPONSE_BYTES)
            .map_err(|err| ApiError::from_body_io(&err))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::Unknown(format!("Unexpected response from server: {err}")))
    }
}

impl DiagnosisApi for ApiClient {
    fn check_health(&self) -> Result<serde_json::Value, ApiError> {
        ApiClient::check_health(self)
    }

    fn model_status(&self) -> Result<ModelStatus, ApiError> {
        ApiClient::model_status(self)
    }

    fn train_model(&self) -> Result<serde_json::Value, ApiError> {
        ApiClient::train_model(self)
    }

    fn predict(&self, features: &FeatureRecord) -> Result<PredictionResult, ApiError> {
        ApiClient::predict(self, features)
    }

    fn set_api_key(&self, key: &str) {
        ApiClient::set_api_key(self, key);
    }
}

fn clean_key(key: &str) -> Option<String> {
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}
