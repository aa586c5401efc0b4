//! HTTP client for the quantum-AI diagnosis backend.

mod client;
mod error;
mod types;

pub use client::{
    ApiClient, DiagnosisApi, HEALTH_PATH, MODEL_STATUS_PATH, PREDICT_PATH, TRAIN_PATH,
};
pub use error::ApiError;
pub use types::{
    FeatureImportance, HIGH_RISK_THRESHOLD, ModelMeta, ModelStatus, PredictionResult, RiskLevel,
    format_probability, health_is_ok,
};
