//! Diagnosis form state, presets and the controller that talks to the backend.

mod controller;
pub mod features;
pub mod form;
mod jobs;
mod state;

pub use controller::DiagnosisController;
pub use features::{FeatureRecord, Preset, RiskFlag, Sex};
pub use form::{FieldErrors, FormField, FormState, FormValues};
pub use state::{DiagnosisUiState, StatusLine, StatusTone};
