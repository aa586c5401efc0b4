use crate::api::{ModelStatus, PredictionResult};

use super::form::FormState;

/// Severity of the status line, used for its badge colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusTone {
    #[default]
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

/// Single-line notification shown at the bottom of the window.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

/// Everything the diagnosis view renders.
#[derive(Clone, Debug, Default)]
pub struct DiagnosisUiState {
    pub form: FormState,
    /// Last snapshot from the backend; `None` until a healthy fetch succeeds.
    pub model_status: Option<ModelStatus>,
    /// Last successful prediction; survives failed requests.
    pub prediction: Option<PredictionResult>,
    pub status_loading: bool,
    pub training: bool,
    pub predicting: bool,
    /// True while the "start training?" confirmation is shown.
    pub confirm_training_open: bool,
    /// Key typed into the training prompt; cleared once the prompt closes.
    pub api_key_input: String,
    /// Also write the typed key to `config.toml`.
    pub remember_api_key: bool,
    pub show_raw_json: bool,
    pub status: StatusLine,
}
