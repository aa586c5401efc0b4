use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use crate::api::DiagnosisApi;
use crate::config;

use super::features::{Preset, RiskFlag, Sex};
use super::jobs::{ApiJobs, JobMessage, PredictResult, StatusFetchResult, TrainResult};
use super::state::{DiagnosisUiState, StatusTone};

/// Owns the diagnosis view state and drives the backend calls behind it.
///
/// Calls run on background threads; [`poll_jobs`](Self::poll_jobs) applies
/// finished results and must be called regularly (once per frame in the UI).
pub struct DiagnosisController {
    pub ui: DiagnosisUiState,
    jobs: ApiJobs,
    /// A refresh was asked for while one was in flight; run it once that lands.
    refresh_pending: bool,
}

impl DiagnosisController {
    pub fn new(api: Arc<dyn DiagnosisApi>) -> Self {
        Self {
            ui: DiagnosisUiState::default(),
            jobs: ApiJobs::new(api),
            refresh_pending: false,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.text = text.into();
        self.ui.status.tone = tone;
    }

    /// Prediction is only offered once the backend reports a trained model.
    pub fn can_predict(&self) -> bool {
        self.ui
            .model_status
            .as_ref()
            .is_some_and(|status| status.trained)
    }

    pub fn is_busy(&self) -> bool {
        self.ui.status_loading || self.ui.training || self.ui.predicting
    }

    /// Fetch health and model status. A call made while a fetch is in flight
    /// queues one more fetch, since the running one may predate a change.
    pub fn refresh_status(&mut self) {
        if self.ui.status_loading {
            self.refresh_pending = true;
            return;
        }
        self.ui.status_loading = true;
        self.jobs.begin_status_refresh();
    }

    pub fn request_training(&mut self) {
        if self.ui.training {
            return;
        }
        self.ui.confirm_training_open = true;
    }

    pub fn cancel_training(&mut self) {
        self.ui.confirm_training_open = false;
        self.ui.api_key_input.clear();
    }

    /// Close the prompt and train, first applying any key typed into it.
    pub fn confirm_training(&mut self) {
        self.ui.confirm_training_open = false;
        let key = std::mem::take(&mut self.ui.api_key_input);
        if !key.trim().is_empty() {
            self.jobs.set_api_key(&key);
            if self.ui.remember_api_key {
                match config::store_api_key(&key) {
                    Ok(path) => tracing::info!("Saved training key to {}", path.display()),
                    Err(err) => tracing::warn!("Failed to save training key: {err}"),
                }
            }
        }
        self.start_training();
    }

    /// Start a training call unless one is already outstanding.
    pub fn start_training(&mut self) {
        if self.ui.training {
            return;
        }
        self.ui.training = true;
        self.set_status("Training model...", StatusTone::Busy);
        tracing::info!("Training requested");
        self.jobs.begin_training();
    }

    /// Validate the form and, if valid, request a prediction.
    ///
    /// Invalid input never reaches the network; field errors are set instead.
    pub fn submit_prediction(&mut self) {
        if self.ui.predicting {
            return;
        }
        let Some(features) = self.ui.form.validate() else {
            self.set_status("Please fix the highlighted fields", StatusTone::Warning);
            return;
        };
        if !self.can_predict() {
            self.set_status("Train the model first to enable prediction", StatusTone::Warning);
            return;
        }
        self.ui.predicting = true;
        self.set_status("Predicting...", StatusTone::Busy);
        self.jobs.begin_prediction(features);
    }

    /// Restore the default record and clear the displayed prediction.
    pub fn reset_form(&mut self) {
        self.ui.form.reset();
        self.ui.prediction = None;
        self.ui.show_raw_json = false;
        self.set_status("Form reset", StatusTone::Idle);
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.ui.form.apply_preset(preset);
    }

    pub fn set_age(&mut self, age: u32) {
        self.ui.form.set_age(age);
    }

    pub fn set_sex(&mut self, sex: Option<Sex>) {
        self.ui.form.set_sex(sex);
    }

    pub fn set_flag(&mut self, flag: RiskFlag, value: bool) {
        self.ui.form.set_flag(flag, value);
    }

    /// Apply every finished background result without blocking.
    pub fn poll_jobs(&mut self) {
        loop {
            match self.jobs.try_recv_message() {
                Ok(message) => self.handle_message(message),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Block until no call is outstanding or `timeout` elapses.
    ///
    /// Returns true when the controller went idle. Used by headless callers
    /// and tests; the UI uses [`poll_jobs`](Self::poll_jobs).
    pub fn wait_for_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.jobs.recv_message_timeout(remaining) {
                Ok(message) => self.handle_message(message),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        !self.is_busy()
    }

    fn handle_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::StatusFetched(message) => self.handle_status_fetched(message),
            JobMessage::Trained(message) => self.handle_trained(message),
            JobMessage::Predicted(message) => self.handle_predicted(message),
        }
    }

    fn handle_status_fetched(&mut self, message: StatusFetchResult) {
        self.ui.status_loading = false;
        match message.result {
            Ok(Some(status)) => {
                tracing::info!("Model status: {}", status.summary());
                self.ui.model_status = Some(status);
            }
            Ok(None) => {
                self.set_status("Server is not reporting healthy", StatusTone::Warning);
            }
            Err(err) => {
                tracing::warn!("Status refresh failed: {err}");
                self.set_status(format!("Failed to connect to server: {err}"), StatusTone::Error);
            }
        }
        if std::mem::take(&mut self.refresh_pending) {
            self.refresh_status();
        }
    }

    fn handle_trained(&mut self, message: TrainResult) {
        self.ui.training = false;
        match message.result {
            Ok(payload) => {
                tracing::info!("Training finished: {payload}");
                self.set_status("Model trained!", StatusTone::Info);
                self.refresh_status();
            }
            Err(err) => {
                self.set_status(err.to_string(), StatusTone::Error);
            }
        }
    }

    fn handle_predicted(&mut self, message: PredictResult) {
        self.ui.predicting = false;
        match message.result {
            Ok(result) => {
                self.set_status(format!("Diagnosis: {}", result.diagnosis), StatusTone::Info);
                self.ui.prediction = Some(result);
            }
            Err(err) => {
                self.set_status(format!("Prediction failed. Try again. ({err})"), StatusTone::Error);
            }
        }
    }
}
