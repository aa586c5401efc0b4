use std::sync::{
    Arc,
    mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError},
};
use std::thread;
use std::time::Duration;

use crate::api::{ApiError, DiagnosisApi, ModelStatus, PredictionResult, health_is_ok};

use super::features::FeatureRecord;

pub(crate) enum JobMessage {
    StatusFetched(StatusFetchResult),
    Trained(TrainResult),
    Predicted(PredictResult),
}

/// `Ok(None)` means the backend answered but did not report itself healthy.
#[derive(Debug)]
pub(crate) struct StatusFetchResult {
    pub(crate) result: Result<Option<ModelStatus>, ApiError>,
}

#[derive(Debug)]
pub(crate) struct TrainResult {
    pub(crate) result: Result<serde_json::Value, ApiError>,
}

#[derive(Debug)]
pub(crate) struct PredictResult {
    pub(crate) result: Result<PredictionResult, ApiError>,
}

/// Runs each API call on its own thread and hands results back over a channel.
pub(crate) struct ApiJobs {
    api: Arc<dyn DiagnosisApi>,
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
}

impl ApiJobs {
    pub(crate) fn new(api: Arc<dyn DiagnosisApi>) -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            api,
            message_tx,
            message_rx,
        }
    }

    pub(crate) fn set_api_key(&self, key: &str) {
        self.api.set_api_key(key);
    }

    pub(crate) fn begin_status_refresh(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = fetch_status(api.as_ref());
            let _ = tx.send(JobMessage::StatusFetched(StatusFetchResult { result }));
        });
    }

    pub(crate) fn begin_training(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api.train_model();
            let _ = tx.send(JobMessage::Trained(TrainResult { result }));
        });
    }

    pub(crate) fn begin_prediction(&self, features: FeatureRecord) {
        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api.predict(&features);
            let _ = tx.send(JobMessage::Predicted(PredictResult { result }));
        });
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn recv_message_timeout(&self, timeout: Duration) -> Result<JobMessage, RecvTimeoutError> {
        self.message_rx.recv_timeout(timeout)
    }
}

fn fetch_status(api: &dyn DiagnosisApi) -> Result<Option<ModelStatus>, ApiError> {
    let health = api.check_health()?;
    if !health_is_ok(&health) {
        tracing::warn!("Health check did not report ok: {health}");
        return Ok(None);
    }
    api.model_status().map(Some)
}
