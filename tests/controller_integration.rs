mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use qdiag::api::ApiClient;
use qdiag::config::{self, ApiSettings};
use qdiag::diagnosis::{DiagnosisController, Preset, StatusTone};
use serde_json::json;
use support::qdiag_env::QdiagEnvGuard;
use support::stub_server::{StubResponse, StubServer};
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(10);

/// Backend whose model becomes trained after the first `/train` call.
fn backend() -> StubServer {
    let trained = Arc::new(AtomicBool::new(false));
    StubServer::respond_with(move |request| match request.path.as_str() {
        "/health" => StubResponse::json(200, json!({ "ok": true })),
        "/models/status" => {
            if trained.load(Ordering::SeqCst) {
                StubResponse::json(200, json!({ "trained": true, "meta": { "acc": 0.9 } }))
            } else {
                StubResponse::json(200, json!({ "trained": false }))
            }
        }
        "/train" => {
            if request.header("x-api-key") == Some("secret-key") {
                trained.store(true, Ordering::SeqCst);
                StubResponse::json(200, json!({ "ok": true }))
            } else {
                StubResponse::json(401, json!({ "detail": "Invalid API key" }))
            }
        }
        "/predict" => StubResponse::json(
            200,
            json!({
                "diagnosis": "Low Risk",
                "final_probability": 0.1,
                "ai_probability": 0.12,
                "quantum_refined_probability": 0.09,
                "used_quantum": false,
                "feature_importance": []
            }),
        ),
        _ => StubResponse::json(404, json!({ "detail": "Not Found" })),
    })
}

fn controller_for(server: &StubServer, api_key: Option<&str>) -> DiagnosisController {
    let settings = ApiSettings {
        base_url: server.base_url(),
        api_key: api_key.map(str::to_string),
        ..ApiSettings::default()
    };
    DiagnosisController::new(Arc::new(ApiClient::new(&settings)))
}

#[test]
fn train_then_predict_round_trip() {
    let server = backend();
    let mut controller = controller_for(&server, Some("secret-key"));

    controller.refresh_status();
    assert!(controller.wait_for_idle(WAIT));
    assert!(!controller.can_predict());

    controller.request_training();
    controller.confirm_training();
    assert!(controller.wait_for_idle(WAIT));
    assert!(controller.can_predict());

    controller.apply_preset(Preset::LowRisk);
    controller.submit_prediction();
    assert!(controller.wait_for_idle(WAIT));
    let prediction = controller.ui.prediction.as_ref().unwrap();
    assert_eq!(prediction.diagnosis, "Low Risk");

    let predict = server
        .requests()
        .into_iter()
        .find(|request| request.path == "/predict")
        .unwrap();
    assert_eq!(predict.json()["features"]["age"], json!(25));
    assert_eq!(predict.json()["features"]["sex"], json!("female"));
}

#[test]
fn training_without_key_reports_unauthorized() {
    let server = backend();
    let mut controller = controller_for(&server, None);
    controller.start_training();
    assert!(controller.wait_for_idle(WAIT));
    assert_eq!(controller.ui.status.tone, StatusTone::Error);
    assert_eq!(controller.ui.status.text, "Unauthorized: Training key invalid.");
    assert!(controller.ui.model_status.is_none());
}

#[test]
fn out_of_range_age_sends_nothing() {
    let server = backend();
    let mut controller = controller_for(&server, Some("secret-key"));
    controller.refresh_status();
    assert!(controller.wait_for_idle(WAIT));
    let before = server.request_count();

    controller.set_age(121);
    controller.submit_prediction();
    assert!(controller.wait_for_idle(WAIT));
    assert_eq!(server.request_count(), before);
    assert_eq!(
        controller.ui.form.errors.age.as_deref(),
        Some("Age must be between 1 and 120")
    );
}

#[test]
fn env_overrides_apply_on_top_of_config_file() {
    let home = tempdir().unwrap();
    let env = QdiagEnvGuard::set_config_home(home.path().to_path_buf());
    let path = config::config_path().unwrap();
    std::fs::write(&path, "[api]\nbase_url = \"http://127.0.0.1:9\"\ntimeout_secs = 5\n").unwrap();

    env.set("QDIAG_API_BASE", "http://127.0.0.1:8000/");
    env.set("QDIAG_API_KEY", "from-env");
    let loaded = config::load_or_default().unwrap();

    assert_eq!(loaded.api.base_url, "http://127.0.0.1:8000");
    assert_eq!(loaded.api.api_key.as_deref(), Some("from-env"));
    assert_eq!(loaded.api.timeout_secs, 5);
    assert_eq!(loaded.api.max_retries, 2);
}
