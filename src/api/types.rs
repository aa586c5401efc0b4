//! Wire types exchanged with the diagnosis backend.

use serde::{Deserialize, Serialize};

use crate::diagnosis::features::FeatureRecord;

/// Probability at or above which a result is shown as high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.5;

/// Training metrics attached to a trained model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub acc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auc: Option<f64>,
}

/// Readiness snapshot reported by `GET /models/status`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub trained: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ModelMeta>,
}

impl ModelStatus {
    /// Header badge text, e.g. `Trained (ACC: 87.5%, AUC: 0.912)`.
    pub fn summary(&self) -> String {
        if !self.trained {
            return "Not Trained".to_string();
        }
        match &self.meta {
            Some(ModelMeta { acc, auc: Some(auc) }) => {
                format!("Trained (ACC: {:.1}%, AUC: {auc:.3})", acc * 100.0)
            }
            Some(ModelMeta { acc, auc: None }) => format!("Trained (ACC: {:.1}%)", acc * 100.0),
            None => "Trained".to_string(),
        }
    }
}

/// Contribution of one input feature to a prediction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub weight: f64,
}

impl FeatureImportance {
    /// `high_bp` becomes `High Bp`.
    pub fn display_name(&self) -> String {
        self.feature
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Diagnosis computed by `POST /predict`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub diagnosis: String,
    pub final_probability: f64,
    pub ai_probability: f64,
    pub quantum_refined_probability: f64,
    pub used_quantum: bool,
    pub feature_importance: Vec<FeatureImportance>,
}

/// Coarse risk bucket derived from the final probability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    High,
}

impl PredictionResult {
    pub fn risk_level(&self) -> RiskLevel {
        if self.final_probability >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    /// Feature weights ordered by descending magnitude.
    pub fn ranked_features(&self) -> Vec<&FeatureImportance> {
        let mut ranked: Vec<&FeatureImportance> = self.feature_importance.iter().collect();
        ranked.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));
        ranked
    }
}

/// Body of `POST /predict`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    pub features: &'a FeatureRecord,
}

/// True when a health payload carries a truthy `ok`.
///
/// Backends variously answer `true`, `1` or `"ok"`; `false`, `0`, `""`,
/// `null` and a missing field all count as unhealthy.
pub fn health_is_ok(payload: &serde_json::Value) -> bool {
    use serde_json::Value;
    match payload.get("ok") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(ok)) => *ok,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Render a percentage with one decimal, as shown in the result panel.
pub fn format_probability(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_with(final_probability: f64) -> PredictionResult {
        PredictionResult {
            diagnosis: "x".into(),
            final_probability,
            ai_probability: 0.0,
            quantum_refined_probability: 0.0,
            used_quantum: false,
            feature_importance: vec![
                FeatureImportance { feature: "age".into(), weight: 0.05 },
                FeatureImportance { feature: "smoking".into(), weight: -0.4 },
                FeatureImportance { feature: "high_bp".into(), weight: 0.2 },
            ],
        }
    }

    #[test]
    fn status_without_meta_parses() {
        let status: ModelStatus = serde_json::from_value(json!({ "trained": false })).unwrap();
        assert_eq!(status, ModelStatus { trained: false, meta: None });
        assert_eq!(status.summary(), "Not Trained");
    }

    #[test]
    fn status_summary_includes_metrics() {
        let status: ModelStatus = serde_json::from_value(json!({
            "trained": true,
            "meta": { "acc": 0.875, "auc": 0.9123 },
            "extra": "ignored"
        }))
        .unwrap();
        assert_eq!(status.summary(), "Trained (ACC: 87.5%, AUC: 0.912)");
    }

    #[test]
    fn risk_level_threshold_is_inclusive() {
        assert_eq!(result_with(0.5).risk_level(), RiskLevel::High);
        assert_eq!(result_with(0.49).risk_level(), RiskLevel::Low);
    }

    #[test]
    fn ranked_features_use_magnitude() {
        let result = result_with(0.1);
        let names: Vec<&str> = result
            .ranked_features()
            .iter()
            .map(|item| item.feature.as_str())
            .collect();
        assert_eq!(names, vec!["smoking", "high_bp", "age"]);
    }

    #[test]
    fn display_name_title_cases_every_word() {
        let item = FeatureImportance { feature: "high_cholesterol".into(), weight: 0.0 };
        assert_eq!(item.display_name(), "High Cholesterol");
    }

    #[test]
    fn health_ok_reads_the_ok_flag() {
        assert!(health_is_ok(&json!({ "ok": true, "version": "1" })));
        assert!(!health_is_ok(&json!({ "ok": false })));
        assert!(!health_is_ok(&json!({ "status": "up" })));
    }

    #[test]
    fn health_accepts_truthy_ok_values() {
        assert!(health_is_ok(&json!({ "ok": 1 })));
        assert!(health_is_ok(&json!({ "ok": "ok" })));
        assert!(health_is_ok(&json!({ "ok": {} })));
        assert!(!health_is_ok(&json!({ "ok": 0 })));
        assert!(!health_is_ok(&json!({ "ok": 0.0 })));
        assert!(!health_is_ok(&json!({ "ok": "" })));
        assert!(!health_is_ok(&json!({ "ok": null })));
        assert!(!health_is_ok(&json!(["ok"])));
    }

    #[test]
    fn probability_formats_as_percent() {
        assert_eq!(format_probability(0.123), "12.3%");
    }
}
