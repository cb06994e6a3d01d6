//! HTTP handlers for the prediction service.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::model::artifact::TrainedEstimator;
use crate::model::ModelError;
use crate::types::{PredictionResult, NUM_FEATURES};

/// Shared service state: the loaded estimator, cloned cheaply per request.
#[derive(Clone)]
pub struct ServiceState {
    pub estimator: Arc<TrainedEstimator>,
}

impl ServiceState {
    pub fn new(estimator: TrainedEstimator) -> Self {
        Self {
            estimator: Arc::new(estimator),
        }
    }
}

/// Request-level failures, each mapped to a distinct status code so the
/// caller can tell a bad payload from a server-side fault.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Body missing, not JSON, or fields of the wrong type.
    #[error("invalid request payload: {0}")]
    Payload(String),

    /// Well-formed payload with values the model cannot accept.
    #[error("invalid feature values: {0}")]
    Validation(String),

    /// The estimator itself failed.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::FeatureShape { expected, found } => ServiceError::Validation(format!(
                "expected {expected} feature values, got {found}"
            )),
            other => ServiceError::Inference(other.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ServiceError::Payload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(%status, error = %self, "Request failed");
        } else {
            warn!(%status, error = %self, "Request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// A prediction request: every clinical feature, all required.
///
/// Integer-coded fields are accepted as JSON numbers; `age` and the lab
/// measurements may be fractional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRequest {
    pub age: f64,
    pub anaemia: i64,
    pub creatinine_phosphokinase: i64,
    pub diabetes: i64,
    pub ejection_fraction: i64,
    pub high_blood_pressure: i64,
    pub platelets: f64,
    pub serum_creatinine: f64,
    pub serum_sodium: i64,
    pub sex: i64,
    pub smoking: i64,
    pub time: i64,
}

impl PredictRequest {
    /// Feature vector in the order the pipeline expects.
    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.age,
            self.anaemia as f64,
            self.creatinine_phosphokinase as f64,
            self.diabetes as f64,
            self.ejection_fraction as f64,
            self.high_blood_pressure as f64,
            self.platelets,
            self.serum_creatinine,
            self.serum_sodium as f64,
            self.sex as f64,
            self.smoking as f64,
            self.time as f64,
        ]
    }

    fn validate(&self) -> Result<(), ServiceError> {
        let features = self.feature_vector();
        debug_assert_eq!(features.len(), NUM_FEATURES);
        if let Some(bad) = features.iter().find(|v| !v.is_finite()) {
            return Err(ServiceError::Validation(format!(
                "feature values must be finite, got {bad}"
            )));
        }
        Ok(())
    }
}

/// `GET /` — liveness probe.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "hello": "world" }))
}

/// `POST /predict` — classify one patient.
pub async fn predict(
    State(state): State<ServiceState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ServiceError> {
    let Json(request) = payload.map_err(|e| ServiceError::Payload(e.body_text()))?;
    request.validate()?;

    let result = state.estimator.predict(&request.feature_vector())?;
    info!(
        prediction = result.prediction,
        probability_death = format!("{:.4}", result.probability_death),
        "Served prediction"
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json() -> serde_json::Value {
        json!({
            "age": 65,
            "anaemia": 0,
            "creatinine_phosphokinase": 250,
            "diabetes": 1,
            "ejection_fraction": 35,
            "high_blood_pressure": 1,
            "platelets": 250000,
            "serum_creatinine": 1.9,
            "serum_sodium": 130,
            "sex": 1,
            "smoking": 0,
            "time": 120
        })
    }

    #[test]
    fn test_request_feature_order() {
        let req: PredictRequest = serde_json::from_value(request_json()).expect("deserialize");
        let v = req.feature_vector();
        assert_eq!(v.len(), NUM_FEATURES);
        assert_eq!(v[0], 65.0);
        assert_eq!(v[6], 250_000.0);
        assert_eq!(v[7], 1.9);
        assert_eq!(v[11], 120.0);
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut body = request_json();
        body.as_object_mut().expect("object").remove("ejection_fraction");
        let err = serde_json::from_value::<PredictRequest>(body).unwrap_err();
        assert!(err.to_string().contains("ejection_fraction"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut body = request_json();
        body["cholesterol"] = json!(200);
        assert!(serde_json::from_value::<PredictRequest>(body).is_err());
    }

    #[test]
    fn test_non_finite_feature_rejected() {
        let req: PredictRequest = serde_json::from_value(request_json()).expect("deserialize");
        let req = PredictRequest {
            serum_creatinine: f64::NAN,
            ..req
        };
        assert!(matches!(req.validate(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                ServiceError::Payload("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                ServiceError::Inference("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
