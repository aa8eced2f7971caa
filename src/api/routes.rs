use crate::recognition::{RecognitionOutcome, RejectReason};
use crate::state::AppState;
use crate::telemetry;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Wire shape of a recognition answer. Business-level failures ride inside
/// the body with HTTP 200; the embedded client branches on `status` and
/// inspects `reason` to distinguish causes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RecognizeResponse {
    #[serde(rename = "dung")]
    Match { name: String, confidence: f64 },
    #[serde(rename = "sai")]
    NoMatch { reason: String },
}

impl From<RecognitionOutcome> for RecognizeResponse {
    fn from(outcome: RecognitionOutcome) -> Self {
        match outcome {
            RecognitionOutcome::Match { name, confidence } => Self::Match {
                name,
                confidence: round_two_decimals(confidence),
            },
            RecognitionOutcome::NoMatch { reason } => Self::NoMatch {
                reason: reason.to_string(),
            },
        }
    }
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recognize the face in an uploaded image.
///
/// Expects a multipart form with a file field named `image`. Every
/// recognition outcome, including a missing field, answers HTTP 200 with a
/// structured body; only a malformed multipart body yields the extractor's
/// own 4xx status.
pub async fn recognize(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut image: Option<Bytes> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("image") {
                    match field.bytes().await {
                        Ok(bytes) => {
                            image = Some(bytes);
                            break;
                        }
                        Err(e) => return (e.status(), e.body_text()).into_response(),
                    }
                }
            }
            Ok(None) => break,
            Err(e) => return (e.status(), e.body_text()).into_response(),
        }
    }

    let Some(image) = image else {
        let response = RecognizeResponse::from(RecognitionOutcome::no_match(
            RejectReason::MissingImage,
        ));
        return (StatusCode::OK, Json(response)).into_response();
    };

    let outcome = state.recognize(&image).await;
    (StatusCode::OK, Json(RecognizeResponse::from(outcome))).into_response()
}

/// Liveness string for quick manual checks from the device side.
pub async fn index() -> impl IntoResponse {
    "Face recognition gate is running (OK)"
}

/// Health check endpoint
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "face-gate"
        })),
    )
}

/// Readiness check endpoint
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.engine().health_check().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "engine": state.engine().id()
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not ready",
                "engine": state.engine().id()
            })),
        )
    }
}

/// Metrics endpoint (Prometheus format)
pub async fn metrics() -> impl IntoResponse {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = telemetry::REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response();
    }

    match String::from_utf8(buffer) {
        Ok(s) => s.into_response(),
        Err(e) => {
            tracing::error!("Failed to convert metrics to UTF-8: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to convert metrics",
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_wire_shape() {
        let response = RecognizeResponse::from(RecognitionOutcome::Match {
            name: "BAO".to_string(),
            confidence: 42.0,
        });
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(
            body,
            json!({"status": "dung", "name": "BAO", "confidence": 42.0})
        );
    }

    #[test]
    fn test_no_match_wire_shape() {
        let response =
            RecognizeResponse::from(RecognitionOutcome::no_match(RejectReason::NoFaceFound));
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body, json!({"status": "sai", "reason": "no face found"}));
    }

    #[test]
    fn test_confidence_rounded_to_two_decimals() {
        let response = RecognizeResponse::from(RecognitionOutcome::Match {
            name: "BAO".to_string(),
            confidence: 42.126,
        });
        match response {
            RecognizeResponse::Match { confidence, .. } => assert_eq!(confidence, 42.13),
            RecognizeResponse::NoMatch { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn test_internal_error_message_becomes_reason() {
        let response = RecognizeResponse::from(RecognitionOutcome::no_match(
            RejectReason::Internal("recognizer predict failed".to_string()),
        ));
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["status"], "sai");
        assert_eq!(body["reason"], "recognizer predict failed");
    }
}
