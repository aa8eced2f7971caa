use crate::recognition::{RecognitionEngine, RecognitionOutcome};
use crate::telemetry;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state, constructed once at startup and cloned into
/// every handler. The engine is the only long-lived state; it is read-only
/// after construction.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    engine: Arc<dyn RecognitionEngine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { engine }),
        }
    }

    pub fn engine(&self) -> &Arc<dyn RecognitionEngine> {
        &self.inner.engine
    }

    /// Run one image through the engine, recording latency and outcome.
    pub async fn recognize(&self, image: &[u8]) -> RecognitionOutcome {
        let start = Instant::now();
        let outcome = self.inner.engine.recognize(image).await;
        let elapsed = start.elapsed();

        telemetry::RECOGNITION_DURATION.observe(elapsed.as_secs_f64());
        match &outcome {
            RecognitionOutcome::Match { .. } => {
                telemetry::RECOGNITIONS.with_label_values(&["match"]).inc();
            }
            RecognitionOutcome::NoMatch { reason } => {
                telemetry::RECOGNITIONS
                    .with_label_values(&["no_match"])
                    .inc();
                telemetry::REJECTIONS
                    .with_label_values(&[reason.metric_label()])
                    .inc();
            }
        }

        info!(
            engine = self.inner.engine.id(),
            matched = outcome.is_match(),
            processing_time_ms = elapsed.as_millis() as u64,
            "processed recognition request"
        );

        outcome
    }
}
