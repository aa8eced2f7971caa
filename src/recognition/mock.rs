//! Scripted engine for exercising the HTTP layer without model files.

use crate::recognition::{RecognitionEngine, RecognitionOutcome};
use async_trait::async_trait;

/// Engine that returns a fixed outcome for every request.
pub struct MockEngine {
    outcome: RecognitionOutcome,
    healthy: bool,
}

impl MockEngine {
    pub fn new(outcome: RecognitionOutcome) -> Self {
        Self {
            outcome,
            healthy: true,
        }
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }
}

#[async_trait]
impl RecognitionEngine for MockEngine {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn recognize(&self, _image: &[u8]) -> RecognitionOutcome {
        self.outcome.clone()
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::RejectReason;

    #[tokio::test]
    async fn test_mock_returns_scripted_outcome() {
        let engine = MockEngine::new(RecognitionOutcome::no_match(RejectReason::NoFaceFound));
        let outcome = engine.recognize(b"anything").await;
        assert_eq!(
            outcome,
            RecognitionOutcome::no_match(RejectReason::NoFaceFound)
        );
    }

    #[tokio::test]
    async fn test_mock_health() {
        let engine = MockEngine::new(RecognitionOutcome::Match {
            name: "BAO".to_string(),
            confidence: 1.0,
        });
        assert!(engine.health_check().await);

        let sick = MockEngine::new(RecognitionOutcome::no_match(RejectReason::Stranger))
            .with_health(false);
        assert!(!sick.health_check().await);
    }
}
