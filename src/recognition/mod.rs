pub mod lbph;
pub mod mock;

use async_trait::async_trait;
use std::fmt;

/// Why a request did not produce a match.
///
/// Every per-request failure is an expected business outcome, carried as a
/// value rather than an error: the HTTP layer always answers 200 with a
/// structured body, and callers branch on the reason string.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// The multipart body had no `image` field.
    MissingImage,
    /// The uploaded bytes were not a decodable image.
    UndecodableImage,
    /// The detector reported zero face regions.
    NoFaceFound,
    /// A face was found but it is not the enrolled identity, or its
    /// distance score was at or above the threshold. The two cases are
    /// deliberately merged so the response leaks no partial-match detail.
    Stranger,
    /// The pipeline failed unexpectedly; carries the underlying message.
    Internal(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImage => write!(f, "missing image file"),
            Self::UndecodableImage => write!(f, "cannot decode image"),
            Self::NoFaceFound => write!(f, "no face found"),
            Self::Stranger => write!(f, "stranger"),
            Self::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl RejectReason {
    /// Stable label for metrics; the internal variant collapses to one
    /// bucket so arbitrary error text never becomes a label value.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::MissingImage => "missing_image",
            Self::UndecodableImage => "undecodable_image",
            Self::NoFaceFound => "no_face_found",
            Self::Stranger => "stranger",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result of running one image through the recognition pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// The enrolled identity was recognized. `confidence` is the raw
    /// recognizer distance (lower = more similar, library-defined scale).
    Match { name: String, confidence: f64 },
    /// No match; the reason says which stage rejected the image.
    NoMatch { reason: RejectReason },
}

impl RecognitionOutcome {
    pub fn no_match(reason: RejectReason) -> Self {
        Self::NoMatch { reason }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// Seam between the HTTP layer and the vision backend. The production
/// implementation wraps OpenCV; tests substitute a scripted mock.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Engine identifier for logs and health output.
    fn id(&self) -> &'static str;

    /// Run the full decode/detect/predict pipeline over raw image bytes.
    ///
    /// Never fails: pipeline errors are folded into a no-match outcome.
    async fn recognize(&self, image: &[u8]) -> RecognitionOutcome;

    /// Whether the engine is ready to serve requests.
    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(RejectReason::MissingImage.to_string(), "missing image file");
        assert_eq!(
            RejectReason::UndecodableImage.to_string(),
            "cannot decode image"
        );
        assert_eq!(RejectReason::NoFaceFound.to_string(), "no face found");
        assert_eq!(RejectReason::Stranger.to_string(), "stranger");
        assert_eq!(
            RejectReason::Internal("boom".to_string()).to_string(),
            "boom"
        );
    }

    #[test]
    fn test_internal_reason_collapses_in_metrics() {
        let a = RejectReason::Internal("first".to_string());
        let b = RejectReason::Internal("second".to_string());
        assert_eq!(a.metric_label(), "internal_error");
        assert_eq!(a.metric_label(), b.metric_label());
    }

    #[test]
    fn test_outcome_is_match() {
        let hit = RecognitionOutcome::Match {
            name: "BAO".to_string(),
            confidence: 42.0,
        };
        assert!(hit.is_match());
        assert!(!RecognitionOutcome::no_match(RejectReason::Stranger).is_match());
    }
}
