//! OpenCV-backed recognition engine: Haar cascade detection + LBPH scoring.
//!
//! Both models are plain OpenCV serialized files loaded once at startup; the
//! per-request pipeline is decode, grayscale, detect, crop, predict.

use crate::config::ServiceConfig;
use crate::recognition::{RecognitionEngine, RecognitionOutcome, RejectReason};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use opencv::core::{Mat, Ptr, Rect, Size, Vector};
use opencv::face::LBPHFaceRecognizer;
use opencv::prelude::*;
use opencv::{imgcodecs, imgproc, objdetect};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{info, warn};

// Detector tuning. A lower neighbor count admits more detections and more
// false positives; these values match the enrolled training pipeline.
const DETECT_SCALE_FACTOR: f64 = 1.1;
const DETECT_MIN_NEIGHBORS: i32 = 10;

// LBPH operator parameters, identical to the training side defaults.
const LBPH_RADIUS: i32 = 1;
const LBPH_NEIGHBORS: i32 = 8;
const LBPH_GRID_X: i32 = 8;
const LBPH_GRID_Y: i32 = 8;

/// Strict upper bound on the LBPH distance for a match. A distance of
/// exactly this value is treated as a stranger.
const MATCH_THRESHOLD: f64 = 100.0;

/// The single enrolled identity the classifier was trained to recognize.
const TARGET_LABEL: i32 = 1;

/// Production engine wrapping the two OpenCV classifiers.
///
/// The cascade detection call takes `&mut self`, so both models sit behind
/// async mutexes; nothing mutates model state after startup.
pub struct LbphEngine {
    detector: Mutex<objdetect::CascadeClassifier>,
    recognizer: Mutex<Ptr<LBPHFaceRecognizer>>,
    target_name: String,
}

impl LbphEngine {
    /// Load both model files. Any failure here is fatal for the service:
    /// the process must not start accepting requests with a partial engine.
    pub fn load(config: &ServiceConfig) -> Result<Self> {
        if !Path::new(&config.cascade_path).exists() {
            bail!("cascade file not found: {}", config.cascade_path);
        }
        if !Path::new(&config.model_path).exists() {
            bail!("classifier file not found: {}", config.model_path);
        }

        let mut detector = objdetect::CascadeClassifier::default()
            .context("failed to construct cascade classifier")?;
        let loaded = detector
            .load(&config.cascade_path)
            .with_context(|| format!("failed to read cascade file {}", config.cascade_path))?;
        if !loaded {
            bail!("cascade file {} is not a valid cascade", config.cascade_path);
        }

        let mut recognizer = LBPHFaceRecognizer::create(
            LBPH_RADIUS,
            LBPH_NEIGHBORS,
            LBPH_GRID_X,
            LBPH_GRID_Y,
            f64::MAX,
        )
        .context("failed to construct LBPH recognizer")?;
        // `Algorithm::read` shares the name; call the filename overload directly.
        opencv::face::FaceRecognizerTrait::read(&mut recognizer, &config.model_path)
            .with_context(|| format!("failed to read classifier file {}", config.model_path))?;

        info!(
            cascade = %config.cascade_path,
            model = %config.model_path,
            target = %config.target_name,
            "loaded detection and recognition models"
        );

        Ok(Self {
            detector: Mutex::new(detector),
            recognizer: Mutex::new(recognizer),
            target_name: config.target_name.clone(),
        })
    }

    async fn run_pipeline(&self, image: &[u8]) -> Result<RecognitionOutcome> {
        let buf = Vector::<u8>::from_slice(image);
        let frame = imgcodecs::imdecode(&buf, imgcodecs::IMREAD_COLOR)
            .context("image decode call failed")?;
        if frame.empty() {
            return Ok(RecognitionOutcome::no_match(RejectReason::UndecodableImage));
        }

        let mut gray = Mat::default();
        imgproc::cvt_color_def(&frame, &mut gray, imgproc::COLOR_BGR2GRAY)
            .context("grayscale conversion failed")?;

        let mut faces = Vector::<Rect>::new();
        {
            let mut detector = self.detector.lock().await;
            detector
                .detect_multi_scale(
                    &gray,
                    &mut faces,
                    DETECT_SCALE_FACTOR,
                    DETECT_MIN_NEIGHBORS,
                    0,
                    Size::default(),
                    Size::default(),
                )
                .context("face detection failed")?;
        }

        if faces.is_empty() {
            return Ok(RecognitionOutcome::no_match(RejectReason::NoFaceFound));
        }

        // Only the first reported region is considered; the detector's
        // ordering is whatever the library returns.
        let region = faces.get(0).context("empty detection list")?;
        let roi = Mat::roi(&gray, region).context("face crop out of bounds")?;

        let (label, distance) = {
            let recognizer = self.recognizer.lock().await;
            let mut label = -1;
            let mut distance = 0.0;
            recognizer
                .predict(&roi, &mut label, &mut distance)
                .context("recognizer predict failed")?;
            (label, distance)
        };

        if is_enrolled_match(label, distance) {
            info!(
                name = %self.target_name,
                confidence = distance,
                "recognized enrolled identity"
            );
            Ok(RecognitionOutcome::Match {
                name: self.target_name.clone(),
                confidence: distance,
            })
        } else {
            info!(label, confidence = distance, "face did not match enrolled identity");
            Ok(RecognitionOutcome::no_match(RejectReason::Stranger))
        }
    }
}

/// Match iff the predicted label is the enrolled identity and the distance
/// is strictly below the threshold.
fn is_enrolled_match(label: i32, distance: f64) -> bool {
    label == TARGET_LABEL && distance < MATCH_THRESHOLD
}

#[async_trait]
impl RecognitionEngine for LbphEngine {
    fn id(&self) -> &'static str {
        "cascade_lbph"
    }

    async fn recognize(&self, image: &[u8]) -> RecognitionOutcome {
        match self.run_pipeline(image).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("recognition pipeline error: {e:#}");
                RecognitionOutcome::no_match(RejectReason::Internal(e.to_string()))
            }
        }
    }
}
