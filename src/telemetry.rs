use lazy_static::lazy_static;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging from the environment (`RUST_LOG`), defaulting to info.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref RECOGNITIONS: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new(
                "face_gate_recognitions_total",
                "Total number of recognition requests by outcome",
            ),
            &["outcome"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref REJECTIONS: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new(
                "face_gate_rejections_total",
                "Total number of not-matched responses by reason",
            ),
            &["reason"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref RECOGNITION_DURATION: Histogram = {
        let metric = Histogram::with_opts(
            HistogramOpts::new(
                "face_gate_recognition_duration_seconds",
                "Duration of the full decode/detect/predict pipeline",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };
}
