// core/src/metrics.rs
//
// Prometheus-tellere for analysen. Globalt registry bak once_cell,
// eksport via TextEncoder for scraping i host-prosessen.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct AnalysisMetrics {
    pub registry: Registry,
    pub analyses_total: IntCounter,
    pub failures_total: IntCounterVec,
    pub plane_fallback_total: IntCounter,
    pub camera_detected_total: IntCounterVec,
}

impl AnalysisMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let analyses_total =
            IntCounter::new("swing_analyses_total", "Fullførte svinganalyser").unwrap();
        let failures_total = IntCounterVec::new(
            Opts::new("swing_analysis_failures_total", "Avviste analyser per feiltype"),
            &["kind"],
        )
        .unwrap();
        let plane_fallback_total = IntCounter::new(
            "swing_plane_fallback_total",
            "Svingplan beregnet via fallback-kjeden",
        )
        .unwrap();
        let camera_detected_total = IntCounterVec::new(
            Opts::new("camera_angle_detected_total", "Detektert kameravinkel"),
            &["angle"],
        )
        .unwrap();

        registry.register(Box::new(analyses_total.clone())).unwrap();
        registry.register(Box::new(failures_total.clone())).unwrap();
        registry.register(Box::new(plane_fallback_total.clone())).unwrap();
        registry.register(Box::new(camera_detected_total.clone())).unwrap();

        Self {
            registry,
            analyses_total,
            failures_total,
            plane_fallback_total,
            camera_detected_total,
        }
    }
}

static METRICS: Lazy<AnalysisMetrics> = Lazy::new(AnalysisMetrics::new);

pub fn global() -> &'static AnalysisMetrics {
    &METRICS
}

/// Registry-innholdet i Prometheus tekstformat.
pub fn export() -> String {
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    if encoder.encode(&METRICS.registry.gather(), &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
