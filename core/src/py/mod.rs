// Python-bindingen: tolerant JSON inn (pose-detektoren kjører i Python),
// komplett SwingReport som JSON ut. Feltnavn-aliaser aksepteres slik at
// eldre payload-varianter fra front-enden ikke brekker.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use serde::Deserialize;
use serde_path_to_error as spte;

use crate::analyzer::SwingAnalyzer;
use crate::metrics;
use crate::types::{CameraAngle, Keypoint, KeypointType, PoseFrame};

fn default_confidence() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct KeypointIn {
    #[serde(alias = "name", alias = "type")]
    kind: KeypointType,
    x: f64,
    y: f64,
    #[serde(default = "default_confidence", alias = "score", alias = "conf")]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct FrameIn {
    #[serde(alias = "timestamp", alias = "time_s")]
    t: f64,
    #[serde(default)]
    keypoints: Vec<KeypointIn>,
}

// OBJECT-form: { frames, camera? } — aksepter også eldre "poses"-navn.
#[derive(Debug, Deserialize)]
struct AnalyzeIn {
    #[serde(alias = "poses")]
    frames: Vec<FrameIn>,
    #[serde(default, alias = "camera_angle", alias = "view")]
    camera: Option<CameraAngle>,
}

fn to_core_frames(input: Vec<FrameIn>) -> Vec<PoseFrame> {
    input
        .into_iter()
        .map(|f| {
            let keypoints = f
                .keypoints
                .into_iter()
                .map(|k| Keypoint::new(k.kind, k.x, k.y, k.confidence))
                .collect();
            PoseFrame::new(f.t, keypoints)
        })
        .collect()
}

/// Analyserer en posesekvens levert som JSON og returnerer
/// SwingReport som JSON-streng.
#[pyfunction]
fn analyze_swing_json(payload: &str) -> PyResult<String> {
    let mut de = serde_json::Deserializer::from_str(payload);
    let input: AnalyzeIn = spte::deserialize(&mut de)
        .map_err(|e| PyValueError::new_err(format!("invalid payload at {}: {}", e.path(), e)))?;

    let frames = to_core_frames(input.frames);
    let analyzer = SwingAnalyzer::new();

    let report = analyzer
        .analyze(&frames, input.camera)
        .map_err(|e| PyValueError::new_err(format!("{} — {}", e, e.remediation())))?;

    serde_json::to_string(&report).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Prometheus-tellere i tekstformat (scrapes av host-prosessen).
#[pyfunction]
fn export_metrics() -> PyResult<String> {
    Ok(metrics::export())
}

#[pymodule]
fn swinggraph_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_swing_json, m)?)?;
    m.add_function(wrap_pyfunction!(export_metrics, m)?)?;
    Ok(())
}
