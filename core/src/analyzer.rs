// core/src/analyzer.rs
//
// Toppnivå-inngangen: PoseSequence → kamera → faser → features →
// klassifisering. Enten et komplett SwingReport eller en typet feil,
// aldri et halvfylt resultat.

use std::collections::BTreeMap;

use chrono::Utc;
use log::debug;

use crate::camera::detect_camera_angle;
use crate::classifier::SwingClassifier;
use crate::error::AnalysisError;
use crate::features::FeatureExtractor;
use crate::metrics;
use crate::phases::{PhaseDetector, ProportionalPhases};
use crate::types::{CameraAngle, KeypointType, PoseFrame, SwingReport};

/// Hard nedre grense for sekvenslengde.
pub const MIN_SEQUENCE_LEN: usize = 3;
/// Snitt detekterte ledd per frame under dette er ubrukelig video.
pub const MIN_AVG_KEYPOINTS: f64 = 8.0;

/// Analysatoren er stateless og trygg å dele mellom uavhengige kall;
/// fasedetektoren injiseres slik at inndelingen kan byttes ut.
pub struct SwingAnalyzer {
    phase_detector: Box<dyn PhaseDetector + Send + Sync>,
    extractor: FeatureExtractor,
    classifier: SwingClassifier,
}

impl Default for SwingAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SwingAnalyzer {
    pub fn new() -> Self {
        Self::with_phase_detector(Box::new(ProportionalPhases))
    }

    pub fn with_phase_detector(phase_detector: Box<dyn PhaseDetector + Send + Sync>) -> Self {
        Self {
            phase_detector,
            extractor: FeatureExtractor::new(),
            classifier: SwingClassifier::new(),
        }
    }

    /// Kjør hele pipelinen. `camera_override` hopper over
    /// auto-deteksjonen når kalleren allerede vet vinkelen.
    pub fn analyze(
        &self,
        frames: &[PoseFrame],
        camera_override: Option<CameraAngle>,
    ) -> Result<SwingReport, AnalysisError> {
        let report = self.analyze_inner(frames, camera_override);
        match &report {
            Ok(_) => metrics::global().analyses_total.inc(),
            Err(e) => {
                let kind = match e {
                    AnalysisError::InsufficientPoseData { .. } => "insufficient_pose_data",
                    AnalysisError::NoValidSwingMotion => "no_valid_swing_motion",
                    AnalysisError::PoorVideoQuality { .. } => "poor_video_quality",
                    AnalysisError::AmbiguousCameraAngle { .. } => "ambiguous_camera_angle",
                };
                metrics::global()
                    .failures_total
                    .with_label_values(&[kind])
                    .inc();
            }
        }
        report
    }

    fn analyze_inner(
        &self,
        frames: &[PoseFrame],
        camera_override: Option<CameraAngle>,
    ) -> Result<SwingReport, AnalysisError> {
        if frames.len() < MIN_SEQUENCE_LEN {
            return Err(AnalysisError::InsufficientPoseData {
                frames: frames.len(),
                min: MIN_SEQUENCE_LEN,
            });
        }

        let avg_keypoints = frames
            .iter()
            .map(|f| f.visible_count() as f64)
            .sum::<f64>()
            / frames.len() as f64;
        if avg_keypoints < MIN_AVG_KEYPOINTS {
            return Err(AnalysisError::PoorVideoQuality {
                avg_keypoints,
                min: MIN_AVG_KEYPOINTS,
            });
        }

        let camera = match camera_override {
            Some(angle) => angle,
            None => {
                let angle = detect_camera_angle(frames)?;
                let label = match angle {
                    CameraAngle::Side => "side",
                    CameraAngle::Back => "back",
                };
                metrics::global()
                    .camera_detected_total
                    .with_label_values(&[label])
                    .inc();
                angle
            }
        };
        debug!("camera angle: {:?} (override={})", camera, camera_override.is_some());

        let windows = self.phase_detector.segment(frames.len());
        let (features, phase_coverage) = self.extractor.extract(frames, camera, &windows)?;
        let classification = self.classifier.classify(&features, camera);

        Ok(SwingReport {
            camera_angle: camera,
            features,
            classification,
            keypoint_reliability: keypoint_reliability(frames),
            phase_coverage,
            analyzed_at: Utc::now(),
        })
    }
}

/// Snitt-confidence per leddtype over sekvensen. Frames der leddet
/// mangler teller som 0.0, så kalleren ser reell dekning.
pub fn keypoint_reliability(frames: &[PoseFrame]) -> BTreeMap<KeypointType, f64> {
    let mut out = BTreeMap::new();
    if frames.is_empty() {
        return out;
    }
    let n = frames.len() as f64;
    for kind in KeypointType::ALL {
        let sum: f64 = frames
            .iter()
            .map(|f| f.keypoint(kind).map(|k| k.confidence).unwrap_or(0.0))
            .sum();
        out.insert(kind, sum / n);
    }
    out
}
