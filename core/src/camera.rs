// core/src/camera.rs
//
// Utleder opptaksvinkel (Side/Back) fra aggregert keypoint-synlighet.
// Flere av de geometriske formlene er vinkel-avhengige, så en usikker
// deteksjon må opp som feil, ikke stille defaulting.

use log::debug;

use crate::error::AnalysisError;
use crate::types::{CameraAngle, KeypointType as K, PoseFrame};

pub const MAX_SAMPLED_FRAMES: usize = 10;
pub const MIN_BODY_RATIO: f64 = 0.2; // gating: minimum kroppsdekning

const BACK_WRIST_DIST: f64 = 0.10;    // hender samlet om grepet, sett bakfra
const BACK_SHOULDER_SYM: f64 = 0.05;  // skulderhøyde-symmetri
const SIDE_ANKLE_SEP: f64 = 0.15;     // standplassbredde synlig fra siden
const SIDE_FACE_COUNT: usize = 3;     // profil: flere ansiktspunkter synlige

#[derive(Debug, Clone, Copy, Default)]
struct FrameIndicators {
    face: bool,
    body: bool,
    back: bool,
    side: bool,
}

fn frame_indicators(frame: &PoseFrame) -> FrameIndicators {
    let face_count = K::FACE.iter().filter(|&&k| frame.has(k)).count();

    let body_count = [K::LeftShoulder, K::RightShoulder, K::LeftWrist, K::RightWrist]
        .iter()
        .filter(|&&k| frame.has(k))
        .count();

    let wrists_together = match (frame.point(K::LeftWrist), frame.point(K::RightWrist)) {
        (Some(l), Some(r)) => l.distance_to(&r) < BACK_WRIST_DIST,
        _ => false,
    };
    let shoulders_level = match (frame.point(K::LeftShoulder), frame.point(K::RightShoulder)) {
        (Some(l), Some(r)) => (l.y - r.y).abs() < BACK_SHOULDER_SYM,
        _ => false,
    };

    let ankles_apart = match (frame.point(K::LeftAnkle), frame.point(K::RightAnkle)) {
        (Some(l), Some(r)) => (l.x - r.x).abs() > SIDE_ANKLE_SEP,
        _ => false,
    };

    FrameIndicators {
        face: face_count > 0,
        body: body_count >= 2,
        back: wrists_together || shoulders_level,
        side: ankles_apart || face_count >= SIDE_FACE_COUNT,
    }
}

/// Plukker inntil 10 jevnt fordelte frames fra sekvensen.
fn sample_indices(n: usize) -> Vec<usize> {
    if n <= MAX_SAMPLED_FRAMES {
        return (0..n).collect();
    }
    let step = n as f64 / MAX_SAMPLED_FRAMES as f64;
    (0..MAX_SAMPLED_FRAMES)
        .map(|i| ((i as f64 * step) as usize).min(n - 1))
        .collect()
}

/// Ren funksjon av sekvensen: samme input gir alltid samme vinkel.
pub fn detect_camera_angle(frames: &[PoseFrame]) -> Result<CameraAngle, AnalysisError> {
    let indices = sample_indices(frames.len());
    let sampled = indices.len().max(1) as f64;

    let mut face = 0usize;
    let mut body = 0usize;
    let mut back = 0usize;
    let mut side = 0usize;

    for &i in &indices {
        let ind = frame_indicators(&frames[i]);
        face += ind.face as usize;
        body += ind.body as usize;
        back += ind.back as usize;
        side += ind.side as usize;
    }

    let face_ratio = face as f64 / sampled;
    let body_ratio = body as f64 / sampled;
    let back_ratio = back as f64 / sampled;
    let side_ratio = side as f64 / sampled;

    debug!(
        "camera ratios: face={:.2} body={:.2} back={:.2} side={:.2}",
        face_ratio, body_ratio, back_ratio, side_ratio
    );

    // Gating: uten et minimum av kroppsdekning er svaret verdiløst.
    if body_ratio <= MIN_BODY_RATIO {
        return Err(AnalysisError::AmbiguousCameraAngle {
            body_ratio,
            min: MIN_BODY_RATIO,
        });
    }

    // Beslutningsregler i prioritert rekkefølge.
    let angle = if body_ratio > 0.3 && face_ratio < 0.1 {
        CameraAngle::Back // kropp synlig men intet ansikt: filmet bakfra
    } else if back_ratio > 0.3 {
        CameraAngle::Back
    } else if back_ratio > side_ratio && back_ratio > 0.2 {
        CameraAngle::Back
    } else {
        CameraAngle::Side
    };

    Ok(angle)
}
