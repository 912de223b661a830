// core/src/features.rs
//
// Bygger den faste 35-elements featurevektoren fra fasevinduene.
// Grupper med for få frames emitteres som nuller og flagges i
// PhaseCoverage; svingplanet eier sin egen fallback-kjede og er den
// eneste målingen som kan velte hele ekstraksjonen.

use log::{debug, warn};

use crate::error::AnalysisError;
use crate::geometry as geo;
use crate::metrics;
use crate::phases::{
    PhaseWindows, MIN_FRAMES_BACKSWING, MIN_FRAMES_DOWNSWING, MIN_FRAMES_IMPACT,
    MIN_FRAMES_SETUP, MIN_FRAMES_TRANSITION,
};
use crate::types::{
    feature_index as fi, CameraAngle, FeatureVector, KeypointType as K, PhaseCoverage, PoseFrame,
};

/// Minste normaliserte forflytning før bevegelsen regnes som en sving.
pub const MIN_PRIMARY_DISPLACEMENT: f64 = 0.05;
pub const MIN_SECONDARY_DISPLACEMENT: f64 = 0.02;

/// Svingplan-vinkel med full fallback-kjede. Feiler med
/// `NoValidSwingMotion` når ingen variant finner reell bevegelse,
/// aldri en gjettet konstant.
pub fn swing_plane_angle(frames: &[PoseFrame], camera: CameraAngle) -> Result<f64, AnalysisError> {
    let n = frames.len();
    debug_assert!(n >= 3);

    let address = &frames[0];
    let top = &frames[(n * 2 / 3).min(n - 1)];

    let primary = match camera {
        CameraAngle::Side => plane_side(address, top),
        CameraAngle::Back => plane_back(address, top),
    };

    if let Some(angle) = primary {
        return Ok(angle);
    }

    warn!("primary swing plane calculation failed, trying fallback pairs");
    metrics::global().plane_fallback_total.inc();

    plane_fallback(address, top).ok_or(AnalysisError::NoValidSwingMotion)
}

/// Sidevisning: sporingspunkt = venstre håndledd → høyre håndledd →
/// venstre albue (første tilgjengelige vinner). Krever forflytning
/// ≥ 0.05; vinkel = atan2(|Δy|, |Δx|), clamp [15°, 75°].
fn plane_side(address: &PoseFrame, top: &PoseFrame) -> Option<f64> {
    let tracked = [K::LeftWrist, K::RightWrist, K::LeftElbow];
    for kind in tracked {
        let (a, b) = match (address.point(kind), top.point(kind)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let disp = (dx * dx + dy * dy).sqrt();
        if disp < MIN_PRIMARY_DISPLACEMENT {
            // punktet sto i ro: ikke en reell sving, la fallback-kjeden prøve
            return None;
        }
        return Some(dy.abs().atan2(dx.abs()).to_degrees().clamp(15.0, 75.0));
    }
    None
}

/// Bakfra: sporingspunkt = skuldersenter, ellers grepssenter
/// (håndledds-midtpunkt). Bevegelsesvinkelen vektes 0.6 mot 0.4 for
/// skulderlinjens rotasjonsendring. Clamp [20°, 80°].
fn plane_back(address: &PoseFrame, top: &PoseFrame) -> Option<f64> {
    let center_of = |f: &PoseFrame| {
        match (f.point(K::LeftShoulder), f.point(K::RightShoulder)) {
            (Some(l), Some(r)) => Some(l.midpoint(&r)),
            _ => match (f.point(K::LeftWrist), f.point(K::RightWrist)) {
                (Some(l), Some(r)) => Some(l.midpoint(&r)),
                _ => None,
            },
        }
    };

    let (a, b) = (center_of(address)?, center_of(top)?);
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let disp = (dx * dx + dy * dy).sqrt();
    if disp <= MIN_SECONDARY_DISPLACEMENT {
        return None;
    }

    let movement = dy.abs().atan2(dx.abs()).to_degrees();
    let rotation = match (geo::shoulder_rotation(address), geo::shoulder_rotation(top)) {
        (Some(r0), Some(r1)) => {
            let mut d = (r1 - r0) % 360.0;
            if d > 180.0 {
                d -= 360.0;
            } else if d < -180.0 {
                d += 360.0;
            }
            d.abs()
        }
        _ => 0.0,
    };

    Some((0.6 * movement + 0.4 * rotation).clamp(20.0, 80.0))
}

/// Fallback: skulder-relative deltaer for fire ledd-par i fast
/// rekkefølge. Første par med forflytning > 0.02 vinner, clamp [25°, 65°].
fn plane_fallback(address: &PoseFrame, top: &PoseFrame) -> Option<f64> {
    let pairs = [
        (K::LeftWrist, K::LeftShoulder),
        (K::RightWrist, K::RightShoulder),
        (K::LeftElbow, K::LeftShoulder),
        (K::RightElbow, K::RightShoulder),
    ];

    for (tracked, anchor) in pairs {
        let rel = |f: &PoseFrame| {
            let (p, s) = (f.point(tracked)?, f.point(anchor)?);
            Some((p.x - s.x, p.y - s.y))
        };
        let (a, b) = match (rel(address), rel(top)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        if (dx * dx + dy * dy).sqrt() <= MIN_SECONDARY_DISPLACEMENT {
            continue;
        }
        return Some(dy.abs().atan2(dx.abs()).to_degrees().clamp(25.0, 65.0));
    }
    None
}

/// Hengsel-serie over et vindu (proxy fra geometry::wrist_hinge).
fn hinge_series(window: &[PoseFrame]) -> Vec<f64> {
    window.iter().map(geo::wrist_hinge).collect()
}

/// Brøkdel av vinduet frem til hengselen har sluppet under
/// `release_fraction` av startverdien. 1.0 = slapp aldri.
fn hinge_release_timing(window: &[PoseFrame], release_fraction: f64) -> f64 {
    let hinges = hinge_series(window);
    if hinges.len() < 2 {
        return 0.5;
    }
    let start = hinges[0];
    if start < 1.0 {
        return 0.5; // ingen lagret vinkel å slippe
    }
    let threshold = start * release_fraction;
    for (i, h) in hinges.iter().enumerate() {
        if *h < threshold {
            return (i as f64 / (hinges.len() - 1) as f64).clamp(0.0, 1.0);
        }
    }
    1.0
}

/// Maks rotasjonshastighet (grader/s) for et ledd-par over et vindu,
/// og indeksen der toppen inntraff.
fn peak_rotation_speed(window: &[PoseFrame], left: K, right: K) -> (f64, usize) {
    let mut peak = 0.0f64;
    let mut peak_i = 0usize;
    for (i, pair) in window.windows(2).enumerate() {
        let dt = (pair[1].t - pair[0].t).max(1e-3);
        if let (Some(a), Some(b)) = (
            geo::line_rotation(&pair[0], left, right),
            geo::line_rotation(&pair[1], left, right),
        ) {
            let mut d = (b - a) % 360.0;
            if d > 180.0 {
                d -= 360.0;
            } else if d < -180.0 {
                d += 360.0;
            }
            let speed = d.abs() / dt;
            if speed > peak {
                peak = speed;
                peak_i = i;
            }
        }
    }
    (peak.clamp(0.0, 1000.0), peak_i)
}

fn window_duration(window: &[PoseFrame]) -> f64 {
    match (window.first(), window.last()) {
        (Some(a), Some(b)) => (b.t - a.t).max(0.0),
        _ => 0.0,
    }
}

/// Stateless ekstraktor. Instansieres per behov, injiseres aldri som
/// global tilstand.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Full 35-elements vektor pluss dekningsflagg per fasegruppe.
    /// Kalleren har allerede validert sekvenslengde og kameravinkel.
    pub fn extract(
        &self,
        frames: &[PoseFrame],
        camera: CameraAngle,
        windows: &PhaseWindows,
    ) -> Result<(FeatureVector, PhaseCoverage), AnalysisError> {
        debug_assert!(frames.len() >= 3);

        // Eneste fatale måling: uten plan er det ingen sving.
        let plane = swing_plane_angle(frames, camera)?;

        let mut v = [0.0f64; 35];
        let coverage = PhaseCoverage {
            setup: windows.setup.len() >= MIN_FRAMES_SETUP,
            backswing: windows.backswing.len() >= MIN_FRAMES_BACKSWING,
            transition: windows.transition.len() >= MIN_FRAMES_TRANSITION,
            downswing: windows.downswing.len() >= MIN_FRAMES_DOWNSWING,
            impact: windows.impact.len() >= MIN_FRAMES_IMPACT,
        };

        let setup_frame = &frames[0];

        if coverage.setup {
            v[fi::SPINE_ANGLE] = geo::spine_angle(setup_frame);
            v[fi::KNEE_FLEXION] = geo::knee_flexion(setup_frame);
            v[fi::WEIGHT_DISTRIBUTION] = geo::weight_distribution(setup_frame);
            v[fi::ARM_HANG_ANGLE] = geo::arm_hang_angle(setup_frame);
            v[fi::STANCE_WIDTH] = geo::stance_width(setup_frame);
        }

        if coverage.backswing {
            let bw = &frames[windows.backswing.clone()];
            let top_frame = bw.last().unwrap_or(setup_frame);

            let shoulder_turn = geo::rotation_turn(bw, setup_frame, K::LeftShoulder, K::RightShoulder);
            let hip_turn = geo::rotation_turn(
                std::slice::from_ref(top_frame),
                setup_frame,
                K::LeftHip,
                K::RightHip,
            );

            v[fi::MAX_SHOULDER_TURN] = shoulder_turn;
            v[fi::HIP_TURN_AT_TOP] = hip_turn;
            v[fi::X_FACTOR] = (shoulder_turn - hip_turn).clamp(-40.0, 90.0);
            v[fi::SWING_PLANE_ANGLE] = plane;
            v[fi::ARM_EXTENSION] = geo::arm_extension_ratio(top_frame);
            v[fi::WEIGHT_SHIFT] = (geo::weight_distribution(top_frame)
                - geo::weight_distribution(setup_frame))
            .clamp(-1.0, 1.0);
            v[fi::WRIST_HINGE] = geo::wrist_hinge(top_frame);
            v[fi::BACKSWING_TEMPO] = window_duration(bw).clamp(0.1, 5.0);
            v[fi::HEAD_MOVEMENT] = geo::head_movement(bw);
            v[fi::KNEE_STABILITY] = geo::knee_stability(bw);
        }

        if coverage.transition {
            let tw = &frames[windows.transition.clone()];
            // overgang + nedsving sett under ett for timing-målene
            let through = &frames[windows.transition.start..];

            let first = tw.first().unwrap_or(setup_frame);
            let last = tw.last().unwrap_or(setup_frame);

            let hip_delta = rotation_delta(first, last, K::LeftHip, K::RightHip);
            let shoulder_delta = rotation_delta(first, last, K::LeftShoulder, K::RightShoulder);

            v[fi::TRANSITION_TEMPO] = window_duration(tw).clamp(0.05, 2.0);
            v[fi::HIP_LEAD] = (hip_delta - shoulder_delta).clamp(-45.0, 45.0);
            let dt = window_duration(tw).max(1e-3);
            v[fi::WEIGHT_TRANSFER_RATE] = ((geo::weight_distribution(last)
                - geo::weight_distribution(first))
                / dt)
                .clamp(-5.0, 5.0);
            v[fi::WRIST_UNCOCK_TIMING] = hinge_release_timing(through, 0.5);
            v[fi::KINEMATIC_SEQUENCE] = kinematic_sequence_score(through);
        }

        if coverage.downswing {
            let dw = &frames[windows.downswing.clone()];

            let (hip_speed, _) = peak_rotation_speed(dw, K::LeftHip, K::RightHip);
            let (shoulder_speed, _) = peak_rotation_speed(dw, K::LeftShoulder, K::RightShoulder);

            v[fi::HIP_ROTATION_SPEED] = hip_speed;
            v[fi::SHOULDER_ROTATION_SPEED] = shoulder_speed;

            let (path, attack) = club_delivery(dw);
            v[fi::CLUB_PATH_ANGLE] = path;
            v[fi::ATTACK_ANGLE] = attack;

            v[fi::RELEASE_TIMING] = hinge_release_timing(dw, 0.4);
            v[fi::LEFT_SIDE_STABILITY] = left_side_stability(dw);
            v[fi::DOWNSWING_TEMPO] = window_duration(dw).clamp(0.05, 2.0);

            let peak_wrist = geo::wrist_speed_series(dw)
                .into_iter()
                .fold(0.0f64, f64::max);
            v[fi::POWER_GENERATION] = (peak_wrist / 10.0).clamp(0.0, 1.0);
        }

        if coverage.impact {
            let iw = &frames[windows.impact.clone()];
            let first = iw.first().unwrap_or(setup_frame);
            let last = iw.last().unwrap_or(setup_frame);

            v[fi::IMPACT_POSITION] = geo::weight_distribution(first);
            v[fi::EXTENSION_THROUGH_IMPACT] = geo::arm_extension_ratio(last);
            v[fi::FOLLOW_THROUGH_BALANCE] = (1.0 - 2.0 * geo::head_movement(iw)).clamp(0.0, 1.0);
            v[fi::FINISH_QUALITY] = (0.5 * v[fi::FOLLOW_THROUGH_BALANCE]
                + 0.5 * v[fi::EXTENSION_THROUGH_IMPACT])
                .clamp(0.0, 1.0);
            v[fi::OVERALL_TEMPO_RATIO] = geo::tempo_ratio(frames);
            v[fi::RHYTHM_CONSISTENCY] = rhythm_consistency(frames);
            v[fi::SWING_EFFICIENCY] = (0.4 * v[fi::POWER_GENERATION]
                + 0.3 * v[fi::FOLLOW_THROUGH_BALANCE]
                + 0.3 * (v[fi::X_FACTOR] / 60.0).clamp(0.0, 1.0))
            .clamp(0.0, 1.0);
        }

        debug!(
            "extracted features: plane={:.1} turn={:.1} tempo={:.2}",
            v[fi::SWING_PLANE_ANGLE],
            v[fi::MAX_SHOULDER_TURN],
            v[fi::OVERALL_TEMPO_RATIO]
        );

        Ok((FeatureVector { values: v }, coverage))
    }
}

/// Absolutt rotasjonsendring for et ledd-par mellom to frames.
fn rotation_delta(a: &PoseFrame, b: &PoseFrame, left: K, right: K) -> f64 {
    match (geo::line_rotation(a, left, right), geo::line_rotation(b, left, right)) {
        (Some(r0), Some(r1)) => {
            let mut d = (r1 - r0) % 360.0;
            if d > 180.0 {
                d -= 360.0;
            } else if d < -180.0 {
                d += 360.0;
            }
            d.abs()
        }
        _ => 0.0,
    }
}

/// Kinematisk sekvens: hoftene skal nå toppfart før skuldrene.
/// 1.0 = riktig rekkefølge, 0.6 = samtidig, 0.3 = omvendt, 0.5 = ukjent.
fn kinematic_sequence_score(window: &[PoseFrame]) -> f64 {
    if window.len() < 3 {
        return 0.5;
    }
    let (hip_peak, hip_i) = peak_rotation_speed(window, K::LeftHip, K::RightHip);
    let (shoulder_peak, shoulder_i) =
        peak_rotation_speed(window, K::LeftShoulder, K::RightShoulder);
    if hip_peak < 1e-9 || shoulder_peak < 1e-9 {
        return 0.5;
    }
    if hip_i < shoulder_i {
        1.0
    } else if hip_i == shoulder_i {
        0.6
    } else {
        0.3
    }
}

/// Kølle-levering uten kølle-keypoint: håndleddsbanen gjennom
/// nedsvinget. Path = horisontal avviksvinkel (negativ = utenfra-inn),
/// attack = signert vertikalvinkel nær treff (negativ = nedadgående;
/// bilde-y vokser nedover).
fn club_delivery(dw: &[PoseFrame]) -> (f64, f64) {
    let wrist_of = |f: &PoseFrame| f.point(K::LeftWrist).or_else(|| f.point(K::RightWrist));

    let path = match (dw.first().and_then(|f| wrist_of(f)), dw.last().and_then(|f| wrist_of(f))) {
        (Some(a), Some(b)) => {
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            if dx.abs() < geo::MIN_SEGMENT_LEN && dy.abs() < geo::MIN_SEGMENT_LEN {
                0.0
            } else {
                dx.atan2(dy.abs()).to_degrees().clamp(-30.0, 30.0)
            }
        }
        _ => 0.0,
    };

    // attack: de siste ~3 frames før treff
    let tail_start = dw.len().saturating_sub(3);
    let tail = &dw[tail_start..];
    let attack = match (tail.first().and_then(|f| wrist_of(f)), tail.last().and_then(|f| wrist_of(f))) {
        (Some(a), Some(b)) => {
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            if dx.abs() < geo::MIN_SEGMENT_LEN && dy.abs() < geo::MIN_SEGMENT_LEN {
                0.0
            } else {
                (-dy).atan2(dx.abs()).to_degrees().clamp(-20.0, 20.0)
            }
        }
        _ => 0.0,
    };

    (path, attack)
}

/// Venstresidestabilitet: 1 − 4·(maks sideveis drift av venstre
/// hofte/ankel gjennom nedsvinget).
fn left_side_stability(dw: &[PoseFrame]) -> f64 {
    let anchor_of = |f: &PoseFrame| f.point(K::LeftHip).or_else(|| f.point(K::LeftAnkle));
    let origin = match dw.first().and_then(|f| anchor_of(f)) {
        Some(p) => p,
        None => return 0.8,
    };
    let mut max_dev = 0.0f64;
    for frame in dw {
        if let Some(p) = anchor_of(frame) {
            max_dev = max_dev.max((p.x - origin.x).abs());
        }
    }
    (1.0 - 4.0 * max_dev).clamp(0.0, 1.0)
}

/// Rytmejevnhet: 1 − variasjonskoeffisient/2 for håndleddsfarten
/// over hele sekvensen. 0.5 når farten er ~0 hele veien.
fn rhythm_consistency(frames: &[PoseFrame]) -> f64 {
    let speeds = geo::wrist_speed_series(frames);
    if speeds.len() < 2 {
        return 0.5;
    }
    let mean = speeds.iter().sum::<f64>() / speeds.len() as f64;
    if mean < 1e-6 {
        return 0.5;
    }
    let var = speeds.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / speeds.len() as f64;
    let cv = var.sqrt() / mean;
    (1.0 - 0.5 * cv).clamp(0.0, 1.0)
}
