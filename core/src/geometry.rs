// core/src/geometry.rs
//
// Stateless geometriske målinger over én PoseFrame eller et vindu av frames.
// Policy: manglende ledd gir en dokumentert default, aldri feil. Delvis
// leddekning skal degradere kontrollert i stedet for å velte hele analysen.
// Alle returverdier clampes til et fysisk plausibelt intervall per måling.

use crate::types::{KeypointType as K, Point, PoseFrame};

// Defaults ved manglende ledd
pub const DEFAULT_SPINE_ANGLE_DEG: f64 = 20.0;
pub const DEFAULT_KNEE_FLEXION_DEG: f64 = 25.0;
pub const DEFAULT_STANCE_WIDTH: f64 = 0.3;
pub const DEFAULT_WEIGHT_DISTRIBUTION: f64 = 0.5;
pub const DEFAULT_ARM_HANG_DEG: f64 = 10.0;
pub const DEFAULT_ARM_EXTENSION: f64 = 0.8;
pub const DEFAULT_WRIST_HINGE_DEG: f64 = 45.0;
pub const DEFAULT_TEMPO_RATIO: f64 = 3.0;
pub const DEFAULT_KNEE_STABILITY: f64 = 0.8;

pub const MIN_SEGMENT_LEN: f64 = 1e-4; // under dette er et ledd-par degenerert

#[inline]
fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if !x.is_finite() {
        return lo;
    }
    x.max(lo).min(hi)
}

/// Leddvinkel i grader ved `mid` gitt de to nabopunktene.
/// Dot-produkt: cos(θ) = (v1·v2) / (|v1||v2|). 180° = strakt.
pub fn joint_angle_deg(a: Point, mid: Point, b: Point) -> Option<f64> {
    let v1 = (a.x - mid.x, a.y - mid.y);
    let v2 = (b.x - mid.x, b.y - mid.y);
    let m1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let m2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if m1 < MIN_SEGMENT_LEN || m2 < MIN_SEGMENT_LEN {
        return None;
    }
    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (m1 * m2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Ryggvinkel mot vertikal: hofte-midtpunkt → nese. Default 20°.
pub fn spine_angle(frame: &PoseFrame) -> f64 {
    let (head, lh, rh) = match (frame.point(K::Nose), frame.point(K::LeftHip), frame.point(K::RightHip)) {
        (Some(h), Some(l), Some(r)) => (h, l, r),
        _ => return DEFAULT_SPINE_ANGLE_DEG,
    };
    let hip_mid = lh.midpoint(&rh);
    let dx = head.x - hip_mid.x;
    let dy = head.y - hip_mid.y;
    if dx.abs() < MIN_SEGMENT_LEN && dy.abs() < MIN_SEGMENT_LEN {
        return DEFAULT_SPINE_ANGLE_DEG;
    }
    // vinkel mot vertikalaksen (y vokser nedover, fortegn uinteressant her)
    clamp(dx.abs().atan2(dy.abs()).to_degrees(), 0.0, 60.0)
}

/// Knebøy (fleksjon) ved kneleddet: 180° − leddvinkel(hofte, kne, ankel).
/// Venstre side foretrekkes, høyre som fallback. Default 25°.
pub fn knee_flexion(frame: &PoseFrame) -> f64 {
    let sides = [
        (K::LeftHip, K::LeftKnee, K::LeftAnkle),
        (K::RightHip, K::RightKnee, K::RightAnkle),
    ];
    for (hip, knee, ankle) in sides {
        if let (Some(h), Some(k), Some(a)) = (frame.point(hip), frame.point(knee), frame.point(ankle)) {
            if let Some(angle) = joint_angle_deg(h, k, a) {
                return clamp(180.0 - angle, 0.0, 90.0);
            }
        }
    }
    DEFAULT_KNEE_FLEXION_DEG
}

/// Vektfordeling: skulder-senterets x-avvik fra hofte-senteret,
/// normalisert på hoftebredden. 0.5 = sentrert, mot 1.0 = mot mål-siden.
pub fn weight_distribution(frame: &PoseFrame) -> f64 {
    let pts = (
        frame.point(K::LeftShoulder),
        frame.point(K::RightShoulder),
        frame.point(K::LeftHip),
        frame.point(K::RightHip),
    );
    let (ls, rs, lh, rh) = match pts {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return DEFAULT_WEIGHT_DISTRIBUTION,
    };
    let hip_w = lh.distance_to(&rh);
    if hip_w < MIN_SEGMENT_LEN {
        return DEFAULT_WEIGHT_DISTRIBUTION;
    }
    let offset = (ls.midpoint(&rs).x - lh.midpoint(&rh).x) / hip_w;
    clamp(0.5 + 0.5 * offset.clamp(-1.0, 1.0), 0.0, 1.0)
}

/// Standplassbredde: |ankel-ankel| i x. Default 0.3.
pub fn stance_width(frame: &PoseFrame) -> f64 {
    match (frame.point(K::LeftAnkle), frame.point(K::RightAnkle)) {
        (Some(l), Some(r)) => clamp((l.x - r.x).abs(), 0.05, 0.8),
        _ => DEFAULT_STANCE_WIDTH,
    }
}

/// Armhengvinkel mot vertikal (skulder → håndledd). Default 10°.
pub fn arm_hang_angle(frame: &PoseFrame) -> f64 {
    let sides = [(K::LeftShoulder, K::LeftWrist), (K::RightShoulder, K::RightWrist)];
    for (shoulder, wrist) in sides {
        if let (Some(s), Some(w)) = (frame.point(shoulder), frame.point(wrist)) {
            let dx = w.x - s.x;
            let dy = w.y - s.y;
            if dx.abs() < MIN_SEGMENT_LEN && dy.abs() < MIN_SEGMENT_LEN {
                continue;
            }
            return clamp(dx.abs().atan2(dy.abs()).to_degrees(), 0.0, 60.0);
        }
    }
    DEFAULT_ARM_HANG_DEG
}

/// Signert vinkel (grader) for linja mellom et ledd-par, mot horisontal.
pub fn line_rotation(frame: &PoseFrame, left: K, right: K) -> Option<f64> {
    let (l, r) = (frame.point(left)?, frame.point(right)?);
    if l.distance_to(&r) < MIN_SEGMENT_LEN {
        return None;
    }
    Some((r.y - l.y).atan2(r.x - l.x).to_degrees())
}

pub fn shoulder_rotation(frame: &PoseFrame) -> Option<f64> {
    line_rotation(frame, K::LeftShoulder, K::RightShoulder)
}

pub fn hip_rotation(frame: &PoseFrame) -> Option<f64> {
    line_rotation(frame, K::LeftHip, K::RightHip)
}

#[inline]
fn wrap_delta_deg(d: f64) -> f64 {
    let mut d = d % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

/// Rotasjonsutslag for et ledd-par over et vindu, relativt til setup-framen.
/// En 2D-linje roterer lite under reell kroppsrotasjon, så utslaget
/// kombineres med krympingen i projisert bredde: acos(w/w₀).
/// Største av de to per frame, maks over vinduet. Clamp [0, 140].
pub fn rotation_turn(window: &[PoseFrame], setup: &PoseFrame, left: K, right: K) -> f64 {
    let rot0 = line_rotation(setup, left, right);
    let w0 = match (setup.point(left), setup.point(right)) {
        (Some(l), Some(r)) => l.distance_to(&r),
        _ => 0.0,
    };

    let mut best = 0.0f64;
    for frame in window {
        let mut turn = 0.0f64;
        if let (Some(r0), Some(r)) = (rot0, line_rotation(frame, left, right)) {
            turn = wrap_delta_deg(r - r0).abs();
        }
        if w0 > MIN_SEGMENT_LEN {
            if let (Some(l), Some(r)) = (frame.point(left), frame.point(right)) {
                let ratio = (l.distance_to(&r) / w0).clamp(0.0, 1.0);
                turn = turn.max(ratio.acos().to_degrees());
            }
        }
        best = best.max(turn);
    }
    clamp(best, 0.0, 140.0)
}

/// Armstrekk: |skulder→håndledd| / (|skulder→albue| + |albue→håndledd|).
/// 1.0 = helt strak arm. Default 0.8.
pub fn arm_extension_ratio(frame: &PoseFrame) -> f64 {
    let sides = [
        (K::LeftShoulder, K::LeftElbow, K::LeftWrist),
        (K::RightShoulder, K::RightElbow, K::RightWrist),
    ];
    for (shoulder, elbow, wrist) in sides {
        if let (Some(s), Some(e), Some(w)) = (frame.point(shoulder), frame.point(elbow), frame.point(wrist)) {
            let segments = s.distance_to(&e) + e.distance_to(&w);
            if segments < MIN_SEGMENT_LEN {
                continue;
            }
            return clamp(s.distance_to(&w) / segments, 0.3, 1.0);
        }
    }
    DEFAULT_ARM_EXTENSION
}

/// Håndleddshengsel-proxy: 180° − leddvinkel(skulder, albue, håndledd).
/// Uten kølle-keypoint er armbøyen den beste tilgjengelige indikatoren.
pub fn wrist_hinge(frame: &PoseFrame) -> f64 {
    let sides = [
        (K::LeftShoulder, K::LeftElbow, K::LeftWrist),
        (K::RightShoulder, K::RightElbow, K::RightWrist),
    ];
    for (shoulder, elbow, wrist) in sides {
        if let (Some(s), Some(e), Some(w)) = (frame.point(shoulder), frame.point(elbow), frame.point(wrist)) {
            if let Some(angle) = joint_angle_deg(s, e, w) {
                return clamp(180.0 - angle, 0.0, 120.0);
            }
        }
    }
    DEFAULT_WRIST_HINGE_DEG
}

/// Maks hodebevegelse fra vinduets første frame (nese, øyne som fallback).
/// Default 0.0 — uten hode-ledd kan vi ikke påstå bevegelse.
pub fn head_movement(window: &[PoseFrame]) -> f64 {
    let head_of = |f: &PoseFrame| {
        f.point(K::Nose)
            .or_else(|| f.point(K::LeftEye))
            .or_else(|| f.point(K::RightEye))
    };
    let origin = match window.first().and_then(|f| head_of(f)) {
        Some(p) => p,
        None => return 0.0,
    };
    let mut max_dev = 0.0f64;
    for frame in window {
        if let Some(p) = head_of(frame) {
            max_dev = max_dev.max(origin.distance_to(&p));
        }
    }
    clamp(max_dev, 0.0, 1.0)
}

/// Knestabilitet: 1 − 4·(maks sideveis knedrift fra vinduets start).
/// 1.0 = helt rolig kne. Default 0.8.
pub fn knee_stability(window: &[PoseFrame]) -> f64 {
    let knee_of = |f: &PoseFrame| f.point(K::LeftKnee).or_else(|| f.point(K::RightKnee));
    let origin = match window.first().and_then(|f| knee_of(f)) {
        Some(p) => p,
        None => return DEFAULT_KNEE_STABILITY,
    };
    let mut max_dev = 0.0f64;
    for frame in window {
        if let Some(p) = knee_of(frame) {
            max_dev = max_dev.max((p.x - origin.x).abs());
        }
    }
    clamp(1.0 - 4.0 * max_dev, 0.0, 1.0)
}

/// Håndleddsfart per steg (normaliserte enheter/s), venstre foretrukket.
/// Steg uten ledd eller uten tidsfremdrift gir 0.
pub fn wrist_speed_series(window: &[PoseFrame]) -> Vec<f64> {
    let wrist_of = |f: &PoseFrame| f.point(K::LeftWrist).or_else(|| f.point(K::RightWrist));
    let mut out = Vec::with_capacity(window.len().saturating_sub(1));
    for pair in window.windows(2) {
        let dt = (pair[1].t - pair[0].t).max(1e-3);
        let v = match (wrist_of(&pair[0]), wrist_of(&pair[1])) {
            (Some(a), Some(b)) => a.distance_to(&b) / dt,
            _ => 0.0,
        };
        out.push(if v.is_finite() { v } else { 0.0 });
    }
    out
}

/// Temporatio: frames før vs. etter punktet med størst endring i
/// rotasjonshastighet (skulderlinja). Deterministisk, ingen jitter.
/// Ideal ligger rundt 3:1. Default 3.0, clamp [0.5, 6.0].
pub fn tempo_ratio(frames: &[PoseFrame]) -> f64 {
    let rot: Vec<Option<f64>> = frames.iter().map(shoulder_rotation).collect();

    // rotasjonshastighet per steg, hull i serien gir 0
    let mut vel = Vec::with_capacity(frames.len().saturating_sub(1));
    for pair in rot.windows(2) {
        match (pair[0], pair[1]) {
            (Some(a), Some(b)) => vel.push(wrap_delta_deg(b - a)),
            _ => vel.push(0.0),
        }
    }
    if vel.len() < 3 {
        return DEFAULT_TEMPO_RATIO;
    }

    // indeks for maks |akselerasjon| = overgangspunktet
    let mut best_i = 1usize;
    let mut best = 0.0f64;
    for i in 1..vel.len() {
        let acc = (vel[i] - vel[i - 1]).abs();
        if acc > best {
            best = acc;
            best_i = i;
        }
    }
    if best < 1e-9 {
        return DEFAULT_TEMPO_RATIO;
    }

    let before = best_i as f64;
    let after = (vel.len() - best_i).max(1) as f64;
    clamp(before / after, 0.5, 6.0)
}
