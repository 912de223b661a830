// core/src/classifier.rs
//
// Heuristisk scoring av featurevektoren mot sju kategorier.
// Hver kategori akkumulerer vektet delkreditt for sine delintervaller;
// vinneren er maks-score med dokumentert tie-break (første i listen).

use ordered_float::OrderedFloat;

use crate::types::{CameraAngle, Classification, FeatureVector, SwingLabel};

/// Under dette har ingen kategori "meningsfull" score.
pub const MEANINGFUL_SCORE: f64 = 0.25;
/// Default-confidence for needs_improvement.
pub const FALLBACK_CONFIDENCE: f64 = 0.70;

const CONFIDENCE_FLOOR: f64 = 0.55;
const CONFIDENCE_CEIL: f64 = 0.95;

/// Planterskler justert for opptaksvinkel: bakfra-clampen ligger
/// høyere, så steep/flat-grensene skyves +3°.
#[derive(Debug, Clone, Copy)]
struct PlaneThresholds {
    steep: f64,
    flat: f64,
    over_the_top: f64,
}

impl PlaneThresholds {
    fn for_camera(camera: CameraAngle) -> Self {
        let shift = match camera {
            CameraAngle::Side => 0.0,
            CameraAngle::Back => 3.0,
        };
        Self {
            steep: 52.0 + shift,
            flat: 38.0 + shift,
            over_the_top: 50.0 + shift,
        }
    }
}

fn score_too_steep(v: &FeatureVector, t: &PlaneThresholds) -> f64 {
    let mut score = 0.0f64;
    let plane = v.plane_angle();
    if plane > t.steep {
        // kreditt skalerer med overskuddet, med tak
        score += 0.25 + ((plane - t.steep) * 0.015).min(0.20);
    }
    if v.spine_angle() > 32.0 {
        score += 0.15;
    }
    let turn = v.shoulder_turn();
    if turn > 1.0 && turn < 80.0 {
        score += 0.10;
    }
    if v.club_path() < -5.0 {
        score += 0.15;
    }
    if v.attack_angle() < -4.0 {
        score += 0.10;
    }
    let tempo = v.tempo_ratio();
    if tempo > 0.0 && tempo < 2.5 {
        score += 0.05;
    }
    score.min(1.0)
}

fn score_too_flat(v: &FeatureVector, t: &PlaneThresholds) -> f64 {
    let mut score = 0.0f64;
    let plane = v.plane_angle();
    if plane > 0.0 && plane < t.flat {
        score += 0.25 + ((t.flat - plane) * 0.015).min(0.20);
    }
    let spine = v.spine_angle();
    if spine > 0.0 && spine < 22.0 {
        score += 0.15;
    }
    if v.shoulder_turn() > 100.0 {
        score += 0.10;
    }
    if v.club_path() > 5.0 {
        score += 0.15;
    }
    if v.attack_angle() > 3.0 {
        score += 0.10;
    }
    if v.tempo_ratio() > 3.6 {
        score += 0.05;
    }
    score.min(1.0)
}

/// Casting: håndleddene slipper den lagrede vinkelen for tidlig.
fn score_casting(v: &FeatureVector) -> f64 {
    let mut score = 0.0f64;
    let uncock = v.wrist_uncock_timing();
    if uncock < 0.4 {
        score += 0.30 + ((0.4 - uncock) * 0.75).min(0.20);
    }
    if v.power_generation() < 0.6 {
        score += 0.25;
    }
    if v.attack_angle() > -1.0 && v.club_path() > 2.0 {
        score += 0.20;
    }
    score.min(1.0)
}

fn score_over_the_top(v: &FeatureVector, t: &PlaneThresholds) -> f64 {
    let mut score = 0.0f64;
    if v.plane_angle() > t.over_the_top && v.club_path() < -3.0 {
        score += 0.45;
    }
    if v.shoulder_turn() - v.hip_turn() > 50.0 && v.power_generation() < 0.5 {
        score += 0.25;
    }
    if v.club_path() < -6.0 {
        score += 0.15;
    }
    score.min(1.0)
}

fn score_poor_balance(v: &FeatureVector) -> f64 {
    let mut score = 0.0f64;
    let balance = v.balance();
    if balance < 0.6 {
        score += 0.30 + ((0.6 - balance) * 0.75).min(0.20);
    }
    if v.head_movement() > 0.2 {
        score += 0.25;
    }
    if v.efficiency() < 0.6 {
        score += 0.20;
    }
    score.min(1.0)
}

#[inline]
fn in_band(x: f64, lo: f64, hi: f64) -> bool {
    x >= lo && x <= hi
}

/// Belønner nærhet til idealbåndene.
fn score_perfect(v: &FeatureVector) -> f64 {
    let mut score = 0.0f64;
    if in_band(v.plane_angle(), 40.0, 48.0) {
        score += 0.20;
    }
    if in_band(v.spine_angle(), 24.0, 30.0) {
        score += 0.15;
    }
    if in_band(v.shoulder_turn(), 85.0, 95.0) {
        score += 0.20;
    }
    if in_band(v.tempo_ratio(), 2.8, 3.3) {
        score += 0.15;
    }
    if v.club_path().abs() <= 2.0 {
        score += 0.15;
    }
    if v.balance() >= 0.8 {
        score += 0.10;
    }
    if v.efficiency() >= 0.8 {
        score += 0.10;
    }
    score.min(1.0)
}

/// Som perfect, men med romsligere bånd og lavere vekter.
fn score_good_swing(v: &FeatureVector) -> f64 {
    let mut score = 0.0f64;
    if in_band(v.plane_angle(), 36.0, 52.0) {
        score += 0.18;
    }
    if in_band(v.spine_angle(), 20.0, 34.0) {
        score += 0.12;
    }
    if in_band(v.shoulder_turn(), 75.0, 105.0) {
        score += 0.15;
    }
    if in_band(v.tempo_ratio(), 2.4, 3.8) {
        score += 0.12;
    }
    if v.club_path().abs() <= 4.0 {
        score += 0.12;
    }
    if v.balance() >= 0.65 {
        score += 0.08;
    }
    if v.efficiency() >= 0.65 {
        score += 0.08;
    }
    score.min(1.0)
}

/// Stateless klassifiserer. En instans per kall er gratis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwingClassifier;

impl SwingClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, features: &FeatureVector, camera: CameraAngle) -> Classification {
        let t = PlaneThresholds::for_camera(camera);

        // Rekkefølgen er tie-break: først i listen vinner ved lik score.
        let scores = [
            (SwingLabel::Perfect, score_perfect(features)),
            (SwingLabel::GoodSwing, score_good_swing(features)),
            (SwingLabel::TooSteep, score_too_steep(features, &t)),
            (SwingLabel::TooFlat, score_too_flat(features, &t)),
            (SwingLabel::Casting, score_casting(features)),
            (SwingLabel::OverTheTop, score_over_the_top(features, &t)),
            (SwingLabel::PoorBalance, score_poor_balance(features)),
        ];

        let mut top = scores[0];
        let mut second = 0.0f64;
        for &(label, score) in &scores[1..] {
            if OrderedFloat(score) > OrderedFloat(top.1) {
                second = top.1;
                top = (label, score);
            } else if OrderedFloat(score) > OrderedFloat(second) {
                second = score;
            }
        }

        let plane_angle_deg = features.plane_angle();
        let tempo_ratio = features.tempo_ratio();

        if top.1 < MEANINGFUL_SCORE {
            return Classification {
                label: SwingLabel::NeedsImprovement,
                confidence: FALLBACK_CONFIDENCE,
                plane_angle_deg,
                tempo_ratio,
            };
        }

        // Separasjonsbonus: tydelig vinner gir høyere confidence.
        let separation_bonus = (2.0 * (top.1 - second)).min(0.2);
        let confidence = (top.1 + separation_bonus).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEIL);

        Classification {
            label: top.0,
            confidence,
            plane_angle_deg,
            tempo_ratio,
        }
    }
}
