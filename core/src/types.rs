use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minste confidence før et keypoint regnes som "tilstede".
/// Pose-modeller padder gjerne med 0.0-punkter for ledd de ikke ser.
pub const MIN_KEYPOINT_CONFIDENCE: f64 = 0.05;

/// De 17 standard-leddene (COCO-rekkefølge) fra pose-modellen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypointType {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl KeypointType {
    pub const ALL: [KeypointType; 17] = [
        KeypointType::Nose,
        KeypointType::LeftEye,
        KeypointType::RightEye,
        KeypointType::LeftEar,
        KeypointType::RightEar,
        KeypointType::LeftShoulder,
        KeypointType::RightShoulder,
        KeypointType::LeftElbow,
        KeypointType::RightElbow,
        KeypointType::LeftWrist,
        KeypointType::RightWrist,
        KeypointType::LeftHip,
        KeypointType::RightHip,
        KeypointType::LeftKnee,
        KeypointType::RightKnee,
        KeypointType::LeftAnkle,
        KeypointType::RightAnkle,
    ];

    /// Ansiktspunktene (brukes av kameravinkel-deteksjonen).
    pub const FACE: [KeypointType; 5] = [
        KeypointType::Nose,
        KeypointType::LeftEye,
        KeypointType::RightEye,
        KeypointType::LeftEar,
        KeypointType::RightEar,
    ];
}

/// 2D-posisjon normalisert til [0,1] per akse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }
}

/// Ett navngitt ledd fra pose-modellen. Immutabelt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Keypoint {
    pub kind: KeypointType,
    pub x: f64,          // normalisert [0,1]
    pub y: f64,          // normalisert [0,1], y vokser nedover i bildet
    pub confidence: f64, // [0,1]
}

impl Keypoint {
    pub fn new(kind: KeypointType, x: f64, y: f64, confidence: f64) -> Self {
        Self { kind, x, y, confidence }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// En tidsstemplet pose: settet av ledd modellen fant i én frame.
/// Ikke alle 17 ledd trenger å være tilstede.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFrame {
    pub t: f64, // sekunder fra start, strengt stigende i sekvensen
    pub keypoints: Vec<Keypoint>,
}

impl PoseFrame {
    pub fn new(t: f64, keypoints: Vec<Keypoint>) -> Self {
        Self { t, keypoints }
    }

    /// Oppslag på leddtype. `None` når leddet mangler eller ligger
    /// under confidence-gulvet, aldri en "null-posisjon".
    pub fn point(&self, kind: KeypointType) -> Option<Point> {
        self.keypoints
            .iter()
            .find(|k| k.kind == kind && k.confidence >= MIN_KEYPOINT_CONFIDENCE)
            .map(|k| k.position())
    }

    /// Som `point`, men med confidence i tillegg.
    pub fn keypoint(&self, kind: KeypointType) -> Option<&Keypoint> {
        self.keypoints
            .iter()
            .find(|k| k.kind == kind && k.confidence >= MIN_KEYPOINT_CONFIDENCE)
    }

    pub fn has(&self, kind: KeypointType) -> bool {
        self.point(kind).is_some()
    }

    /// Antall ledd over confidence-gulvet.
    pub fn visible_count(&self) -> usize {
        self.keypoints
            .iter()
            .filter(|k| k.confidence >= MIN_KEYPOINT_CONFIDENCE)
            .count()
    }
}

/// Opptaksvinkel relativt til golferen. Utledes automatisk,
/// men en eksplisitt overstyring fra kalleren respekteres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAngle {
    Side,
    Back,
}

/// Fast 35-elements featurevektor i fem grupper (5+10+5+8+7).
/// Indeksposisjonen ER kontrakten mot klassifisereren.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: [f64; 35],
}

// serde dekker bare arrays opp til 32 elementer, så (de)serialisering
// går via slice/Vec med lengdesjekk.
impl Serialize for FeatureVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values.iter())
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Vec::<f64>::deserialize(deserializer)?;
        let len = v.len();
        let values: [f64; 35] = v
            .try_into()
            .map_err(|_| serde::de::Error::invalid_length(len, &"exactly 35 feature values"))?;
        Ok(Self { values })
    }
}

/// Navngitte indekser inn i `FeatureVector::values`.
pub mod feature_index {
    // Setup (5)
    pub const SPINE_ANGLE: usize = 0;
    pub const KNEE_FLEXION: usize = 1;
    pub const WEIGHT_DISTRIBUTION: usize = 2;
    pub const ARM_HANG_ANGLE: usize = 3;
    pub const STANCE_WIDTH: usize = 4;
    // Backswing (10)
    pub const MAX_SHOULDER_TURN: usize = 5;
    pub const HIP_TURN_AT_TOP: usize = 6;
    pub const X_FACTOR: usize = 7;
    pub const SWING_PLANE_ANGLE: usize = 8;
    pub const ARM_EXTENSION: usize = 9;
    pub const WEIGHT_SHIFT: usize = 10;
    pub const WRIST_HINGE: usize = 11;
    pub const BACKSWING_TEMPO: usize = 12;
    pub const HEAD_MOVEMENT: usize = 13;
    pub const KNEE_STABILITY: usize = 14;
    // Transition (5)
    pub const TRANSITION_TEMPO: usize = 15;
    pub const HIP_LEAD: usize = 16;
    pub const WEIGHT_TRANSFER_RATE: usize = 17;
    pub const WRIST_UNCOCK_TIMING: usize = 18;
    pub const KINEMATIC_SEQUENCE: usize = 19;
    // Downswing (8)
    pub const HIP_ROTATION_SPEED: usize = 20;
    pub const SHOULDER_ROTATION_SPEED: usize = 21;
    pub const CLUB_PATH_ANGLE: usize = 22;
    pub const ATTACK_ANGLE: usize = 23;
    pub const RELEASE_TIMING: usize = 24;
    pub const LEFT_SIDE_STABILITY: usize = 25;
    pub const DOWNSWING_TEMPO: usize = 26;
    pub const POWER_GENERATION: usize = 27;
    // Impact / follow-through (7)
    pub const IMPACT_POSITION: usize = 28;
    pub const EXTENSION_THROUGH_IMPACT: usize = 29;
    pub const FOLLOW_THROUGH_BALANCE: usize = 30;
    pub const FINISH_QUALITY: usize = 31;
    pub const OVERALL_TEMPO_RATIO: usize = 32;
    pub const RHYTHM_CONSISTENCY: usize = 33;
    pub const SWING_EFFICIENCY: usize = 34;
}

impl FeatureVector {
    pub fn zeroed() -> Self {
        Self { values: [0.0; 35] }
    }

    #[inline]
    pub fn get(&self, idx: usize) -> f64 {
        self.values[idx]
    }

    // Oppslagene klassifisereren leser.
    #[inline]
    pub fn spine_angle(&self) -> f64 { self.values[feature_index::SPINE_ANGLE] }
    #[inline]
    pub fn shoulder_turn(&self) -> f64 { self.values[feature_index::MAX_SHOULDER_TURN] }
    #[inline]
    pub fn hip_turn(&self) -> f64 { self.values[feature_index::HIP_TURN_AT_TOP] }
    #[inline]
    pub fn plane_angle(&self) -> f64 { self.values[feature_index::SWING_PLANE_ANGLE] }
    #[inline]
    pub fn head_movement(&self) -> f64 { self.values[feature_index::HEAD_MOVEMENT] }
    #[inline]
    pub fn wrist_uncock_timing(&self) -> f64 { self.values[feature_index::WRIST_UNCOCK_TIMING] }
    #[inline]
    pub fn club_path(&self) -> f64 { self.values[feature_index::CLUB_PATH_ANGLE] }
    #[inline]
    pub fn attack_angle(&self) -> f64 { self.values[feature_index::ATTACK_ANGLE] }
    #[inline]
    pub fn power_generation(&self) -> f64 { self.values[feature_index::POWER_GENERATION] }
    #[inline]
    pub fn balance(&self) -> f64 { self.values[feature_index::FOLLOW_THROUGH_BALANCE] }
    #[inline]
    pub fn tempo_ratio(&self) -> f64 { self.values[feature_index::OVERALL_TEMPO_RATIO] }
    #[inline]
    pub fn efficiency(&self) -> f64 { self.values[feature_index::SWING_EFFICIENCY] }
}

/// Lukket kategorisett for klassifiseringen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingLabel {
    Perfect,
    GoodSwing,
    TooSteep,
    TooFlat,
    Casting,
    OverTheTop,
    PoorBalance,
    NeedsImprovement,
}

impl SwingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwingLabel::Perfect => "perfect",
            SwingLabel::GoodSwing => "good_swing",
            SwingLabel::TooSteep => "too_steep",
            SwingLabel::TooFlat => "too_flat",
            SwingLabel::Casting => "casting",
            SwingLabel::OverTheTop => "over_the_top",
            SwingLabel::PoorBalance => "poor_balance",
            SwingLabel::NeedsImprovement => "needs_improvement",
        }
    }
}

/// Resultatet av klassifiseringen. Beregnes én gang per analyse,
/// muteres aldri etterpå.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SwingLabel,
    pub confidence: f64,      // [0.5, 0.95]
    pub plane_angle_deg: f64, // planvinkelen scoringen brukte
    pub tempo_ratio: f64,     // tempoforholdet scoringen brukte
}

/// Dekning per fasegruppe: `false` betyr at vinduet hadde for få
/// frames og at gruppens features ble satt til 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCoverage {
    pub setup: bool,
    pub backswing: bool,
    pub transition: bool,
    pub downswing: bool,
    pub impact: bool,
}

impl PhaseCoverage {
    pub fn all_ok(&self) -> bool {
        self.setup && self.backswing && self.transition && self.downswing && self.impact
    }
}

/// Komplett analyseresultat til presentasjons-/anbefalingslagene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwingReport {
    pub camera_angle: CameraAngle,
    pub features: FeatureVector,
    pub classification: Classification,
    /// Snitt-confidence per leddtype over hele sekvensen (manglende ledd
    /// teller som 0.0). Kalleren bruker dette til "low confidence"-varsling.
    pub keypoint_reliability: BTreeMap<KeypointType, f64>,
    pub phase_coverage: PhaseCoverage,
    pub analyzed_at: DateTime<Utc>,
}
