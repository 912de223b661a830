use thiserror::Error;

/// Fatale feil fra analysen. Enten komplett resultat eller én av disse,
/// aldri en halvfylt featurevektor tilbake til kalleren.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Under 3 frames er ikke en svingsekvens.
    #[error("insufficient pose data: got {frames} frames, need at least {min}")]
    InsufficientPoseData { frames: usize, min: usize },

    /// Primær- og samtlige fallback-beregninger av svingplanet fant
    /// ingen reell bevegelse. Vi gjetter aldri en vinkel.
    #[error("no valid swing motion detected in the pose sequence")]
    NoValidSwingMotion,

    /// For få detekterte ledd per frame til å stole på geometrien.
    #[error("poor video quality: {avg_keypoints:.1} detected keypoints per frame, need at least {min:.0}")]
    PoorVideoQuality { avg_keypoints: f64, min: f64 },

    /// Kroppssynligheten er for lav til å avgjøre opptaksvinkel,
    /// og de geometriske formlene er vinkel-avhengige.
    #[error("ambiguous camera angle: body visibility ratio {body_ratio:.2} below {min:.2}")]
    AmbiguousCameraAngle { body_ratio: f64, min: f64 },
}

impl AnalysisError {
    /// Konkret, brukerrettet veiledning, aldri en rå intern kode.
    pub fn remediation(&self) -> &'static str {
        match self {
            AnalysisError::InsufficientPoseData { .. } => {
                "Record the full swing from setup to finish; a clip of a few seconds is enough."
            }
            AnalysisError::NoValidSwingMotion => {
                "Make sure the clip contains an actual swing, not a practice stance, and that \
                 the hands stay inside the frame."
            }
            AnalysisError::PoorVideoQuality { .. } => {
                "Improve the lighting, move the camera closer, and keep the full body in frame."
            }
            AnalysisError::AmbiguousCameraAngle { .. } => {
                "Place the camera directly to the side of or directly behind the golfer, \
                 with the whole body visible."
            }
        }
    }
}
