pub mod analyzer;
pub mod camera;
pub mod classifier;
pub mod error;
pub mod features;
pub mod geometry;
pub mod metrics;
pub mod phases;
pub mod types;

#[cfg(feature = "python")]
pub mod py;

pub use analyzer::{keypoint_reliability, SwingAnalyzer, MIN_AVG_KEYPOINTS, MIN_SEQUENCE_LEN};
pub use camera::detect_camera_angle;
pub use classifier::SwingClassifier;
pub use error::AnalysisError;
pub use features::{swing_plane_angle, FeatureExtractor};
pub use phases::{PhaseDetector, PhaseWindows, ProportionalPhases};
pub use types::{
    CameraAngle, Classification, FeatureVector, Keypoint, KeypointType, PhaseCoverage, Point,
    PoseFrame, SwingLabel, SwingReport,
};
