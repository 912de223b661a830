use swinggraph_core::{detect_camera_angle, AnalysisError, CameraAngle, Keypoint, KeypointType as K, PoseFrame};

fn kp(kind: K, x: f64, y: f64) -> Keypoint {
    Keypoint::new(kind, x, y, 0.9)
}

/// Bakfra: ansikt skjult, hendene samlet om grepet, skuldre i vater.
fn back_view_frame(t: f64) -> PoseFrame {
    PoseFrame::new(
        t,
        vec![
            kp(K::LeftShoulder, 0.45, 0.30),
            kp(K::RightShoulder, 0.55, 0.31),
            kp(K::LeftWrist, 0.50, 0.55),
            kp(K::RightWrist, 0.52, 0.55),
            kp(K::LeftHip, 0.46, 0.55),
            kp(K::RightHip, 0.54, 0.55),
            kp(K::LeftAnkle, 0.47, 0.90),
            kp(K::RightAnkle, 0.53, 0.90),
        ],
    )
}

/// Fra siden: profilansikt synlig, bred standplass, hender fra hverandre.
fn side_view_frame(t: f64) -> PoseFrame {
    PoseFrame::new(
        t,
        vec![
            kp(K::Nose, 0.52, 0.20),
            kp(K::LeftEye, 0.53, 0.19),
            kp(K::RightEye, 0.51, 0.19),
            kp(K::LeftEar, 0.54, 0.20),
            kp(K::RightEar, 0.50, 0.20),
            kp(K::LeftShoulder, 0.48, 0.30),
            kp(K::RightShoulder, 0.56, 0.36),
            kp(K::LeftWrist, 0.50, 0.60),
            kp(K::RightWrist, 0.62, 0.60),
            kp(K::LeftAnkle, 0.40, 0.90),
            kp(K::RightAnkle, 0.62, 0.90),
        ],
    )
}

#[test]
fn test_detects_back_view() {
    let frames: Vec<PoseFrame> = (0..20).map(|i| back_view_frame(i as f64 * 0.1)).collect();
    assert_eq!(detect_camera_angle(&frames).unwrap(), CameraAngle::Back);
}

#[test]
fn test_detects_side_view() {
    let frames: Vec<PoseFrame> = (0..20).map(|i| side_view_frame(i as f64 * 0.1)).collect();
    assert_eq!(detect_camera_angle(&frames).unwrap(), CameraAngle::Side);
}

#[test]
fn test_detection_is_deterministic() {
    let frames: Vec<PoseFrame> = (0..30).map(|i| side_view_frame(i as f64 * 0.1)).collect();
    let first = detect_camera_angle(&frames).unwrap();
    let second = detect_camera_angle(&frames).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ambiguous_without_body_coverage() {
    // ansikt og bein, men ingen skuldre/håndledd → gatingen slår til
    let frames: Vec<PoseFrame> = (0..10)
        .map(|i| {
            PoseFrame::new(
                i as f64 * 0.1,
                vec![
                    kp(K::Nose, 0.5, 0.2),
                    kp(K::LeftEye, 0.51, 0.19),
                    kp(K::RightEye, 0.49, 0.19),
                    kp(K::LeftHip, 0.46, 0.55),
                    kp(K::RightHip, 0.54, 0.55),
                    kp(K::LeftKnee, 0.46, 0.72),
                    kp(K::RightKnee, 0.54, 0.72),
                    kp(K::LeftAnkle, 0.45, 0.90),
                    kp(K::RightAnkle, 0.55, 0.90),
                ],
            )
        })
        .collect();

    match detect_camera_angle(&frames) {
        Err(AnalysisError::AmbiguousCameraAngle { body_ratio, .. }) => {
            assert!(body_ratio <= 0.2);
        }
        other => panic!("expected AmbiguousCameraAngle, got {:?}", other),
    }
}

#[test]
fn test_back_view_with_face_visible_via_back_ratio() {
    // regel 2: ansiktet er synlig (regel 1 slår ikke til), men hendene
    // er samlet om grepet i samtlige frames → back_ratio > 0.3
    let frames: Vec<PoseFrame> = (0..10)
        .map(|i| {
            PoseFrame::new(
                i as f64 * 0.1,
                vec![
                    kp(K::Nose, 0.50, 0.20),
                    kp(K::LeftShoulder, 0.45, 0.30),
                    kp(K::RightShoulder, 0.55, 0.36), // ikke i vater
                    kp(K::LeftWrist, 0.50, 0.55),
                    kp(K::RightWrist, 0.52, 0.55),
                ],
            )
        })
        .collect();
    assert_eq!(detect_camera_angle(&frames).unwrap(), CameraAngle::Back);
}

#[test]
fn test_back_view_on_majority_back_indicator() {
    // regel 3: back-indikatoren treffer bare 3 av 10 frames (≤ 0.3, så
    // regel 2 slår ikke til), men side-indikatoren treffer ingen
    let frames: Vec<PoseFrame> = (0..10)
        .map(|i| {
            let (lw, rw) = if i < 3 {
                (0.50, 0.52) // hendene samlet
            } else {
                (0.40, 0.60)
            };
            PoseFrame::new(
                i as f64 * 0.1,
                vec![
                    kp(K::Nose, 0.50, 0.20), // 1 ansiktspunkt: blokkerer regel 1
                    kp(K::LeftShoulder, 0.45, 0.30),
                    kp(K::RightShoulder, 0.55, 0.36),
                    kp(K::LeftWrist, lw, 0.55),
                    kp(K::RightWrist, rw, 0.55),
                    kp(K::LeftAnkle, 0.47, 0.90), // smal standplass: ikke side
                    kp(K::RightAnkle, 0.53, 0.90),
                ],
            )
        })
        .collect();
    assert_eq!(detect_camera_angle(&frames).unwrap(), CameraAngle::Back);
}

#[test]
fn test_back_view_without_face_kps() {
    // regel 1: kropp synlig, intet ansikt
    let frames: Vec<PoseFrame> = (0..10)
        .map(|i| {
            PoseFrame::new(
                i as f64 * 0.1,
                vec![
                    kp(K::LeftShoulder, 0.45, 0.30),
                    kp(K::RightShoulder, 0.55, 0.38), // ikke i vater
                    kp(K::LeftWrist, 0.40, 0.55),
                    kp(K::RightWrist, 0.60, 0.55), // hendene fra hverandre
                ],
            )
        })
        .collect();
    assert_eq!(detect_camera_angle(&frames).unwrap(), CameraAngle::Back);
}
