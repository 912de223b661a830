//! Round-trip via CSV-fixtureformatet front-enden eksporterer:
//! én rad per ledd med frame-tid, leddnavn, posisjon og confidence.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use swinggraph_core::{Keypoint, KeypointType, PoseFrame, SwingAnalyzer};

fn kp(kind: KeypointType, x: f64, y: f64) -> Keypoint {
    Keypoint::new(kind, x, y, 0.9)
}

fn swing_sequence(n: usize) -> Vec<PoseFrame> {
    use KeypointType as K;
    let top = n * 2 / 3;
    (0..n)
        .map(|i| {
            let (wx, wy) = if i <= top {
                let p = i as f64 / top as f64;
                (0.50 - 0.30 * p, 0.60 - 0.25 * p)
            } else {
                let q = (i - top) as f64 / (n - 1 - top) as f64;
                (0.20 + 0.32 * q, 0.35 + 0.27 * q)
            };
            PoseFrame::new(
                i as f64 / 30.0,
                vec![
                    kp(K::Nose, 0.52, 0.20),
                    kp(K::LeftEye, 0.53, 0.19),
                    kp(K::RightEye, 0.51, 0.19),
                    kp(K::LeftEar, 0.54, 0.20),
                    kp(K::RightEar, 0.50, 0.20),
                    kp(K::LeftShoulder, 0.48, 0.30),
                    kp(K::RightShoulder, 0.56, 0.36),
                    kp(K::LeftWrist, wx, wy),
                    kp(K::RightWrist, wx + 0.12, wy),
                    kp(K::LeftHip, 0.47, 0.55),
                    kp(K::RightHip, 0.55, 0.55),
                    kp(K::LeftKnee, 0.46, 0.72),
                    kp(K::RightKnee, 0.56, 0.72),
                    kp(K::LeftAnkle, 0.40, 0.90),
                    kp(K::RightAnkle, 0.62, 0.90),
                ],
            )
        })
        .collect()
}

fn to_csv(frames: &[PoseFrame]) -> String {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["t", "keypoint", "x", "y", "confidence"]).unwrap();
    for frame in frames {
        for k in &frame.keypoints {
            let name = serde_json::to_value(k.kind).unwrap();
            wtr.write_record([
                frame.t.to_string(),
                name.as_str().unwrap().to_string(),
                k.x.to_string(),
                k.y.to_string(),
                k.confidence.to_string(),
            ])
            .unwrap();
        }
    }
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

fn from_csv(data: &str) -> Vec<PoseFrame> {
    let mut rdr = csv::Reader::from_reader(data.as_bytes());
    // grupper radene per frame-tid; OrderedFloat gir sorterbar nøkkel
    let mut by_t: BTreeMap<OrderedFloat<f64>, Vec<Keypoint>> = BTreeMap::new();
    for record in rdr.records() {
        let record = record.unwrap();
        let t: f64 = record[0].parse().unwrap();
        let kind: KeypointType = serde_json::from_value(serde_json::Value::String(record[1].to_string())).unwrap();
        let x: f64 = record[2].parse().unwrap();
        let y: f64 = record[3].parse().unwrap();
        let conf: f64 = record[4].parse().unwrap();
        by_t.entry(OrderedFloat(t)).or_default().push(Keypoint::new(kind, x, y, conf));
    }
    by_t.into_iter()
        .map(|(t, keypoints)| PoseFrame::new(t.into_inner(), keypoints))
        .collect()
}

#[test]
fn test_csv_fixture_roundtrip_analysis() {
    let original = swing_sequence(30);
    let parsed = from_csv(&to_csv(&original));
    assert_eq!(parsed.len(), original.len());

    let analyzer = SwingAnalyzer::new();
    let a = analyzer.analyze(&original, None).unwrap();
    let b = analyzer.analyze(&parsed, None).unwrap();

    // fixturformatet er tapsfritt for analysen
    assert_eq!(a.features, b.features);
    assert_eq!(a.classification, b.classification);
    assert_eq!(a.camera_angle, b.camera_angle);
}
