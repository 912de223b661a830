use swinggraph_core::{PhaseDetector, ProportionalPhases};

#[test]
fn test_windows_for_30_frames() {
    let w = ProportionalPhases.segment(30);
    assert_eq!(w.setup, 0..1);
    assert_eq!(w.backswing, 0..20); // floor(30·2/3)
    assert_eq!(w.transition, 20..22); // floor(30·3/4)
    assert_eq!(w.downswing, 22..30);
    assert_eq!(w.impact, 25..30); // siste min(5, 7) frames
}

#[test]
fn test_impact_always_includes_last_frame() {
    for n in [3usize, 4, 7, 12, 100] {
        let w = ProportionalPhases.segment(n);
        assert_eq!(w.impact.end, n, "n={}", n);
        assert!(!w.impact.is_empty(), "n={}", n);
        assert!(w.impact.len() <= 5, "n={}", n);
    }
}

#[test]
fn test_minimal_sequence_windows() {
    let w = ProportionalPhases.segment(3);
    assert_eq!(w.setup, 0..1);
    assert_eq!(w.backswing, 0..2);
    assert!(w.transition.is_empty()); // 2..2
    assert_eq!(w.downswing, 2..3);
    assert_eq!(w.impact, 2..3);
}

#[test]
fn test_windows_cover_sequence_in_order() {
    let w = ProportionalPhases.segment(47);
    assert_eq!(w.backswing.start, 0);
    assert_eq!(w.backswing.end, w.transition.start);
    assert_eq!(w.transition.end, w.downswing.start);
    assert_eq!(w.downswing.end, 47);
}
