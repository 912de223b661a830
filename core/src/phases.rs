// core/src/phases.rs
//
// Fasevinduer per indeksandel, ikke tid. En bevisst forenkling —
// trait-sømmen lar en fremtidig hastighetsbasert detektor byttes inn
// uten å røre metrikker eller klassifiserer.

use std::ops::Range;

/// Minimum antall frames per fasegruppe før gruppen regnes som dekket.
pub const MIN_FRAMES_SETUP: usize = 1;
pub const MIN_FRAMES_BACKSWING: usize = 2;
pub const MIN_FRAMES_TRANSITION: usize = 2;
pub const MIN_FRAMES_DOWNSWING: usize = 3;
pub const MIN_FRAMES_IMPACT: usize = 1;

/// Indeksvinduer for de fem fasene. Halvåpne intervaller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseWindows {
    pub setup: Range<usize>,
    pub backswing: Range<usize>,
    pub transition: Range<usize>,
    pub downswing: Range<usize>,
    pub impact: Range<usize>,
}

pub trait PhaseDetector {
    fn segment(&self, frame_count: usize) -> PhaseWindows;
}

/// Proporsjonal inndeling: setup = frame 0, backswing = [0, 2N/3),
/// transition = [2N/3, 3N/4), downswing = [3N/4, N),
/// impact = siste min(5, N/4) frames (inkluderer alltid siste frame).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalPhases;

impl PhaseDetector for ProportionalPhases {
    fn segment(&self, n: usize) -> PhaseWindows {
        let top = n * 2 / 3;
        let down = n * 3 / 4;
        let impact_len = (n / 4).min(5).max(1).min(n);

        PhaseWindows {
            setup: 0..1.min(n),
            backswing: 0..top,
            transition: top..down,
            downswing: down..n,
            impact: n.saturating_sub(impact_len)..n,
        }
    }
}
