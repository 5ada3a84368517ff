//! End-of-content detection from successive frame fingerprints.

use super::fingerprint::Fingerprint;
use image::RgbaImage;

/// Consecutive unchanged captures that end the session. One unchanged
/// capture is tolerated as a slow render; two means the content stopped.
pub const UNCHANGED_LIMIT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Content moved; keep the frame and scroll again.
    Append,
    /// Same as the last retained frame; drop it but keep scrolling.
    Unchanged { streak: u32 },
    /// Unchanged `UNCHANGED_LIMIT` times in a row.
    Stop,
}

#[derive(Debug)]
pub struct TerminationDetector {
    previous: Fingerprint,
    unchanged_streak: u32,
}

impl TerminationDetector {
    /// Seeds the detector with the first frame of the session.
    pub fn new(seed: &RgbaImage) -> Self {
        Self {
            previous: Fingerprint::of(seed),
            unchanged_streak: 0,
        }
    }

    pub fn observe(&mut self, frame: &RgbaImage) -> Verdict {
        let current = Fingerprint::of(frame);

        if current != self.previous {
            self.previous = current;
            self.unchanged_streak = 0;
            return Verdict::Append;
        }

        self.unchanged_streak += 1;
        if self.unchanged_streak >= UNCHANGED_LIMIT {
            Verdict::Stop
        } else {
            Verdict::Unchanged {
                streak: self.unchanged_streak,
            }
        }
    }

    pub fn unchanged_streak(&self) -> u32 {
        self.unchanged_streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(v: u8) -> RgbaImage {
        RgbaImage::from_pixel(32, 32, Rgba([v, v, v, 255]))
    }

    #[test]
    fn stops_after_exactly_two_unchanged() {
        let mut detector = TerminationDetector::new(&solid(0));
        assert_eq!(detector.observe(&solid(0)), Verdict::Unchanged { streak: 1 });
        assert_eq!(detector.observe(&solid(0)), Verdict::Stop);
    }

    #[test]
    fn change_resets_streak() {
        let mut detector = TerminationDetector::new(&solid(0));
        assert_eq!(detector.observe(&solid(0)), Verdict::Unchanged { streak: 1 });
        assert_eq!(detector.observe(&solid(10)), Verdict::Append);
        assert_eq!(detector.unchanged_streak(), 0);
        assert_eq!(detector.observe(&solid(10)), Verdict::Unchanged { streak: 1 });
        assert_eq!(detector.observe(&solid(20)), Verdict::Append);
    }

    #[test]
    fn compares_against_latest_frame_not_seed() {
        let mut detector = TerminationDetector::new(&solid(0));
        assert_eq!(detector.observe(&solid(5)), Verdict::Append);
        assert_eq!(detector.observe(&solid(0)), Verdict::Append);
    }
}
