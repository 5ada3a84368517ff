//! Stitching domain — pure frame analysis and composition.
//!
//! This module has zero infrastructure dependencies: fingerprints for
//! end-of-content detection, overlap search between adjacent frames,
//! and composition of the final tall frame.

mod compose;
mod fingerprint;
mod overlap;
mod termination;

pub use compose::{composed_height, stitch, StitchError};
pub use fingerprint::{Fingerprint, FINGERPRINT_SAMPLES};
pub use overlap::{candidate_range, resolve_all, resolve_overlap, MIN_OVERLAP, OVERLAP_STEP};
pub use termination::{TerminationDetector, Verdict, UNCHANGED_LIMIT};

use image::RgbaImage;

/// The `width * height` pixels of `frame`. The backing container may be
/// longer than that; the slack is never image data.
pub(crate) fn pixel_bytes(frame: &RgbaImage) -> &[u8] {
    let len = frame.width() as usize * frame.height() as usize * 4;
    &frame.as_raw()[..len]
}
