//! Overlap search between two vertically adjacent captures.
//!
//! For each candidate overlap `o`, the bottom `o` rows of the earlier
//! frame are compared against the top `o` rows of the later one. Only the
//! middle of that band is scored (edges carry anti-aliasing and sticky
//! UI chrome), every 5th column, RGB Euclidean distance, alpha ignored.
//! The lowest average distance wins; ties go to the smaller overlap.

use image::RgbaImage;
use std::ops::RangeInclusive;

/// Smallest overlap ever considered.
pub const MIN_OVERLAP: u32 = 20;
/// Candidate overlaps are tried in steps of this many rows.
pub const OVERLAP_STEP: usize = 5;
/// Every Nth column is sampled when scoring a band.
pub const COLUMN_STEP: usize = 5;
/// Percentage of the band skipped at both its top and bottom edge.
pub const BAND_EDGE_PERCENT: u32 = 20;

/// Candidate overlaps for a pair of frames, or `None` when the frames are
/// too short for the search to have any candidates.
pub fn candidate_range(
    prior_height: u32,
    next_height: u32,
    hint: u32,
) -> Option<RangeInclusive<u32>> {
    let lower = MIN_OVERLAP.max(hint / 3);
    let upper = hint
        .saturating_mul(3)
        .min(prior_height.min(next_height) / 2);
    (lower <= upper).then_some(lower..=upper)
}

/// Finds the overlap between `prior` and `next`.
///
/// Falls back to `hint`, clamped to the shorter frame, when there is
/// nothing to search.
pub fn resolve_overlap(prior: &RgbaImage, next: &RgbaImage, hint: u32) -> u32 {
    let shortest = prior.height().min(next.height());
    let width = prior.width().min(next.width());
    let fallback = hint.min(shortest);

    let Some(range) = candidate_range(prior.height(), next.height(), hint) else {
        log::debug!(
            "[OVERLAP] No candidates for {}px/{}px frames, using hint {}px",
            prior.height(),
            next.height(),
            fallback
        );
        return fallback;
    };
    if width == 0 {
        return fallback;
    }

    let mut best_overlap = *range.start();
    let mut best_score = f64::INFINITY;

    for overlap in range.step_by(OVERLAP_STEP) {
        let score = band_distance(prior, next, overlap, width);
        if score < best_score {
            best_score = score;
            best_overlap = overlap;
        }
    }

    log::debug!(
        "[OVERLAP] Best overlap {}px (mean distance {:.3})",
        best_overlap,
        best_score
    );
    best_overlap
}

/// Resolves the overlap of every adjacent pair, in order.
pub fn resolve_all(frames: &[RgbaImage], hint: u32) -> Vec<u32> {
    frames
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let overlap = resolve_overlap(&pair[0], &pair[1], hint);
            log::info!("[OVERLAP] Frames {}→{}: {}px", i, i + 1, overlap);
            overlap
        })
        .collect()
}

/// Mean RGB distance over the scored middle of a candidate band.
fn band_distance(prior: &RgbaImage, next: &RgbaImage, overlap: u32, width: u32) -> f64 {
    let edge = overlap * BAND_EDGE_PERCENT / 100;
    let prior_top = prior.height() - overlap;

    let mut total = 0.0;
    let mut samples = 0u64;

    for row in edge..overlap - edge {
        for x in (0..width).step_by(COLUMN_STEP) {
            let a = prior.get_pixel(x, prior_top + row);
            let b = next.get_pixel(x, row);
            let dr = f64::from(a[0]) - f64::from(b[0]);
            let dg = f64::from(a[1]) - f64::from(b[1]);
            let db = f64::from(a[2]) - f64::from(b[2]);
            total += (dr * dr + dg * dg + db * db).sqrt();
            samples += 1;
        }
    }

    if samples == 0 {
        f64::INFINITY
    } else {
        total / samples as f64
    }
}
