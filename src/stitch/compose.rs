//! Composition of an ordered frame sequence into one tall frame.
//!
//! The first frame is copied whole. Every later frame drops its top
//! `overlap` rows (already present at the bottom of the output) and the
//! remainder is appended below.

use super::pixel_bytes;
use image::RgbaImage;

/// Height of the composed frame: first frame plus the non-overlapping
/// part of every later frame.
pub fn composed_height(frames: &[RgbaImage], overlaps: &[u32]) -> u64 {
    let Some(first) = frames.first() else {
        return 0;
    };
    frames[1..]
        .iter()
        .zip(overlaps)
        .fold(u64::from(first.height()), |total, (frame, overlap)| {
            total + u64::from(frame.height().saturating_sub(*overlap))
        })
}

/// Stitches `frames` into one buffer using `overlaps[i]` between
/// `frames[i]` and `frames[i + 1]`.
pub fn stitch(frames: &[RgbaImage], overlaps: &[u32]) -> Result<RgbaImage, StitchError> {
    let first = frames.first().ok_or(StitchError::EmptyFrameSet)?;

    if overlaps.len() != frames.len() - 1 {
        return Err(StitchError::OverlapCountMismatch {
            frames: frames.len(),
            overlaps: overlaps.len(),
        });
    }

    let width = first.width();
    for (index, (frame, overlap)) in frames[1..].iter().zip(overlaps).enumerate() {
        if frame.width() != width {
            return Err(StitchError::WidthMismatch {
                index: index + 1,
                expected: width,
                actual: frame.width(),
            });
        }
        if *overlap > frame.height() {
            return Err(StitchError::OverlapExceedsFrame {
                index: index + 1,
                overlap: *overlap,
                height: frame.height(),
            });
        }
    }

    let total = composed_height(frames, overlaps);
    let height = u32::try_from(total).map_err(|_| StitchError::TooTall(total))?;

    let row_bytes = width as usize * 4;
    let mut buffer = Vec::with_capacity(row_bytes * height as usize);
    buffer.extend_from_slice(pixel_bytes(first));

    for (frame, overlap) in frames[1..].iter().zip(overlaps) {
        let skip = *overlap as usize * row_bytes;
        buffer.extend_from_slice(&pixel_bytes(frame)[skip..]);
    }

    let composed =
        RgbaImage::from_raw(width, height, buffer).ok_or(StitchError::TooTall(total))?;

    log::info!(
        "[STITCH] Composed {} frames into {}x{}",
        frames.len(),
        width,
        height
    );
    Ok(composed)
}

#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    #[error("No frames to stitch")]
    EmptyFrameSet,

    #[error("{frames} frames need {} overlaps, got {overlaps}", frames - 1)]
    OverlapCountMismatch { frames: usize, overlaps: usize },

    #[error("Frame {index} is {actual}px wide, expected {expected}px")]
    WidthMismatch { index: usize, expected: u32, actual: u32 },

    #[error("Overlap of {overlap}px exceeds frame {index} height of {height}px")]
    OverlapExceedsFrame { index: usize, overlap: u32, height: u32 },

    #[error("Composed height of {0}px is too large for one image")]
    TooTall(u64),
}
