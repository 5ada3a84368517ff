//! Coarse frame fingerprint for "did anything visibly change" checks.
//!
//! Samples a fixed number of evenly strided pixels across the whole
//! buffer and hashes them together with the frame dimensions. Not a
//! perceptual hash: two frames either fingerprint equal or they don't.

use image::RgbaImage;
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of pixels sampled per frame.
pub const FINGERPRINT_SAMPLES: usize = 100;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(frame: &RgbaImage) -> Self {
        let raw = super::pixel_bytes(frame);
        let pixel_count = raw.len() / 4;

        let mut hasher = Sha256::new();
        hasher.update(frame.width().to_le_bytes());
        hasher.update(frame.height().to_le_bytes());

        // First and last pixel are always part of the sample.
        let samples = FINGERPRINT_SAMPLES.min(pixel_count);
        let last = pixel_count.saturating_sub(1) as u64;
        let spacing = samples.saturating_sub(1).max(1) as u64;
        for i in 0..samples as u64 {
            let offset = (i * last / spacing) as usize * 4;
            hasher.update(&raw[offset..offset + 4]);
        }

        Self(hasher.finalize().into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn black_and_white_differ() {
        let black = RgbaImage::from_pixel(64, 48, Rgba([0, 0, 0, 255]));
        let white = RgbaImage::from_pixel(64, 48, Rgba([255, 255, 255, 255]));
        assert_ne!(Fingerprint::of(&black), Fingerprint::of(&white));
    }

    #[test]
    fn identical_buffers_match() {
        let a = RgbaImage::from_fn(120, 90, |x, y| Rgba([x as u8, y as u8, (x ^ y) as u8, 255]));
        let b = a.clone();
        assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
    }

    #[test]
    fn same_content_different_shape_differs() {
        let wide = RgbaImage::from_pixel(20, 10, Rgba([7, 7, 7, 255]));
        let tall = RgbaImage::from_pixel(10, 20, Rgba([7, 7, 7, 255]));
        assert_ne!(Fingerprint::of(&wide), Fingerprint::of(&tall));
    }

    #[test]
    fn scrolled_content_changes_fingerprint() {
        let page = RgbaImage::from_fn(50, 400, |x, y| Rgba([(y * 3) as u8, (x + y) as u8, 0, 255]));
        let top = image::imageops::crop_imm(&page, 0, 0, 50, 200).to_image();
        let lower = image::imageops::crop_imm(&page, 0, 60, 50, 200).to_image();
        assert_ne!(Fingerprint::of(&top), Fingerprint::of(&lower));
    }

    #[test]
    fn tiny_frames_are_fully_sampled() {
        let mut a = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        let before = Fingerprint::of(&a);
        a.put_pixel(2, 2, Rgba([1, 0, 0, 255]));
        assert_ne!(before, Fingerprint::of(&a));
    }

    #[test]
    fn change_in_bottom_rows_is_seen() {
        let black = RgbaImage::from_pixel(10, 19, Rgba([0, 0, 0, 255]));
        let mut footer = black.clone();
        for y in 10..19 {
            for x in 0..10 {
                footer.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        assert_ne!(Fingerprint::of(&black), Fingerprint::of(&footer));

        let screen = RgbaImage::from_pixel(1920, 1080, Rgba([0, 0, 0, 255]));
        let mut status_bar = screen.clone();
        status_bar.put_pixel(1919, 1079, Rgba([0, 0, 255, 255]));
        assert_ne!(Fingerprint::of(&screen), Fingerprint::of(&status_bar));
    }

    #[test]
    fn slack_after_the_pixels_is_ignored() {
        let exact = RgbaImage::from_pixel(2, 2, Rgba([5, 5, 5, 255]));
        let mut raw = exact.as_raw().clone();
        raw.extend_from_slice(&[99; 8]);
        let padded = RgbaImage::from_raw(2, 2, raw).unwrap();
        assert_eq!(Fingerprint::of(&exact), Fingerprint::of(&padded));
    }

    #[test]
    fn single_pixel_frame_is_sampled() {
        let a = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let b = RgbaImage::from_pixel(1, 1, Rgba([1, 0, 0, 255]));
        assert_ne!(Fingerprint::of(&a), Fingerprint::of(&b));
    }

    #[test]
    fn empty_frame_does_not_panic() {
        let empty = RgbaImage::new(0, 0);
        assert_eq!(Fingerprint::of(&empty), Fingerprint::of(&RgbaImage::new(0, 0)));
    }
}
