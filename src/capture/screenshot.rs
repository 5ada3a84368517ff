//! Window capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS.
//! The session engine only sees the `FrameSource` trait, so tests
//! drive it with synthetic frames instead of real windows.

use super::window::{find_xcap_window, WindowHandle};
use image::RgbaImage;

/// Anything that can produce one raw RGBA frame of a window's current contents.
pub trait FrameSource {
    fn capture_window_raw(&mut self, window: WindowHandle) -> Result<RgbaImage, CaptureError>;
}

/// Captures windows through `xcap`.
///
/// The handle is re-resolved on every call, so a window that closes
/// mid-session surfaces as `WindowNotFound` rather than a stale capture.
#[derive(Debug, Default)]
pub struct XcapFrameSource;

impl XcapFrameSource {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for XcapFrameSource {
    fn capture_window_raw(&mut self, window: WindowHandle) -> Result<RgbaImage, CaptureError> {
        let start = std::time::Instant::now();
        let target = find_xcap_window(window.id)?;

        let image = target
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::EmptyCapture(window.id));
        }

        log::debug!(
            "[CAPTURE] Window {} captured {}x{} in {}ms",
            window.id,
            image.width(),
            image.height(),
            start.elapsed().as_millis()
        );

        Ok(image)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate windows: {0}")]
    WindowEnumeration(String),

    #[error("No capturable window matches {0}")]
    WindowNotFound(String),

    #[error("Window capture failed: {0}")]
    CaptureFailed(String),

    #[error("Window {0} produced an empty frame")]
    EmptyCapture(u32),

    #[error("Frame width changed mid-session: expected {expected}px, got {actual}px")]
    WidthChanged { expected: u32, actual: u32 },
}
