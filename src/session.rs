//! Long-capture session — scroll, wait, capture, compare, repeat; then
//! resolve overlaps and stitch.
//!
//! Strictly sequential: the capture must observe the window after the
//! gesture finished and the content had `scroll_delay` to render. The
//! only suspension point is that delay.

use crate::capture::{CaptureError, FrameSource, WindowHandle};
use crate::config::{ConfigError, SessionConfig};
use crate::scroll::{ScrollActuator, ScrollError};
use crate::stitch::{self, StitchError, TerminationDetector, Verdict};
use image::RgbaImage;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    ContentUnchanged,
    MaxScrolls,
}

/// Summary of one session, emitted alongside the composed frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub window: WindowHandle,
    pub frames: usize,
    pub scrolls: u32,
    pub scroll_failures: u32,
    pub stop_reason: StopReason,
    pub overlaps: Vec<u32>,
    pub width: u32,
    pub height: u32,
    pub elapsed_ms: u64,
}

/// The composed frame plus what it took to get it. Owned by the caller.
#[derive(Debug)]
pub struct LongCapture {
    pub image: RgbaImage,
    pub report: SessionReport,
}

/// Frames gathered by the scroll loop, before overlap resolution.
#[derive(Debug)]
pub struct CapturedFrames {
    pub frames: Vec<RgbaImage>,
    pub scrolls: u32,
    pub scroll_failures: u32,
    pub stop_reason: StopReason,
}

pub struct CaptureSession<S, A> {
    source: S,
    actuator: A,
    config: SessionConfig,
}

impl<S, A> CaptureSession<S, A>
where
    S: FrameSource,
    A: ScrollActuator,
{
    pub fn new(source: S, actuator: A, config: SessionConfig) -> Self {
        Self {
            source,
            actuator,
            config,
        }
    }

    /// Runs a full session against `window` and returns the stitched frame.
    ///
    /// Any capture failure aborts the session without partial output.
    pub async fn run(&mut self, window: WindowHandle) -> Result<LongCapture, SessionError> {
        let start = Instant::now();
        self.config.validate()?;

        log::info!(
            "[SESSION] Long capture of {} — delay {}ms, max {} scrolls, overlap hint {}px",
            window,
            self.config.scroll_delay_ms,
            self.config.max_scrolls,
            self.config.overlap_hint_pixels
        );

        let captured = self.capture_frames(window).await?;

        let overlaps = stitch::resolve_all(&captured.frames, self.config.overlap_hint_pixels);
        let image = stitch::stitch(&captured.frames, &overlaps)?;

        let report = SessionReport {
            window,
            frames: captured.frames.len(),
            scrolls: captured.scrolls,
            scroll_failures: captured.scroll_failures,
            stop_reason: captured.stop_reason,
            overlaps,
            width: image.width(),
            height: image.height(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        log::info!(
            "[SESSION] Done: {} frames, {} scrolls ({} failed), {:?}, {}x{} in {}ms",
            report.frames,
            report.scrolls,
            report.scroll_failures,
            report.stop_reason,
            report.width,
            report.height,
            report.elapsed_ms
        );

        Ok(LongCapture { image, report })
    }

    /// The scroll loop alone: seed frame, then up to `max_scrolls`
    /// gesture/delay/capture rounds. Unchanged frames are not retained.
    pub async fn capture_frames(
        &mut self,
        window: WindowHandle,
    ) -> Result<CapturedFrames, SessionError> {
        let seed = self.source.capture_window_raw(window)?;
        let width = seed.width();
        log::info!("[SESSION] Seed frame {}x{}", width, seed.height());

        let mut detector = TerminationDetector::new(&seed);
        let mut frames = vec![seed];
        let mut scrolls = 0;
        let mut scroll_failures = 0;
        let mut stop_reason = StopReason::MaxScrolls;

        for iteration in 1..=self.config.max_scrolls {
            match self.actuator.scroll(window).await {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    scroll_failures += 1;
                    log::warn!("[SCROLL] Gesture {} failed, capturing anyway: {}", iteration, e);
                }
                Err(e) => return Err(SessionError::Scroll(e)),
            }
            scrolls += 1;

            tokio::time::sleep(self.config.scroll_delay()).await;

            let frame = self.source.capture_window_raw(window)?;
            if frame.width() != width {
                return Err(CaptureError::WidthChanged {
                    expected: width,
                    actual: frame.width(),
                }
                .into());
            }

            match detector.observe(&frame) {
                Verdict::Append => {
                    frames.push(frame);
                    log::info!(
                        "[SESSION] Scroll {}/{}: captured frame {}",
                        iteration,
                        self.config.max_scrolls,
                        frames.len()
                    );
                }
                Verdict::Unchanged { streak } => {
                    log::info!(
                        "[SESSION] Scroll {}/{}: content unchanged ({} in a row)",
                        iteration,
                        self.config.max_scrolls,
                        streak
                    );
                }
                Verdict::Stop => {
                    log::info!(
                        "[SESSION] Scroll {}/{}: content unchanged twice, reached the end",
                        iteration,
                        self.config.max_scrolls
                    );
                    stop_reason = StopReason::ContentUnchanged;
                    break;
                }
            }
        }

        Ok(CapturedFrames {
            frames,
            scrolls,
            scroll_failures,
            stop_reason,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Scroll(ScrollError),

    #[error("Stitching failed: {0}")]
    Stitch(#[from] StitchError),
}
