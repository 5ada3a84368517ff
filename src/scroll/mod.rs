//! Scroll actuation — one "page forward" gesture per call.
//!
//! How far the content moves is up to the target application; the
//! actuator never asks for a pixel delta. Each platform synthesizes
//! keyboard input its own way:
//! - Windows: attach to the window's input thread, focus it, send Page Down.
//! - macOS: System Events via `osascript`.
//! - Anything else: `PlatformUnsupported`.

mod applescript;
#[cfg(any(target_os = "windows", test))]
mod focus;
#[cfg(target_os = "windows")]
mod win32;

pub use applescript::AppleScriptActuator;
#[cfg(target_os = "windows")]
pub use win32::Win32Actuator;

use crate::capture::WindowHandle;
use crate::config::SessionConfig;
use std::time::Duration;

/// Issues exactly one scroll gesture against a window per call.
#[allow(async_fn_in_trait)]
pub trait ScrollActuator {
    async fn scroll(&mut self, window: WindowHandle) -> Result<(), ScrollError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScrollError {
    #[error("Scroll gestures are not supported on {0}")]
    PlatformUnsupported(&'static str),

    #[error("Scroll gesture failed: {0}")]
    Actuation(String),

    #[error("Scroll gesture timed out after {0:?}")]
    TimedOut(Duration),
}

impl ScrollError {
    /// Recoverable failures look exactly like reaching the end of the
    /// content, so the session keeps capturing and lets the termination
    /// detector decide.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScrollError::PlatformUnsupported(_))
    }
}

/// Stand-in for platforms with no gesture implementation. Every call fails
/// with `PlatformUnsupported`, which aborts the session.
#[derive(Debug, Default)]
pub struct UnsupportedActuator;

impl ScrollActuator for UnsupportedActuator {
    async fn scroll(&mut self, _window: WindowHandle) -> Result<(), ScrollError> {
        Err(ScrollError::PlatformUnsupported(std::env::consts::OS))
    }
}

#[cfg(target_os = "windows")]
pub type PlatformActuator = Win32Actuator;
#[cfg(target_os = "macos")]
pub type PlatformActuator = AppleScriptActuator;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub type PlatformActuator = UnsupportedActuator;

/// The gesture implementation for the platform this binary was built for.
pub fn platform_actuator(config: &SessionConfig) -> PlatformActuator {
    #[cfg(target_os = "windows")]
    {
        Win32Actuator::new(config.gesture_amount)
    }
    #[cfg(target_os = "macos")]
    {
        AppleScriptActuator::new(config.gesture_amount, config.gesture_timeout())
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let _ = config;
        UnsupportedActuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_platform_unsupported_is_fatal() {
        assert!(!ScrollError::PlatformUnsupported("linux").is_recoverable());
        assert!(ScrollError::Actuation("denied".into()).is_recoverable());
        assert!(ScrollError::TimedOut(Duration::from_secs(5)).is_recoverable());
    }

    #[tokio::test]
    async fn unsupported_actuator_always_fails() {
        let mut actuator = UnsupportedActuator;
        let result = actuator.scroll(WindowHandle::new(1, 1)).await;
        assert!(matches!(result, Err(ScrollError::PlatformUnsupported(_))));
    }
}
