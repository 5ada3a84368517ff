//! macOS scroll gesture through System Events (`osascript`).
//!
//! Requires the Accessibility permission for the calling process.
//! With a gesture amount, the gesture is that many Down Arrow presses
//! instead of a single Page Down.

use super::{ScrollActuator, ScrollError};
use crate::capture::WindowHandle;
use std::time::Duration;
use tokio::process::Command;

const KEY_CODE_PAGE_DOWN: u32 = 121;
const KEY_CODE_DOWN_ARROW: u32 = 125;

#[derive(Debug)]
pub struct AppleScriptActuator {
    gesture_amount: Option<u32>,
    timeout: Duration,
}

impl AppleScriptActuator {
    pub fn new(gesture_amount: Option<u32>, timeout: Duration) -> Self {
        Self {
            gesture_amount,
            timeout,
        }
    }

    /// The AppleScript source for one gesture against the window's process.
    pub fn script(&self, window: WindowHandle) -> String {
        let mut lines = vec!["tell application \"System Events\"".to_string()];

        if window.pid != 0 {
            lines.push(format!(
                "set frontmost of (first process whose unix id is {}) to true",
                window.pid
            ));
        }

        match self.gesture_amount {
            Some(repeat) => {
                lines.push(format!("repeat {} times", repeat));
                lines.push(format!("key code {}", KEY_CODE_DOWN_ARROW));
                lines.push("end repeat".to_string());
            }
            None => lines.push(format!("key code {}", KEY_CODE_PAGE_DOWN)),
        }

        lines.push("end tell".to_string());
        lines.join("\n")
    }
}

impl ScrollActuator for AppleScriptActuator {
    async fn scroll(&mut self, window: WindowHandle) -> Result<(), ScrollError> {
        let mut command = Command::new("osascript");
        command.arg("-e").arg(self.script(window)).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => return Err(ScrollError::TimedOut(self.timeout)),
            Ok(result) => result.map_err(|e| {
                ScrollError::Actuation(format!("failed to run osascript: {}", e))
            })?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScrollError::Actuation(format!(
                "osascript exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
