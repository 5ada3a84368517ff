//! Window enumeration and lookup by id, title pattern, or application name.

use super::screenshot::CaptureError;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use xcap::Window;

/// Opaque reference to a top-level window.
///
/// `id` is the platform window id reported by `xcap` (an HWND value on
/// Windows, a CGWindowID on macOS). `pid` is the owning process, needed
/// on macOS to bring the right application to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WindowHandle {
    pub id: u32,
    pub pid: u32,
}

impl WindowHandle {
    pub fn new(id: u32, pid: u32) -> Self {
        Self { id, pid }
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window {} (pid {})", self.id, self.pid)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowInfo {
    pub id: u32,
    pub pid: u32,
    pub title: String,
    pub app_name: String,
}

impl WindowInfo {
    pub fn handle(&self) -> WindowHandle {
        WindowHandle::new(self.id, self.pid)
    }
}

/// How the caller picks the window to capture.
#[derive(Debug, Clone)]
pub enum WindowSelector {
    Id(u32),
    Title(Regex),
    App(String),
}

impl WindowSelector {
    pub fn matches(&self, info: &WindowInfo) -> bool {
        match self {
            WindowSelector::Id(id) => info.id == *id,
            WindowSelector::Title(pattern) => pattern.is_match(&info.title),
            WindowSelector::App(name) => info.app_name.eq_ignore_ascii_case(name),
        }
    }
}

impl fmt::Display for WindowSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSelector::Id(id) => write!(f, "id {}", id),
            WindowSelector::Title(pattern) => write!(f, "title /{}/", pattern.as_str()),
            WindowSelector::App(name) => write!(f, "app '{}'", name),
        }
    }
}

/// Lists visible (non-minimized) top-level windows.
pub fn list_windows() -> Result<Vec<WindowInfo>, CaptureError> {
    let windows = Window::all().map_err(|e| CaptureError::WindowEnumeration(e.to_string()))?;

    Ok(windows
        .iter()
        .filter(|w| !w.is_minimized().unwrap_or(false))
        .filter_map(|w| {
            Some(WindowInfo {
                id: w.id().ok()?,
                pid: w.pid().unwrap_or(0),
                title: w.title().unwrap_or_default(),
                app_name: w.app_name().unwrap_or_default(),
            })
        })
        .collect())
}

/// Resolves a selector to the first matching window in z-order.
pub fn find_window(selector: &WindowSelector) -> Result<WindowInfo, CaptureError> {
    select_window(list_windows()?, selector)
}

/// Pure selection step of `find_window`, split out so it can be tested
/// without a desktop session.
pub fn select_window(
    windows: Vec<WindowInfo>,
    selector: &WindowSelector,
) -> Result<WindowInfo, CaptureError> {
    windows
        .into_iter()
        .find(|w| selector.matches(w))
        .ok_or_else(|| CaptureError::WindowNotFound(selector.to_string()))
}

pub(super) fn find_xcap_window(id: u32) -> Result<Window, CaptureError> {
    Window::all()
        .map_err(|e| CaptureError::WindowEnumeration(e.to_string()))?
        .into_iter()
        .find(|w| w.id().map(|wid| wid == id).unwrap_or(false))
        .ok_or_else(|| CaptureError::WindowNotFound(format!("id {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_windows() -> Vec<WindowInfo> {
        vec![
            WindowInfo {
                id: 11,
                pid: 100,
                title: "Inbox — Mail".into(),
                app_name: "Mail".into(),
            },
            WindowInfo {
                id: 42,
                pid: 200,
                title: "Rust Reference - Firefox".into(),
                app_name: "firefox".into(),
            },
        ]
    }

    #[test]
    fn selects_by_id() {
        let w = select_window(sample_windows(), &WindowSelector::Id(42)).unwrap();
        assert_eq!(w.handle(), WindowHandle::new(42, 200));
    }

    #[test]
    fn selects_by_title_pattern() {
        let selector = WindowSelector::Title(Regex::new(r"(?i)rust .*firefox").unwrap());
        let w = select_window(sample_windows(), &selector).unwrap();
        assert_eq!(w.id, 42);
    }

    #[test]
    fn selects_by_app_name_case_insensitive() {
        let w = select_window(sample_windows(), &WindowSelector::App("MAIL".into())).unwrap();
        assert_eq!(w.id, 11);
    }

    #[test]
    fn missing_window_is_an_error() {
        let result = select_window(sample_windows(), &WindowSelector::App("slack".into()));
        assert!(matches!(result, Err(CaptureError::WindowNotFound(ref s)) if s.contains("slack")));
    }
}
