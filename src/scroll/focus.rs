//! Focus-then-key-press sequence for input injection.
//!
//! The OS calls sit behind `InputApi` so the sequence, and the detach
//! that must follow every successful attach, can be exercised without a
//! desktop.

use super::ScrollError;
use crate::capture::WindowHandle;

/// Key-down plus key-up.
pub(crate) const PAGE_DOWN_EVENTS: u32 = 2;

/// OS entry points used by `page_down`. Windows are identified by their
/// capture id, threads by their OS thread id.
pub(crate) struct InputApi {
    pub is_window: fn(u32) -> bool,
    pub current_thread: fn() -> u32,
    pub window_thread: fn(u32) -> u32,
    /// `(current, target, attach)`; returns whether the OS accepted it.
    pub attach_thread_input: fn(u32, u32, bool) -> bool,
    pub set_foreground: fn(u32) -> bool,
    /// Injects Page Down and returns how many events went through.
    pub send_page_down: fn() -> u32,
}

/// Our thread's input queue joined to the target window's thread.
/// Detached again when dropped.
struct InputAttachment<'a> {
    api: &'a InputApi,
    current: u32,
    target: u32,
}

impl<'a> InputAttachment<'a> {
    /// Returns `None` when no attachment is needed (same thread) or the
    /// OS refuses it; focusing is then attempted unattached.
    fn acquire(api: &'a InputApi, window_id: u32) -> Option<Self> {
        let current = (api.current_thread)();
        let target = (api.window_thread)(window_id);

        if target == 0 || target == current {
            return None;
        }

        if !(api.attach_thread_input)(current, target, true) {
            log::debug!("[SCROLL] AttachThreadInput({} → {}) refused", current, target);
            return None;
        }

        Some(Self {
            api,
            current,
            target,
        })
    }
}

impl Drop for InputAttachment<'_> {
    fn drop(&mut self) {
        if !(self.api.attach_thread_input)(self.current, self.target, false) {
            log::warn!(
                "[SCROLL] Failed to detach input thread {} from {}",
                self.current,
                self.target
            );
        }
    }
}

/// Focuses `window` and sends one Page Down to it.
pub(crate) fn page_down(api: &InputApi, window: WindowHandle) -> Result<(), ScrollError> {
    if !(api.is_window)(window.id) {
        return Err(ScrollError::Actuation(format!(
            "window {} no longer exists",
            window.id
        )));
    }

    let _attachment = InputAttachment::acquire(api, window.id);

    if !(api.set_foreground)(window.id) {
        log::debug!("[SCROLL] SetForegroundWindow refused for window {}", window.id);
    }

    let sent = (api.send_page_down)();
    if sent != PAGE_DOWN_EVENTS {
        return Err(ScrollError::Actuation(format!(
            "SendInput injected {} of {} events",
            sent, PAGE_DOWN_EVENTS
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const OUR_THREAD: u32 = 7;
    const WINDOW_THREAD: u32 = 42;

    thread_local! {
        static CALLS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn record(call: &'static str) {
        CALLS.with(|c| c.borrow_mut().push(call));
    }

    fn calls() -> Vec<&'static str> {
        CALLS.with(|c| c.borrow_mut().drain(..).collect())
    }

    fn attach(current: u32, target: u32, join: bool) -> bool {
        assert_eq!((current, target), (OUR_THREAD, WINDOW_THREAD));
        record(if join { "attach" } else { "detach" });
        true
    }

    fn fake_api() -> InputApi {
        InputApi {
            is_window: |_| true,
            current_thread: || OUR_THREAD,
            window_thread: |_| WINDOW_THREAD,
            attach_thread_input: attach,
            set_foreground: |_| {
                record("focus");
                true
            },
            send_page_down: || {
                record("send");
                PAGE_DOWN_EVENTS
            },
        }
    }

    fn window() -> WindowHandle {
        WindowHandle::new(100, 5)
    }

    #[test]
    fn detaches_after_successful_gesture() {
        calls();
        page_down(&fake_api(), window()).unwrap();
        assert_eq!(calls(), ["attach", "focus", "send", "detach"]);
    }

    #[test]
    fn detaches_after_failed_send_input() {
        calls();
        let api = InputApi {
            send_page_down: || {
                record("send");
                1
            },
            ..fake_api()
        };

        let result = page_down(&api, window());

        assert!(matches!(result, Err(ScrollError::Actuation(_))));
        assert_eq!(calls(), ["attach", "focus", "send", "detach"]);
    }

    #[test]
    fn refused_attach_is_not_detached() {
        calls();
        let api = InputApi {
            attach_thread_input: |_, _, join| {
                record(if join { "attach" } else { "detach" });
                false
            },
            ..fake_api()
        };

        page_down(&api, window()).unwrap();
        assert_eq!(calls(), ["attach", "focus", "send"]);
    }

    #[test]
    fn same_thread_skips_attachment() {
        calls();
        let api = InputApi {
            window_thread: |_| OUR_THREAD,
            ..fake_api()
        };

        page_down(&api, window()).unwrap();
        assert_eq!(calls(), ["focus", "send"]);
    }

    #[test]
    fn vanished_window_fails_before_touching_input() {
        calls();
        let api = InputApi {
            is_window: |_| false,
            ..fake_api()
        };

        let result = page_down(&api, window());

        assert!(matches!(result, Err(ScrollError::Actuation(_))));
        assert!(calls().is_empty());
    }
}
