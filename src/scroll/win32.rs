//! Windows scroll gesture via Win32 input injection.
//!
//! `SendInput` goes to the foreground window, and `SetForegroundWindow`
//! only succeeds reliably while our thread shares the target's input
//! queue. The attach/focus/send sequence lives in `focus`; this file
//! only binds it to the Win32 calls.

use super::focus::{self, InputApi};
use super::{ScrollActuator, ScrollError};
use crate::capture::WindowHandle;
use std::ffi::c_void;
use std::mem;

use windows::Win32::{
    Foundation::{BOOL, HWND},
    System::Threading::{AttachThreadInput, GetCurrentThreadId},
    UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_EXTENDEDKEY,
        KEYEVENTF_KEYUP, VIRTUAL_KEY, VK_NEXT,
    },
    UI::WindowsAndMessaging::{GetWindowThreadProcessId, IsWindow, SetForegroundWindow},
};

/// Sends one Page Down per gesture. The configured gesture amount has no
/// effect on Windows.
#[derive(Debug)]
pub struct Win32Actuator;

impl Win32Actuator {
    pub fn new(gesture_amount: Option<u32>) -> Self {
        if let Some(amount) = gesture_amount {
            log::debug!(
                "[SCROLL] Gesture amount {} ignored on Windows — one Page Down per gesture",
                amount
            );
        }
        Self
    }
}

impl ScrollActuator for Win32Actuator {
    async fn scroll(&mut self, window: WindowHandle) -> Result<(), ScrollError> {
        focus::page_down(&WIN32, window)
    }
}

const WIN32: InputApi = InputApi {
    is_window,
    current_thread,
    window_thread,
    attach_thread_input,
    set_foreground,
    send_page_down,
};

fn hwnd(window_id: u32) -> HWND {
    HWND(window_id as usize as *mut c_void)
}

fn is_window(window_id: u32) -> bool {
    unsafe { IsWindow(hwnd(window_id)) }.as_bool()
}

fn current_thread() -> u32 {
    unsafe { GetCurrentThreadId() }
}

fn window_thread(window_id: u32) -> u32 {
    unsafe { GetWindowThreadProcessId(hwnd(window_id), None) }
}

fn attach_thread_input(current: u32, target: u32, attach: bool) -> bool {
    unsafe { AttachThreadInput(current, target, BOOL::from(attach)) }.as_bool()
}

fn set_foreground(window_id: u32) -> bool {
    unsafe { SetForegroundWindow(hwnd(window_id)) }.as_bool()
}

fn send_page_down() -> u32 {
    let inputs = [key_event(VK_NEXT, false), key_event(VK_NEXT, true)];
    unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) }
}

/// Page Down lives on the extended key block.
fn key_event(vk: VIRTUAL_KEY, key_up: bool) -> INPUT {
    let flags = if key_up {
        KEYEVENTF_EXTENDEDKEY | KEYEVENTF_KEYUP
    } else {
        KEYEVENTF_EXTENDEDKEY
    };

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}
