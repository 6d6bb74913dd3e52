//! Native event pumping for the hotkey backend.
//!
//! On Windows and macOS `global-hotkey` only sees key presses while the
//! thread that created its manager runs the platform event loop. The event
//! loop in `app` calls [`pump_events`] on every tick, before draining the
//! hotkey receiver. On Linux the X11 backend runs its own thread.

/// Process every native event that is already queued, without blocking.
#[cfg(windows)]
pub fn pump_events() {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE,
    };

    let mut msg = MSG::default();
    // SAFETY: msg is a valid, writable MSG for the duration of each call.
    unsafe {
        while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Process every native event that is already queued, without blocking.
#[cfg(target_os = "macos")]
pub fn pump_events() {
    use core_foundation::runloop::{kCFRunLoopDefaultMode, CFRunLoop};
    use std::time::Duration;

    // SAFETY: kCFRunLoopDefaultMode is an immutable CoreFoundation constant.
    let mode = unsafe { kCFRunLoopDefaultMode };
    let _ = CFRunLoop::run_in_mode(mode, Duration::ZERO, false);
}

#[cfg(not(any(windows, target_os = "macos")))]
pub fn pump_events() {}
