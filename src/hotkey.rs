//! Hotkey descriptors and the global hotkey capability.
//!
//! A descriptor is an accelerator string such as `CommandOrControl+Shift+I`.
//! [`HotkeyHost`] is the seam the registrar talks to; [`GlobalHotkeyHost`]
//! implements it on top of the `global-hotkey` crate.

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

use crate::error::{HkmError, Result};

/// Callback run when a registered hotkey is pressed.
pub type HotkeyHandler = Box<dyn FnMut()>;

/// A host able to bind global hotkeys to handlers.
pub trait HotkeyHost {
    /// Bind `descriptor` to `handler`. Fails if the descriptor is invalid or
    /// already claimed.
    fn register(&mut self, descriptor: &str, handler: HotkeyHandler) -> Result<()>;

    fn unregister(&mut self, descriptor: &str) -> Result<()>;

    /// Release every hotkey this host registered.
    fn unregister_all(&mut self) -> Result<()>;
}

/// Join a modifier chord and a key into a descriptor.
///
/// Each segment is trimmed and empty segments are dropped, so stray
/// whitespace or newlines in the configuration never reach the backend.
pub fn compose_descriptor(trigger: &str, key: &str) -> String {
    trigger
        .split('+')
        .chain(std::iter::once(key))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("+")
}

/// Parse a descriptor into a [`HotKey`].
pub fn parse_hotkey(descriptor: &str) -> Result<HotKey> {
    let binding = descriptor.to_lowercase();
    let parts: Vec<&str> = binding.split('+').map(|s| s.trim()).collect();

    if parts.iter().any(|part| part.is_empty()) {
        return Err(HkmError::invalid_hotkey(descriptor, "empty segment"));
    }

    let mut modifiers = Modifiers::empty();
    let mut key_code = None;

    for part in &parts {
        match *part {
            "commandorcontrol" | "cmdorctrl" => modifiers |= command_or_control(),
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" | "option" => modifiers |= Modifiers::ALT,
            "shift" => modifiers |= Modifiers::SHIFT,
            "meta" | "cmd" | "command" | "super" => modifiers |= Modifiers::SUPER,
            key => {
                if key_code.is_some() {
                    return Err(HkmError::invalid_hotkey(
                        descriptor,
                        "more than one non-modifier key",
                    ));
                }
                let code = parse_key_code(key).ok_or_else(|| {
                    HkmError::invalid_hotkey(descriptor, format!("unsupported key '{}'", key))
                })?;
                key_code = Some(code);
            }
        }
    }

    let code = key_code.ok_or_else(|| HkmError::invalid_hotkey(descriptor, "no key specified"))?;
    let modifiers = if modifiers.is_empty() {
        None
    } else {
        Some(modifiers)
    };

    Ok(HotKey::new(modifiers, code))
}

#[cfg(target_os = "macos")]
fn command_or_control() -> Modifiers {
    Modifiers::SUPER
}

#[cfg(not(target_os = "macos"))]
fn command_or_control() -> Modifiers {
    Modifiers::CONTROL
}

fn parse_key_code(key: &str) -> Option<Code> {
    let code = match key {
        // Letters
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,

        // Numbers
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,

        // Function keys
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,

        // Special keys
        "space" => Code::Space,
        "enter" | "return" => Code::Enter,
        "tab" => Code::Tab,
        "escape" | "esc" => Code::Escape,
        "backspace" => Code::Backspace,
        "delete" => Code::Delete,
        "insert" => Code::Insert,
        "home" => Code::Home,
        "end" => Code::End,
        "pageup" => Code::PageUp,
        "pagedown" => Code::PageDown,

        // Arrow keys
        "up" | "arrowup" => Code::ArrowUp,
        "down" | "arrowdown" => Code::ArrowDown,
        "left" | "arrowleft" => Code::ArrowLeft,
        "right" | "arrowright" => Code::ArrowRight,

        // Punctuation
        "-" | "minus" => Code::Minus,
        // `+` shares the `=` key on US layouts
        "=" | "equal" | "plus" => Code::Equal,
        "[" => Code::BracketLeft,
        "]" => Code::BracketRight,
        ";" => Code::Semicolon,
        "'" => Code::Quote,
        "," | "comma" => Code::Comma,
        "." | "period" => Code::Period,
        "/" => Code::Slash,
        "\\" => Code::Backslash,
        "`" | "backquote" => Code::Backquote,

        // Numpad
        "num0" => Code::Numpad0,
        "num1" => Code::Numpad1,
        "num2" => Code::Numpad2,
        "num3" => Code::Numpad3,
        "num4" => Code::Numpad4,
        "num5" => Code::Numpad5,
        "num6" => Code::Numpad6,
        "num7" => Code::Numpad7,
        "num8" => Code::Numpad8,
        "num9" => Code::Numpad9,
        "numadd" => Code::NumpadAdd,
        "numsub" => Code::NumpadSubtract,
        "nummult" => Code::NumpadMultiply,
        "numdiv" => Code::NumpadDivide,
        "numdec" => Code::NumpadDecimal,

        _ => return None,
    };

    Some(code)
}

struct Registration {
    descriptor: String,
    hotkey: HotKey,
    handler: HotkeyHandler,
}

/// Drop the registration for `descriptor` once `os_unregister` has released
/// the binding. On failure the handler stays, matching the OS state.
fn release<F>(
    registrations: &mut HashMap<u32, Registration>,
    descriptor: &str,
    os_unregister: F,
) -> Result<()>
where
    F: FnOnce(HotKey) -> Result<()>,
{
    let hotkey = parse_hotkey(descriptor)?;
    if !registrations.contains_key(&hotkey.id()) {
        return Err(HkmError::hotkey(format!("'{}' is not registered", descriptor)));
    }

    os_unregister(hotkey)?;
    registrations.remove(&hotkey.id());
    Ok(())
}

/// [`HotkeyHost`] backed by the OS through `global-hotkey`.
///
/// Must live on the thread that runs the event loop; handlers are invoked
/// from [`GlobalHotkeyHost::poll`].
pub struct GlobalHotkeyHost {
    manager: GlobalHotKeyManager,
    registrations: HashMap<u32, Registration>,
}

impl GlobalHotkeyHost {
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new().map_err(|e| {
            HkmError::hotkey(format!("failed to create GlobalHotKeyManager: {}", e))
        })?;

        Ok(Self {
            manager,
            registrations: HashMap::new(),
        })
    }

    /// Drain pending hotkey events and run the matching handlers.
    ///
    /// Returns the number of handlers invoked.
    pub fn poll(&mut self) -> usize {
        let receiver = GlobalHotKeyEvent::receiver();
        let mut fired = 0;
        while let Ok(event) = receiver.try_recv() {
            if self.dispatch(&event) {
                fired += 1;
            }
        }
        fired
    }

    fn dispatch(&mut self, event: &GlobalHotKeyEvent) -> bool {
        if event.state != HotKeyState::Pressed {
            return false;
        }

        match self.registrations.get_mut(&event.id) {
            Some(registration) => {
                trace!(descriptor = %registration.descriptor, "hotkey pressed");
                (registration.handler)();
                true
            }
            None => {
                debug!(id = event.id, "event for unknown hotkey ignored");
                false
            }
        }
    }
}

impl HotkeyHost for GlobalHotkeyHost {
    fn register(&mut self, descriptor: &str, handler: HotkeyHandler) -> Result<()> {
        let hotkey = parse_hotkey(descriptor)?;

        if let Some(existing) = self.registrations.get(&hotkey.id()) {
            return Err(HkmError::hotkey(format!(
                "'{}' is already bound as '{}'",
                descriptor, existing.descriptor
            )));
        }

        self.manager
            .register(hotkey)
            .map_err(|e| HkmError::hotkey(e.to_string()))?;

        self.registrations.insert(
            hotkey.id(),
            Registration {
                descriptor: descriptor.to_string(),
                hotkey,
                handler,
            },
        );

        info!(descriptor = %descriptor, "global hotkey registered");
        Ok(())
    }

    fn unregister(&mut self, descriptor: &str) -> Result<()> {
        let manager = &self.manager;
        release(&mut self.registrations, descriptor, |hotkey| {
            manager
                .unregister(hotkey)
                .map_err(|e| HkmError::hotkey(e.to_string()))
        })?;

        debug!(descriptor = %descriptor, "global hotkey unregistered");
        Ok(())
    }

    fn unregister_all(&mut self) -> Result<()> {
        let manager = &self.manager;
        let mut first_error = None;

        self.registrations
            .retain(|_, registration| match manager.unregister(registration.hotkey) {
                Ok(()) => false,
                Err(e) => {
                    warn!(descriptor = %registration.descriptor, error = %e, "failed to unregister hotkey");
                    first_error.get_or_insert_with(|| HkmError::hotkey(e.to_string()));
                    true
                }
            });

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_descriptor() {
        assert_eq!(
            compose_descriptor("CommandOrControl+Shift", "I"),
            "CommandOrControl+Shift+I"
        );
        assert_eq!(
            compose_descriptor("\n    CommandOrControl + Shift\n", " I\n"),
            "CommandOrControl+Shift+I"
        );
        assert_eq!(compose_descriptor("", "U"), "U");
        assert_eq!(compose_descriptor("Shift+", "U"), "Shift+U");
    }

    #[test]
    fn test_parse_command_or_control() {
        let hotkey = parse_hotkey("CommandOrControl+Shift+I").unwrap();
        #[cfg(target_os = "macos")]
        let expected = HotKey::new(Some(Modifiers::SUPER | Modifiers::SHIFT), Code::KeyI);
        #[cfg(not(target_os = "macos"))]
        let expected = HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyI);
        assert_eq!(hotkey, expected);

        assert_eq!(parse_hotkey("CmdOrCtrl+Shift+i").unwrap(), expected);
    }

    #[test]
    fn test_parse_plain_modifiers_and_keys() {
        assert_eq!(
            parse_hotkey("Alt+F5").unwrap(),
            HotKey::new(Some(Modifiers::ALT), Code::F5)
        );
        assert_eq!(
            parse_hotkey("ctrl+super+left").unwrap(),
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::SUPER), Code::ArrowLeft)
        );
        assert_eq!(parse_hotkey("u").unwrap(), HotKey::new(None, Code::KeyU));
    }

    fn registrations_with(descriptor: &str) -> HashMap<u32, Registration> {
        let hotkey = parse_hotkey(descriptor).unwrap();
        let mut registrations = HashMap::new();
        registrations.insert(
            hotkey.id(),
            Registration {
                descriptor: descriptor.to_string(),
                hotkey,
                handler: Box::new(|| {}),
            },
        );
        registrations
    }

    #[test]
    fn test_release_keeps_handler_when_os_refuses() {
        let mut registrations = registrations_with("Shift+U");

        let result = release(&mut registrations, "Shift+U", |_| {
            Err(HkmError::hotkey("still grabbed"))
        });

        assert!(result.is_err());
        assert_eq!(registrations.len(), 1);
    }

    #[test]
    fn test_release_removes_handler_after_os_release() {
        let mut registrations = registrations_with("Shift+U");
        let mut released = None;

        release(&mut registrations, "shift+u", |hotkey| {
            released = Some(hotkey);
            Ok(())
        })
        .unwrap();

        assert!(registrations.is_empty());
        assert_eq!(released, Some(HotKey::new(Some(Modifiers::SHIFT), Code::KeyU)));
        assert!(release(&mut registrations, "Shift+U", |_| Ok(())).is_err());
    }

    #[test]
    fn test_parse_accelerator_key_names() {
        assert_eq!(
            parse_hotkey("Shift+Plus").unwrap(),
            HotKey::new(Some(Modifiers::SHIFT), Code::Equal)
        );
        assert_eq!(
            parse_hotkey("Alt+numadd").unwrap(),
            HotKey::new(Some(Modifiers::ALT), Code::NumpadAdd)
        );
        assert_eq!(
            parse_hotkey("Ctrl+Num7").unwrap(),
            HotKey::new(Some(Modifiers::CONTROL), Code::Numpad7)
        );
        assert_eq!(
            parse_hotkey("Alt+Backquote").unwrap(),
            HotKey::new(Some(Modifiers::ALT), Code::Backquote)
        );
    }

    #[test]
    fn test_parse_rejects_bad_descriptors() {
        assert!(matches!(
            parse_hotkey("Shift+"),
            Err(HkmError::InvalidHotkey { .. })
        ));
        assert!(parse_hotkey("Shift+Ctrl").is_err());
        assert!(parse_hotkey("Shift+I+J").is_err());
        assert!(parse_hotkey("Shift+Nope").is_err());
        assert!(parse_hotkey("").is_err());
    }
}
