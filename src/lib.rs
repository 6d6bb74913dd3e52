//! # Hotkey Mouse
//!
//! Move and click the mouse pointer with global keyboard shortcuts.
//!
//! ## Features
//!
//! - Four movement bindings and two click bindings, each combined with a
//!   shared modifier chord
//! - Configurable step size in pixels
//! - JSON configuration, loaded at startup and saved atomically at shutdown
//! - Per-binding registration failure reporting with a configurable policy
//!
//! ## Example
//!
//! ```no_run
//! use hotkey_mouse::{Binding, EmulationParameters};
//!
//! let params = EmulationParameters::load("bindings.json").unwrap();
//! params.validate().unwrap();
//! for binding in Binding::ALL {
//!     println!("{}: {}", binding, params.descriptor_for(binding));
//! }
//! ```
//!
//! ## Configuration
//!
//! ```json
//! {
//!   "mouseMovementKeyBindings": { "upKeyBinding": "I", "rightKeyBinding": "L", "downKeyBinding": "K", "leftKeyBinding": "J" },
//!   "mouseClickKeyBindings": { "leftClickKeyBinding": "U", "rightClickKeyBinding": "O" },
//!   "mouseMovementParameters": { "movementSpeed": 25, "movementTriggerKeyBinding": "CommandOrControl+Shift" }
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod hotkey;
pub mod notify;
pub mod platform;
pub mod pointer;
pub mod registrar;

pub use app::{AppContext, FailurePolicy};
pub use config::{Binding, EmulationParameters};
pub use error::{HkmError, Result};
pub use hotkey::{GlobalHotkeyHost, HotkeyHost};
pub use notify::{ConsoleNotifier, Notifier};
pub use pointer::{EnigoPointer, MouseButton, Pointer};
pub use registrar::{HotkeyAction, RegistrationReport, ShortcutRegistrar};
