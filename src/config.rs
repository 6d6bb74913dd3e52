//! Emulation parameters and their JSON store.
//!
//! The document lives at a path supplied on the command line. It is loaded
//! once at startup and written back once at shutdown; nothing in between
//! touches the file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{HkmError, Result};
use crate::hotkey::{compose_descriptor, parse_hotkey};

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmulationParameters {
    pub mouse_movement_key_bindings: MouseMovementKeyBindings,
    pub mouse_click_key_bindings: MouseClickKeyBindings,
    pub mouse_movement_parameters: MouseMovementParameters,
}

/// Keys that move the pointer one step in each direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseMovementKeyBindings {
    pub up_key_binding: String,
    pub right_key_binding: String,
    pub down_key_binding: String,
    pub left_key_binding: String,
}

/// Keys that click the mouse buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseClickKeyBindings {
    pub left_click_key_binding: String,
    pub right_click_key_binding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseMovementParameters {
    /// Pixels moved per keypress.
    pub movement_speed: u32,
    /// Modifier chord prefixed to every binding, e.g. `CommandOrControl+Shift`.
    pub movement_trigger_key_binding: String,
}

/// One of the six actions a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Up,
    Right,
    Down,
    Left,
    LeftClick,
    RightClick,
}

impl Binding {
    /// Every binding, in registration order.
    pub const ALL: [Binding; 6] = [
        Binding::Up,
        Binding::Right,
        Binding::Down,
        Binding::Left,
        Binding::LeftClick,
        Binding::RightClick,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Binding::Up => "up",
            Binding::Right => "right",
            Binding::Down => "down",
            Binding::Left => "left",
            Binding::LeftClick => "leftClick",
            Binding::RightClick => "rightClick",
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for EmulationParameters {
    /// The sample document written by `hkmouse init`. Never used to fill in
    /// a missing or incomplete file.
    fn default() -> Self {
        Self {
            mouse_movement_key_bindings: MouseMovementKeyBindings {
                up_key_binding: "I".to_string(),
                right_key_binding: "L".to_string(),
                down_key_binding: "K".to_string(),
                left_key_binding: "J".to_string(),
            },
            mouse_click_key_bindings: MouseClickKeyBindings {
                left_click_key_binding: "U".to_string(),
                right_click_key_binding: "O".to_string(),
            },
            mouse_movement_parameters: MouseMovementParameters {
                movement_speed: 25,
                movement_trigger_key_binding: "CommandOrControl+Shift".to_string(),
            },
        }
    }
}

impl EmulationParameters {
    /// Load the document at `path`.
    ///
    /// A missing file is reported as [`HkmError::ConfigNotFound`]; content that
    /// is not UTF-8 JSON of the expected shape as [`HkmError::ConfigParse`].
    /// No field is ever defaulted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(HkmError::config_not_found(shown));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(HkmError::config_parse(shown, "file is not valid UTF-8"));
            }
            Err(e) => return Err(HkmError::config_read(shown, e.to_string())),
        };

        let params: Self = serde_json::from_str(&content)
            .map_err(|e| HkmError::config_parse(&shown, e.to_string()))?;

        info!(path = %path.display(), "emulation parameters loaded");
        Ok(params)
    }

    /// Write the document to `path`, replacing any existing file.
    ///
    /// The JSON is written to a temporary file in the same directory and then
    /// renamed over the target, so a failed write leaves the old file intact.
    /// An existing file keeps its permissions. The parent directory is not
    /// created.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let json = self.to_json()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| HkmError::config_write(&shown, e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| HkmError::config_write(&shown, e.to_string()))?;
        if let Some(existing) = fs::metadata(path).ok().filter(|m| m.is_file()) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| HkmError::config_write(&shown, e.to_string()))?;
        }
        tmp.persist(path)
            .map_err(|e| HkmError::config_write(&shown, e.error.to_string()))?;

        info!(path = %path.display(), "emulation parameters saved");
        Ok(())
    }

    /// Pretty JSON with a trailing newline. Field order is fixed, so equal
    /// values always serialize to identical bytes.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// The bare key bound to `binding`.
    pub fn key_for(&self, binding: Binding) -> &str {
        let movement = &self.mouse_movement_key_bindings;
        let click = &self.mouse_click_key_bindings;
        match binding {
            Binding::Up => &movement.up_key_binding,
            Binding::Right => &movement.right_key_binding,
            Binding::Down => &movement.down_key_binding,
            Binding::Left => &movement.left_key_binding,
            Binding::LeftClick => &click.left_click_key_binding,
            Binding::RightClick => &click.right_click_key_binding,
        }
    }

    /// The full hotkey descriptor for `binding`: trigger chord plus key.
    pub fn descriptor_for(&self, binding: Binding) -> String {
        compose_descriptor(
            &self.mouse_movement_parameters.movement_trigger_key_binding,
            self.key_for(binding),
        )
    }

    pub fn movement_speed(&self) -> u32 {
        self.mouse_movement_parameters.movement_speed
    }

    pub fn validate(&self) -> Result<()> {
        if self.movement_speed() == 0 {
            return Err(HkmError::config_validation(
                "movementSpeed must be a positive integer",
            ));
        }

        for binding in Binding::ALL {
            let key = self.key_for(binding).trim();
            if key.is_empty() {
                return Err(HkmError::config_validation(format!(
                    "{} key binding cannot be empty",
                    binding
                )));
            }
            if key.contains('+') {
                return Err(HkmError::config_validation(format!(
                    "{} key binding '{}' must be a single key",
                    binding, key
                )));
            }

            let descriptor = self.descriptor_for(binding);
            parse_hotkey(&descriptor).map_err(|e| {
                HkmError::config_validation(format!("{} binding: {}", binding, e))
            })?;
            debug!(binding = %binding, descriptor = %descriptor, "binding validated");
        }

        Ok(())
    }
}
