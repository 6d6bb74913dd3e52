//! Mouse pointer control.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use std::fmt;
use tracing::trace;

use crate::error::{HkmError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => f.write_str("left"),
            MouseButton::Right => f.write_str("right"),
        }
    }
}

/// The pointer capability: read the position, move absolutely, click.
pub trait Pointer {
    fn position(&mut self) -> Result<(i32, i32)>;

    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;

    fn click(&mut self, button: MouseButton) -> Result<()>;
}

/// [`Pointer`] that drives the real mouse through `enigo`.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| HkmError::pointer(format!("failed to connect to input backend: {}", e)))?;
        Ok(Self { enigo })
    }
}

impl Pointer for EnigoPointer {
    fn position(&mut self) -> Result<(i32, i32)> {
        self.enigo
            .location()
            .map_err(|e| HkmError::pointer(format!("failed to read pointer position: {}", e)))
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        trace!(x, y, "moving pointer");
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| HkmError::pointer(format!("failed to move pointer to ({}, {}): {}", x, y, e)))
    }

    fn click(&mut self, button: MouseButton) -> Result<()> {
        trace!(%button, "clicking");
        let enigo_button = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        };
        self.enigo
            .button(enigo_button, Direction::Click)
            .map_err(|e| HkmError::pointer(format!("failed to click {} button: {}", button, e)))
    }
}
