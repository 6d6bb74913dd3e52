//! Custom error types for hotkey-mouse.
//!
//! This module provides structured error types using `thiserror` so that
//! every failure names the file, binding or descriptor it concerns.

use std::io;
use thiserror::Error;

/// Main error type for hotkey-mouse operations.
#[derive(Error, Debug)]
pub enum HkmError {
    /// No configuration file exists at the given path.
    #[error("config file '{path}' not found")]
    ConfigNotFound { path: String },

    /// The configuration file is not valid JSON or does not match the expected shape.
    #[error("failed to parse config '{path}': {reason}")]
    ConfigParse { path: String, reason: String },

    /// The configuration file exists but could not be read.
    #[error("failed to read config '{path}': {reason}")]
    ConfigRead { path: String, reason: String },

    /// Error writing configuration file.
    #[error("failed to save config to '{path}': {reason}")]
    ConfigWrite { path: String, reason: String },

    /// Configuration validation error.
    #[error("configuration error: {0}")]
    ConfigValidation(String),

    /// A hotkey descriptor could not be parsed.
    #[error("invalid hotkey '{descriptor}': {reason}")]
    InvalidHotkey { descriptor: String, reason: String },

    /// The host refused to register a binding.
    #[error("failed to register {binding} hotkey '{descriptor}': {reason}")]
    HotkeyRegistration {
        binding: String,
        descriptor: String,
        reason: String,
    },

    /// Error querying or driving the mouse pointer.
    #[error("pointer error: {0}")]
    Pointer(String),

    /// Error creating or driving the hotkey backend.
    #[error("hotkey error: {0}")]
    Hotkey(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for hotkey-mouse operations.
pub type Result<T> = std::result::Result<T, HkmError>;

impl HkmError {
    /// Create a new ConfigNotFound error.
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a new ConfigParse error.
    pub fn config_parse(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ConfigRead error.
    pub fn config_read(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ConfigWrite error.
    pub fn config_write(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigWrite {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ConfigValidation error.
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation(message.into())
    }

    /// Create a new InvalidHotkey error.
    pub fn invalid_hotkey(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHotkey {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }

    /// Create a new HotkeyRegistration error.
    pub fn hotkey_registration(
        binding: impl Into<String>,
        descriptor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::HotkeyRegistration {
            binding: binding.into(),
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Pointer error.
    pub fn pointer(message: impl Into<String>) -> Self {
        Self::Pointer(message.into())
    }

    /// Create a new Hotkey error.
    pub fn hotkey(message: impl Into<String>) -> Self {
        Self::Hotkey(message.into())
    }
}
