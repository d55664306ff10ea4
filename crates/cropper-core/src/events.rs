//! Messages exchanged with the server-driven UI host.
//!
//! Inbound events arrive as `(name, payload)` pairs and are parsed through a
//! single name table into [`InboundEvent`]. Outbound events carry a name and a
//! serializable payload. [`Effect`] lists the DOM side effects the binding
//! layer must perform after the session handles something.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while parsing a host event.
#[derive(Debug, Error, PartialEq)]
pub enum EventError {
    /// The event name is not one the widget listens for
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// The payload does not have the expected shape
    #[error("Invalid payload for {event}: {reason}")]
    InvalidPayload { event: &'static str, reason: String },
}

/// Which inbound event a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    ResetFileInput,
    ChangeAspectRatio,
}

impl InboundKind {
    const TABLE: [(&'static str, InboundKind); 2] = [
        ("reset_file_input", InboundKind::ResetFileInput),
        ("change_aspect_ratio", InboundKind::ChangeAspectRatio),
    ];

    /// Look up an event name.
    pub fn from_name(name: &str) -> Result<Self, EventError> {
        Self::TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| EventError::UnknownEvent(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            InboundKind::ResetFileInput => "reset_file_input",
            InboundKind::ChangeAspectRatio => "change_aspect_ratio",
        }
    }

    /// All event names, for registering host listeners.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::TABLE.iter().map(|(n, _)| *n)
    }
}

/// Payload of `change_aspect_ratio`. A `null` ratio unlocks the aspect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatioPayload {
    pub ratio: Option<f64>,
}

/// A parsed host-to-widget event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InboundEvent {
    /// Clear the file-selection control.
    ResetFileInput,
    /// Change (or with `None`, remove) the aspect-ratio lock.
    ChangeAspectRatio { ratio: Option<f64> },
}

impl InboundEvent {
    /// Build an event from its host name and an already-decoded payload.
    ///
    /// `payload` is only consulted for events that carry one.
    pub fn from_parts(name: &str, payload: Option<AspectRatioPayload>) -> Result<Self, EventError> {
        let kind = InboundKind::from_name(name)?;
        match kind {
            InboundKind::ResetFileInput => Ok(InboundEvent::ResetFileInput),
            InboundKind::ChangeAspectRatio => {
                let payload = payload.ok_or(EventError::InvalidPayload {
                    event: kind.name(),
                    reason: "missing ratio".to_string(),
                })?;
                match payload.ratio {
                    Some(r) if !r.is_finite() || r <= 0.0 => Err(EventError::InvalidPayload {
                        event: kind.name(),
                        reason: format!("ratio must be a positive number, got {}", r),
                    }),
                    ratio => Ok(InboundEvent::ChangeAspectRatio { ratio }),
                }
            }
        }
    }

    pub fn kind(&self) -> InboundKind {
        match self {
            InboundEvent::ResetFileInput => InboundKind::ResetFileInput,
            InboundEvent::ChangeAspectRatio { .. } => InboundKind::ChangeAspectRatio,
        }
    }
}

/// A widget-to-host event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundEvent {
    /// Intrinsic size of a freshly decoded source image.
    ImageLoaded { width: u32, height: u32 },
    /// The exported crop.
    ImageCropped { data: String, width: u32, height: u32 },
}

impl OutboundEvent {
    /// Event name as the host expects it.
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::ImageLoaded { .. } => "image_loaded",
            OutboundEvent::ImageCropped { .. } => "image_cropped",
        }
    }
}

/// DOM side effect requested by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Clear the file-selection control so the same file can be re-selected.
    ClearFileInput,
    /// Repaint the canvas from the current state.
    Redraw,
    /// Show the canvas and the optional controls/preview region.
    ShowControls,
}
