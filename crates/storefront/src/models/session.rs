//! Session-related types.
//!
//! The visitor itself is [`localazy_core::visitor::Visitor`]; this module
//! holds the keys it is stored under and the one-shot flash messages.

use serde::{Deserialize, Serialize};

/// Severity of a flash message, used as a CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A notice shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// The per-session [`Visitor`](localazy_core::visitor::Visitor).
    pub const VISITOR: &str = "visitor";

    /// Pending flash messages.
    pub const FLASH: &str = "flash";

    /// Product ids ticked in the store dashboard's manage view.
    pub const PRODUCT_SELECTION: &str = "product_selection";
}
