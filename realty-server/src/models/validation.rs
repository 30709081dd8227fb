//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// An update carried no allow-listed field
    NoChanges { resource: &'static str },

    /// Path or field value doesn't have the required shape
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be decoded (malformed JSON, unknown field, wrong type)
    Body { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChanges { resource } => {
                write!(f, "no updatable {} fields supplied", resource)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::Body { reason } => write!(f, "invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
