//! Standardized API response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by every failing endpoint.
///
/// `details` carries structured context such as field-level validation
/// issues and is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Attach serializable details. Unserializable values are dropped.
    pub fn with_details<T: Serialize>(mut self, details: &T) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    // Common error constructors
    pub fn invalid_data() -> Self {
        Self::new("Invalid data")
    }

    pub fn unauthorized() -> Self {
        Self::new("Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new("Forbidden")
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(format!("{what} not found"))
    }

    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
