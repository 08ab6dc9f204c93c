//! Error types for the telemetry client
//!
//! Provides unified error handling using thiserror. Transport failures,
//! business envelope failures and interceptor failures all share one type so
//! they can flow through the same error interceptor chain.

use serde_json::Value;
use thiserror::Error;

/// Message shown to the user when the failure is not a recognized HTTP error.
pub const NETWORK_FAILURE_MESSAGE: &str = "Network request failed, please check your connection";

/// Fallback message for business errors whose envelope carries no message.
pub const DEFAULT_BUSINESS_MESSAGE: &str = "request failed";

// == Client Error Enum ==
/// Unified error type for the client.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// HTTP status outside the 2xx range
    #[error("HTTP Error: {status}")]
    Status {
        status: u16,
        body: Option<Value>,
    },

    /// Envelope `code` was non-zero
    #[error("{message}")]
    Business {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// Connection could not be established or was dropped
    #[error("Network error: {0}")]
    Network(String),

    /// The platform request did not finish in time
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Body was not a valid `{code, data, message}` envelope
    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// An interceptor failed while processing a request, response or error
    #[error("Interceptor failed: {0}")]
    Interceptor(String),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// Local storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Builds a business error, substituting the default message when the
    /// envelope message is empty.
    pub fn business(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            DEFAULT_BUSINESS_MESSAGE.to_string()
        } else {
            message
        };
        ClientError::Business {
            code,
            message,
            data,
        }
    }

    /// True for errors that carry a server-provided status or business code.
    pub fn is_http_error(&self) -> bool {
        matches!(self, ClientError::Status { .. } | ClientError::Business { .. })
    }

    /// Returns the status or business code, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            ClientError::Status { status, .. } => Some(i64::from(*status)),
            ClientError::Business { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Text suitable for a transient toast.
    pub fn user_message(&self) -> String {
        if self.is_http_error() {
            self.to_string()
        } else {
            NETWORK_FAILURE_MESSAGE.to_string()
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the client.
pub type Result<T> = std::result::Result<T, ClientError>;
