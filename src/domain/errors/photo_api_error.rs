//! Errors raised by the remote photo services.

use thiserror::Error;

/// Failure of a request against the photo or metadata endpoints.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum PhotoApiError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("photo not found: {id}")]
    NotFound { id: String },

    #[error("unexpected response {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("photo id {id:?} cannot be mapped to a metadata record")]
    InvalidId { id: String },

    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl PhotoApiError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates invalid id error.
    #[must_use]
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout)
    }

    /// Returns whether the upstream reported the photo as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
