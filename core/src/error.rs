//! Error types for the student API client.
//!
//! # Design
//! Every non-2xx response lands in `Http` with the status, the body's
//! `message` field when the server sent one, and the raw body for debugging.
//! `user_message` is what the page surfaces to the user: the server's own
//! wording first, the generic description otherwise.

use serde::Deserialize;
use thiserror::Error;

/// Errors produced by `StudentClient` parse methods and `Transport`s.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection, TLS...).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Http {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Build an `Http` error, pulling a non-empty `message` string out of the
    /// body if it is a JSON object carrying one.
    pub fn from_status(status: u16, body: String) -> Self {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());
        ApiError::Http {
            status,
            message,
            body,
        }
    }

    /// Text shown to the user when a command fails.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
