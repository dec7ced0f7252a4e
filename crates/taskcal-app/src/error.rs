// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

pub const UNREACHABLE_MESSAGE: &str = "Could not reach the server";

/// Failure talking to the task backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The request never completed, or the response could not be decoded.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with `success: false` or a non-2xx status.
    #[error("{message}")]
    Server { message: String },
}

impl BackendError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network(detail.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Text for a notice: the server's own message when it sent one,
    /// `fallback` for an empty one, and a fixed line for transport failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Network(_) => UNREACHABLE_MESSAGE.to_owned(),
            Self::Server { message } if message.trim().is_empty() => fallback.to_owned(),
            Self::Server { message } => message.clone(),
        }
    }
}

/// Errors from a month refresh.
pub type FetchError = BackendError;

/// A required form field was left blank; caught before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is required -- fill it in and retry")]
pub struct ValidationError {
    pub field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl MutationError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(error) => error.to_string(),
            Self::Backend(error) => error.user_message(fallback),
        }
    }
}
