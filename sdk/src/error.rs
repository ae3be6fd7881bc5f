use std::collections::BTreeMap;

use serde::Deserialize;

use crate::board::PendingAction;

/// First failed rule per field, keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Errors returned by the Taskboard SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport or connection error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with `status: false` or an error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Option<FieldErrors>,
    },

    /// Local validation failed; no request was sent.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    /// The same action already has a request in flight.
    #[error("{0} is already in progress")]
    Busy(PendingAction),

    /// Failed to deserialize the response body.
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl Error {
    /// Text shown to the user for this failure. Server messages pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error envelope returned by the Taskboard API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
    pub errors: Option<FieldErrors>,
}

pub type Result<T> = std::result::Result<T, Error>;
