pub mod actions;
pub mod config;
pub mod models;

use thiserror::Error;

/// Invocation input errors. All of these are fatal and reported before any
/// remote call is made.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("missing required input '{0}'")]
    Missing(&'static str),
    #[error("input '{name}' must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("input 'client-payload' is not valid JSON: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("input 'client-payload' must be a JSON object, got {0}")]
    PayloadNotObject(&'static str),
}
