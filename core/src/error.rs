//! Error types for the Petfinder client.
//!
//! # Design
//! Configuration mistakes and transport failures are kept apart: the former
//! are reported synchronously and never change client state, the latter are
//! whatever the transport returned, passed through untouched. A token that
//! cannot be found in an authentication response is not an error at all.

use thiserror::Error;

/// Rejected configuration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The response format is not one of `json` or `xml`.
    #[error("invalid response format `{0}`, expected one of: json, xml")]
    InvalidFormat(String),

    /// The name does not match any remote operation.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// A required environment variable is unset.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Failure reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Connection(String),
}
