//! Blocking client for the Petfinder pet-adoption API.
//!
//! # Overview
//! Builds `GET <endpoint>/<operation>?key=..&format=..&..` requests, signs
//! and fetches a session token when an operation needs one, and returns the
//! raw JSON or XML body. Bodies are never parsed; that is up to the caller.
//!
//! # Design
//! - `Client` holds credentials, the response format, the session token and
//!   the last request URL. One method per remote operation.
//! - Fetching goes through the `Transport` trait. `UreqTransport` is the
//!   default; tests and the C wrapper bring their own.
//! - The query always starts with `key` and `format`, in that order, so
//!   request strings are reproducible and match the signed form.
//! - Token extraction is a per-format `TokenExtractor`, not a parser.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod token;
pub mod types;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ConfigError, TransportError};
pub use http::{Transport, UreqTransport};
pub use request::convert_method;
pub use token::{JsonTokenExtractor, TokenExtractor, XmlTokenExtractor};
pub use types::{Input, Operation, ParamValue, Params, ResponseFormat};
