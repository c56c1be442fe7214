//! The transport seam: a blocking `GET url -> body` capability.
//!
//! # Design
//! The client only builds URLs and keeps session state; fetching is
//! delegated to a `Transport`. `UreqTransport` is the default. Tests and the
//! C wrapper plug in their own, and any
//! `Fn(&str) -> Result<String, TransportError>` closure is a transport too.
//!
//! Bodies are returned exactly as received. Timeouts and the user agent are
//! transport configuration; the client has no opinion on either.

use std::time::Duration;

use crate::error::TransportError;

pub const DEFAULT_USER_AGENT: &str = "Petfinder Rust Client Library";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP GET.
pub trait Transport {
    /// Fetch `url` and return the raw response body.
    fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<String, TransportError>,
{
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        self(url)
    }
}

/// `Transport` backed by a ureq agent.
///
/// Non-2xx responses become `TransportError::Status` carrying the body.
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: user_agent.to_string(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(TransportError::Status { status, body });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_transports() {
        let transport = |url: &str| Ok::<_, TransportError>(format!("fetched {url}"));
        assert_eq!(transport.fetch("http://x/pet.find").unwrap(), "fetched http://x/pet.find");
    }

    #[test]
    fn boxed_closure_is_a_transport() {
        let transport: Box<dyn Fn(&str) -> Result<String, TransportError>> =
            Box::new(|_: &str| Err(TransportError::Connection("offline".to_string())));
        assert_eq!(
            transport.fetch("http://x").unwrap_err(),
            TransportError::Connection("offline".to_string())
        );
    }

    #[test]
    fn default_transport_uses_library_user_agent() {
        assert_eq!(UreqTransport::default().user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn unreachable_host_is_connection_error() {
        let transport = UreqTransport::new("test", Duration::from_secs(2));
        // Port 9 on loopback: nothing listens there in the test environment.
        let err = transport.fetch("http://127.0.0.1:9/pet.find").unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)));
    }
}
