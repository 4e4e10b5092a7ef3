//! # TCP Endpoint Checker
//!
//! Reachability probe for `tcp://host:port` notification endpoints: a
//! bounded connect attempt, nothing more. ZMQ handshake semantics are not
//! exercised; an endpoint that accepts the connection is considered
//! reachable.

use crate::ports::ZmqEndpointChecker;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2000;

/// Connect-probe endpoint checker.
#[derive(Debug, Clone)]
pub struct TcpEndpointChecker {
    timeout: Duration,
}

impl TcpEndpointChecker {
    /// Create a checker with the given connect timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TcpEndpointChecker {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS))
    }
}

impl ZmqEndpointChecker for TcpEndpointChecker {
    fn is_reachable(&self, endpoint: &str) -> bool {
        let Some(authority) = endpoint.strip_prefix("tcp://") else {
            debug!(endpoint, "Endpoint is not a tcp:// address");
            return false;
        };

        let addrs = match authority.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(endpoint, error = %e, "Endpoint did not resolve");
                return false;
            }
        };

        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                return true;
            }
        }
        false
    }
}
