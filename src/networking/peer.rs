use serde::{Deserialize, Serialize};
use std::fmt;

use crate::networking::error::{NetworkError, Result};

/// Lowest port a node may listen on. Privileged ports are refused.
pub const MIN_NODE_PORT: u32 = 1025;
pub const MAX_NODE_PORT: u32 = 65535;

/// Address of a peer. Also part of several payloads (`addr_from`, the node
/// lists), which is why the port is a plain integer: a bad value received
/// from a peer must survive decoding so that `validate` can reject it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct NodeAddr {
    pub host: String,
    pub port: u32,
}

impl NodeAddr {
    pub fn new(host: &str, port: u32) -> Self {
        NodeAddr {
            host: String::from(host),
            port,
        }
    }

    /// Checks if the node address looks fine. Must pass before any socket is
    /// opened to it.
    pub fn validate(&self) -> Result<()> {
        if self.port < MIN_NODE_PORT || self.port > MAX_NODE_PORT {
            return Err(NetworkError::AddressInvalid(format!(
                "node address port has wrong value {}",
                self.port
            )));
        }
        if self.host.is_empty() {
            return Err(NetworkError::AddressInvalid(String::from(
                "node address host is empty",
            )));
        }
        Ok(())
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_port_range() {
        assert!(NodeAddr::new("localhost", 1025).validate().is_ok());
        assert!(NodeAddr::new("localhost", 8766).validate().is_ok());
        assert!(NodeAddr::new("10.0.0.7", 65535).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_addresses() {
        for port in [0, 80, 1024, 65536, 70000] {
            assert!(
                matches!(
                    NodeAddr::new("localhost", port).validate(),
                    Err(NetworkError::AddressInvalid(_))
                ),
                "port {} should be rejected",
                port
            );
        }
        assert!(matches!(
            NodeAddr::new("", 8766).validate(),
            Err(NetworkError::AddressInvalid(_))
        ));
    }

    #[test]
    fn test_node_addr_display() {
        assert_eq!(NodeAddr::new("127.0.0.1", 8766).to_string(), "127.0.0.1:8766");
    }
}
