use crate::crypto::PrivateKey;
use crate::error::Result;
use std::time::Duration;

/// Protocol version string exchanged in handshakes
pub const PROTOCOL_VERSION: &str = "cadence-1";

/// Version field stamped into block headers
pub const BLOCK_VERSION: u32 = 1;

/// Default bound on outbound dials and RPC round trips
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_millis(5000);

/// Per-node configuration. Several nodes with distinct configs can share
/// one process, which the in-process mesh tests rely on.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub version: String,
    pub listen_addr: String,
    /// Present iff this node is a validator
    pub private_key: Option<PrivateKey>,
    pub rpc_timeout: Duration,
}

impl NodeConfig {
    pub fn new(listen_addr: impl Into<String>) -> NodeConfig {
        NodeConfig {
            version: PROTOCOL_VERSION.to_string(),
            listen_addr: listen_addr.into(),
            private_key: None,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
        }
    }

    /// A validator node with a freshly generated key
    pub fn validator(listen_addr: impl Into<String>) -> Result<NodeConfig> {
        let key = PrivateKey::generate()?;
        Ok(Self::new(listen_addr).with_private_key(key))
    }

    pub fn with_private_key(mut self, key: PrivateKey) -> NodeConfig {
        self.private_key = Some(key);
        self
    }

    pub fn with_rpc_timeout(mut self, timeout: Duration) -> NodeConfig {
        self.rpc_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NodeConfig::new("127.0.0.1:3000");
        assert_eq!(config.version, PROTOCOL_VERSION);
        assert!(config.private_key.is_none());
        assert_eq!(config.rpc_timeout, DEFAULT_RPC_TIMEOUT);
    }

    #[test]
    fn test_validator_config_carries_a_key() {
        let config = NodeConfig::validator("127.0.0.1:3000").unwrap();
        assert!(config.private_key.is_some());
    }
}
