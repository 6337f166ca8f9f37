use crate::core::{Block, Transaction};
use crate::error::{ChainError, Result};
use crate::network::{Request, Response, Version};
use serde::Deserialize;
use serde_json::Deserializer;
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Client handle for a remote node.
///
/// Holds only the address; a connection is dialed per call, so building a
/// client performs no I/O. Dials, writes, and reads are all bounded by
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct NodeClient {
    addr: String,
    timeout: Duration,
}

impl NodeClient {
    pub fn new(addr: String, timeout: Duration) -> NodeClient {
        NodeClient { addr, timeout }
    }

    pub fn get_addr(&self) -> &str {
        self.addr.as_str()
    }

    fn call(&self, request: &Request) -> Result<Response> {
        let socket_addr = self
            .addr
            .parse::<SocketAddr>()
            .map_err(|e| ChainError::Network(format!("Invalid address {}: {e}", self.addr)))?;

        let stream = TcpStream::connect_timeout(&socket_addr, self.timeout)
            .map_err(|e| ChainError::Network(format!("Failed to connect to {}: {e}", self.addr)))?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(|e| ChainError::Network(format!("Failed to set write timeout: {e}")))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(|e| ChainError::Network(format!("Failed to set read timeout: {e}")))?;

        serde_json::to_writer(&stream, request)
            .map_err(|e| ChainError::Network(format!("Failed to send request: {e}")))?;
        (&stream)
            .flush()
            .map_err(|e| ChainError::Network(format!("Failed to flush request: {e}")))?;

        let mut reader = Deserializer::from_reader(BufReader::new(&stream));
        let response = Response::deserialize(&mut reader).map_err(|e| {
            ChainError::Network(format!("Failed to read response from {}: {e}", self.addr))
        })?;
        Ok(response)
    }

    /// Exchange Version records; returns the remote's Version
    pub fn handshake(&self, version: &Version) -> Result<Version> {
        match self.call(&Request::Handshake {
            version: version.clone(),
        })? {
            Response::Handshake { version } => Ok(version),
            Response::Error { message } => Err(ChainError::Network(message)),
            other => Err(ChainError::Network(format!(
                "Unexpected handshake response: {other:?}"
            ))),
        }
    }

    pub fn handle_transaction(&self, transaction: &Transaction) -> Result<()> {
        match self.call(&Request::HandleTransaction {
            transaction: transaction.clone(),
        })? {
            Response::Ack => Ok(()),
            Response::Error { message } => Err(ChainError::Network(message)),
            other => Err(ChainError::Network(format!(
                "Unexpected transaction response: {other:?}"
            ))),
        }
    }

    pub fn handle_block(&self, block: &Block) -> Result<()> {
        match self.call(&Request::HandleBlock {
            block: block.clone(),
        })? {
            Response::Ack => Ok(()),
            Response::Error { message } => Err(ChainError::Network(message)),
            other => Err(ChainError::Network(format!(
                "Unexpected block response: {other:?}"
            ))),
        }
    }
}
