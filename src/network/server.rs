use crate::core::{Block, Transaction};
use crate::error::{ChainError, Result};
use crate::network::Node;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Deserializer;
use std::io::{BufReader, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const CONNECTION_READ_TIMEOUT: u64 = 60;

/// What a node tells a peer about itself during a handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    pub height: u32,
    pub listen_addr: String,
    pub peer_list: Vec<String>,
}

/// RPC requests between nodes
#[derive(Debug, Serialize, Deserialize)]
pub enum Request {
    Handshake { version: Version },
    HandleTransaction { transaction: Transaction },
    HandleBlock { block: Block },
}

/// RPC responses
#[derive(Debug, Serialize, Deserialize)]
pub enum Response {
    Handshake { version: Version },
    Ack,
    Error { message: String },
}

/// Accept loop: one handler thread per inbound connection
pub fn serve(node: Arc<Node>, listener: TcpListener) -> Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let node = Arc::clone(&node);
                thread::spawn(move || {
                    if let Err(e) = handle_connection(node, stream) {
                        error!("Error handling connection: {e}");
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {e}");
            }
        }
    }
    Ok(())
}

/// Serve one connection: a stream of requests, each answered in order
fn handle_connection(node: Arc<Node>, stream: TcpStream) -> Result<()> {
    let peer_addr = stream
        .peer_addr()
        .map_err(|e| ChainError::Network(format!("Failed to get peer address: {e}")))?;

    stream
        .set_read_timeout(Some(Duration::from_secs(CONNECTION_READ_TIMEOUT)))
        .map_err(|e| ChainError::Network(format!("Failed to set read timeout: {e}")))?;

    let reader = BufReader::new(&stream);
    let requests = Deserializer::from_reader(reader).into_iter::<Request>();

    for request in requests {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                debug!("Closing connection from {peer_addr}: {e}");
                break;
            }
        };

        let response = dispatch(&node, request);
        serde_json::to_writer(&stream, &response)
            .map_err(|e| ChainError::Network(format!("Failed to send response: {e}")))?;
        (&stream)
            .flush()
            .map_err(|e| ChainError::Network(format!("Failed to flush response: {e}")))?;
    }

    let _ = stream.shutdown(Shutdown::Both);
    Ok(())
}

fn dispatch(node: &Arc<Node>, request: Request) -> Response {
    match request {
        Request::Handshake { version } => {
            let local = Arc::clone(node).handshake(version);
            Response::Handshake { version: local }
        }
        Request::HandleTransaction { transaction } => {
            Arc::clone(node).handle_transaction(transaction);
            Response::Ack
        }
        Request::HandleBlock { block } => match node.handle_block(block) {
            Ok(()) => Response::Ack,
            Err(e) => {
                warn!("Rejected block: {e}");
                Response::Error {
                    message: e.to_string(),
                }
            }
        },
    }
}
