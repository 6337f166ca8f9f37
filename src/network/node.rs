// The node ties the pieces together: it owns the mempool and the peer
// table, guards the chain behind a single-writer lock, and runs the
// accept loop, bootstrap passes, broadcast fanouts, and the validator
// tick as separate threads over that shared state.

use crate::config::{NodeConfig, BLOCK_VERSION};
use crate::core::{Block, Chain, Header, Transaction};
use crate::error::{ChainError, Result};
use crate::network::{server, NodeClient, PeerTable, Version};
use crate::storage::{MemoryBlockStore, MemoryTxStore, Mempool};
use crate::utils::current_timestamp;
use log::{debug, error, info, warn};
use std::net::TcpListener;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

/// Interval between validator ticks; each tick seals a block
pub const BLOCK_TIME: Duration = Duration::from_secs(5);

pub struct Node {
    config: NodeConfig,
    chain: RwLock<Chain>,
    mempool: Mempool,
    peers: PeerTable,
}

impl Node {
    pub fn new(config: NodeConfig) -> Result<Node> {
        let chain = Chain::new(
            Box::new(MemoryBlockStore::new()),
            Box::new(MemoryTxStore::new()),
        )?;
        Ok(Node {
            config,
            chain: RwLock::new(chain),
            mempool: Mempool::new(),
            peers: PeerTable::new(),
        })
    }

    /// Bind the listener, spawn the bootstrap pass and the validator
    /// loop, then serve inbound connections until the process exits
    pub fn start(self: Arc<Self>, bootstrap_addrs: &[String]) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            ChainError::Network(format!("Failed to bind to {}: {e}", self.config.listen_addr))
        })?;
        info!("node started on {}", self.config.listen_addr);

        if !bootstrap_addrs.is_empty() {
            let node = Arc::clone(&self);
            let addrs = bootstrap_addrs.to_vec();
            thread::spawn(move || node.bootstrap(&addrs));
        }

        if self.config.private_key.is_some() {
            let node = Arc::clone(&self);
            thread::spawn(move || node.validator_loop());
        }

        server::serve(self, listener)
    }

    /// Handshake RPC: install the caller as a peer and reply with our
    /// Version. The reply is computed after the insert, so the caller
    /// appears in the peer list it hands out from now on.
    pub fn handshake(self: Arc<Self>, remote: Version) -> Version {
        if remote.version != self.config.version {
            debug!(
                "peer {} speaks {}, we speak {}",
                remote.listen_addr, remote.version, self.config.version
            );
        }
        let client = NodeClient::new(remote.listen_addr.clone(), self.config.rpc_timeout);
        Arc::clone(&self).add_peer(client, remote);
        self.version()
    }

    /// HandleTransaction RPC: mempool insert, then asynchronous fanout to
    /// every peer when the transaction is new. Returns immediately.
    pub fn handle_transaction(self: Arc<Self>, transaction: Transaction) {
        let hash = transaction.hash_hex();
        if self.mempool.add(transaction.clone()) {
            debug!("received transaction {hash} on {}", self.config.listen_addr);
            thread::spawn(move || self.broadcast_transaction(&transaction));
        }
    }

    /// HandleBlock RPC: validate and append, then evict the block's
    /// transactions from the mempool
    pub fn handle_block(&self, block: Block) -> Result<()> {
        {
            let mut chain = self
                .chain
                .write()
                .map_err(|_| ChainError::Store("chain lock poisoned".to_string()))?;
            chain.add_block(&block)?;
        }
        for tx in block.get_transactions() {
            self.mempool.remove(&tx.hash_hex());
        }
        info!(
            "accepted block {} at height {} on {}",
            block.hash_hex(),
            block.get_header().get_height(),
            self.config.listen_addr
        );
        Ok(())
    }

    // A failing peer is skipped, never the rest of the fanout
    fn broadcast_transaction(&self, transaction: &Transaction) {
        for client in self.peers.clients() {
            if let Err(e) = client.handle_transaction(transaction) {
                warn!(
                    "Failed to broadcast transaction to {}: {e}",
                    client.get_addr()
                );
            }
        }
    }

    fn broadcast_block(&self, block: &Block) {
        for client in self.peers.clients() {
            if let Err(e) = client.handle_block(block) {
                warn!("Failed to broadcast block to {}: {e}", client.get_addr());
            }
        }
    }

    fn validator_loop(self: Arc<Self>) {
        let public = self
            .config
            .private_key
            .as_ref()
            .map(|key| key.public().to_string())
            .unwrap_or_default();
        info!(
            "starting validator loop on {} with key {public}",
            self.config.listen_addr
        );
        loop {
            thread::sleep(BLOCK_TIME);
            if let Err(e) = self.produce_block() {
                error!("Failed to produce block: {e}");
            }
        }
    }

    /// One validator tick: drain the mempool, keep the transactions that
    /// still validate, seal them into a signed block, append it locally,
    /// and broadcast it
    fn produce_block(&self) -> Result<()> {
        let key = self
            .config
            .private_key
            .as_ref()
            .ok_or_else(|| ChainError::Config("validator tick without a private key".to_string()))?;

        let drained = self.mempool.clear();
        let mut chain = self
            .chain
            .write()
            .map_err(|_| ChainError::Store("chain lock poisoned".to_string()))?;

        let mut transactions = Vec::new();
        for tx in drained {
            match chain.validate_transaction(&tx) {
                Ok(()) => transactions.push(tx),
                Err(e) => warn!("dropping transaction {}: {e}", tx.hash_hex()),
            }
        }

        let tip = chain.get_block_by_height(chain.height())?;
        let header = Header::new(
            BLOCK_VERSION,
            (chain.height() + 1) as u32,
            tip.hash(),
            current_timestamp()?,
        );
        let mut block = Block::new(header, transactions);
        block.sign(key)?;
        chain.add_block(&block)?;
        drop(chain);

        debug!(
            "sealed block {} with {} transactions on {}",
            block.hash_hex(),
            block.get_transactions().len(),
            self.config.listen_addr
        );
        self.broadcast_block(&block);
        Ok(())
    }

    /// Dial each candidate address, handshake, and install the peer.
    /// A failure only skips that address.
    fn bootstrap(self: Arc<Self>, addrs: &[String]) {
        for addr in addrs {
            if !self.can_connect_with(addr) {
                continue;
            }
            debug!(
                "dialing remote node {addr} from {}",
                self.config.listen_addr
            );
            match self.dial_remote_node(addr) {
                Ok((client, version)) => Arc::clone(&self).add_peer(client, version),
                Err(e) => {
                    warn!("Failed to bootstrap from {addr}: {e}");
                    continue;
                }
            }
        }
    }

    fn dial_remote_node(&self, addr: &str) -> Result<(NodeClient, Version)> {
        let client = NodeClient::new(addr.to_string(), self.config.rpc_timeout);
        let version = client.handshake(&self.version())?;
        Ok((client, version))
    }

    /// Install a peer and, when it advertised further peers we have not
    /// seen, launch a transitive bootstrap pass over them. The pass only
    /// runs for fresh inserts, which bounds the discovery recursion.
    fn add_peer(self: Arc<Self>, client: NodeClient, version: Version) {
        let addr = version.listen_addr.clone();
        let advertised = version.peer_list.clone();
        if !self.peers.add_peer(client, version) {
            return;
        }
        info!("peer {addr} added on {}", self.config.listen_addr);

        if !advertised.is_empty() {
            thread::spawn(move || self.bootstrap(&advertised));
        }
    }

    fn can_connect_with(&self, addr: &str) -> bool {
        if addr == self.config.listen_addr {
            return false;
        }
        !self.peers.contains(addr)
    }

    /// Our current Version record, including the peer list for
    /// transitive discovery
    pub fn version(&self) -> Version {
        Version {
            version: self.config.version.clone(),
            height: self.height() as u32,
            listen_addr: self.config.listen_addr.clone(),
            peer_list: self.peers.peer_list(),
        }
    }

    pub fn height(&self) -> usize {
        self.chain
            .read()
            .expect("Failed to acquire read lock on chain - this should never happen")
            .height()
    }

    pub fn peer_list(&self) -> Vec<String> {
        self.peers.peer_list()
    }

    pub fn mempool(&self) -> &Mempool {
        &self.mempool
    }

    pub fn listen_addr(&self) -> &str {
        self.config.listen_addr.as_str()
    }
}
