use crate::network::{NodeClient, Version};
use std::collections::HashMap;
use std::sync::RwLock;

/// A live peer: the client handle back to it and the Version it advertised
#[derive(Debug, Clone)]
pub struct PeerEntry {
    pub client: NodeClient,
    pub version: Version,
}

/// Peer registry keyed by the remote listen address.
///
/// Clients dial per call, so the listen address is the connection
/// identity; keying on it keeps each peer in the table exactly once.
pub struct PeerTable {
    inner: RwLock<HashMap<String, PeerEntry>>,
}

impl Default for PeerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerTable {
    pub fn new() -> PeerTable {
        PeerTable {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a peer, returning true iff it was not already present
    pub fn add_peer(&self, client: NodeClient, version: Version) -> bool {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on peer table - this should never happen");
        let addr = version.listen_addr.clone();
        if inner.contains_key(&addr) {
            return false;
        }
        inner.insert(addr, PeerEntry { client, version });
        true
    }

    pub fn remove_peer(&self, addr: &str) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on peer table - this should never happen");
        inner.remove(addr);
    }

    pub fn contains(&self, addr: &str) -> bool {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on peer table - this should never happen");
        inner.contains_key(addr)
    }

    /// Listen addresses of every known peer
    pub fn peer_list(&self) -> Vec<String> {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on peer table - this should never happen");
        inner.keys().cloned().collect()
    }

    /// Snapshot of the peer clients, for broadcast fanout outside the lock
    pub fn clients(&self) -> Vec<NodeClient> {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on peer table - this should never happen");
        inner.values().map(|entry| entry.client.clone()).collect()
    }

    pub fn len(&self) -> usize {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on peer table - this should never happen");
        inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
