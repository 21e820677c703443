//! Ordered peer table keyed by [`NodeAddress`].
//!
//! The table keeps peers sorted by address so iteration order is stable and
//! identical on every node. All methods take `&self`; interior locking uses
//! `parking_lot::RwLock`, so the table can be shared behind an `Arc`.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::node::NodeAddress;

/// Thread-safe map from node address to per-peer state.
#[derive(Debug)]
pub struct PeerTable<V> {
    peers: RwLock<BTreeMap<NodeAddress, V>>,
}

impl<V> Default for PeerTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PeerTable<V> {
    pub fn new() -> Self {
        Self {
            peers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Add or replace a peer, returning the previous value.
    ///
    /// The virtual node names no peer and is rejected.
    pub fn insert(&self, addr: NodeAddress, value: V) -> Result<Option<V>> {
        if addr.is_virtual() {
            warn!("refusing to register the virtual node as a peer");
            return Err(Error::invalid("virtual node cannot be a peer"));
        }
        let previous = self.peers.write().insert(addr, value);
        debug!(peer = %addr, replaced = previous.is_some(), "peer registered");
        Ok(previous)
    }

    pub fn remove(&self, addr: &NodeAddress) -> Option<V> {
        let removed = self.peers.write().remove(addr);
        if removed.is_some() {
            debug!(peer = %addr, "peer removed");
        }
        removed
    }

    pub fn contains(&self, addr: &NodeAddress) -> bool {
        self.peers.read().contains_key(addr)
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    /// All peer addresses in ascending order.
    pub fn addresses(&self) -> Vec<NodeAddress> {
        self.peers.read().keys().copied().collect()
    }

    /// Peers that are not on this host, in ascending order.
    pub fn remote_peers(&self) -> Vec<NodeAddress> {
        self.peers
            .read()
            .keys()
            .filter(|addr| !addr.is_local())
            .copied()
            .collect()
    }
}

impl<V: Clone> PeerTable<V> {
    pub fn get(&self, addr: &NodeAddress) -> Option<V> {
        self.peers.read().get(addr).cloned()
    }

    /// Lowest-ordered peer.
    pub fn first(&self) -> Option<(NodeAddress, V)> {
        self.peers
            .read()
            .iter()
            .next()
            .map(|(addr, v)| (*addr, v.clone()))
    }

    /// Highest-ordered peer.
    pub fn last(&self) -> Option<(NodeAddress, V)> {
        self.peers
            .read()
            .iter()
            .next_back()
            .map(|(addr, v)| (*addr, v.clone()))
    }
}
