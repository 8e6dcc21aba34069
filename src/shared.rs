//! Thread safe handle to a [HashRing].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::NodeId;
use crate::hash::{PositionFunction, Sha256};
use crate::ring::{HashRing, RangeReport};
use crate::Result;

/// Clonable handle to a [HashRing] shared between threads.
///
/// Adding and removing nodes takes the write lock, so there is a single writer
/// at a time. Lookups and range reports share the read lock, and never observe
/// a node half way through being added or removed.
#[derive(Debug)]
pub struct SharedRing<P = Sha256>(Arc<RwLock<HashRing<P>>>);

impl<P> Clone for SharedRing<P> {
    fn clone(&self) -> Self {
        SharedRing(self.0.clone())
    }
}

impl<P: PositionFunction> From<HashRing<P>> for SharedRing<P> {
    fn from(ring: HashRing<P>) -> Self {
        SharedRing::new(ring)
    }
}

impl<P: PositionFunction> SharedRing<P> {
    pub fn new(ring: HashRing<P>) -> Self {
        SharedRing(Arc::new(RwLock::new(ring)))
    }

    // === Public Methods ===

    /// See [HashRing::add_node].
    pub fn add_node(&self, node: &str) -> bool {
        self.write().add_node(node)
    }

    /// See [HashRing::add_node_with_replicas].
    pub fn add_node_with_replicas(&self, node: &str, replicas: usize) -> Result<bool> {
        self.write().add_node_with_replicas(node, replicas)
    }

    /// See [HashRing::remove_node].
    pub fn remove_node(&self, node: &str) -> bool {
        self.write().remove_node(node)
    }

    /// See [HashRing::remove_node_with_replicas].
    pub fn remove_node_with_replicas(&self, node: &str, replicas: usize) -> Result<bool> {
        self.write().remove_node_with_replicas(node, replicas)
    }

    /// See [HashRing::lookup].
    pub fn lookup<K: AsRef<[u8]>>(&self, key: K) -> Result<NodeId> {
        self.read().lookup(key).cloned()
    }

    /// See [HashRing::range_report].
    pub fn range_report(&self) -> RangeReport {
        self.read().range_report()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.read().contains(node)
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Run `f` with shared access to the ring, for several reads against the same state.
    pub fn with_ring<T>(&self, f: impl FnOnce(&HashRing<P>) -> T) -> T {
        f(&*self.read())
    }

    // === Private Methods ===

    // Every mutation keeps the ring sorted before it can panic, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashRing<P>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashRing<P>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}
