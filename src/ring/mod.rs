//! Consistent hashing ring with virtual nodes.

mod config;
mod report;

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use tracing::{debug, trace, warn};

use crate::common::{NodeId, Position, VirtualNode};
use crate::hash::{PositionFunction, Sha256};
use crate::{Error, Result};

pub use config::{Config, DEFAULT_REPLICAS, DEFAULT_SEPARATOR};
pub use report::{RangeReport, VirtualRange};

/// Consistent hashing ring.
///
/// Every physical node is placed on the ring as a number of virtual nodes, at
/// the positions of `"{node}{separator}{index}"`. A key belongs to the first
/// virtual node at or after the key's own position, wrapping around to the
/// lowest position past the end of the ring.
///
/// Adding or removing a node only moves the keys in the neighborhood of that
/// node's virtual nodes, every other key keeps its owner.
///
/// The replica count each node was added with is recorded, so removal never
/// depends on the caller remembering it.
///
/// If two virtual nodes land on the same position, the last one added owns it.
/// The earlier owners are kept underneath, and take the position back once
/// the later ones are removed.
#[derive(Clone)]
pub struct HashRing<P = Sha256> {
    /// Owners of each position in insertion order, the last one owns it.
    /// Never empty.
    virtual_nodes: BTreeMap<Position, Vec<NodeId>>,
    /// Physical nodes and the number of virtual nodes they were added with.
    members: BTreeMap<NodeId, usize>,
    config: Config,
    position_fn: P,
}

impl HashRing {
    /// Create an empty ring with `replicas` virtual nodes per physical node,
    /// positioned by [Sha256].
    ///
    /// Returns [Error::InvalidReplicas] if `replicas` is zero.
    pub fn new(replicas: usize) -> Result<Self> {
        Self::builder().replicas(replicas).build()
    }

    /// Create an empty ring from a [Config], positioned by [Sha256].
    pub fn with_config(config: Config) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Returns a builder to configure the replica count, separator and position function.
    pub fn builder() -> RingBuilder {
        RingBuilder::default()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        HashRing {
            virtual_nodes: BTreeMap::new(),
            members: BTreeMap::new(),
            config: Config::default(),
            position_fn: Sha256,
        }
    }
}

impl<P: PositionFunction> HashRing<P> {
    // === Getters ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Default number of virtual nodes per physical node.
    pub fn default_replicas(&self) -> usize {
        self.config.replicas
    }

    pub fn position_fn(&self) -> &P {
        &self.position_fn
    }

    /// Size of the key space, `2^32` unless the position function is reduced.
    pub fn keyspace(&self) -> u64 {
        self.position_fn.keyspace()
    }

    /// Number of occupied positions on the ring.
    pub fn len(&self) -> usize {
        self.virtual_nodes.len()
    }

    /// Returns `true` if the ring has no virtual nodes.
    pub fn is_empty(&self) -> bool {
        self.virtual_nodes.is_empty()
    }

    /// Returns `true` if `node` was added and not removed since.
    pub fn contains(&self, node: &str) -> bool {
        self.members.contains_key(node)
    }

    /// Number of virtual nodes `node` was added with.
    pub fn replicas(&self, node: &str) -> Option<usize> {
        self.members.get(node).copied()
    }

    /// Physical nodes and their replica counts, sorted by identifier.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, usize)> + '_ {
        self.members.iter().map(|(node, replicas)| (node, *replicas))
    }

    /// Virtual nodes in ring order, one per position with its current owner.
    pub fn virtual_nodes(&self) -> impl Iterator<Item = VirtualNode> + '_ {
        self.owners()
            .map(|(position, owner)| VirtualNode::new(*position, owner.clone()))
    }

    /// Number of virtual nodes placed for `node`, including those shadowed by
    /// a later node at the same position.
    pub fn placed(&self, node: &str) -> usize {
        self.virtual_nodes
            .values()
            .flatten()
            .filter(|owner| owner.as_str() == node)
            .count()
    }

    /// Number of positions `node` currently owns.
    pub fn owned(&self, node: &str) -> usize {
        self.owners()
            .filter(|(_, owner)| owner.as_str() == node)
            .count()
    }

    /// All owners stacked at `position`, earliest first. Only the last one owns it.
    pub fn owners_at(&self, position: Position) -> &[NodeId] {
        self.virtual_nodes
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // === Public Methods ===

    /// Add a node with the configured number of virtual nodes.
    ///
    /// Returns `false` if the node is already on the ring with the same replica count.
    pub fn add_node(&mut self, node: &str) -> bool {
        self.add(node, self.config.replicas)
    }

    /// Add a node with `replicas` virtual nodes, overriding the configured count.
    ///
    /// Re-adding a node with a different count re-weights it: its previous
    /// virtual nodes are removed first.
    ///
    /// Returns [Error::InvalidReplicas] if `replicas` is zero.
    pub fn add_node_with_replicas(&mut self, node: &str, replicas: usize) -> Result<bool> {
        if replicas == 0 {
            return Err(Error::InvalidReplicas(replicas));
        }

        Ok(self.add(node, replicas))
    }

    /// Remove a node and all of its virtual nodes.
    ///
    /// Returns `false` if the node is not on the ring.
    pub fn remove_node(&mut self, node: &str) -> bool {
        match self.members.remove_entry(node) {
            Some((node, replicas)) => {
                self.remove_virtual_nodes(&node, replicas);

                debug!(%node, replicas, ring_size = self.len(), "Removed node");

                true
            }
            None => {
                debug!(node, "Tried to remove unknown node");

                false
            }
        }
    }

    /// Remove a node, checking that `replicas` matches the count it was added with.
    ///
    /// Returns [Error::ReplicaMismatch] without touching the ring if it does not,
    /// and `Ok(false)` if the node is not on the ring.
    pub fn remove_node_with_replicas(&mut self, node: &str, replicas: usize) -> Result<bool> {
        if let Some(expected) = self.replicas(node) {
            if expected != replicas {
                debug!(node, expected, requested = replicas, "Rejected removal");

                return Err(Error::ReplicaMismatch {
                    node: node.into(),
                    expected,
                    requested: replicas,
                });
            }
        }

        Ok(self.remove_node(node))
    }

    /// Returns the node responsible for `key`.
    ///
    /// Returns [Error::EmptyRing] if there are no nodes on the ring.
    pub fn lookup<K: AsRef<[u8]>>(&self, key: K) -> Result<&NodeId> {
        let position = self.position_fn.position(key.as_ref());

        self.lookup_position(position)
    }

    /// Returns the owner of the first virtual node at or after `position`,
    /// wrapping around to the first virtual node of the ring.
    ///
    /// Returns [Error::EmptyRing] if there are no nodes on the ring.
    pub fn lookup_position(&self, position: Position) -> Result<&NodeId> {
        let owner = self
            .virtual_nodes
            .range(position..)
            .chain(self.virtual_nodes.iter())
            .find_map(|(_, owners)| owners.last())
            .ok_or(Error::EmptyRing)?;

        trace!(?position, %owner, "Lookup");

        Ok(owner)
    }

    /// Report the range of positions attributed to each virtual node, and the
    /// total width covered by each physical node.
    pub fn range_report(&self) -> RangeReport {
        RangeReport::new(self.owners(), self.keyspace())
    }

    // === Private Methods ===

    fn add(&mut self, node: &str, replicas: usize) -> bool {
        let existing = self
            .members
            .get_key_value(node)
            .map(|(node, replicas)| (node.clone(), *replicas));

        let node = match existing {
            Some((_, existing)) if existing == replicas => {
                return false;
            }
            Some((node, existing)) => {
                self.remove_virtual_nodes(&node, existing);

                node
            }
            None => NodeId::from(node),
        };

        for index in 0..replicas {
            let position = self.virtual_position(&node, index);

            let owners = self.virtual_nodes.entry(position).or_default();

            if let Some(previous) = owners.last() {
                if *previous != node {
                    warn!(?position, %previous, %node, "Virtual node collision, last write wins");
                }
            }

            owners.push(node.clone());
        }

        debug!(%node, replicas, ring_size = self.len(), "Added node");

        self.members.insert(node, replicas);

        true
    }

    /// Remove one entry of `node` per virtual node, dropping positions left without owners.
    fn remove_virtual_nodes(&mut self, node: &NodeId, replicas: usize) {
        for index in 0..replicas {
            let position = self.virtual_position(node, index);

            if let Some(owners) = self.virtual_nodes.get_mut(&position) {
                if let Some(i) = owners.iter().rposition(|owner| owner == node) {
                    owners.remove(i);
                }

                if owners.is_empty() {
                    self.virtual_nodes.remove(&position);
                }
            }
        }
    }

    fn owners(&self) -> impl Iterator<Item = (&Position, &NodeId)> + '_ {
        self.virtual_nodes
            .iter()
            .filter_map(|(position, owners)| owners.last().map(|owner| (position, owner)))
    }

    fn virtual_position(&self, node: &NodeId, index: usize) -> Position {
        let id = node.virtual_id(self.config.separator, index);

        self.position_fn.position(id.as_bytes())
    }
}

impl<P> Debug for HashRing<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("config", &self.config)
            .field("members", &self.members)
            .field("virtual_nodes", &self.virtual_nodes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
/// Builder for [HashRing].
pub struct RingBuilder<P = Sha256> {
    config: Config,
    position_fn: P,
}

impl<P: PositionFunction> RingBuilder<P> {
    /// Set the number of virtual nodes per physical node.
    ///
    /// Defaults to [DEFAULT_REPLICAS]
    pub fn replicas(mut self, replicas: usize) -> Self {
        self.config.replicas = replicas;
        self
    }

    /// Set the separator used to derive virtual node identifiers.
    ///
    /// Defaults to [DEFAULT_SEPARATOR]
    pub fn separator(mut self, separator: char) -> Self {
        self.config.separator = separator;
        self
    }

    /// Replace the whole [Config].
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the position function used for both keys and virtual nodes.
    ///
    /// Defaults to [Sha256]
    pub fn position_fn<Q: PositionFunction>(self, position_fn: Q) -> RingBuilder<Q> {
        RingBuilder {
            config: self.config,
            position_fn,
        }
    }

    /// Create an empty [HashRing].
    ///
    /// Returns [Error::InvalidReplicas] if the replica count is zero.
    pub fn build(self) -> Result<HashRing<P>> {
        self.config.validate()?;

        Ok(HashRing {
            virtual_nodes: BTreeMap::new(),
            members: BTreeMap::new(),
            config: self.config,
            position_fn: self.position_fn,
        })
    }
}
