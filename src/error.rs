//! Main Crate Error

use crate::common::NodeId;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Consistent ring error enum.
pub enum Error {
    /// Lookup on a ring without any virtual nodes.
    #[error("Lookup on an empty ring")]
    EmptyRing,

    /// Every physical node needs at least one virtual node.
    #[error("Invalid replica count: {0}, expected at least 1")]
    InvalidReplicas(usize),

    /// A [crate::hash::Modulo] position function can not reduce modulo zero.
    #[error("Modulus must be greater than zero")]
    InvalidModulus,

    /// Removal requested with a different replica count than the one
    /// the node was added with.
    #[error("Replica mismatch for node {node}: added with {expected}, removal requested {requested}")]
    ReplicaMismatch {
        node: NodeId,
        expected: usize,
        requested: usize,
    },
}

/// Alias for `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
