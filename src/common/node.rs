//! Physical node identifiers and the virtual nodes placed on the ring for them.
use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::Deref;
use std::sync::Arc;

use crate::common::Position;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of a physical node.
///
/// Cheap to clone, every virtual node of the same physical node shares one allocation.
/// An empty string is a valid, if unusual, identifier.
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(id: &str) -> NodeId {
        NodeId(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of the `index`th virtual node of this node, `"{node}{separator}{index}"`.
    pub fn virtual_id(&self, separator: char, index: usize) -> String {
        format!("{}{}{}", self.0, separator, index)
    }
}

impl Deref for NodeId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(Arc::from(value))
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", &*self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One of the ring slots assigned to a physical node.
pub struct VirtualNode {
    pub position: Position,
    pub owner: NodeId,
}

impl VirtualNode {
    pub fn new(position: Position, owner: NodeId) -> VirtualNode {
        VirtualNode { position, owner }
    }
}
