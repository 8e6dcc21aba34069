#![doc = include_str!("../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
//!

mod common;
mod error;
pub mod hash;
mod ring;
mod shared;

pub use crate::common::{NodeId, Position, VirtualNode, KEYSPACE, POSITION_SIZE};
pub use crate::error::{Error, Result};
pub use crate::hash::PositionFunction;
pub use crate::ring::{
    Config, HashRing, RangeReport, RingBuilder, VirtualRange, DEFAULT_REPLICAS, DEFAULT_SEPARATOR,
};
pub use crate::shared::SharedRing;
