//! Position of a key or a virtual node on the ring
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};

/// The size of positions in bytes.
pub const POSITION_SIZE: usize = 4;
/// Number of distinct positions on a full resolution ring, `2^32`.
pub const KEYSPACE: u64 = 1 << 32;

#[derive(Clone, Copy, PartialEq, Ord, PartialOrd, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// Location on the ring, produced by a [crate::hash::PositionFunction].
pub struct Position(pub u32);

impl Position {
    pub const MIN: Position = Position(u32::MIN);
    pub const MAX: Position = Position(u32::MAX);

    /// Truncate a digest to its first [POSITION_SIZE] bytes, read as a big-endian integer.
    ///
    /// Digests shorter than [POSITION_SIZE] are left-padded with zeros.
    pub fn from_digest<T: AsRef<[u8]>>(digest: T) -> Position {
        let digest = digest.as_ref();
        let len = digest.len().min(POSITION_SIZE);

        let mut tmp = [0; POSITION_SIZE];
        tmp[POSITION_SIZE - len..].copy_from_slice(&digest[..len]);

        Position(u32::from_be_bytes(tmp))
    }

    /// Clockwise distance from this position to `other` on a ring of `keyspace` positions.
    ///
    /// Distance to self is 0, and `a.distance(b) + b.distance(a) == keyspace` otherwise.
    pub fn distance(&self, other: &Position, keyspace: u64) -> u64 {
        let from = self.0 as u64;
        let to = other.0 as u64;

        if to >= from {
            to - from
        } else {
            keyspace - from + to
        }
    }

    pub fn to_be_bytes(&self) -> [u8; POSITION_SIZE] {
        self.0.to_be_bytes()
    }
}

impl From<u32> for Position {
    fn from(value: u32) -> Self {
        Position(value)
    }
}

impl From<Position> for u32 {
    fn from(value: Position) -> Self {
        value.0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.0)
    }
}
