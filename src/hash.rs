//! Position functions, mapping arbitrary bytes to a [Position] on the ring.
//!
//! Any deterministic and roughly uniform function will do, the ring never
//! depends on a particular digest. Closures `Fn(&[u8]) -> u32` are accepted
//! as well, which is handy for deterministic test rings.

use std::fmt::{self, Debug, Formatter};
use std::num::NonZeroU32;

use crc::{Crc, CRC_32_ISCSI};
use sha2::Digest;

use crate::common::{Position, KEYSPACE};
use crate::{Error, Result};

const CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// Deterministic mapping from bytes to a [Position].
///
/// Implementations must return the same position for the same input,
/// regardless of call order or ring state.
pub trait PositionFunction: Send + Sync {
    fn position(&self, data: &[u8]) -> Position;

    /// Number of distinct positions this function can return.
    ///
    /// Defaults to [KEYSPACE], the full `u32` range.
    fn keyspace(&self) -> u64 {
        KEYSPACE
    }
}

impl<F> PositionFunction for F
where
    F: Fn(&[u8]) -> u32 + Send + Sync,
{
    fn position(&self, data: &[u8]) -> Position {
        Position(self(data))
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// First 4 bytes of the SHA-256 digest. The default position function.
pub struct Sha256;

impl PositionFunction for Sha256 {
    fn position(&self, data: &[u8]) -> Position {
        Position::from_digest(sha2::Sha256::digest(data))
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// First 4 bytes of the SHA-1 digest.
pub struct Sha1;

impl PositionFunction for Sha1 {
    fn position(&self, data: &[u8]) -> Position {
        Position::from_digest(sha1_smol::Sha1::from(data).digest().bytes())
    }
}

#[cfg(feature = "md5")]
#[derive(Debug, Clone, Copy, Default)]
/// First 4 bytes of the MD5 digest.
pub struct Md5;

#[cfg(feature = "md5")]
impl PositionFunction for Md5 {
    fn position(&self, data: &[u8]) -> Position {
        Position::from_digest(md5::compute(data).0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// CRC-32 (Castagnoli) checksum. Fast, but not as uniform as the digests
/// on short, similar inputs.
pub struct Crc32;

impl PositionFunction for Crc32 {
    fn position(&self, data: &[u8]) -> Position {
        Position(CASTAGNOLI.checksum(data))
    }
}

#[derive(Clone, Copy)]
/// Low resolution ring, reducing another position function modulo a small range.
///
/// Collisions become likely with a small modulus, so this is a distinct
/// configuration meant for demonstrations and tests, where positions are
/// easy to read. The ring's keyspace shrinks to the modulus.
pub struct Modulo<P> {
    inner: P,
    modulus: NonZeroU32,
}

impl<P: PositionFunction> Modulo<P> {
    /// Returns [Error::InvalidModulus] if `modulus` is zero.
    pub fn new(inner: P, modulus: u32) -> Result<Self> {
        let modulus = NonZeroU32::new(modulus).ok_or(Error::InvalidModulus)?;

        Ok(Modulo { inner, modulus })
    }

    pub fn modulus(&self) -> u32 {
        self.modulus.get()
    }
}

impl<P: PositionFunction> PositionFunction for Modulo<P> {
    fn position(&self, data: &[u8]) -> Position {
        Position(self.inner.position(data).0 % self.modulus.get())
    }

    fn keyspace(&self) -> u64 {
        (self.modulus.get() as u64).min(self.inner.keyspace())
    }
}

impl<P: Debug> Debug for Modulo<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Modulo({:?} % {})", self.inner, self.modulus)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sha256_truncates_digest() {
        // e3b0c442 98fc1c14 ...
        assert_eq!(Sha256.position(b""), Position(0xe3b0_c442));
    }

    #[test]
    fn sha1_truncates_digest() {
        // da39a3ee 5e6b4b0d ...
        assert_eq!(Sha1.position(b""), Position(0xda39_a3ee));
    }

    #[cfg(feature = "md5")]
    #[test]
    fn md5_truncates_digest() {
        // d41d8cd9 8f00b204 ...
        assert_eq!(Md5.position(b""), Position(0xd41d_8cd9));
    }

    #[test]
    fn crc32_checksum() {
        assert_eq!(Crc32.position(b"123456789"), Position(0xe306_9283));
    }

    #[test]
    fn deterministic() {
        for key in ["K1", "K2", "S1#0", ""] {
            assert_eq!(Sha256.position(key.as_bytes()), Sha256.position(key.as_bytes()));
            assert_eq!(Crc32.position(key.as_bytes()), Crc32.position(key.as_bytes()));
        }
    }

    #[test]
    fn modulo_reduces_positions() {
        let modulo = Modulo::new(Sha256, 1000).unwrap();

        assert_eq!(modulo.keyspace(), 1000);
        assert_eq!(modulo.modulus(), 1000);

        for i in 0..100 {
            let key = format!("K{i}");
            let position = modulo.position(key.as_bytes());

            assert!(position.0 < 1000);
            assert_eq!(position.0, Sha256.position(key.as_bytes()).0 % 1000);
        }
    }

    #[test]
    fn modulo_zero_is_rejected() {
        assert!(matches!(Modulo::new(Sha256, 0), Err(Error::InvalidModulus)));
    }

    #[test]
    fn closures_are_position_functions() {
        let first_byte = |data: &[u8]| data.first().copied().unwrap_or(0) as u32;

        assert_eq!(first_byte.position(b"a"), Position(97));
        assert_eq!(first_byte.keyspace(), KEYSPACE);
    }
}
