//! Peer identifiers and the Kademlia key space
//!
//! A peer identifier is a self-describing multihash: one byte naming the
//! hash function, one byte for the digest length, then the digest itself.
//! A peer's position in XOR space is not the identifier but the SHA-256
//! digest of its encoded bytes.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;

/// Multihash code for SHA2-256
pub const MULTIHASH_SHA2_256: u8 = 0x12;

/// Digest length in bytes
pub const DIGEST_LEN: usize = 32;

/// Encoded peer identifier length: code byte + length byte + digest
pub const PEER_ID_LEN: usize = 2 + DIGEST_LEN;

/// A 32-byte Kademlia key
pub type KadId = [u8; 32];

/// A self-describing peer identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId([u8; PEER_ID_LEN]);

impl PeerId {
    /// Encode an identifier whose digest begins with `key`.
    ///
    /// `key` is written big-endian into the first 4 digest bytes; the
    /// remaining digest bytes are zero.
    pub fn from_digest_prefix(key: u32) -> Self {
        let mut bytes = [0u8; PEER_ID_LEN];
        bytes[0] = MULTIHASH_SHA2_256;
        bytes[1] = DIGEST_LEN as u8;
        bytes[2..6].copy_from_slice(&key.to_be_bytes());
        Self(bytes)
    }

    /// Decode an identifier, validating the multihash header
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PEER_ID_LEN {
            return Err(Error::InvalidPeerIdLength(bytes.len()));
        }
        if bytes[0] != MULTIHASH_SHA2_256 {
            return Err(Error::InvalidHashCode(bytes[0]));
        }
        if bytes[1] as usize != DIGEST_LEN {
            return Err(Error::InvalidDigestLength(bytes[1] as usize));
        }
        let mut buf = [0u8; PEER_ID_LEN];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The 32-byte digest portion of the identifier
    pub fn digest(&self) -> &[u8] {
        &self.0[2..]
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", hex::encode(self.0))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Derive a peer's Kademlia key: the SHA-256 digest of its encoded identifier
pub fn kad_id_for_peer(id: &PeerId) -> KadId {
    let digest = Sha256::digest(id.as_bytes());
    digest.into()
}

/// Helper to format a Kademlia key as hex string
pub fn kad_id_to_hex(id: &KadId) -> String {
    hex::encode(id)
}

/// Helper to parse a hex string into a Kademlia key
pub fn hex_to_kad_id(s: &str) -> Result<KadId> {
    let bytes = hex::decode(s)?;
    if bytes.len() != 32 {
        return Err(Error::InvalidKadIdLength(bytes.len()));
    }
    let mut id = [0u8; 32];
    id.copy_from_slice(&bytes);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_digest_prefix() {
        let id = PeerId::from_digest_prefix(0xDEADBEEF);
        assert_eq!(id.as_bytes().len(), PEER_ID_LEN);
        assert_eq!(id.as_bytes()[0], MULTIHASH_SHA2_256);
        assert_eq!(id.as_bytes()[1], DIGEST_LEN as u8);
        assert_eq!(&id.digest()[..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(id.digest()[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_round_trip() {
        let id = PeerId::from_digest_prefix(42);
        let decoded = PeerId::from_bytes(id.as_bytes()).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        let id = PeerId::from_digest_prefix(42);
        let mut bytes = id.as_bytes().to_vec();

        bytes[0] = 0x16;
        assert!(matches!(
            PeerId::from_bytes(&bytes),
            Err(Error::InvalidHashCode(0x16))
        ));

        bytes[0] = MULTIHASH_SHA2_256;
        bytes[1] = 20;
        assert!(matches!(
            PeerId::from_bytes(&bytes),
            Err(Error::InvalidDigestLength(20))
        ));

        assert!(matches!(
            PeerId::from_bytes(&bytes[..10]),
            Err(Error::InvalidPeerIdLength(10))
        ));
    }

    #[test]
    fn test_kad_id_is_stable() {
        let id = PeerId::from_digest_prefix(7);
        assert_eq!(kad_id_for_peer(&id), kad_id_for_peer(&id));

        let other = PeerId::from_digest_prefix(8);
        assert_ne!(kad_id_for_peer(&id), kad_id_for_peer(&other));
    }

    #[test]
    fn test_hex_round_trip() {
        let id = kad_id_for_peer(&PeerId::from_digest_prefix(1));
        let parsed = hex_to_kad_id(&kad_id_to_hex(&id)).unwrap();
        assert_eq!(parsed, id);

        assert!(hex_to_kad_id("abcd").is_err());
        assert!(hex_to_kad_id("not hex").is_err());
    }
}
