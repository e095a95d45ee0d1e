//! Burrow DHT - Kademlia bucket-refresh target generation
//!
//! When a bucket in a Kademlia routing table runs dry, the table needs a
//! lookup target that would land in exactly that bucket. Identifiers are
//! content hashes, so such a target cannot be computed directly; instead a
//! precomputed prefix catalogue maps every 16-bit key prefix to a known
//! hash preimage, and the generator combines the local key's prefix with
//! caller-supplied random bits to pick the entry at the requested common
//! prefix length.

pub mod catalogue;
pub mod generator;
pub mod refresh;

use thiserror::Error;

/// Longest common prefix length a generated identifier can target.
///
/// The catalogue covers 16-bit prefixes, and the bit after the shared run
/// must disagree, so targets beyond 15 cannot be represented.
pub const MAX_REFRESH_CPL: u16 = 15;

#[derive(Error, Debug)]
pub enum DhtError {
    #[error("cannot generate peer ID for common prefix length greater than {}", MAX_REFRESH_CPL)]
    InvalidCpl(u16),

    #[error("catalogue holds {actual} keys, expected {expected}")]
    CatalogueSize { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalogue document error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DhtError>;

/// Draw 16 random seed bits from the OS
pub fn random_seed() -> u16 {
    let mut buf = [0u8; 2];
    getrandom::getrandom(&mut buf).expect("Failed to generate random bytes");
    u16::from_le_bytes(buf)
}
