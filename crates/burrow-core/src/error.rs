//! Error types for Burrow core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid multihash code: expected 0x12, got {0:#04x}")]
    InvalidHashCode(u8),

    #[error("invalid digest length: expected 32, got {0}")]
    InvalidDigestLength(usize),

    #[error("invalid peer ID length: expected 34 bytes, got {0}")]
    InvalidPeerIdLength(usize),

    #[error("invalid Kademlia key length: expected 32 bytes, got {0}")]
    InvalidKadIdLength(usize),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, Error>;
