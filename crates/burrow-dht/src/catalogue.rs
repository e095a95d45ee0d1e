//! The prefix catalogue
//!
//! For every 16-bit prefix the catalogue stores a preimage key whose
//! encoded peer identifier hashes to a Kademlia key starting with that
//! prefix. Built offline, persisted as a JSON array of 65536 unsigned
//! integers in index order, loaded once at startup and read-only after
//! that.

use crate::{DhtError, Result};
use burrow_core::{kad_id_for_peer, kad_prefix, PeerId};
use std::path::Path;

/// Number of catalogue entries, one per 16-bit prefix
pub const CATALOGUE_LEN: usize = 1 << 16;

/// Prefix to preimage-key lookup table
#[derive(Debug)]
pub struct Catalogue {
    /// Invariant: exactly [`CATALOGUE_LEN`] keys
    keys: Box<[u32]>,
}

impl Catalogue {
    /// Build a catalogue from raw keys in prefix order
    pub fn from_keys(keys: Vec<u32>) -> Result<Self> {
        if keys.len() != CATALOGUE_LEN {
            return Err(DhtError::CatalogueSize {
                expected: CATALOGUE_LEN,
                actual: keys.len(),
            });
        }
        Ok(Self {
            keys: keys.into_boxed_slice(),
        })
    }

    /// Preimage key for a 16-bit prefix
    pub fn key(&self, prefix: u16) -> u32 {
        self.keys[prefix as usize]
    }

    /// Load a catalogue from a persisted JSON document
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let keys: Vec<u32> = serde_json::from_str(&content)?;
        Self::from_keys(keys)
    }

    /// Persist the catalogue as a JSON document
    pub fn save(&self, path: &Path) -> Result<()> {
        let doc = serde_json::to_string(&self.keys)?;
        std::fs::write(path, doc)?;
        Ok(())
    }

    /// Precompute a catalogue by scanning preimage keys in order.
    ///
    /// Each candidate key is encoded as a peer identifier and hashed to its
    /// Kademlia key; the first candidate observed for every prefix is
    /// recorded. Runs until all 65536 prefixes are covered, which takes
    /// on the order of a million hashes for a uniform digest.
    pub fn build() -> Self {
        let mut keys = vec![0u32; CATALOGUE_LEN].into_boxed_slice();
        let mut seen = vec![false; CATALOGUE_LEN];
        let mut remaining = CATALOGUE_LEN;
        let mut candidate: u32 = 0;

        while remaining > 0 {
            let id = PeerId::from_digest_prefix(candidate);
            let prefix = kad_prefix(&kad_id_for_peer(&id)) as usize;

            if !seen[prefix] {
                seen[prefix] = true;
                keys[prefix] = candidate;
                remaining -= 1;

                if remaining % 8192 == 0 {
                    tracing::debug!("catalogue build: {} prefixes remaining", remaining);
                }
            }

            candidate += 1;
        }

        tracing::info!("catalogue built after scanning {} preimage keys", candidate);

        Self { keys }
    }

    /// Re-derive every entry and return the prefixes whose key does not
    /// reproduce them.
    ///
    /// The generator never runs this check: a corrupted catalogue silently
    /// yields identifiers that miss their bucket.
    pub fn verify(&self) -> Vec<u16> {
        (0..=u16::MAX)
            .filter(|&prefix| {
                let id = PeerId::from_digest_prefix(self.key(prefix));
                kad_prefix(&kad_id_for_peer(&id)) != prefix
            })
            .collect()
    }
}
