//! Prefix-targeted identifier generation
//!
//! Produces synthetic peer identifiers whose bucket assignment relative to
//! the local key is exactly a requested common prefix length. Pure bit
//! arithmetic plus one catalogue lookup; no I/O and no verification of the
//! catalogue itself.

use crate::catalogue::Catalogue;
use crate::{DhtError, Result, MAX_REFRESH_CPL};
use burrow_core::{kad_prefix, KadId, PeerId};

/// Generate an identifier for the target Cpl with fresh random fill bits
pub fn random_peer_id(local: &KadId, target_cpl: u16, catalogue: &Catalogue) -> Result<PeerId> {
    peer_id_for_cpl(local, target_cpl, crate::random_seed(), catalogue)
}

/// Generate the identifier for a target Cpl and seed.
///
/// The returned identifier's Kademlia key shares exactly `target_cpl`
/// leading bits with `local`, assuming an intact catalogue. Deterministic
/// in its inputs; only the low `15 - target_cpl` bits of `seed` are used.
pub fn peer_id_for_cpl(
    local: &KadId,
    target_cpl: u16,
    seed: u16,
    catalogue: &Catalogue,
) -> Result<PeerId> {
    if target_cpl > MAX_REFRESH_CPL {
        return Err(DhtError::InvalidCpl(target_cpl));
    }

    let prefix = target_prefix(kad_prefix(local), target_cpl, seed);

    Ok(PeerId::from_digest_prefix(catalogue.key(prefix)))
}

/// Pick a 16-bit prefix whose common prefix length with `local_prefix` is
/// exactly `target_cpl`.
///
/// An identifier lands in bucket `b` only if its common prefix length with
/// the local key is exactly `b`, so the bit right after the shared run is
/// toggled to disagree; everything below it comes from the seed.
fn target_prefix(local_prefix: u16, target_cpl: u16, seed: u16) -> u16 {
    let toggled = local_prefix ^ (0x8000 >> target_cpl);

    // Top target_cpl + 1 bits from the toggled local prefix, the rest from
    // the seed.
    let mask = 0xFFFFu16 << (16 - (target_cpl + 1));
    (toggled & mask) | (seed & !mask)
}
