//! Bucket-refresh planning
//!
//! A routing table seeded only with organically discovered peers develops
//! gaps: buckets for which no peer is known. The planner decides which
//! common prefix lengths are due for a refresh lookup; the caller generates
//! a target for each one (see [`crate::generator`]) and runs the actual
//! query. Time is always passed in, never read from a clock here.

use crate::MAX_REFRESH_CPL;
use burrow_core::{common_prefix_len, KadId};
use std::time::{Duration, Instant};

/// Longest common prefix length between the local key and any peer
pub fn max_common_prefix(local: &KadId, peers: &[KadId]) -> u16 {
    peers
        .iter()
        .map(|peer| common_prefix_len(local, peer) as u16)
        .max()
        .unwrap_or(0)
}

/// Number of peers whose common prefix length with the local key is
/// exactly `cpl`
pub fn num_peers_for_cpl(local: &KadId, peers: &[KadId], cpl: u16) -> usize {
    peers
        .iter()
        .filter(|peer| common_prefix_len(local, peer) as u16 == cpl)
        .count()
}

/// Tracks when each common prefix length was last refreshed and plans
/// refresh rounds
pub struct RefreshPlanner {
    refresh_interval: Duration,
    refreshed_at: [Option<Instant>; (MAX_REFRESH_CPL + 1) as usize],
}

impl RefreshPlanner {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            refreshed_at: [None; (MAX_REFRESH_CPL + 1) as usize],
        }
    }

    /// Common prefix lengths due for a refresh lookup at `now`.
    ///
    /// Plans `0..=min(max_common_prefix, MAX_REFRESH_CPL)`, keeping every
    /// cpl that has never been refreshed, went stale past the interval, or
    /// all of them when `force` is set. A cpl with no peers caps the plan
    /// at `min(2 * (gap + 1), max)`.
    pub fn due_cpls(&self, local: &KadId, peers: &[KadId], now: Instant, force: bool) -> Vec<u16> {
        let mut max_cpl = max_common_prefix(local, peers).min(MAX_REFRESH_CPL);

        if let Some(gap) =
            (0..=max_cpl).find(|&cpl| num_peers_for_cpl(local, peers, cpl) == 0)
        {
            max_cpl = max_cpl.min(2 * (gap + 1));
        }

        (0..=max_cpl)
            .filter(|&cpl| force || self.is_due(cpl, now))
            .collect()
    }

    /// Record that a refresh lookup ran for `cpl`
    pub fn mark_refreshed(&mut self, cpl: u16, now: Instant) {
        if let Some(slot) = self.refreshed_at.get_mut(cpl as usize) {
            *slot = Some(now);
        }
    }

    fn is_due(&self, cpl: u16, now: Instant) -> bool {
        match self.refreshed_at[cpl as usize] {
            Some(at) => now.duration_since(at) >= self.refresh_interval,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: KadId = [0u8; 32];

    /// Peer differing from [`LOCAL`] at exactly bit `cpl`
    fn peer_with_cpl(cpl: usize) -> KadId {
        let mut peer = LOCAL;
        peer[cpl / 8] ^= 0x80 >> (cpl % 8);
        peer
    }

    #[test]
    fn test_max_common_prefix() {
        assert_eq!(max_common_prefix(&LOCAL, &[]), 0);

        let peers = vec![peer_with_cpl(0), peer_with_cpl(5), peer_with_cpl(2)];
        assert_eq!(max_common_prefix(&LOCAL, &peers), 5);
    }

    #[test]
    fn test_num_peers_for_cpl() {
        let peers = vec![peer_with_cpl(3), peer_with_cpl(3), peer_with_cpl(9)];
        assert_eq!(num_peers_for_cpl(&LOCAL, &peers, 3), 2);
        assert_eq!(num_peers_for_cpl(&LOCAL, &peers, 9), 1);
        assert_eq!(num_peers_for_cpl(&LOCAL, &peers, 4), 0);
    }

    #[test]
    fn test_empty_table_plans_bucket_zero() {
        let planner = RefreshPlanner::new(Duration::from_secs(600));
        assert_eq!(planner.due_cpls(&LOCAL, &[], Instant::now(), false), vec![0]);
    }

    #[test]
    fn test_plans_up_to_max_common_prefix() {
        let planner = RefreshPlanner::new(Duration::from_secs(600));
        let peers: Vec<KadId> = (0..=3).map(peer_with_cpl).collect();

        let due = planner.due_cpls(&LOCAL, &peers, Instant::now(), false);
        assert_eq!(due, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_gap_caps_the_plan() {
        let planner = RefreshPlanner::new(Duration::from_secs(600));

        // Peers at cpl 0 and 9 only: the gap at 1 caps the plan at
        // 2 * (1 + 1) = 4.
        let peers = vec![peer_with_cpl(0), peer_with_cpl(9)];
        let due = planner.due_cpls(&LOCAL, &peers, Instant::now(), false);
        assert_eq!(due, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_refreshed_cpls_go_quiet_until_stale() {
        let mut planner = RefreshPlanner::new(Duration::from_secs(60));
        let peers: Vec<KadId> = (0..=2).map(peer_with_cpl).collect();
        let now = Instant::now();

        for cpl in planner.due_cpls(&LOCAL, &peers, now, false) {
            planner.mark_refreshed(cpl, now);
        }
        assert!(planner.due_cpls(&LOCAL, &peers, now, false).is_empty());

        // force overrides staleness
        assert_eq!(
            planner.due_cpls(&LOCAL, &peers, now, true),
            vec![0, 1, 2]
        );

        let later = now + Duration::from_secs(61);
        assert_eq!(
            planner.due_cpls(&LOCAL, &peers, later, false),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_deep_common_prefix_is_capped() {
        let planner = RefreshPlanner::new(Duration::from_secs(600));

        // A peer sharing every leading bit up to the prefix space: the plan
        // still stops at MAX_REFRESH_CPL.
        let peers: Vec<KadId> = (0..=MAX_REFRESH_CPL as usize + 4).map(peer_with_cpl).collect();
        let due = planner.due_cpls(&LOCAL, &peers, Instant::now(), false);
        assert_eq!(due.len(), MAX_REFRESH_CPL as usize + 1);
        assert_eq!(*due.last().unwrap(), MAX_REFRESH_CPL);
    }
}
