//! Pairwise kill-count matrix across all match participants.

use std::collections::BTreeMap;

use common::PlayerId;

use crate::killfeed::RoundBreakdown;

/// Cumulative (attacker, victim) kill counts over the whole match. Self-pairs
/// are never recorded and absent cells read as zero.
pub fn matrix(breakdowns: &[RoundBreakdown]) -> BTreeMap<PlayerId, BTreeMap<PlayerId, u32>> {
    let mut head_to_head: BTreeMap<PlayerId, BTreeMap<PlayerId, u32>> = BTreeMap::new();

    for entry in breakdowns.iter().flat_map(|breakdown| breakdown.kills.iter()) {
        if entry.killer == entry.victim {
            continue;
        }

        let attacker_entry = head_to_head.entry(entry.killer.clone()).or_default();
        let victim_killed: &mut u32 = attacker_entry.entry(entry.victim.clone()).or_default();
        *victim_killed += 1;
    }

    head_to_head
}
