//! Flash-efficiency metrics derived from the utility counters.

use std::collections::BTreeMap;

use common::{stat_or_zero, PlayerId, UtilityCounters};

/// Enemies flashed per flashbang thrown, rounded to 2 decimals. A player who
/// never threw a flash reads as zero, never a division fault.
pub fn ef_per_flash(utility: &UtilityCounters) -> BTreeMap<PlayerId, f64> {
    utility
        .flashes_thrown
        .keys()
        .chain(utility.enemies_flashed.keys())
        .map(|player| {
            let thrown = stat_or_zero(&utility.flashes_thrown, player);
            let flashed = stat_or_zero(&utility.enemies_flashed, player);

            let ratio = if thrown == 0 {
                0.0
            } else {
                crate::round2(flashed as f64 / thrown as f64)
            };

            (player.clone(), ratio)
        })
        .collect()
}
