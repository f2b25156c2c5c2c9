//! Flattens the nested per-round kill feed and classifies opening duels and
//! trades.

use std::collections::BTreeMap;

use common::{match_data::OpeningKill, Kill, PlayerId};

use crate::Config;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatKill {
    pub killer: PlayerId,
    pub victim: PlayerId,
    pub kill: Kill,
}

/// Everything derived from a single round's kill feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundBreakdown {
    /// Kills in chronological order.
    pub kills: Vec<FlatKill>,
    pub opening: Option<OpeningKill>,
    pub kill_counts: BTreeMap<PlayerId, u32>,
    pub death_counts: BTreeMap<PlayerId, u32>,
    pub assist_counts: BTreeMap<PlayerId, u32>,
    pub flash_assist_counts: BTreeMap<PlayerId, u32>,
    pub headshot_counts: BTreeMap<PlayerId, u32>,
    pub trade_kills: BTreeMap<PlayerId, u32>,
    pub deaths_traded: BTreeMap<PlayerId, u32>,
}

/// Flattens one round's killer -> victim map into a list ordered by kill
/// time. The sort is stable, ties keep the map's deterministic key order.
pub fn flatten_round(feed: &BTreeMap<PlayerId, BTreeMap<PlayerId, Kill>>) -> Vec<FlatKill> {
    let mut flat: Vec<FlatKill> = feed
        .iter()
        .flat_map(|(killer, victims)| {
            victims.iter().map(|(victim, kill)| FlatKill {
                killer: killer.clone(),
                victim: victim.clone(),
                kill: kill.clone(),
            })
        })
        .collect();

    flat.sort_by_key(|entry| entry.kill.time_ms);
    flat
}

struct DeathRecord {
    victim: PlayerId,
    killed_by: PlayerId,
    time_ms: i64,
    traded: bool,
}

pub fn classify_round(
    config: &Config,
    feed: &BTreeMap<PlayerId, BTreeMap<PlayerId, Kill>>,
) -> RoundBreakdown {
    let kills = flatten_round(feed);

    let mut breakdown = RoundBreakdown::default();
    let mut deaths: Vec<DeathRecord> = Vec::with_capacity(kills.len());

    for entry in kills.iter() {
        *breakdown.kill_counts.entry(entry.killer.clone()).or_default() += 1;
        *breakdown.death_counts.entry(entry.victim.clone()).or_default() += 1;

        if entry.kill.is_headshot {
            *breakdown
                .headshot_counts
                .entry(entry.killer.clone())
                .or_default() += 1;
        }

        if let Some(assister) = entry.kill.assister.as_ref() {
            let counts = if entry.kill.assisted_flash {
                &mut breakdown.flash_assist_counts
            } else {
                &mut breakdown.assist_counts
            };
            *counts.entry(assister.clone()).or_default() += 1;
        }

        // This kill avenges every not-yet-traded teammate the victim killed
        // within the window. Each death is credited at most once, to the
        // earliest qualifying kill.
        for death in deaths
            .iter_mut()
            .filter(|death| !death.traded && death.killed_by == entry.victim)
        {
            if entry.kill.time_ms - death.time_ms <= config.trade_window_ms {
                death.traded = true;
                *breakdown
                    .deaths_traded
                    .entry(death.victim.clone())
                    .or_default() += 1;
                *breakdown.trade_kills.entry(entry.killer.clone()).or_default() += 1;
            }
        }

        deaths.push(DeathRecord {
            victim: entry.victim.clone(),
            killed_by: entry.killer.clone(),
            time_ms: entry.kill.time_ms,
            traded: false,
        });
    }

    breakdown.opening = kills.first().map(|first| OpeningKill {
        attacker: first.killer.clone(),
        victim: first.victim.clone(),
        kill: first.kill.clone(),
    });
    breakdown.kills = kills;

    breakdown
}

pub fn classify(
    config: &Config,
    kill_feed: &[BTreeMap<PlayerId, BTreeMap<PlayerId, Kill>>],
) -> Vec<RoundBreakdown> {
    kill_feed
        .iter()
        .map(|feed| classify_round(config, feed))
        .collect()
}
