//! Aggregate and composite per-player statistics: basic ratios, KAST,
//! Impact/HLTV approximations, RWS, multi-kills and opening-duel stats.

use std::collections::BTreeMap;

use common::{
    match_data::{Round, Stats, WinReason},
    stat_or_zero, PlayerId, RawData, Side,
};

use crate::{killfeed::RoundBreakdown, normalize::Normalized, round2, score, Config};

pub fn compute(
    config: &Config,
    raw: &RawData,
    normalized: &Normalized,
    breakdowns: &[RoundBreakdown],
    half_length: usize,
) -> Stats {
    let total_rounds = normalized.rounds.len();

    let kills = total_counts(breakdowns, |breakdown| &breakdown.kill_counts);
    let deaths = total_counts(breakdowns, |breakdown| &breakdown.death_counts);
    let assists = total_counts(breakdowns, |breakdown| &breakdown.assist_counts);
    let flash_assists = total_counts(breakdowns, |breakdown| &breakdown.flash_assist_counts);
    let headshots = total_counts(breakdowns, |breakdown| &breakdown.headshot_counts);
    let trade_kills = total_counts(breakdowns, |breakdown| &breakdown.trade_kills);
    let deaths_traded = total_counts(breakdowns, |breakdown| &breakdown.deaths_traded);

    let mut damage_totals: BTreeMap<PlayerId, u64> = BTreeMap::new();
    for round_damage in normalized.damage.iter() {
        for (player, dealt) in round_damage.iter() {
            *damage_totals.entry(player.clone()).or_default() += *dealt as u64;
        }
    }

    let mut stats = Stats::default();

    for player in raw.teams.keys() {
        let player_kills = stat_or_zero(&kills, player);
        let player_deaths = stat_or_zero(&deaths, player);
        let player_headshots = stat_or_zero(&headshots, player);
        let damage = damage_totals.get(player).copied().unwrap_or(0);

        let headshot_pct = if player_kills == 0 {
            0.0
        } else {
            (100.0 * player_headshots as f64 / player_kills as f64).round()
        };

        // Deaths of zero report the raw kill count instead of a ratio.
        let kd = if player_deaths == 0 {
            player_kills as f64
        } else {
            round2(player_kills as f64 / player_deaths as f64)
        };

        let (kpr, adr) = if total_rounds == 0 {
            (0.0, 0.0)
        } else {
            (
                round2(player_kills as f64 / total_rounds as f64),
                (damage as f64 / total_rounds as f64).round(),
            )
        };

        stats.headshot_pct.insert(player.clone(), headshot_pct);
        stats.kd.insert(player.clone(), kd);
        stats
            .kdiff
            .insert(player.clone(), player_kills as i64 - player_deaths as i64);
        stats.kpr.insert(player.clone(), kpr);
        stats.adr.insert(player.clone(), adr);
    }

    stats.kast = kast(total_rounds, &raw.teams, breakdowns);
    compute_multikills(&mut stats, breakdowns);
    compute_openings(&mut stats, raw, breakdowns, total_rounds);

    for player in raw.teams.keys() {
        let apr = if total_rounds == 0 {
            0.0
        } else {
            stat_or_zero(&assists, player) as f64 / total_rounds as f64
        };
        let impact = round2(
            config.weights.impact_kpr * stat_or_zero(&stats.kpr, player)
                + config.weights.impact_apr * apr
                + config.weights.impact_offset,
        );
        stats.impact.insert(player.clone(), impact);

        let dpr = if total_rounds == 0 {
            0.0
        } else {
            stat_or_zero(&deaths, player) as f64 / total_rounds as f64
        };
        let hltv = round2(
            config.weights.hltv_kast * stat_or_zero(&stats.kast, player)
                + config.weights.hltv_kpr * stat_or_zero(&stats.kpr, player)
                + config.weights.hltv_dpr * dpr
                + config.weights.hltv_impact * impact
                + config.weights.hltv_adr * stat_or_zero(&stats.adr, player)
                + config.weights.hltv_offset,
        );
        stats.hltv.insert(player.clone(), hltv);
    }

    stats.rws = rws(
        &raw.teams,
        &normalized.rounds,
        &normalized.damage,
        half_length,
    );

    stats.kills = kills;
    stats.assists = assists;
    stats.deaths = deaths;
    stats.flash_assists = flash_assists;
    stats.trade_kills = trade_kills;
    stats.deaths_traded = deaths_traded;

    stats.ef_per_flash = crate::utility::ef_per_flash(&raw.utility);
    stats.enemies_flashed = raw.utility.enemies_flashed.clone();
    stats.teammates_flashed = raw.utility.teammates_flashed.clone();
    stats.util_damage = raw.utility.util_damage.clone();
    stats.smokes_thrown = raw.utility.smokes_thrown.clone();
    stats.mollies_thrown = raw.utility.mollies_thrown.clone();
    stats.hes_thrown = raw.utility.hes_thrown.clone();
    stats.flashes_thrown = raw.utility.flashes_thrown.clone();

    stats
}

fn total_counts<F>(breakdowns: &[RoundBreakdown], select: F) -> BTreeMap<PlayerId, u32>
where
    F: Fn(&RoundBreakdown) -> &BTreeMap<PlayerId, u32>,
{
    let mut totals: BTreeMap<PlayerId, u32> = BTreeMap::new();
    for breakdown in breakdowns.iter() {
        for (player, count) in select(breakdown).iter() {
            *totals.entry(player.clone()).or_default() += count;
        }
    }
    totals
}

/// Percentage of rounds with a kill, assist, survival or traded death. A
/// round counts once no matter how many conditions hold.
fn kast(
    total_rounds: usize,
    teams: &BTreeMap<PlayerId, Side>,
    breakdowns: &[RoundBreakdown],
) -> BTreeMap<PlayerId, f64> {
    teams
        .keys()
        .map(|player| {
            if total_rounds == 0 {
                return (player.clone(), 0.0);
            }

            let qualifying = breakdowns
                .iter()
                .filter(|breakdown| {
                    stat_or_zero(&breakdown.kill_counts, player) != 0
                        || stat_or_zero(&breakdown.assist_counts, player) != 0
                        || stat_or_zero(&breakdown.death_counts, player) == 0
                        || stat_or_zero(&breakdown.deaths_traded, player) != 0
                })
                .count();

            (
                player.clone(),
                (100.0 * qualifying as f64 / total_rounds as f64).round(),
            )
        })
        .collect()
}

fn compute_multikills(stats: &mut Stats, breakdowns: &[RoundBreakdown]) {
    for breakdown in breakdowns.iter() {
        for (player, count) in breakdown.kill_counts.iter() {
            let bucket = match count {
                2 => &mut stats.k2,
                3 => &mut stats.k3,
                4 => &mut stats.k4,
                5 => &mut stats.k5,
                _ => continue,
            };
            *bucket.entry(player.clone()).or_default() += 1;
        }
    }
}

fn compute_openings(
    stats: &mut Stats,
    raw: &RawData,
    breakdowns: &[RoundBreakdown],
    total_rounds: usize,
) {
    for opening in breakdowns.iter().filter_map(|b| b.opening.as_ref()) {
        *stats
            .opening_kills
            .entry(opening.attacker.clone())
            .or_default() += 1;
        *stats
            .opening_deaths
            .entry(opening.victim.clone())
            .or_default() += 1;
    }

    for player in raw.teams.keys() {
        // Early-contact participants who did not land the kill only show up
        // when the source provides the extra signal, otherwise this is
        // kills-plus-deaths detection.
        let attempts = stat_or_zero(&stats.opening_kills, player)
            + stat_or_zero(&stats.opening_deaths, player)
            + stat_or_zero(&raw.opening_attempts, player);
        if attempts == 0 {
            continue;
        }

        stats.opening_attempts.insert(player.clone(), attempts);
        if total_rounds != 0 {
            stats.opening_attempts_pct.insert(
                player.clone(),
                (100.0 * attempts as f64 / total_rounds as f64).round(),
            );
        }
        stats.opening_success.insert(
            player.clone(),
            (100.0 * stat_or_zero(&stats.opening_kills, player) as f64 / attempts as f64).round(),
        );
    }
}

/// Round win share: each won round distributes 100 points across the winning
/// side by damage share, with a 30 point objective bonus for the planter or
/// defuser on bomb rounds (the remaining 70 split by damage). Per-player sums
/// are averaged over the rounds won by that player's team.
fn rws(
    teams: &BTreeMap<PlayerId, Side>,
    rounds: &[Round],
    damage: &[BTreeMap<PlayerId, u32>],
    half_length: usize,
) -> BTreeMap<PlayerId, f64> {
    let mut points: BTreeMap<PlayerId, f64> = BTreeMap::new();

    for (index, round) in rounds.iter().enumerate() {
        let winners: Vec<&PlayerId> = teams
            .iter()
            .filter(|(_, side)| score::side_in_round(**side, index, half_length) == round.winner)
            .map(|(player, _)| player)
            .collect();

        let round_damage = damage.get(index);
        let winner_damage = |player: &PlayerId| -> f64 {
            round_damage
                .map(|map| stat_or_zero(map, player) as f64)
                .unwrap_or(0.0)
        };
        let total: f64 = winners.iter().map(|player| winner_damage(player)).sum();

        let objective = match round.reason {
            WinReason::BombExploded => round.planter.as_ref(),
            WinReason::BombDefused => round.defuser.as_ref(),
            _ => None,
        };
        let split = if objective.is_some() { 70.0 } else { 100.0 };

        for player in winners.iter() {
            if objective == Some(*player) {
                *points.entry((*player).clone()).or_default() += 30.0;
            }
            if total > 0.0 {
                *points.entry((*player).clone()).or_default() +=
                    winner_damage(player) / total * split;
            }
        }
    }

    teams
        .iter()
        .map(|(player, side)| {
            let team_wins = score::score(rounds, *side, usize::MAX, half_length).0;
            let share = if team_wins == 0 {
                0.0
            } else {
                round2(stat_or_zero(&points, player) / team_wins as f64)
            };
            (player.clone(), share)
        })
        .collect()
}
