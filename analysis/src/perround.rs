//! Per-round timelines: kills, plants, defuses and explosions merged into one
//! chronological event list with running scores.

use common::{
    match_data::{Round, RoundEvent, RoundOverview},
    Side,
};

use crate::{killfeed::RoundBreakdown, score};

/// Builds the round-by-round view. Scores are the running totals *after* each
/// round, side labels are resolved against the swap boundary.
pub fn round_by_round(
    rounds: &[Round],
    breakdowns: &[RoundBreakdown],
    half_length: usize,
) -> Vec<RoundOverview> {
    rounds
        .iter()
        .zip(breakdowns.iter())
        .enumerate()
        .map(|(index, (round, breakdown))| {
            let mut events: Vec<RoundEvent> = breakdown
                .kills
                .iter()
                .map(|entry| RoundEvent::Kill {
                    time: entry.kill.time_ms,
                    killer: entry.killer.clone(),
                    victim: entry.victim.clone(),
                    kill: entry.kill.clone(),
                })
                .collect();

            if let (Some(planter), Some(time)) = (round.planter.as_ref(), round.planter_time) {
                events.push(RoundEvent::Plant {
                    time,
                    planter: planter.clone(),
                });
            }
            if let (Some(defuser), Some(time)) = (round.defuser.as_ref(), round.defuser_time) {
                events.push(RoundEvent::Defuse {
                    time,
                    defuser: defuser.clone(),
                });
            }
            if let Some(time) = round.bomb_explode_time {
                events.push(RoundEvent::BombExplode { time });
            }

            events.sort_by_key(|event| event.time());

            let (team_a_score, team_a_side) = score::score(rounds, Side::Ct, index + 1, half_length);
            let (team_b_score, team_b_side) = score::score(rounds, Side::T, index + 1, half_length);

            RoundOverview {
                team_a_score,
                team_b_score,
                team_a_side,
                team_b_side,
                events,
            }
        })
        .collect()
}
