//! Running and final team scores, honoring the halftime side swap.

use std::collections::BTreeMap;

use common::{match_data::Round, PlayerId, Side};

/// Win count for the team identified by the side it holds in the *second*
/// half, over rounds `1..=to_round` (clamped to the available rounds).
///
/// Before the swap the team plays the opposite side, so first-segment rounds
/// count when the winner differs from the queried label and second-segment
/// rounds count when it matches. Also returns the side label the team holds
/// at `to_round`, for display.
pub fn score(rounds: &[Round], side: Side, to_round: usize, half_length: usize) -> (u32, Side) {
    let limit = to_round.min(rounds.len());

    let mut wins = 0;
    for (index, round) in rounds.iter().take(limit).enumerate() {
        let won = if index < half_length {
            round.winner != side
        } else {
            round.winner == side
        };
        if won {
            wins += 1;
        }
    }

    let current_side = if to_round <= half_length {
        side.flipped()
    } else {
        side
    };

    (wins, current_side)
}

/// Derives the first-half assignment from the final one: flipped when the
/// match ran past the swap boundary, identical otherwise.
pub fn start_sides(
    teams: &BTreeMap<PlayerId, Side>,
    total_rounds: usize,
    half_length: usize,
) -> BTreeMap<PlayerId, Side> {
    teams
        .iter()
        .map(|(player, side)| {
            let start = if total_rounds > half_length {
                side.flipped()
            } else {
                *side
            };
            (player.clone(), start)
        })
        .collect()
}

/// The side a player holds during a given round (0-based index).
pub fn side_in_round(side: Side, round_index: usize, half_length: usize) -> Side {
    if round_index < half_length {
        side.flipped()
    } else {
        side
    }
}
