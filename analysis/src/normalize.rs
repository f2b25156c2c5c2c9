//! Validation and canonicalization of the raw per-match input.

use std::collections::BTreeMap;

use common::{match_data::Round, match_data::WinReason, Kill, PlayerId, RawData};

use crate::DataIntegrityError;

// https://github.com/markus-wa/demoinfocs-golang/blob/205b0bb25e9f3e96e1d306d154199b4a6292940e/pkg/demoinfocs/events/events.go#L53
pub static ROUND_WIN_REASON: phf::Map<i32, WinReason> = phf::phf_map! {
    0_i32 => WinReason::StillInProgress,
    1_i32 => WinReason::BombExploded,
    2_i32 => WinReason::VipEscaped,
    3_i32 => WinReason::VipKilled,
    4_i32 => WinReason::TSaved,
    5_i32 => WinReason::CtStoppedEscape,
    6_i32 => WinReason::RoundEndReasonTerroristsStopped,
    7_i32 => WinReason::BombDefused,
    8_i32 => WinReason::TKilled,
    9_i32 => WinReason::CTKilled,
    10_i32 => WinReason::Draw,
    11_i32 => WinReason::HostageRescued,
    12_i32 => WinReason::TimeRanOut,
    13_i32 => WinReason::RoundEndReasonHostagesNotRescued,
    14_i32 => WinReason::TerroristsNotEscaped,
    15_i32 => WinReason::VipNotEscaped,
    16_i32 => WinReason::GameStart,
    17_i32 => WinReason::TSurrender,
    18_i32 => WinReason::CTSurrender,
    19_i32 => WinReason::TPlanted,
    20_i32 => WinReason::CTReachedHostage,
};

/// The canonical view of a match after validation: winners resolved, reason
/// codes mapped, and the damage sequence padded to one entry per round.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub rounds: Vec<Round>,
    pub damage: Vec<BTreeMap<PlayerId, u32>>,
}

pub fn normalize(raw: &RawData) -> Result<Normalized, DataIntegrityError> {
    if raw.kill_feed.len() != raw.rounds.len() {
        return Err(DataIntegrityError::RoundCountMismatch {
            rounds: raw.rounds.len(),
            kill_feed: raw.kill_feed.len(),
        });
    }

    if !raw.damage.is_empty() && raw.damage.len() != raw.rounds.len() {
        return Err(DataIntegrityError::DamageLengthMismatch {
            rounds: raw.rounds.len(),
            damage: raw.damage.len(),
        });
    }

    check_player_domains(raw)?;

    let mut rounds = Vec::with_capacity(raw.rounds.len());
    for (index, round) in raw.rounds.iter().enumerate() {
        let winner = round
            .winner
            .ok_or(DataIntegrityError::UnresolvedWinner { round: index })?;

        let reason = ROUND_WIN_REASON
            .get(&round.reason)
            .filter(|reason| !matches!(reason, WinReason::StillInProgress))
            .ok_or(DataIntegrityError::UnknownWinReason {
                round: index,
                code: round.reason,
            })?;

        rounds.push(Round {
            winner,
            reason: *reason,
            planter: round.planter.clone(),
            defuser: round.defuser.clone(),
            planter_time: round.planter_time,
            defuser_time: round.defuser_time,
            bomb_explode_time: round.bomb_explode_time,
        });
    }

    let damage = if raw.damage.is_empty() {
        vec![BTreeMap::new(); raw.rounds.len()]
    } else {
        raw.damage.clone()
    };

    Ok(Normalized { rounds, damage })
}

/// Every player id appearing anywhere in the input must exist in the team
/// assignment, otherwise derived mappings would reference unknown players.
fn check_player_domains(raw: &RawData) -> Result<(), DataIntegrityError> {
    let known = |id: &PlayerId| -> Result<(), DataIntegrityError> {
        if raw.teams.contains_key(id) {
            Ok(())
        } else {
            Err(DataIntegrityError::UnknownPlayer { id: id.clone() })
        }
    };

    for round_feed in raw.kill_feed.iter() {
        for (killer, victims) in round_feed.iter() {
            known(killer)?;
            for (victim, kill) in victims.iter() {
                known(victim)?;
                if let Some(assister) = kill.assister.as_ref() {
                    known(assister)?;
                }
            }
        }
    }

    for round_damage in raw.damage.iter() {
        for id in round_damage.keys() {
            known(id)?;
        }
    }

    for round in raw.rounds.iter() {
        if let Some(planter) = round.planter.as_ref() {
            known(planter)?;
        }
        if let Some(defuser) = round.defuser.as_ref() {
            known(defuser)?;
        }
    }

    let counters = [
        &raw.utility.smokes_thrown,
        &raw.utility.mollies_thrown,
        &raw.utility.hes_thrown,
        &raw.utility.flashes_thrown,
        &raw.utility.enemies_flashed,
        &raw.utility.teammates_flashed,
        &raw.utility.util_damage,
        &raw.opening_attempts,
    ];
    for counter in counters {
        for id in counter.keys() {
            known(id)?;
        }
    }

    Ok(())
}

/// Total kill count of one round's nested feed.
pub fn round_kill_count(feed: &BTreeMap<PlayerId, BTreeMap<PlayerId, Kill>>) -> usize {
    feed.values().map(|victims| victims.len()).sum()
}
