//! Shared data model for the match analytics pipeline.
//!
//! The input side ([`RawData`]) is what an upstream demo parser hands us, the
//! output side ([`match_data::Match`]) is what API/UI consumers read. Both
//! serialize with the camelCase field names the frontend expects.

use std::collections::BTreeMap;

pub mod match_data;

pub type PlayerId = String;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Side {
    #[serde(rename = "CT")]
    Ct,
    #[serde(rename = "T")]
    T,
}

impl Side {
    pub fn flipped(&self) -> Self {
        match self {
            Self::Ct => Self::T,
            Self::T => Self::Ct,
        }
    }
}

/// A single kill as recorded in the nested kill feed, timestamped in
/// milliseconds since the start of its round.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kill {
    pub weapon: String,
    #[serde(default)]
    pub assister: Option<PlayerId>,
    pub time_ms: i64,
    pub is_headshot: bool,
    #[serde(default)]
    pub attacker_blind: bool,
    #[serde(default)]
    pub assisted_flash: bool,
    #[serde(default)]
    pub no_scope: bool,
    #[serde(default)]
    pub through_smoke: bool,
    #[serde(default)]
    pub penetrated_objects: u32,
}

/// One round as reported by the parser. The winner may still be unresolved
/// here, normalization rejects such rounds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRound {
    #[serde(default)]
    pub winner: Option<Side>,
    /// Raw round-end reason code, demoinfocs numbering.
    pub reason: i32,
    #[serde(default)]
    pub planter: Option<PlayerId>,
    #[serde(default)]
    pub defuser: Option<PlayerId>,
    #[serde(default)]
    pub planter_time: Option<i64>,
    #[serde(default)]
    pub defuser_time: Option<i64>,
    #[serde(default)]
    pub bomb_explode_time: Option<i64>,
}

/// Per-player grenade usage totals. Absent key means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtilityCounters {
    pub smokes_thrown: BTreeMap<PlayerId, u32>,
    pub mollies_thrown: BTreeMap<PlayerId, u32>,
    #[serde(rename = "HEsThrown")]
    pub hes_thrown: BTreeMap<PlayerId, u32>,
    pub flashes_thrown: BTreeMap<PlayerId, u32>,
    pub enemies_flashed: BTreeMap<PlayerId, u32>,
    pub teammates_flashed: BTreeMap<PlayerId, u32>,
    pub util_damage: BTreeMap<PlayerId, u32>,
}

/// Complete per-match input, as produced by the demo-parsing collaborator.
///
/// `teams` holds the side each player occupies in the *second* half, which is
/// the final assignment a parser observes. The kill feed is keyed
/// round -> killer -> victim; BTreeMaps keep iteration deterministic so the
/// whole derivation is reproducible byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawData {
    pub id: String,
    pub teams: BTreeMap<PlayerId, Side>,
    #[serde(default)]
    pub player_names: BTreeMap<PlayerId, String>,
    #[serde(default)]
    pub ct_clan_tag: Option<String>,
    #[serde(default)]
    pub t_clan_tag: Option<String>,
    pub rounds: Vec<RawRound>,
    pub kill_feed: Vec<BTreeMap<PlayerId, BTreeMap<PlayerId, Kill>>>,
    /// Damage dealt per round. May be empty when the source carries no damage
    /// events, in which case damage-based stats degrade to zero.
    #[serde(default)]
    pub damage: Vec<BTreeMap<PlayerId, u32>>,
    #[serde(default)]
    pub utility: UtilityCounters,
    /// Extra early-contact opening attempts that did not end in a kill.
    /// Sources without this signal simply leave it empty.
    #[serde(default)]
    pub opening_attempts: BTreeMap<PlayerId, u32>,
}

/// Reads a per-player mapping with the uniform missing-key-is-zero policy.
pub fn stat_or_zero<V: Copy + Default>(map: &BTreeMap<PlayerId, V>, player: &str) -> V {
    map.get(player).copied().unwrap_or_default()
}
