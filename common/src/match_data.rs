//! Derived match output consumed by the API and match-review UI.

use std::collections::BTreeMap;

use crate::{Kill, PlayerId, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WinReason {
    StillInProgress,
    BombExploded,
    VipEscaped,
    VipKilled,
    TSaved,
    CtStoppedEscape,
    RoundEndReasonTerroristsStopped,
    BombDefused,
    TKilled,
    CTKilled,
    Draw,
    HostageRescued,
    TimeRanOut,
    RoundEndReasonHostagesNotRescued,
    TerroristsNotEscaped,
    VipNotEscaped,
    GameStart,
    TSurrender,
    CTSurrender,
    TPlanted,
    CTReachedHostage,
}

/// A round after normalization, winner resolved and reason canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub winner: Side,
    pub reason: WinReason,
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

/// The fixed per-player stat mappings. A missing player key always reads as
/// zero, see [`crate::stat_or_zero`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub kills: BTreeMap<PlayerId, u32>,
    pub assists: BTreeMap<PlayerId, u32>,
    pub deaths: BTreeMap<PlayerId, u32>,
    pub kd: BTreeMap<PlayerId, f64>,
    pub kdiff: BTreeMap<PlayerId, i64>,
    pub kpr: BTreeMap<PlayerId, f64>,
    pub adr: BTreeMap<PlayerId, f64>,
    pub headshot_pct: BTreeMap<PlayerId, f64>,
    #[serde(rename = "2k")]
    pub k2: BTreeMap<PlayerId, u32>,
    #[serde(rename = "3k")]
    pub k3: BTreeMap<PlayerId, u32>,
    #[serde(rename = "4k")]
    pub k4: BTreeMap<PlayerId, u32>,
    #[serde(rename = "5k")]
    pub k5: BTreeMap<PlayerId, u32>,
    pub hltv: BTreeMap<PlayerId, f64>,
    pub impact: BTreeMap<PlayerId, f64>,
    pub kast: BTreeMap<PlayerId, f64>,
    pub rws: BTreeMap<PlayerId, f64>,
    pub trade_kills: BTreeMap<PlayerId, u32>,
    pub deaths_traded: BTreeMap<PlayerId, u32>,
    pub opening_kills: BTreeMap<PlayerId, u32>,
    pub opening_deaths: BTreeMap<PlayerId, u32>,
    pub opening_attempts: BTreeMap<PlayerId, u32>,
    pub opening_attempts_pct: BTreeMap<PlayerId, f64>,
    pub opening_success: BTreeMap<PlayerId, f64>,
    pub ef_per_flash: BTreeMap<PlayerId, f64>,
    pub flash_assists: BTreeMap<PlayerId, u32>,
    pub enemies_flashed: BTreeMap<PlayerId, u32>,
    pub teammates_flashed: BTreeMap<PlayerId, u32>,
    pub util_damage: BTreeMap<PlayerId, u32>,
    pub smokes_thrown: BTreeMap<PlayerId, u32>,
    pub mollies_thrown: BTreeMap<PlayerId, u32>,
    #[serde(rename = "HEsThrown")]
    pub hes_thrown: BTreeMap<PlayerId, u32>,
    pub flashes_thrown: BTreeMap<PlayerId, u32>,
}

/// Enumerated stat keys, used instead of stringly-typed column lookups when a
/// consumer sorts or extracts a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKey {
    Kills,
    Assists,
    Deaths,
    Kd,
    Kdiff,
    Kpr,
    Adr,
    HeadshotPct,
    #[serde(rename = "2k")]
    K2,
    #[serde(rename = "3k")]
    K3,
    #[serde(rename = "4k")]
    K4,
    #[serde(rename = "5k")]
    K5,
    Hltv,
    Impact,
    Kast,
    Rws,
    TradeKills,
    DeathsTraded,
    OpeningKills,
    OpeningDeaths,
    OpeningAttempts,
    OpeningAttemptsPct,
    OpeningSuccess,
    EfPerFlash,
    FlashAssists,
    EnemiesFlashed,
    TeammatesFlashed,
    UtilDamage,
    SmokesThrown,
    MolliesThrown,
    #[serde(rename = "HEsThrown")]
    HesThrown,
    FlashesThrown,
}

impl StatKey {
    pub const ALL: [StatKey; 32] = [
        StatKey::Kills,
        StatKey::Assists,
        StatKey::Deaths,
        StatKey::Kd,
        StatKey::Kdiff,
        StatKey::Kpr,
        StatKey::Adr,
        StatKey::HeadshotPct,
        StatKey::K2,
        StatKey::K3,
        StatKey::K4,
        StatKey::K5,
        StatKey::Hltv,
        StatKey::Impact,
        StatKey::Kast,
        StatKey::Rws,
        StatKey::TradeKills,
        StatKey::DeathsTraded,
        StatKey::OpeningKills,
        StatKey::OpeningDeaths,
        StatKey::OpeningAttempts,
        StatKey::OpeningAttemptsPct,
        StatKey::OpeningSuccess,
        StatKey::EfPerFlash,
        StatKey::FlashAssists,
        StatKey::EnemiesFlashed,
        StatKey::TeammatesFlashed,
        StatKey::UtilDamage,
        StatKey::SmokesThrown,
        StatKey::MolliesThrown,
        StatKey::HesThrown,
        StatKey::FlashesThrown,
    ];
}

impl Stats {
    /// Single accessor table over every stat column, widened to f64.
    pub fn value(&self, key: StatKey, player: &str) -> f64 {
        let int = |map: &BTreeMap<PlayerId, u32>| crate::stat_or_zero(map, player) as f64;
        let float = |map: &BTreeMap<PlayerId, f64>| crate::stat_or_zero(map, player);

        match key {
            StatKey::Kills => int(&self.kills),
            StatKey::Assists => int(&self.assists),
            StatKey::Deaths => int(&self.deaths),
            StatKey::Kd => float(&self.kd),
            StatKey::Kdiff => crate::stat_or_zero(&self.kdiff, player) as f64,
            StatKey::Kpr => float(&self.kpr),
            StatKey::Adr => float(&self.adr),
            StatKey::HeadshotPct => float(&self.headshot_pct),
            StatKey::K2 => int(&self.k2),
            StatKey::K3 => int(&self.k3),
            StatKey::K4 => int(&self.k4),
            StatKey::K5 => int(&self.k5),
            StatKey::Hltv => float(&self.hltv),
            StatKey::Impact => float(&self.impact),
            StatKey::Kast => float(&self.kast),
            StatKey::Rws => float(&self.rws),
            StatKey::TradeKills => int(&self.trade_kills),
            StatKey::DeathsTraded => int(&self.deaths_traded),
            StatKey::OpeningKills => int(&self.opening_kills),
            StatKey::OpeningDeaths => int(&self.opening_deaths),
            StatKey::OpeningAttempts => int(&self.opening_attempts),
            StatKey::OpeningAttemptsPct => float(&self.opening_attempts_pct),
            StatKey::OpeningSuccess => float(&self.opening_success),
            StatKey::EfPerFlash => float(&self.ef_per_flash),
            StatKey::FlashAssists => int(&self.flash_assists),
            StatKey::EnemiesFlashed => int(&self.enemies_flashed),
            StatKey::TeammatesFlashed => int(&self.teammates_flashed),
            StatKey::UtilDamage => int(&self.util_damage),
            StatKey::SmokesThrown => int(&self.smokes_thrown),
            StatKey::MolliesThrown => int(&self.mollies_thrown),
            StatKey::HesThrown => int(&self.hes_thrown),
            StatKey::FlashesThrown => int(&self.flashes_thrown),
        }
    }
}

/// The first kill of a round.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningKill {
    pub attacker: PlayerId,
    pub victim: PlayerId,
    pub kill: Kill,
}

/// One entry of a round's chronological timeline. Times are in milliseconds
/// since the round started.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum RoundEvent {
    #[serde(rename = "kill")]
    Kill {
        time: i64,
        killer: PlayerId,
        victim: PlayerId,
        kill: Kill,
    },
    #[serde(rename = "plant")]
    Plant { time: i64, planter: PlayerId },
    #[serde(rename = "defuse")]
    Defuse { time: i64, defuser: PlayerId },
    #[serde(rename = "bomb_explode")]
    BombExplode { time: i64 },
}

impl RoundEvent {
    pub fn time(&self) -> i64 {
        match self {
            Self::Kill { time, .. }
            | Self::Plant { time, .. }
            | Self::Defuse { time, .. }
            | Self::BombExplode { time } => *time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOverview {
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub team_a_side: Side,
    pub team_b_side: Side,
    pub events: Vec<RoundEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoType {
    Pugsetup,
    Esea,
    Faceit,
    Steam,
    Other,
}

impl DemoType {
    /// Display label; unrecognized sources fall back to a generic one.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pugsetup => "PUG",
            Self::Esea => "ESEA match",
            Self::Faceit => "FACEIT match",
            Self::Steam | Self::Other => "Match",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub id: String,
    pub map: String,
    /// Match date at midnight UTC, milliseconds since the epoch.
    pub date_timestamp: i64,
    pub demo_type: DemoType,
    pub player_names: BTreeMap<PlayerId, String>,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub team_a_title: String,
    pub team_b_title: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    pub total_rounds: usize,
    pub teams: BTreeMap<PlayerId, Side>,
    pub start_teams: BTreeMap<PlayerId, Side>,
    pub rounds: Vec<Round>,
    pub half_length: usize,
    pub stats: Stats,
    pub head_to_head: BTreeMap<PlayerId, BTreeMap<PlayerId, u32>>,
    pub kill_feed: Vec<BTreeMap<PlayerId, BTreeMap<PlayerId, Kill>>>,
    pub round_by_round: Vec<RoundOverview>,
    pub opening_kills: Vec<OpeningKill>,
}

/// The assembled match. Constructed once per recording, never mutated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub meta: MetaData,
    pub match_data: MatchData,
}

impl Match {
    pub fn summary(&self) -> MatchInfo {
        MatchInfo {
            id: self.meta.id.clone(),
            map: self.meta.map.clone(),
            date_timestamp: self.meta.date_timestamp,
            team_a_score: self.meta.team_a_score,
            team_b_score: self.meta.team_b_score,
            team_a_title: self.meta.team_a_title.clone(),
            team_b_title: self.meta.team_b_title.clone(),
        }
    }
}

/// Lightweight entry for the match-history listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub id: String,
    pub map: String,
    pub date_timestamp: i64,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub team_a_title: String,
    pub team_b_title: String,
}

/// Orders a history listing by match date, most recent first.
pub fn sort_history(matches: &mut [MatchInfo]) {
    matches.sort_by(|a, b| b.date_timestamp.cmp(&a.date_timestamp));
}
