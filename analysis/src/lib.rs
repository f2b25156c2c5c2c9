//! Derivation engine for match-review analytics.
//!
//! Takes one complete [`common::RawData`] value and produces the assembled
//! [`common::match_data::Match`]: aggregate stats, composite ratings,
//! head-to-head matrix, opening/trade classification and per-round timelines.
//! Everything here is a pure synchronous transform, callers can run matches
//! in parallel without coordination.

use std::collections::BTreeMap;

use common::{match_data::Match, match_data::MatchData, PlayerId, RawData, Side};

pub mod head_to_head;
pub mod killfeed;
pub mod meta;
pub mod normalize;
pub mod perround;
pub mod rating;
pub mod score;
pub mod utility;

/// Half length used when the short-match heuristic fires.
pub const SHORT_HALF_LENGTH: usize = 8;

/// Weights for the community approximations of the HLTV 2.0 and Impact
/// ratings.
///
/// The defaults are the reverse-engineered coefficients published at
/// https://flashed.gg/posts/reverse-engineering-hltv-rating/ and are applied
/// to KAST as a percentage and ADR unnormalized, the weights absorb the
/// scales. Deviating from these produces ratings that no longer line up with
/// published numbers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RatingWeights {
    pub impact_kpr: f64,
    pub impact_apr: f64,
    pub impact_offset: f64,
    pub hltv_kast: f64,
    pub hltv_kpr: f64,
    pub hltv_dpr: f64,
    pub hltv_impact: f64,
    pub hltv_adr: f64,
    pub hltv_offset: f64,
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self {
            impact_kpr: 2.13,
            impact_apr: 0.42,
            impact_offset: -0.41,
            hltv_kast: 0.0073,
            hltv_kpr: 0.3591,
            hltv_dpr: -0.5329,
            hltv_impact: 0.2372,
            hltv_adr: 0.0032,
            hltv_offset: 0.1587,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Window in which a kill on a teammate's killer counts as a trade.
    pub trade_window_ms: i64,
    /// Follow-up window for crediting flash assists. The upstream parser
    /// applies it when flagging `assistedFlash` on kills; no code path in
    /// this crate reads it, it is carried so the value is part of the shared
    /// contract rather than a hardcoded constant on the parser side.
    pub flash_window_ms: i64,
    /// Round index at which the teams swap sides.
    pub half_length: usize,
    /// Re-derive scores with [`SHORT_HALF_LENGTH`] when the final scores look
    /// like a short (first-to-9) match.
    pub detect_short_match: bool,
    /// Known identifier-to-date fallbacks, consulted before the identifier
    /// pattern is parsed. Loaded once at startup, read-only afterwards.
    pub demo_dates: BTreeMap<String, chrono::NaiveDate>,
    pub weights: RatingWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trade_window_ms: 5000,
            flash_window_ms: 5000,
            half_length: 15,
            detect_short_match: true,
            demo_dates: BTreeMap::new(),
            weights: RatingWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    RoundCountMismatch { rounds: usize, kill_feed: usize },
    DamageLengthMismatch { rounds: usize, damage: usize },
    UnknownPlayer { id: PlayerId },
    UnresolvedWinner { round: usize },
    UnknownWinReason { round: usize, code: i32 },
}

impl core::fmt::Display for DataIntegrityError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RoundCountMismatch { rounds, kill_feed } => write!(
                f,
                "kill feed covers {} rounds but {} rounds were played",
                kill_feed, rounds
            ),
            Self::DamageLengthMismatch { rounds, damage } => write!(
                f,
                "damage covers {} rounds but {} rounds were played",
                damage, rounds
            ),
            Self::UnknownPlayer { id } => {
                write!(f, "player {:?} is missing from the team assignment", id)
            }
            Self::UnresolvedWinner { round } => {
                write!(f, "round {} has no resolved winner", round + 1)
            }
            Self::UnknownWinReason { round, code } => {
                write!(f, "round {} has unknown win reason code {}", round + 1, code)
            }
        }
    }
}

impl std::error::Error for DataIntegrityError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataParseError {
    UnrecognizedFormat { id: String },
    MissingDate { id: String },
}

impl core::fmt::Display for MetadataParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnrecognizedFormat { id } => {
                write!(f, "identifier {:?} does not match the expected pattern", id)
            }
            Self::MissingDate { id } => write!(
                f,
                "identifier {:?} has no date token and no fallback entry",
                id
            ),
        }
    }
}

impl std::error::Error for MetadataParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    Integrity(DataIntegrityError),
    Metadata(MetadataParseError),
}

impl From<DataIntegrityError> for AnalyzeError {
    fn from(value: DataIntegrityError) -> Self {
        Self::Integrity(value)
    }
}

impl From<MetadataParseError> for AnalyzeError {
    fn from(value: MetadataParseError) -> Self {
        Self::Metadata(value)
    }
}

impl core::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Integrity(e) => write!(f, "data integrity: {}", e),
            Self::Metadata(e) => write!(f, "metadata: {}", e),
        }
    }
}

impl std::error::Error for AnalyzeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Integrity(e) => Some(e),
            Self::Metadata(e) => Some(e),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Runs the full derivation pipeline over one match.
#[tracing::instrument(name = "Analyze", skip(config, raw), fields(id = %raw.id))]
pub fn analyze(config: &Config, raw: &RawData) -> Result<Match, AnalyzeError> {
    let normalized = normalize::normalize(raw)?;
    let total_rounds = normalized.rounds.len();
    tracing::info!("Deriving stats over {} rounds", total_rounds);

    let breakdowns = killfeed::classify(config, &raw.kill_feed);

    let mut half_length = config.half_length;
    let (mut team_a_score, _) = score::score(&normalized.rounds, Side::Ct, usize::MAX, half_length);
    let (mut team_b_score, _) = score::score(&normalized.rounds, Side::T, usize::MAX, half_length);

    // A finished match whose scores sum to 16 or less, without either team
    // reaching 16, must have been played as a short (first-to-9) match.
    if config.detect_short_match
        && team_a_score + team_b_score <= 16
        && team_a_score != 16
        && team_b_score != 16
    {
        half_length = SHORT_HALF_LENGTH;
        team_a_score = score::score(&normalized.rounds, Side::Ct, usize::MAX, half_length).0;
        team_b_score = score::score(&normalized.rounds, Side::T, usize::MAX, half_length).0;
        tracing::debug!("Short match detected, half length {}", half_length);
    }

    let stats = rating::compute(config, raw, &normalized, &breakdowns, half_length);
    let head_to_head = head_to_head::matrix(&breakdowns);
    let round_by_round = perround::round_by_round(&normalized.rounds, &breakdowns, half_length);
    let opening_kills = breakdowns
        .iter()
        .filter_map(|breakdown| breakdown.opening.clone())
        .collect();
    let start_teams = score::start_sides(&raw.teams, total_rounds, half_length);

    let meta = meta::resolve(config, raw, &stats.hltv, team_a_score, team_b_score)?;

    Ok(Match {
        meta,
        match_data: MatchData {
            total_rounds,
            teams: raw.teams.clone(),
            start_teams,
            rounds: normalized.rounds,
            half_length,
            stats,
            head_to_head,
            kill_feed: raw.kill_feed.clone(),
            round_by_round,
            opening_kills,
        },
    })
}
