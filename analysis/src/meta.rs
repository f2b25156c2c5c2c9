//! Match metadata resolution: map and date from the recording identifier,
//! recording-source classification and team titles.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use common::{
    match_data::{DemoType, MetaData},
    PlayerId, RawData, Side,
};

use crate::{Config, MetadataParseError};

/// Classifies the recording source from the identifier prefix. Unrecognized
/// prefixes degrade to [`DemoType::Other`] and a generic display label.
pub fn demo_type(id: &str) -> DemoType {
    // Valve matchmaking demos use the share-code style "1-<guid>" naming.
    if id.starts_with("1-") {
        return DemoType::Steam;
    }

    match id.split('_').next().unwrap_or("") {
        "pug" | "pugsetup" => DemoType::Pugsetup,
        "esea" => DemoType::Esea,
        "faceit" => DemoType::Faceit,
        "steam" => DemoType::Steam,
        _ => DemoType::Other,
    }
}

/// Parses `<source>_<map tokens>_<ISO date>_<suffix>` identifiers, e.g.
/// `pug_de_mirage_2022-01-15_06` -> (`de_mirage`, 2022-01-15). The map is
/// every token between the source prefix and the first date token.
pub fn parse_identifier(id: &str) -> Result<(String, NaiveDate), MetadataParseError> {
    let tokens: Vec<&str> = id.split('_').collect();

    let date_token = tokens.iter().enumerate().find_map(|(index, token)| {
        NaiveDate::parse_from_str(token, "%Y-%m-%d")
            .ok()
            .map(|date| (index, date))
    });

    match date_token {
        Some((index, date)) if index >= 2 => Ok((tokens[1..index].join("_"), date)),
        Some(_) => Err(MetadataParseError::UnrecognizedFormat { id: id.to_owned() }),
        None => Err(MetadataParseError::MissingDate { id: id.to_owned() }),
    }
}

/// Map-name fallback for identifiers listed in the date table but not
/// matching the date-token grammar: everything after the source prefix,
/// taken verbatim. Date-looking tokens and numeric suffixes are kept, the
/// table entry vouches for the identifier as a whole.
fn fallback_map_name(id: &str) -> Result<String, MetadataParseError> {
    let tokens: Vec<&str> = id.split('_').collect();
    if tokens.len() < 2 {
        return Err(MetadataParseError::UnrecognizedFormat { id: id.to_owned() });
    }
    Ok(tokens[1..].join("_"))
}

pub fn resolve(
    config: &Config,
    raw: &RawData,
    hltv: &BTreeMap<PlayerId, f64>,
    team_a_score: u32,
    team_b_score: u32,
) -> Result<MetaData, MetadataParseError> {
    // The injected fallback table wins over the parsed date token.
    let (map, date) = match parse_identifier(&raw.id) {
        Ok((map, date)) => (map, config.demo_dates.get(&raw.id).copied().unwrap_or(date)),
        Err(error) => match config.demo_dates.get(&raw.id) {
            Some(date) => (fallback_map_name(&raw.id)?, *date),
            None => return Err(error),
        },
    };

    let date_timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();

    Ok(MetaData {
        id: raw.id.clone(),
        map,
        date_timestamp,
        demo_type: demo_type(&raw.id),
        player_names: raw.player_names.clone(),
        team_a_score,
        team_b_score,
        team_a_title: team_title(raw.ct_clan_tag.as_deref(), raw, hltv, Side::Ct),
        team_b_title: team_title(raw.t_clan_tag.as_deref(), raw, hltv, Side::T),
    })
}

/// Title for the team holding `side` in the second half: the clan tag when
/// one was seen, otherwise `team_<name>` of the side's highest-rated player.
fn team_title(
    clan_tag: Option<&str>,
    raw: &RawData,
    hltv: &BTreeMap<PlayerId, f64>,
    side: Side,
) -> String {
    if let Some(tag) = clan_tag.filter(|tag| !tag.is_empty()) {
        return tag.to_owned();
    }

    let top_player = raw
        .teams
        .iter()
        .filter(|(_, player_side)| **player_side == side)
        .map(|(player, _)| player)
        .max_by(|a, b| {
            let rating_a = common::stat_or_zero(hltv, a);
            let rating_b = common::stat_or_zero(hltv, b);
            rating_a
                .partial_cmp(&rating_b)
                .unwrap_or(core::cmp::Ordering::Equal)
        });

    match top_player {
        Some(player) => {
            let name = raw.player_names.get(player).unwrap_or(player);
            format!("team_{}", name)
        }
        None => match side {
            Side::Ct => "Team A".to_owned(),
            Side::T => "Team B".to_owned(),
        },
    }
}
