use common::{
    match_data::{sort_history, MatchInfo, RoundEvent, StatKey, Stats},
    Kill, RawData, Side, UtilityCounters,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn sides_use_the_in_game_labels() {
    assert_eq!(serde_json::to_value(Side::Ct).unwrap(), json!("CT"));
    assert_eq!(serde_json::to_value(Side::T).unwrap(), json!("T"));
    assert_eq!(serde_json::from_value::<Side>(json!("T")).unwrap(), Side::T);
}

#[test]
fn kills_serialize_camel_case_with_defaults() {
    let value = json!({
        "weapon": "awp",
        "timeMs": 12_345,
        "isHeadshot": true
    });

    let kill: Kill = serde_json::from_value(value).unwrap();

    assert_eq!(kill.weapon, "awp");
    assert_eq!(kill.time_ms, 12_345);
    assert!(kill.is_headshot);
    // Flag fields the parser omits default to false.
    assert!(!kill.attacker_blind);
    assert!(!kill.through_smoke);
    assert_eq!(kill.penetrated_objects, 0);

    let back = serde_json::to_value(&kill).unwrap();
    assert_eq!(back.get("timeMs"), Some(&json!(12_345)));
    assert_eq!(back.get("assistedFlash"), Some(&json!(false)));
}

#[test]
fn stats_keep_the_legacy_column_names() {
    let mut stats = Stats::default();
    stats.k2.insert("ann".to_owned(), 3);
    stats.hes_thrown.insert("ann".to_owned(), 5);
    stats.headshot_pct.insert("ann".to_owned(), 40.0);

    let value = serde_json::to_value(&stats).unwrap();

    assert_eq!(value["2k"]["ann"], json!(3));
    assert_eq!(value["HEsThrown"]["ann"], json!(5));
    assert_eq!(value["headshotPct"]["ann"], json!(40.0));
    assert!(value.get("k2").is_none());

    // The column keys round-trip through the same names.
    assert_eq!(serde_json::to_value(StatKey::K2).unwrap(), json!("2k"));
    assert_eq!(
        serde_json::to_value(StatKey::HesThrown).unwrap(),
        json!("HEsThrown")
    );
    assert_eq!(
        serde_json::to_value(StatKey::OpeningAttemptsPct).unwrap(),
        json!("openingAttemptsPct")
    );
}

#[test]
fn stat_key_table_covers_every_column() {
    let mut stats = Stats::default();
    stats.kills.insert("ann".to_owned(), 7);
    stats.kd.insert("ann".to_owned(), 1.4);
    stats.kdiff.insert("ann".to_owned(), -2);

    assert_eq!(stats.value(StatKey::Kills, "ann"), 7.0);
    assert_eq!(stats.value(StatKey::Kd, "ann"), 1.4);
    assert_eq!(stats.value(StatKey::Kdiff, "ann"), -2.0);
    // Unknown players read as zero in every column.
    for key in StatKey::ALL {
        assert_eq!(stats.value(key, "nobody"), 0.0);
    }
}

#[test]
fn round_events_are_tagged_by_kind() {
    let plant = RoundEvent::Plant {
        time: 30_000,
        planter: "ann".to_owned(),
    };
    assert_eq!(
        serde_json::to_value(&plant).unwrap(),
        json!({"kind": "plant", "time": 30_000, "planter": "ann"})
    );

    let explode = RoundEvent::BombExplode { time: 70_000 };
    assert_eq!(
        serde_json::to_value(&explode).unwrap(),
        json!({"kind": "bomb_explode", "time": 70_000})
    );

    let defuse: RoundEvent =
        serde_json::from_value(json!({"kind": "defuse", "time": 55_000, "defuser": "bob"}))
            .unwrap();
    assert_eq!(
        defuse,
        RoundEvent::Defuse {
            time: 55_000,
            defuser: "bob".to_owned()
        }
    );
}

#[test]
fn raw_data_accepts_the_minimal_parser_payload() {
    let value = json!({
        "id": "pug_de_dust2_2022-02-02_01",
        "teams": {"ann": "CT", "bob": "T"},
        "rounds": [{"winner": "CT", "reason": 8}],
        "killFeed": [{}]
    });

    let raw: RawData = serde_json::from_value(value).unwrap();

    assert_eq!(raw.teams.get("ann"), Some(&Side::Ct));
    assert_eq!(raw.rounds[0].winner, Some(Side::Ct));
    assert!(raw.rounds[0].planter.is_none());
    assert!(raw.damage.is_empty());
    assert_eq!(raw.utility, UtilityCounters::default());
    assert!(raw.opening_attempts.is_empty());
}

#[test]
fn utility_counters_keep_the_hes_thrown_name() {
    let mut utility = UtilityCounters::default();
    utility.hes_thrown.insert("ann".to_owned(), 2);

    let value = serde_json::to_value(&utility).unwrap();

    assert_eq!(value["HEsThrown"]["ann"], json!(2));
    assert_eq!(value["smokesThrown"], json!({}));
}

#[test]
fn history_sorts_most_recent_first() {
    let entry = |id: &str, ts: i64| MatchInfo {
        id: id.to_owned(),
        map: "de_mirage".to_owned(),
        date_timestamp: ts,
        team_a_score: 16,
        team_b_score: 9,
        team_a_title: "Team A".to_owned(),
        team_b_title: "Team B".to_owned(),
    };

    let mut history = vec![entry("old", 100), entry("new", 300), entry("mid", 200)];
    sort_history(&mut history);

    let ids: Vec<&str> = history.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}
