use analysis::{killfeed, Config};
use common::Kill;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

type Feed = BTreeMap<String, BTreeMap<String, Kill>>;

fn kill(time_ms: i64) -> Kill {
    Kill {
        weapon: "ak47".to_owned(),
        assister: None,
        time_ms,
        is_headshot: false,
        attacker_blind: false,
        assisted_flash: false,
        no_scope: false,
        through_smoke: false,
        penetrated_objects: 0,
    }
}

fn feed(entries: &[(&str, &str, Kill)]) -> Feed {
    let mut feed: Feed = BTreeMap::new();
    for (killer, victim, kill) in entries.iter() {
        feed.entry((*killer).to_owned())
            .or_default()
            .insert((*victim).to_owned(), kill.clone());
    }
    feed
}

#[test]
fn flatten_orders_by_time() {
    let feed = feed(&[
        ("zoe", "ann", kill(100)),
        ("ann", "bob", kill(5_000)),
        ("bob", "zoe", kill(2_500)),
    ]);

    let flat = killfeed::flatten_round(&feed);

    let order: Vec<(&str, i64)> = flat
        .iter()
        .map(|entry| (entry.killer.as_str(), entry.kill.time_ms))
        .collect();
    assert_eq!(order, vec![("zoe", 100), ("bob", 2_500), ("ann", 5_000)]);
}

#[test]
fn flatten_is_stable_on_equal_timestamps() {
    let feed = feed(&[
        ("carl", "dan", kill(3_000)),
        ("abe", "bea", kill(3_000)),
        ("bea", "carl", kill(3_000)),
    ]);

    let flat = killfeed::flatten_round(&feed);
    let again = {
        let mut resorted = flat.clone();
        resorted.sort_by_key(|entry| entry.kill.time_ms);
        resorted
    };

    // Ties keep the deterministic key order of the nested map, and re-sorting
    // an already sorted list changes nothing.
    let killers: Vec<&str> = flat.iter().map(|entry| entry.killer.as_str()).collect();
    assert_eq!(killers, vec!["abe", "bea", "carl"]);
    assert_eq!(flat, again);
}

#[test]
fn flatten_preserves_kill_counts() {
    let rounds = vec![
        feed(&[("a", "x", kill(1_000)), ("b", "y", kill(2_000))]),
        feed(&[("x", "a", kill(1_500))]),
        feed(&[]),
    ];

    let config = Config::default();
    let breakdowns = killfeed::classify(&config, &rounds);

    let flattened: usize = breakdowns.iter().map(|b| b.kills.len()).sum();
    let nested: usize = rounds.iter().map(analysis::normalize::round_kill_count).sum();
    assert_eq!(flattened, nested);
    assert_eq!(flattened, 3);
}

#[test]
fn first_kill_is_the_opening_duel() {
    // "zed" sorts last in the map but shoots first.
    let feed = feed(&[("ann", "bob", kill(9_000)), ("zed", "ann", kill(800))]);

    let breakdown = killfeed::classify_round(&Config::default(), &feed);

    let opening = breakdown.opening.expect("round has kills");
    assert_eq!(opening.attacker, "zed");
    assert_eq!(opening.victim, "ann");
    assert_eq!(opening.kill.time_ms, 800);
}

#[test]
fn kill_inside_window_trades_the_death() {
    let feed = feed(&[
        ("vic", "ann", kill(10_000)),
        ("bob", "vic", kill(14_000)),
    ]);

    let breakdown = killfeed::classify_round(&Config::default(), &feed);

    assert_eq!(breakdown.deaths_traded.get("ann"), Some(&1));
    assert_eq!(breakdown.trade_kills.get("bob"), Some(&1));
}

#[test]
fn kill_at_exactly_the_window_still_counts() {
    let feed = feed(&[
        ("vic", "ann", kill(10_000)),
        ("bob", "vic", kill(15_000)),
    ]);

    let breakdown = killfeed::classify_round(&Config::default(), &feed);

    assert_eq!(breakdown.deaths_traded.get("ann"), Some(&1));
}

#[test]
fn kill_outside_window_is_not_a_trade() {
    let feed = feed(&[
        ("vic", "ann", kill(10_000)),
        ("bob", "vic", kill(15_001)),
    ]);

    let breakdown = killfeed::classify_round(&Config::default(), &feed);

    assert_eq!(breakdown.deaths_traded.get("ann"), None);
    assert_eq!(breakdown.trade_kills.get("bob"), None);
}

#[test]
fn window_is_configurable() {
    let config = Config {
        trade_window_ms: 1_000,
        ..Config::default()
    };
    let feed = feed(&[
        ("vic", "ann", kill(10_000)),
        ("bob", "vic", kill(12_000)),
    ]);

    let breakdown = killfeed::classify_round(&config, &feed);

    assert_eq!(breakdown.deaths_traded.get("ann"), None);
}

#[test]
fn one_avenging_kill_trades_every_victim_of_the_killer() {
    let feed = feed(&[
        ("vic", "ann", kill(1_000)),
        ("vic", "bea", kill(2_000)),
        ("bob", "vic", kill(4_000)),
    ]);

    let breakdown = killfeed::classify_round(&Config::default(), &feed);

    assert_eq!(breakdown.deaths_traded.get("ann"), Some(&1));
    assert_eq!(breakdown.deaths_traded.get("bea"), Some(&1));
    assert_eq!(breakdown.trade_kills.get("bob"), Some(&2));
}

#[test]
fn tallies_cover_assists_and_headshots() {
    let mut headshot = kill(1_000);
    headshot.is_headshot = true;
    headshot.assister = Some("cal".to_owned());

    let mut flashed = kill(2_000);
    flashed.assister = Some("cal".to_owned());
    flashed.assisted_flash = true;

    let feed = feed(&[("ann", "xen", headshot), ("bob", "yve", flashed)]);

    let breakdown = killfeed::classify_round(&Config::default(), &feed);

    assert_eq!(breakdown.headshot_counts.get("ann"), Some(&1));
    assert_eq!(breakdown.assist_counts.get("cal"), Some(&1));
    assert_eq!(breakdown.flash_assist_counts.get("cal"), Some(&1));
    assert_eq!(breakdown.death_counts.get("xen"), Some(&1));
    assert_eq!(breakdown.death_counts.get("yve"), Some(&1));
}
