use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use worldle_game::{
    Catalog, DailyGame, GameConfig, GameDate, GameRecord, GameSession, HistoryAggregate,
    MemoryStore, PuzzleSelector, SeedFormat,
};

const PUBLISHED_ISO: [usize; 10] = [45, 44, 43, 42, 41, 40, 39, 38, 37, 15];
const PUBLISHED_LEGACY: [usize; 10] = [21, 3, 22, 21, 29, 23, 18, 31, 8, 0];

fn january(day: u32) -> GameDate {
    GameDate::from_ymd(2024, 1, day).unwrap()
}

#[test]
fn published_answers_stay_stable() {
    let catalog = Catalog::bundled().unwrap();
    for (format, expected) in [
        (SeedFormat::Iso, PUBLISHED_ISO),
        (SeedFormat::Legacy, PUBLISHED_LEGACY),
    ] {
        let selector = PuzzleSelector::new(&catalog, format);
        let indices: Vec<usize> = (1..=10).map(|d| selector.index_for(january(d))).collect();
        assert_eq!(indices, expected, "{format:?} answers moved");
    }
}

#[test]
fn catalog_entities_use_camel_case_keys() {
    let catalog = Catalog::bundled().unwrap();
    let value = serde_json::to_value(catalog.get(7).unwrap()).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys.len(),
        6,
        "entity shape changed: {keys:?}"
    );
    for key in ["name", "house", "bloodStatus", "species", "firstAppearance", "occupation"] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(value["species"], "Human/Giant");
}

#[test]
fn history_document_keeps_field_names() {
    let store = MemoryStore::new();
    let mut game = DailyGame::open(
        Catalog::bundled().unwrap(),
        GameConfig::default(),
        store.clone(),
        january(15),
    )
    .unwrap();
    let answer = game.session().mystery().name.clone();
    game.submit(&answer, Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap())
        .unwrap();

    let raw = store.raw("worldle.history").unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let top: BTreeMap<&str, &Value> = value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    assert_eq!(
        top.keys().copied().collect::<Vec<_>>(),
        vec!["currentStreak", "games", "losses", "maxStreak", "totalGames", "wins"]
    );
    let game_doc = &value["games"][0];
    assert_eq!(game_doc["date"], "2024-01-15");
    assert_eq!(game_doc["mysteryEntity"]["name"], "Luna Lovegood");
    assert_eq!(game_doc["attempts"], 1);
    assert_eq!(game_doc["won"], true);
    assert_eq!(game_doc["completedAt"], "2024-01-15T09:30:00Z");

    let record: GameRecord = serde_json::from_value(game_doc.clone()).unwrap();
    assert_eq!(record.mystery.name, "Luna Lovegood");
    let history: HistoryAggregate = serde_json::from_str(&raw).unwrap();
    assert_eq!(history.total_games(), 1);
}

#[test]
fn session_document_carries_catalog_tag() {
    let store = MemoryStore::new();
    let catalog = Catalog::bundled().unwrap();
    let fingerprint = catalog.fingerprint();
    let game =
        DailyGame::open(catalog, GameConfig::default(), store.clone(), january(15)).unwrap();

    let value: Value = serde_json::from_str(&store.raw("worldle.session").unwrap()).unwrap();
    assert_eq!(value["catalog"], format!("{fingerprint:016x}"));
    assert_eq!(value["session"]["status"], "in_progress");
    let session: GameSession = serde_json::from_value(value["session"].clone()).unwrap();
    assert_eq!(&session, game.session());
}
