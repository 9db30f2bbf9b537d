//! Integration tests for the song store
//!
//! Each test runs against a throwaway database and backup file in a temp dir.

use chordlab_common::db::init_database;
use chordlab_common::{Error, SongStore};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Test helper: store over a fresh database, backup file inside the temp dir
async fn setup_store() -> (SongStore, TempDir) {
    let temp = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&temp.path().join("chordlab.db"))
        .await
        .expect("Should initialize database");
    let store = SongStore::new(pool, temp.path().join("backup").join("songs.json"));
    (store, temp)
}

fn song(id: &str, date: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Song {}", id),
        "dateAnalyzed": date,
        "bpm": 120,
        "chords": [{"time": 0.0, "duration": 2.5, "chord": "C Major", "notes": ["C", "E", "G"]}]
    })
}

fn ids(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_upsert_then_list_round_trip() {
    let (store, _temp) = setup_store().await;
    let record = song("1", "2024-01-01");

    let stored = store.upsert(record.clone()).await.unwrap();
    assert_eq!(stored, record);

    let all = store.list_all().await.unwrap();
    assert_eq!(all, vec![record.clone()]);
    assert_eq!(store.get("1").await.unwrap(), Some(record));
}

#[tokio::test]
async fn test_unknown_fields_pass_through() {
    let (store, _temp) = setup_store().await;
    let record = json!({
        "id": "x",
        "dateAnalyzed": "2024-02-02",
        "key": null,
        "nested": {"deep": [1, 2, {"three": true}]},
        "artist": "Somebody"
    });

    store.upsert(record.clone()).await.unwrap();
    assert_eq!(store.list_all().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_upsert_fully_replaces_existing_record() {
    let (store, _temp) = setup_store().await;
    store
        .upsert(json!({"id": "1", "dateAnalyzed": "2024-01-01", "bpm": 90, "scale": "minor"}))
        .await
        .unwrap();

    let replacement = json!({"id": "1", "dateAnalyzed": "2024-05-05", "name": "Renamed"});
    store.upsert(replacement.clone()).await.unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], replacement);
    assert!(all[0].get("bpm").is_none(), "old fields must disappear");
    assert!(all[0].get("scale").is_none(), "old fields must disappear");
}

#[tokio::test]
async fn test_list_orders_by_date_descending() {
    let (store, _temp) = setup_store().await;
    store.upsert(song("a", "2024-01-01")).await.unwrap();
    store.upsert(song("b", "2024-03-01")).await.unwrap();
    store.upsert(song("c", "2023-12-01")).await.unwrap();

    let dates: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(|r| r["dateAnalyzed"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(dates, vec!["2024-03-01", "2024-01-01", "2023-12-01"]);
}

#[tokio::test]
async fn test_upsert_without_id_is_rejected() {
    let (store, _temp) = setup_store().await;
    store.upsert(song("1", "2024-01-01")).await.unwrap();
    let before = store.list_all().await.unwrap();

    let result = store
        .upsert(json!({"dateAnalyzed": "2024-02-01", "name": "No id"}))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let result = store.upsert(json!({"id": "", "dateAnalyzed": "2024-02-01"})).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    assert_eq!(store.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_delete_removes_record() {
    let (store, _temp) = setup_store().await;
    store.upsert(song("1", "2024-01-01")).await.unwrap();
    store.upsert(song("2", "2024-01-02")).await.unwrap();

    store.delete("1").await.unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(ids(&all), vec!["2"]);
    assert_eq!(store.get("1").await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_unknown_id_is_noop() {
    let (store, _temp) = setup_store().await;
    store.upsert(song("1", "2024-01-01")).await.unwrap();

    store.delete("does-not-exist").await.unwrap();
    store.delete("does-not-exist").await.unwrap();

    assert_eq!(ids(&store.list_all().await.unwrap()), vec!["1"]);
}

#[tokio::test]
async fn test_replace_all_clears_store_and_writes_backup() {
    let (store, _temp) = setup_store().await;
    store.upsert(song("old-1", "2022-01-01")).await.unwrap();
    store.upsert(song("old-2", "2022-06-01")).await.unwrap();

    let r1 = song("r1", "2024-01-01");
    let r2 = song("r2", "2024-02-01");
    let input = vec![r1.clone(), r2.clone()];

    let count = store.replace_all(&input).await.unwrap();
    assert_eq!(count, 2);

    let all = store.list_all().await.unwrap();
    assert_eq!(all, vec![r2, r1]);

    let backup = std::fs::read_to_string(store.backup_path()).unwrap();
    let parsed: Vec<Value> = serde_json::from_str(&backup).unwrap();
    assert_eq!(parsed, input);
    // Pretty-printed for readability
    assert!(backup.contains("\n  {"));
}

#[tokio::test]
async fn test_replace_all_overwrites_previous_backup() {
    let (store, _temp) = setup_store().await;
    store
        .replace_all(&[song("1", "2024-01-01"), song("2", "2024-01-02")])
        .await
        .unwrap();

    store.replace_all(&[song("3", "2024-01-03")]).await.unwrap();

    let backup: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(store.backup_path()).unwrap()).unwrap();
    assert_eq!(ids(&backup), vec!["3"]);
    assert_eq!(ids(&store.list_all().await.unwrap()), vec!["3"]);
}

#[tokio::test]
async fn test_replace_all_with_empty_input() {
    let (store, _temp) = setup_store().await;
    store.upsert(song("1", "2024-01-01")).await.unwrap();

    assert_eq!(store.replace_all(&[]).await.unwrap(), 0);
    assert!(store.list_all().await.unwrap().is_empty());

    let backup = std::fs::read_to_string(store.backup_path()).unwrap();
    assert_eq!(backup, "[]");
}

#[tokio::test]
async fn test_replace_all_stores_records_without_date() {
    let (store, _temp) = setup_store().await;
    let undated = json!({"id": "undated", "name": "No date"});

    store
        .replace_all(&[undated.clone(), song("dated", "2024-01-01")])
        .await
        .unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&undated));
}

#[tokio::test]
async fn test_replace_all_backup_failure_is_export_error() {
    let temp = tempfile::tempdir().unwrap();
    let pool = init_database(&temp.path().join("chordlab.db")).await.unwrap();

    // A directory where the backup file should go makes the write fail
    let backup_path = temp.path().join("songs.json");
    std::fs::create_dir_all(&backup_path).unwrap();
    let store = SongStore::new(pool, backup_path);

    let result = store.replace_all(&[song("1", "2024-01-01")]).await;
    match result {
        Err(Error::Export(message)) => assert!(!message.is_empty()),
        other => panic!("Expected export error, got {:?}", other),
    }

    // Rows written before the file step stay written
    assert_eq!(ids(&store.list_all().await.unwrap()), vec!["1"]);
}

#[tokio::test]
async fn test_replace_all_duplicate_ids_collapse_but_count_input() {
    let (store, _temp) = setup_store().await;
    let first = json!({"id": "dup", "dateAnalyzed": "2024-01-01", "take": 1});
    let second = json!({"id": "dup", "dateAnalyzed": "2024-01-02", "take": 2});
    let no_id_a = json!({"dateAnalyzed": "2023-01-01", "name": "A"});
    let no_id_b = json!({"dateAnalyzed": "2023-02-01", "name": "B"});
    let input = vec![first, second.clone(), no_id_a.clone(), no_id_b.clone()];

    let count = store.replace_all(&input).await.unwrap();
    assert_eq!(count, 4, "count reports every input record");

    // Last record wins for a repeated id; records without id each keep a row
    let all = store.list_all().await.unwrap();
    assert_eq!(all, vec![second, no_id_b, no_id_a]);
    assert_eq!(store.count().await.unwrap(), 3);

    // The backup mirrors the input, duplicates included
    let backup: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(store.backup_path()).unwrap()).unwrap();
    assert_eq!(backup, input);
}

#[tokio::test]
async fn test_replace_all_database_failure_is_export_error() {
    let temp = tempfile::tempdir().unwrap();
    let pool = init_database(&temp.path().join("chordlab.db")).await.unwrap();
    let backup_path = temp.path().join("songs.json");
    let store = SongStore::new(pool.clone(), backup_path.clone());
    pool.close().await;

    let result = store.replace_all(&[song("1", "2024-01-01")]).await;
    match result {
        Err(Error::Export(message)) => assert!(message.contains("Database error")),
        other => panic!("Expected export error, got {:?}", other),
    }

    // The file step never ran
    assert!(!backup_path.exists());
}

#[tokio::test]
async fn test_count_tracks_upserts_and_deletes() {
    let (store, _temp) = setup_store().await;
    assert_eq!(store.count().await.unwrap(), 0);

    store.upsert(song("1", "2024-01-01")).await.unwrap();
    store.upsert(song("1", "2024-01-02")).await.unwrap();
    store.upsert(song("2", "2024-01-03")).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 2);

    store.delete("1").await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);
}
