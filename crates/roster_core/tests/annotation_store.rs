use roster_core::db::open_db;
use roster_core::db::open_db_in_memory;
use roster_core::{
    Annotation, AnnotationPatch, AnnotationStore, KvRepository, ManualClock, MemoryKvRepository,
    SqliteKvRepository, Status, StoreError, STATE_KEY,
};

fn memory_store(clock: &ManualClock) -> AnnotationStore<MemoryKvRepository, &ManualClock> {
    AnnotationStore::load_with_clock(MemoryKvRepository::new(), clock)
}

#[test]
fn unknown_handles_read_as_default_without_inserting() {
    let clock = ManualClock::new(1_000, 1);
    let store = memory_store(&clock);

    for handle in ["alice", "", "never-seen"] {
        assert_eq!(
            store.get(handle),
            Annotation {
                status: Status::Uncontacted,
                note: String::new(),
                updated_at: 0,
            }
        );
    }
    assert!(store.is_empty());
    assert_eq!(store.repository().entry(STATE_KEY), None);
}

#[test]
fn status_update_keeps_previous_note_and_vice_versa() {
    let clock = ManualClock::new(1_000, 10);
    let mut store = memory_store(&clock);

    store.set_note("alice", "asked about schedule").unwrap();
    store.set_status("alice", Status::Contacted).unwrap();
    store.set_status("alice", Status::Joined).unwrap();
    let after = store.get("alice");
    assert_eq!(after.status, Status::Joined);
    assert_eq!(after.note, "asked about schedule");

    store.set_note("alice", "").unwrap();
    let cleared = store.get("alice");
    assert_eq!(cleared.status, Status::Joined);
    assert_eq!(cleared.note, "");
}

#[test]
fn combined_patch_sets_both_fields() {
    let clock = ManualClock::frozen(5);
    let mut store = memory_store(&clock);

    let written = store
        .update(
            "bob",
            AnnotationPatch {
                status: Some(Status::NotFit),
                note: Some("wrong niche".to_string()),
            },
        )
        .unwrap();

    assert_eq!(written, store.get("bob"));
    assert_eq!(written.status, Status::NotFit);
    assert_eq!(written.note, "wrong niche");
    assert_eq!(written.updated_at, 5);
}

#[test]
fn updated_at_never_decreases_across_updates() {
    let clock = ManualClock::new(100, 7);
    let mut store = memory_store(&clock);

    let mut last = 0;
    for index in 0..5 {
        let written = store.set_note("alice", format!("note {index}")).unwrap();
        assert!(written.updated_at > last);
        last = written.updated_at;
    }

    let frozen_clock = ManualClock::frozen(900);
    let mut frozen = memory_store(&frozen_clock);
    let first = frozen.set_status("carol", Status::Contacted).unwrap();
    let second = frozen.set_status("carol", Status::Joined).unwrap();
    assert_eq!(first.updated_at, second.updated_at);
}

#[test]
fn empty_patch_only_touches_timestamp() {
    let clock = ManualClock::new(50, 50);
    let mut store = memory_store(&clock);
    store.set_status("dana", Status::Contacted).unwrap();

    let written = store.update("dana", AnnotationPatch::default()).unwrap();
    assert_eq!(written.status, Status::Contacted);
    assert_eq!(written.updated_at, 100);
}

#[test]
fn every_update_is_persisted_before_returning() {
    let clock = ManualClock::new(10, 1);
    let mut store = memory_store(&clock);

    store.set_status("alice", Status::Contacted).unwrap();
    let blob = store
        .repository()
        .entry(STATE_KEY)
        .expect("state should be written")
        .to_string();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value["alice"]["status"], "contacted");
    assert_eq!(value["alice"]["note"], "");
    assert_eq!(value["alice"]["updatedAt"], 10);
}

#[test]
fn reset_clears_everything_and_persists_empty_mapping() {
    let clock = ManualClock::new(10, 1);
    let mut store = memory_store(&clock);
    store.set_status("alice", Status::Joined).unwrap();
    store.set_note("bob", "follow up").unwrap();

    store.reset().unwrap();

    assert!(store.is_empty());
    for handle in ["alice", "bob", "carol"] {
        assert_eq!(store.get(handle), Annotation::default());
    }
    assert_eq!(store.repository().entry(STATE_KEY), Some("{}"));

    let reloaded = AnnotationStore::load(store.into_repository());
    assert!(reloaded.is_empty());
}

#[test]
fn malformed_or_missing_state_loads_as_empty() {
    for blob in ["{broken", "[1,2,3]", "\"text\"", "42"] {
        let repo = MemoryKvRepository::new().with_entry(STATE_KEY, blob);
        let store = AnnotationStore::load(repo);
        assert!(store.is_empty(), "blob {blob} should degrade to empty");
    }

    let store = AnnotationStore::load(MemoryKvRepository::new().with_entry(STATE_KEY, "null"));
    assert!(store.is_empty());

    let store = AnnotationStore::load(MemoryKvRepository::new());
    assert!(store.is_empty());
}

#[test]
fn one_bad_entry_does_not_discard_the_others() {
    let blob = r#"{
        "alice":{"status":"joined","note":"signed","updatedAt":100},
        "bob":{"status":"contacted","note":null,"updatedAt":200.5},
        "eve":{"status":"vip","note":"","updatedAt":300}
    }"#;
    let clock = ManualClock::frozen(900);
    let repo = MemoryKvRepository::new().with_entry(STATE_KEY, blob);
    let mut store = AnnotationStore::load_with_clock(repo, &clock);

    assert_eq!(store.len(), 2);
    assert_eq!(store.get("alice").note, "signed");
    assert_eq!(
        store.get("bob"),
        Annotation {
            status: Status::Contacted,
            note: String::new(),
            updated_at: 200,
        }
    );
    assert_eq!(store.get("eve"), Annotation::default());

    store.set_status("carol", Status::Contacted).unwrap();

    let persisted: serde_json::Value = serde_json::from_str(
        store
            .repository()
            .entry(STATE_KEY)
            .expect("state should be written"),
    )
    .unwrap();
    assert_eq!(persisted["alice"]["status"], "joined");
    assert_eq!(persisted["alice"]["note"], "signed");
    assert_eq!(persisted["alice"]["updatedAt"], 100);
    assert_eq!(persisted["bob"]["status"], "contacted");
    assert_eq!(persisted["carol"]["updatedAt"], 900);
    assert!(persisted.get("eve").is_none());
}

#[test]
fn unreadable_storage_loads_as_empty() {
    let mut repo = MemoryKvRepository::new().with_entry(
        STATE_KEY,
        r#"{"alice":{"status":"joined","note":"","updatedAt":1}}"#,
    );
    repo.set_fail_reads(true);

    let store = AnnotationStore::load(repo);
    assert!(store.is_empty());
    assert_eq!(store.get("alice"), Annotation::default());
}

#[test]
fn stored_entries_with_missing_fields_are_filled_with_defaults() {
    let repo = MemoryKvRepository::new().with_entry(STATE_KEY, r#"{"alice":{"note":"hi"}}"#);
    let store = AnnotationStore::load(repo);

    let annotation = store.get("alice");
    assert_eq!(annotation.status, Status::Uncontacted);
    assert_eq!(annotation.note, "hi");
    assert_eq!(annotation.updated_at, 0);
}

#[test]
fn failed_write_rolls_back_memory() {
    let clock = ManualClock::new(10, 1);
    let mut store = memory_store(&clock);
    store.set_note("alice", "first").unwrap();

    let mut repo = store.into_repository();
    repo.set_fail_writes(true);
    let mut store = AnnotationStore::load_with_clock(repo, &clock);

    let err = store.set_note("alice", "second").unwrap_err();
    assert!(matches!(err, StoreError::Persist(_)));
    assert_eq!(store.get("alice").note, "first");

    let err = store.set_status("bob", Status::Joined).unwrap_err();
    assert!(matches!(err, StoreError::Persist(_)));
    assert!(!store.entries().contains_key("bob"));

    store.reset().unwrap_err();
    assert_eq!(store.len(), 1);
}

#[test]
fn sqlite_state_round_trips_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.sqlite3");
    let clock = ManualClock::new(1_700_000_000_000, 1_000);

    let snapshot = {
        let conn = open_db(&path).unwrap();
        let mut store = AnnotationStore::load_with_clock(SqliteKvRepository::new(&conn), &clock);
        store.set_status("alice", Status::Contacted).unwrap();
        store.set_note("alice", "sent \"hello\"\nline two").unwrap();
        store.set_status("bob", Status::NotFit).unwrap();
        store.entries().clone()
    };

    let conn = open_db(&path).unwrap();
    let reloaded = AnnotationStore::load(SqliteKvRepository::new(&conn));
    assert_eq!(reloaded.entries(), &snapshot);
    assert_eq!(reloaded.get("alice").note, "sent \"hello\"\nline two");
}

#[test]
fn sqlite_repository_upserts_single_state_row() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(1, 1);
    {
        let mut store = AnnotationStore::load_with_clock(SqliteKvRepository::new(&conn), &clock);
        store.set_status("alice", Status::Joined).unwrap();
        store.set_status("bob", Status::Joined).unwrap();
        store.reset().unwrap();
    }

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    let repo = SqliteKvRepository::new(&conn);
    assert_eq!(repo.read(STATE_KEY).unwrap().as_deref(), Some("{}"));
}

#[test]
fn sqlite_corrupt_blob_degrades_to_empty() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteKvRepository::new(&conn);
    repo.write(STATE_KEY, "definitely not json").unwrap();

    let store = AnnotationStore::load(repo);
    assert!(store.is_empty());
}
