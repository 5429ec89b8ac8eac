use reforest_core::db::{open_db, open_db_in_memory};
use reforest_core::repo::kv_store::{load_object, save_object};
use reforest_core::{
    Category, Content, KeyValueStore, KvWrite, MemoryKeyValueStore, SqliteKeyValueStore, StorageKey,
    StoreError,
};
use rusqlite::Connection;

fn sample_categories() -> Vec<Category> {
    let mut personality = Category::new("personality");
    personality.content_list.push(Content::with_answer(
        "strengths",
        reforest_core::parse_marked("• calm\n\t☑ patient"),
    ));
    vec![personality, Category::new("hobby")]
}

#[test]
fn sqlite_store_puts_gets_and_removes_bytes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();

    assert_eq!(store.get(StorageKey::ProfileImage).unwrap(), None);
    store.put(StorageKey::ProfileImage, &[0, 159, 255]).unwrap();
    store.put(StorageKey::ProfileImage, &[1, 2]).unwrap();

    assert_eq!(store.get(StorageKey::ProfileImage).unwrap(), Some(vec![1, 2]));
    assert_eq!(store.keys().unwrap(), [StorageKey::ProfileImage]);
    assert!(store.remove(StorageKey::ProfileImage).unwrap());
    assert!(!store.remove(StorageKey::ProfileImage).unwrap());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.sqlite3");
    let categories = sample_categories();

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        save_object(&store, StorageKey::MeCategoryModelList, &categories).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let loaded: Vec<Category> = load_object(&store, StorageKey::MeCategoryModelList)
        .unwrap()
        .unwrap();
    assert_eq!(loaded, categories);
}

#[test]
fn sqlite_batch_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_profile_value BEFORE INSERT ON kv_entries
         WHEN NEW.key = 'profileValue'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store.put(StorageKey::Profile, b"{}").unwrap();

    let result = store.apply_batch(&[
        KvWrite::Put(StorageKey::ProfileName, b"\"kim\"".to_vec()),
        KvWrite::Remove(StorageKey::Profile),
        KvWrite::Put(StorageKey::ProfileValue, b"\"v\"".to_vec()),
    ]);

    assert!(matches!(result, Err(StoreError::Db(_))));
    assert_eq!(store.keys().unwrap(), [StorageKey::Profile]);

    store
        .apply_batch(&[
            KvWrite::Put(StorageKey::ProfileName, b"\"kim\"".to_vec()),
            KvWrite::Remove(StorageKey::Profile),
        ])
        .unwrap();
    assert_eq!(store.keys().unwrap(), [StorageKey::ProfileName]);
}

#[test]
fn sqlite_store_skips_unknown_persisted_keys() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value, updated_at) VALUES ('leftover', x'00', 0);",
        [],
    )
    .unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store.put(StorageKey::ProfileName, b"\"kim\"").unwrap();

    assert_eq!(store.keys().unwrap(), [StorageKey::ProfileName]);
}

#[test]
fn sqlite_store_requires_prepared_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKeyValueStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(actual_version, 0);
            assert!(expected_version > 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("bare connection was accepted"),
    }
}

#[test]
fn load_object_reports_decode_errors_with_key() {
    let store = MemoryKeyValueStore::new();
    store.put(StorageKey::MeCategoryModelList, b"{not json").unwrap();

    let err = load_object::<_, Vec<Category>>(&store, StorageKey::MeCategoryModelList).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Decode {
            key: StorageKey::MeCategoryModelList,
            ..
        }
    ));
    assert!(err.to_string().contains("meCategoryModelList"));
}

#[test]
fn memory_store_round_trips_objects() {
    let store = MemoryKeyValueStore::new();
    let categories = sample_categories();

    save_object(&store, StorageKey::MeCategoryModelList, &categories).unwrap();
    let loaded: Option<Vec<Category>> =
        load_object(&store, StorageKey::MeCategoryModelList).unwrap();

    assert_eq!(loaded, Some(categories));
    assert_eq!(
        load_object::<_, String>(&store, StorageKey::ProfileName).unwrap(),
        None
    );
}
