use calcfind_core::personalization::{decode_ids, encode_ids, PersonalizationStore, MAX_RECENT};
use calcfind_core::storage::{
    KeyValueStore, MemoryStore, StorageError, FAVORITES_KEY, RECENT_KEY,
};

struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn toggling_favorite_twice_restores_membership() {
    let mut store = PersonalizationStore::load(MemoryStore::new());
    assert!(!store.is_favorite("tip"));

    assert!(store.toggle_favorite("tip"));
    assert!(store.is_favorite("tip"));

    assert!(!store.toggle_favorite("tip"));
    assert!(!store.is_favorite("tip"));
    assert!(store.favorites().is_empty());
}

#[test]
fn recent_keeps_only_the_newest_eight() {
    let mut store = PersonalizationStore::load(MemoryStore::new());
    for i in 0..10 {
        store.add_to_recent(&format!("calc-{i}"));
    }

    let expected: Vec<String> = (2..10).rev().map(|i| format!("calc-{i}")).collect();
    assert_eq!(store.recent().len(), MAX_RECENT);
    assert_eq!(store.recent(), expected.as_slice());
}

#[test]
fn reopening_recent_promotes_without_duplicating() {
    let mut store = PersonalizationStore::load(MemoryStore::new());
    store.add_to_recent("a");
    store.add_to_recent("b");
    store.add_to_recent("a");

    assert_eq!(store.recent(), ["a".to_string(), "b".to_string()].as_slice());
}

#[test]
fn state_round_trips_through_storage() {
    let backing = MemoryStore::new();
    {
        let mut store = PersonalizationStore::load(backing.clone());
        store.toggle_favorite("bmi");
        store.toggle_favorite("tip");
        store.add_to_recent("loan-payment");
        store.add_to_recent("bmi");
    }

    let reloaded = PersonalizationStore::load(backing.clone());
    assert_eq!(reloaded.favorites(), vec!["bmi".to_string(), "tip".to_string()]);
    assert_eq!(
        reloaded.recent(),
        ["bmi".to_string(), "loan-payment".to_string()].as_slice()
    );

    let empty = PersonalizationStore::load(MemoryStore::new());
    let empty_again = PersonalizationStore::load(MemoryStore::new());
    assert_eq!(empty.state(), empty_again.state());
}

#[test]
fn empty_state_round_trips() {
    let backing = MemoryStore::new();
    {
        let mut store = PersonalizationStore::load(backing.clone());
        store.toggle_favorite("tip");
        store.toggle_favorite("tip");
        store.clear_recent();
    }

    assert_eq!(backing.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    assert_eq!(backing.get(RECENT_KEY).unwrap().as_deref(), Some("[]"));
    let reloaded = PersonalizationStore::load(backing);
    assert!(reloaded.favorites().is_empty());
    assert!(reloaded.recent().is_empty());
}

#[test]
fn corrupt_favorites_slot_loads_as_empty_without_touching_recent() {
    let backing = MemoryStore::new();
    backing.set(FAVORITES_KEY, "{not json").unwrap();
    backing.set(RECENT_KEY, r#"["tip","bmi"]"#).unwrap();

    let store = PersonalizationStore::load(backing);
    assert!(store.favorites().is_empty());
    assert_eq!(store.recent(), ["tip".to_string(), "bmi".to_string()].as_slice());
}

#[test]
fn wrong_shape_in_recent_slot_loads_as_empty() {
    let backing = MemoryStore::new();
    backing.set(RECENT_KEY, r#"{"recent":["tip"]}"#).unwrap();
    backing.set(FAVORITES_KEY, r#"["tip"]"#).unwrap();

    let store = PersonalizationStore::load(backing);
    assert!(store.recent().is_empty());
    assert!(store.is_favorite("tip"));
}

#[test]
fn persisted_recent_is_sanitised_on_load() {
    let backing = MemoryStore::new();
    let ids: Vec<String> = ["a", "b", "a", "c", "d", "e", "f", "g", "h", "i", "j"]
        .iter()
        .map(|id| id.to_string())
        .collect();
    backing.set(RECENT_KEY, &encode_ids(&ids).unwrap()).unwrap();

    let store = PersonalizationStore::load(backing);
    assert_eq!(store.recent().len(), MAX_RECENT);
    assert_eq!(store.recent()[0], "a");
    assert_eq!(store.recent()[1], "b");
    assert_eq!(store.recent()[2], "c");
}

#[test]
fn storage_failures_keep_in_memory_state() {
    let mut store = PersonalizationStore::load(FailingStore);
    assert!(store.favorites().is_empty());

    assert!(store.toggle_favorite("tip"));
    store.add_to_recent("tip");

    assert!(store.is_favorite("tip"));
    assert_eq!(store.recent(), ["tip".to_string()].as_slice());
}

#[test]
fn stale_ids_are_kept_by_the_store() {
    let mut store = PersonalizationStore::load(MemoryStore::new());
    store.toggle_favorite("calculator-that-was-removed");
    assert!(store.is_favorite("calculator-that-was-removed"));
    store.remove_favorite("calculator-that-was-removed");
    assert!(!store.is_favorite("calculator-that-was-removed"));
}

#[test]
fn id_codec_rejects_non_list_payloads() {
    assert!(decode_ids("\"tip\"").is_err());
    assert!(decode_ids("[1, 2]").is_err());
    assert_eq!(decode_ids("[]").unwrap(), Vec::<String>::new());
}
