//! Skip list tests
//!
//! Tests verify:
//! - Insert/lookup/overwrite on the raw list
//! - Level bookkeeping (cap, growth, shrink)
//! - Store wrapper behavior

use fastkv::config::SKIPLIST_MAX_LEVEL;
use fastkv::store::{SkipList, SkipListStore};
use fastkv::{Config, KvStore};

fn seeded_list() -> SkipList {
    SkipList::new(SKIPLIST_MAX_LEVEL, 0.25, Some(1234))
}

// =============================================================================
// Raw List Tests
// =============================================================================

#[test]
fn test_insert_two_keys_out_of_order() {
    let mut sl = seeded_list();
    sl.insert("b", "2");
    sl.insert("a", "1");
    assert_eq!(sl.get("a"), Some("1"));
    assert_eq!(sl.get("b"), Some("2"));
    assert_eq!(sl.get("c"), None);
}

#[test]
fn test_insert_1000_keys_get_all_back() {
    let mut sl = seeded_list();
    for i in (0..1000).rev() {
        sl.insert(&format!("key_{:05}", i), &format!("val_{}", i));
    }
    assert_eq!(sl.len(), 1000);
    for i in 0..1000 {
        assert_eq!(sl.get(&format!("key_{:05}", i)), Some(format!("val_{}", i).as_str()));
    }

    let keys: Vec<&str> = sl.iter().map(|(k, _)| k).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_remove_missing_key_returns_none() {
    let mut sl = seeded_list();
    sl.insert("a", "1");
    assert_eq!(sl.remove("b"), None);
    assert_eq!(sl.remove("a"), Some("1".to_string()));
    assert_eq!(sl.remove("a"), None);
    assert!(sl.is_empty());
}

#[test]
fn test_level_bounded_after_many_inserts() {
    let mut sl = seeded_list();
    for i in 0..50_000 {
        sl.insert(&i.to_string(), "v");
    }
    assert!(sl.level() >= 1);
    assert!(sl.level() <= SKIPLIST_MAX_LEVEL);
    assert_eq!(sl.max_level(), SKIPLIST_MAX_LEVEL);
}

#[test]
fn test_level_cap_is_respected() {
    let mut sl = SkipList::new(3, 0.9, Some(5));
    for i in 0..2_000 {
        sl.insert(&i.to_string(), "v");
    }
    assert_eq!(sl.level(), 3);
}

#[test]
fn test_deleting_top_level_lowers_active_level() {
    let mut sl = seeded_list();
    for i in 0..2_000 {
        sl.insert(&format!("k{:05}", i), "v");
    }
    let top = sl.level();
    assert!(top > 1);

    for key in sl.keys_at_level(top) {
        sl.remove(&key);
    }
    assert!(sl.level() < top);
    assert!(sl.keys_at_level(top).is_empty());
}

#[test]
fn test_deleting_everything_resets_to_one_level() {
    let mut sl = seeded_list();
    for i in 0..300 {
        sl.insert(&i.to_string(), "v");
    }
    for i in 0..300 {
        assert!(sl.remove(&i.to_string()).is_some());
    }
    assert_eq!(sl.level(), 1);
    assert_eq!(sl.iter().count(), 0);
}

#[test]
fn test_range_walks_level_zero() {
    let mut sl = seeded_list();
    for key in ["apple", "banana", "cherry", "date", "elder"] {
        sl.insert(key, "fruit");
    }
    assert_eq!(sl.range("b", "d"), vec!["banana", "cherry"]);
    assert_eq!(sl.range("banana", "banana"), Vec::<String>::new());
    assert_eq!(sl.range("", "zzz").len(), 5);
}

// =============================================================================
// Store Wrapper Tests
// =============================================================================

#[test]
fn test_skiplist_store_basic_lifecycle() {
    let config = Config::builder().skiplist_seed(99).build();
    let store = SkipListStore::with_config(&config);

    store.set("foo", "bar").unwrap();
    assert_eq!(store.get("foo").unwrap(), "bar");

    store.delete("foo").unwrap();
    assert!(store.get("foo").unwrap_err().is_not_found());

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("c", "3").unwrap();
    assert_eq!(store.range("a", "c").unwrap(), vec!["a", "b"]);

    store.flush().unwrap();
    assert!(store.level() <= SKIPLIST_MAX_LEVEL);
}

#[test]
fn test_skiplist_store_overwrite_does_not_grow() {
    let store = SkipListStore::new();
    store.set("k", "1").unwrap();
    let before = store.approximate_bytes();
    store.set("k", "2").unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.approximate_bytes(), before);
}
