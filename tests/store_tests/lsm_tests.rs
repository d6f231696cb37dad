//! LSM store tests
//!
//! Tests verify:
//! - Auto-flush at the threshold keeps every key readable
//! - The table stays sorted with one entry per key
//! - Memtable entries shadow the table
//! - Both tombstone modes

use fastkv::store::LsmStore;
use fastkv::{Config, KvStore, TombstoneMode};

// =============================================================================
// Helper Functions
// =============================================================================

fn lsm(threshold: usize, tombstones: TombstoneMode) -> LsmStore {
    let config = Config::builder()
        .lsm_flush_threshold(threshold)
        .lsm_tombstones(tombstones)
        .build();
    LsmStore::with_config(&config)
}

fn is_sorted_unique(keys: &[String]) -> bool {
    keys.windows(2).all(|w| w[0] < w[1])
}

// =============================================================================
// Flush and Merge
// =============================================================================

#[test]
fn test_lsm_basic_lifecycle() {
    let store = LsmStore::new();
    assert_eq!(store.threshold(), 1000);
    assert_eq!(store.tombstone_mode(), TombstoneMode::Explicit);

    store.set("foo", "bar").unwrap();
    assert_eq!(store.get("foo").unwrap(), "bar");

    store.delete("foo").unwrap();
    assert!(store.get("foo").unwrap_err().is_not_found());

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("c", "3").unwrap();
    assert_eq!(store.range("a", "c").unwrap(), vec!["a", "b"]);

    store.flush().unwrap();
    assert_eq!(store.memtable_len(), 0);
}

#[test]
fn test_threshold_plus_one_writes_all_readable() {
    let threshold = 1000;
    let store = lsm(threshold, TombstoneMode::Explicit);

    for i in 0..=threshold {
        store.set(&format!("key{}", i), &format!("value{}", i)).unwrap();
    }

    assert_eq!(store.flush_count(), 1);
    assert_eq!(store.table_len(), threshold);
    assert_eq!(store.memtable_len(), 1);
    assert!(is_sorted_unique(&store.table_keys()));

    for i in 0..=threshold {
        assert_eq!(
            store.get(&format!("key{}", i)).unwrap(),
            format!("value{}", i)
        );
    }
}

#[test]
fn test_repeated_flushes_keep_table_sorted_and_deduplicated() {
    let store = lsm(7, TombstoneMode::Explicit);
    for round in 0..5 {
        for i in (0..40).rev() {
            store.set(&format!("k{:03}", i), &format!("r{}", round)).unwrap();
        }
    }
    store.flush().unwrap();

    let keys = store.table_keys();
    assert_eq!(keys.len(), 40);
    assert!(is_sorted_unique(&keys));
    assert_eq!(store.get("k017").unwrap(), "r4");
    assert_eq!(store.len(), 40);
}

#[test]
fn test_memtable_shadows_table() {
    let store = lsm(100, TombstoneMode::Explicit);
    store.set("k", "old").unwrap();
    store.flush().unwrap();
    assert_eq!(store.table_len(), 1);

    store.set("k", "new").unwrap();
    assert_eq!(store.get("k").unwrap(), "new");
    assert_eq!(store.range("a", "z").unwrap(), vec!["k"]);
    assert_eq!(store.len(), 1);

    store.flush().unwrap();
    assert_eq!(store.table_len(), 1);
    assert_eq!(store.get("k").unwrap(), "new");
}

#[test]
fn test_delete_counts_toward_threshold() {
    let store = lsm(2, TombstoneMode::Explicit);
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(store.flush_count(), 1);

    store.delete("a").unwrap();
    store.delete("b").unwrap();
    assert_eq!(store.flush_count(), 2);
    assert_eq!(store.table_len(), 0);
}

// =============================================================================
// Explicit Tombstones
// =============================================================================

#[test]
fn test_explicit_tombstone_shadows_flushed_value() {
    let store = lsm(100, TombstoneMode::Explicit);
    store.set("gone", "v").unwrap();
    store.set("kept", "v").unwrap();
    store.flush().unwrap();

    store.delete("gone").unwrap();
    assert!(store.get("gone").unwrap_err().is_not_found());
    assert_eq!(store.range("a", "z").unwrap(), vec!["kept"]);
    assert!(store.delete("gone").unwrap_err().is_not_found());

    store.flush().unwrap();
    assert_eq!(store.table_keys(), vec!["kept"]);
    assert!(store.get("gone").unwrap_err().is_not_found());
}

#[test]
fn test_explicit_mode_keeps_empty_values() {
    let store = lsm(100, TombstoneMode::Explicit);
    store.set("blank", "").unwrap();
    assert_eq!(store.get("blank").unwrap(), "");
    assert_eq!(store.range("a", "z").unwrap(), vec!["blank"]);
    store.delete("blank").unwrap();
}

// =============================================================================
// Empty-Value Deletes
// =============================================================================

#[test]
fn test_empty_value_delete_reads_back_empty() {
    let store = lsm(100, TombstoneMode::EmptyValue);
    store.set("k", "v").unwrap();
    store.delete("k").unwrap();

    assert_eq!(store.get("k").unwrap(), "");
    assert!(store.range("a", "z").unwrap().is_empty());

    store.flush().unwrap();
    assert_eq!(store.get("k").unwrap(), "");
    assert_eq!(store.table_keys(), vec!["k"]);
}

#[test]
fn test_empty_value_delete_of_absent_key_succeeds() {
    let store = lsm(100, TombstoneMode::EmptyValue);
    store.delete("never").unwrap();
    store.delete("never").unwrap();
    assert_eq!(store.get("never").unwrap(), "");
    assert!(store.is_empty());
}

#[test]
fn test_empty_value_range_skips_deleted_keys() {
    let store = lsm(3, TombstoneMode::EmptyValue);
    for key in ["a", "b", "c", "d", "e"] {
        store.set(key, "v").unwrap();
    }
    store.delete("b").unwrap();
    store.delete("d").unwrap();

    assert_eq!(store.range("a", "f").unwrap(), vec!["a", "c", "e"]);
    assert_eq!(store.len(), 3);
}
