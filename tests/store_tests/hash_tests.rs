//! Hash store tests

use fastkv::store::HashStore;
use fastkv::{KvError, KvStore};

#[test]
fn test_hash_basic_lifecycle() {
    let store = HashStore::new();

    store.set("foo", "bar").unwrap();
    assert_eq!(store.get("foo").unwrap(), "bar");

    store.delete("foo").unwrap();
    assert!(matches!(store.get("foo"), Err(KvError::NotFound)));

    assert!(matches!(store.range("a", "z"), Err(KvError::Unsupported("hash"))));
}

#[test]
fn test_hash_flush_is_noop() {
    let store = HashStore::new();
    store.set("k", "v").unwrap();
    store.flush().unwrap();
    assert_eq!(store.get("k").unwrap(), "v");
    assert_eq!(store.len(), 1);
}

#[test]
fn test_hash_unsupported_error_names_store() {
    let store = HashStore::new();
    let err = store.range("a", "b").unwrap_err();
    assert_eq!(err.to_string(), "Operation unsupported by hash store");
}
