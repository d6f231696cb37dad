//! Ordered-tree store tests

use fastkv::store::BTreeStore;
use fastkv::KvStore;

#[test]
fn test_btree_basic_lifecycle() {
    let store = BTreeStore::new();

    store.set("foo", "bar").unwrap();
    assert_eq!(store.get("foo").unwrap(), "bar");

    store.delete("foo").unwrap();
    assert!(store.get("foo").unwrap_err().is_not_found());

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("c", "3").unwrap();
    assert_eq!(store.range("a", "c").unwrap(), vec!["a", "b"]);

    store.flush().unwrap();
}

#[test]
fn test_btree_range_prefix_scan() {
    let store = BTreeStore::new();
    for i in 0..20 {
        store.set(&format!("user:{:02}", i), "x").unwrap();
        store.set(&format!("order:{:02}", i), "y").unwrap();
    }

    let users = store.range("user:", "user;").unwrap();
    assert_eq!(users.len(), 20);
    assert_eq!(users.first().unwrap(), "user:00");
    assert_eq!(users.last().unwrap(), "user:19");
}

#[test]
fn test_btree_range_start_is_inclusive_end_exclusive() {
    let store = BTreeStore::new();
    for key in ["10", "20", "30"] {
        store.set(key, key).unwrap();
    }
    assert_eq!(store.range("10", "30").unwrap(), vec!["10", "20"]);
    assert_eq!(store.range("11", "31").unwrap(), vec!["20", "30"]);
}
