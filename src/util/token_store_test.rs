use super::*;

// =============================================================
// MemoryTokenStore
// =============================================================

#[test]
fn memory_store_starts_empty() {
    assert_eq!(MemoryTokenStore::new().read(), None);
}

#[test]
fn memory_store_write_then_read_returns_exact_payload() {
    let store = MemoryTokenStore::new();
    store.write(r#"{"access":"a.b.c","refresh":"r"}"#);
    assert_eq!(store.read().as_deref(), Some(r#"{"access":"a.b.c","refresh":"r"}"#));
}

#[test]
fn memory_store_write_overwrites_previous() {
    let store = MemoryTokenStore::with_payload("first");
    store.write("second");
    assert_eq!(store.read().as_deref(), Some("second"));
}

#[test]
fn memory_store_clear_is_idempotent() {
    let store = MemoryTokenStore::with_payload("x");
    store.clear();
    store.clear();
    assert_eq!(store.read(), None);
}

#[test]
fn memory_store_clones_share_slot() {
    let store = MemoryTokenStore::new();
    let other = store.clone();
    store.write("shared");
    assert_eq!(other.read().as_deref(), Some("shared"));
}

// =============================================================
// LocalStorageTokenStore (native build has no browser storage)
// =============================================================

#[test]
fn local_storage_store_keeps_key() {
    let store = LocalStorageTokenStore::new("authTokens");
    assert_eq!(store.key(), "authTokens");
}

#[test]
fn local_storage_store_reads_empty_without_browser() {
    let store = LocalStorageTokenStore::new("authTokens");
    store.write("ignored");
    assert_eq!(store.read(), None);
    store.clear();
}

#[test]
fn platform_store_is_usable() {
    let store = platform_store("authTokens");
    store.write("payload");
    assert_eq!(store.read().as_deref(), Some("payload"));
}
