mod common;

use std::fs;

use common::{catalog, fingerprint_of, results};
use tempfile::tempdir;
use tt_core::{to_canonical_json_bytes, SchemaVersion};
use tt_store::{
    entry_from_bytes, entry_to_bytes, CacheEntry, DirectoryCache, MemoryCache, ScheduleCache,
};

fn entry(byte: char) -> CacheEntry {
    CacheEntry::new(fingerprint_of(byte), results(&catalog()))
}

#[test]
fn memory_cache_round_trips_and_invalidates() {
    let mut cache = MemoryCache::new();
    let stored = entry('a');
    assert_eq!(cache.get(&stored.fingerprint).expect("get"), None);

    cache.put(stored.clone()).expect("put");
    assert_eq!(cache.get(&stored.fingerprint).expect("get"), Some(stored.clone()));
    assert_eq!(cache.get(&fingerprint_of('b')).expect("get"), None);

    assert!(cache.invalidate(&stored.fingerprint).expect("invalidate"));
    assert!(!cache.invalidate(&stored.fingerprint).expect("invalidate"));
    assert!(cache.is_empty());
}

#[test]
fn memory_cache_treats_mismatched_entries_as_misses() {
    let mut cache = MemoryCache::new();
    cache.insert_raw(fingerprint_of('c'), entry('d'));
    assert_eq!(cache.get(&fingerprint_of('c')).expect("get"), None);

    let mut future = entry('e');
    future.schema_version = SchemaVersion::new(2, 0, 0);
    cache.put(future.clone()).expect("put");
    assert_eq!(cache.get(&future.fingerprint).expect("get"), None);

    cache.clear().expect("clear");
    assert_eq!(cache.len(), 0);
}

#[test]
fn directory_cache_persists_across_handles() {
    let dir = tempdir().expect("tempdir");
    let stored = entry('a');
    {
        let mut cache = DirectoryCache::open(dir.path().join("cache")).expect("open");
        cache.put(stored.clone()).expect("put");
    }
    let cache = DirectoryCache::open(dir.path().join("cache")).expect("reopen");
    assert_eq!(cache.get(&stored.fingerprint).expect("get"), Some(stored.clone()));
    assert_eq!(cache.fingerprints().expect("list"), vec![stored.fingerprint.clone()]);

    let on_disk = fs::read(cache.entry_path(&stored.fingerprint)).expect("read");
    assert_eq!(on_disk, to_canonical_json_bytes(&stored).expect("json"));
}

#[test]
fn directory_cache_treats_corrupt_entries_as_misses() {
    let dir = tempdir().expect("tempdir");
    let mut cache = DirectoryCache::open(dir.path()).expect("open");

    let corrupt = fingerprint_of('a');
    fs::write(cache.entry_path(&corrupt), b"{ not json").expect("write");
    assert_eq!(cache.get(&corrupt).expect("get"), None);

    let misplaced = fingerprint_of('b');
    let foreign = entry('c');
    fs::write(
        cache.entry_path(&misplaced),
        to_canonical_json_bytes(&foreign).expect("json"),
    )
    .expect("write");
    assert_eq!(cache.get(&misplaced).expect("get"), None);

    // A fresh put repairs the slot.
    cache.put(entry('a')).expect("put");
    assert!(cache.get(&corrupt).expect("get").is_some());
}

#[test]
fn directory_cache_lists_and_clears_only_entries() {
    let dir = tempdir().expect("tempdir");
    let mut cache = DirectoryCache::open(dir.path()).expect("open");
    cache.put(entry('b')).expect("put");
    cache.put(entry('a')).expect("put");
    fs::write(dir.path().join("notes.txt"), b"keep").expect("write");
    fs::write(dir.path().join("not-a-fingerprint.json"), b"{}").expect("write");

    assert_eq!(
        cache.fingerprints().expect("list"),
        vec![fingerprint_of('a'), fingerprint_of('b')]
    );
    assert!(cache.invalidate(&fingerprint_of('a')).expect("invalidate"));
    assert!(!cache.invalidate(&fingerprint_of('a')).expect("invalidate"));

    cache.clear().expect("clear");
    assert!(cache.fingerprints().expect("list").is_empty());
    assert!(dir.path().join("notes.txt").exists());
    assert!(dir.path().join("not-a-fingerprint.json").exists());
}

#[test]
fn entries_survive_blob_encoding() {
    let stored = entry('f');
    let bytes = entry_to_bytes(&stored).expect("encode");
    assert_eq!(entry_from_bytes(&bytes).expect("decode"), stored);
    assert!(entry_from_bytes(&[0xff, 0x00]).is_err());
}
