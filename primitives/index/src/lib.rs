#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Dual-index schema cache.
//!
//! [`SchemaCache`] holds two indices over the same [`Schema`] records:
//!
//! - `by_id`: schema id → record
//! - `by_subject_version`: subject → (version → record)
//!
//! Both maps live behind a single [`parking_lot::RwLock`], so an insert is
//! all-or-nothing with respect to every concurrent lookup: a reader never
//! observes a record in one index and not the other. Guards are always
//! block-scoped and no lock is held across an `.await`.
//!
//! Records are stored as `Arc<Schema>` and lookups hand out clones of the
//! `Arc`; the live maps are never exposed by reference.
//!
//! ## Coherency
//!
//! Every record in the cache is reachable from both indices, and both
//! entries are the same allocation. When an insert displaces an older record
//! from either slot, the older record is also removed from its other slot,
//! so a superseded record is never left half-present.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use types::{Schema, SchemaId};

#[derive(Default)]
struct Indices {
    by_id: HashMap<SchemaId, Arc<Schema>>,
    by_subject_version: HashMap<String, BTreeMap<i32, Arc<Schema>>>,
}

impl Indices {
    fn slot(&self, subject: &str, version: i32) -> Option<&Arc<Schema>> {
        self.by_subject_version.get(subject).and_then(|versions| versions.get(&version))
    }

    /// Removes `record` from the id index if that slot still holds it.
    fn unlink_id(&mut self, record: &Arc<Schema>) {
        if self.by_id.get(&record.id).is_some_and(|held| Arc::ptr_eq(held, record)) {
            self.by_id.remove(&record.id);
        }
    }

    /// Removes `record` from the subject/version index if that slot still holds it.
    fn unlink_subject_version(&mut self, record: &Arc<Schema>) {
        let Some(versions) = self.by_subject_version.get_mut(&record.subject) else {
            return;
        };
        if versions.get(&record.version).is_some_and(|held| Arc::ptr_eq(held, record)) {
            versions.remove(&record.version);
        }
        if versions.is_empty() {
            self.by_subject_version.remove(&record.subject);
        }
    }

    fn insert(&mut self, record: Arc<Schema>) {
        let displaced_slot = self
            .by_subject_version
            .entry(record.subject.clone())
            .or_default()
            .insert(record.version, Arc::clone(&record));
        if let Some(old) = displaced_slot {
            if !Arc::ptr_eq(&old, &record) {
                self.unlink_id(&old);
            }
        }

        let displaced_id = self.by_id.insert(record.id, Arc::clone(&record));
        if let Some(old) = displaced_id {
            if !old.is_at(&record.subject, record.version) {
                self.unlink_subject_version(&old);
            }
        }
    }
}

/// Point-in-time counters for a [`SchemaCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Records currently cached
    pub entries: usize,
    /// Distinct subjects with at least one cached version
    pub subjects: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
}

/// Concurrent dual-index cache of schema records.
#[derive(Default)]
pub struct SchemaCache {
    inner: RwLock<Indices>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SchemaCache {
    /// Create a new empty cache.
    pub fn new() -> Self { Self::default() }

    /// Looks up a record by schema id. Never blocks on I/O.
    pub fn lookup_by_id(&self, id: SchemaId) -> Option<Arc<Schema>> {
        let found = {
            let indices = self.inner.read();
            indices.by_id.get(&id).cloned()
        };
        self.record(found)
    }

    /// Looks up a record by subject and version.
    pub fn lookup_by_subject_version(&self, subject: &str, version: i32) -> Option<Arc<Schema>> {
        let found = {
            let indices = self.inner.read();
            indices.slot(subject, version).cloned()
        };
        self.record(found)
    }

    /// The highest cached version for a subject.
    ///
    /// This is the newest version *this cache has seen*, which can lag the
    /// registry. Callers that need the registry's current latest must fetch.
    pub fn lookup_latest(&self, subject: &str) -> Option<Arc<Schema>> {
        let found = {
            let indices = self.inner.read();
            indices
                .by_subject_version
                .get(subject)
                .and_then(|versions| versions.values().next_back())
                .cloned()
        };
        self.record(found)
    }

    /// Inserts or replaces a record in both indices atomically.
    ///
    /// Returns the `Arc` the cache now holds for the record. Inserting content
    /// equal to what both slots already hold keeps the existing allocation,
    /// so repeated or racing inserts of the same record are idempotent.
    pub fn insert(&self, schema: Schema) -> Arc<Schema> {
        let mut indices = self.inner.write();
        if let Some(existing) = indices.by_id.get(&schema.id) {
            let canonical = **existing == schema
                && indices
                    .slot(&schema.subject, schema.version)
                    .is_some_and(|held| Arc::ptr_eq(held, existing));
            if canonical {
                return Arc::clone(existing);
            }
        }
        let record = Arc::new(schema);
        indices.insert(Arc::clone(&record));
        record
    }

    /// Subjects with at least one cached version, sorted.
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = {
            let indices = self.inner.read();
            indices.by_subject_version.keys().cloned().collect()
        };
        subjects.sort();
        subjects
    }

    /// Cached versions of a subject, ascending.
    pub fn versions(&self, subject: &str) -> Vec<i32> {
        let indices = self.inner.read();
        indices
            .by_subject_version
            .get(subject)
            .map(|versions| versions.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize { self.inner.read().by_id.len() }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Removes every cached version of a subject from both indices.
    ///
    /// Returns the removed records, oldest version first.
    pub fn remove_subject(&self, subject: &str) -> Vec<Arc<Schema>> {
        let mut indices = self.inner.write();
        let Some(versions) = indices.by_subject_version.remove(subject) else {
            return Vec::new();
        };
        let removed: Vec<Arc<Schema>> = versions.into_values().collect();
        for record in &removed {
            indices.unlink_id(record);
        }
        removed
    }

    /// Drops every record from both indices.
    pub fn clear(&self) {
        let mut indices = self.inner.write();
        indices.by_id.clear();
        indices.by_subject_version.clear();
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let (entries, subjects) = {
            let indices = self.inner.read();
            (indices.by_id.len(), indices.by_subject_version.len())
        };
        CacheStats {
            entries,
            subjects,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn record(&self, found: Option<Arc<Schema>>) -> Option<Arc<Schema>> {
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }
}
