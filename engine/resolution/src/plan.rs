//! Pure resolution decisions.
//!
//! Nothing in this module performs I/O: given a key and the cache, it says
//! whether the answer is already known and, if not, which registry call
//! comes next.

use std::fmt;
use std::sync::Arc;

use index::SchemaCache;
use types::{Schema, SchemaId, SubjectVersion};

use crate::error::{Operation, RegistryError, Result};

/// What a caller is looking a schema up by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    /// Registry-wide schema id
    Id(SchemaId),
    /// Exact subject and version
    SubjectVersion {
        /// Subject name
        subject: String,
        /// Version within the subject
        version: i32,
    },
    /// The registry's current latest version of a subject
    Latest(String),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Id(id) => write!(f, "id={}", id),
            LookupKey::SubjectVersion { subject, version } => {
                write!(f, "subject={} version={}", subject, version)
            }
            LookupKey::Latest(subject) => write!(f, "subject={} version=latest", subject),
        }
    }
}

/// Next step for a lookup.
#[derive(Debug, Clone)]
pub enum Plan {
    /// Answer is cached
    Hit(Arc<Schema>),
    /// Fetch the (subject, version) locations of an id
    FetchLocations(SchemaId),
    /// Fetch the record at an exact subject and version
    FetchSubjectVersion {
        /// Subject name
        subject: String,
        /// Version within the subject
        version: i32,
    },
    /// Fetch the registry's latest record for a subject
    FetchLatest(String),
}

/// Decides the next step for `key`.
///
/// `cache` is `None` when caching is disabled, in which case every lookup
/// plans a fetch. `Latest` always plans a fetch: the cache only knows the
/// newest version it has seen, not the registry's.
pub fn plan(cache: Option<&SchemaCache>, key: &LookupKey) -> Plan {
    match key {
        LookupKey::Id(id) => match cache.and_then(|c| c.lookup_by_id(*id)) {
            Some(hit) => Plan::Hit(hit),
            None => Plan::FetchLocations(*id),
        },
        LookupKey::SubjectVersion { subject, version } => {
            match cache.and_then(|c| c.lookup_by_subject_version(subject, *version)) {
                Some(hit) => Plan::Hit(hit),
                None => Plan::FetchSubjectVersion { subject: subject.clone(), version: *version },
            }
        }
        LookupKey::Latest(subject) => Plan::FetchLatest(subject.clone()),
    }
}

/// Picks the location to resolve an id through: the first one, in the order
/// the registry listed them.
pub fn choose_location(id: SchemaId, locations: &[SubjectVersion]) -> Result<&SubjectVersion> {
    locations.first().ok_or_else(|| RegistryError::Resolution {
        operation: Operation::GetById,
        key: LookupKey::Id(id).to_string(),
        reason: "registry listed no subject/version for the id".to_string(),
    })
}

/// Confirms that resolving `id` through a subject/version produced it.
///
/// With a cache, the id index is re-consulted after the fill; without one,
/// the fetched record's id must match. A mismatch means the registry mapped
/// the id to a location that holds different content.
pub fn verify_resolved(
    cache: Option<&SchemaCache>,
    id: SchemaId,
    fetched: Arc<Schema>,
) -> Result<Arc<Schema>> {
    let resolved = match cache {
        Some(cache) => cache.lookup_by_id(id),
        None => Some(fetched.clone()).filter(|schema| schema.id == id),
    };
    resolved.ok_or_else(|| RegistryError::Resolution {
        operation: Operation::GetById,
        key: LookupKey::Id(id).to_string(),
        reason: format!(
            "{}/{} resolved to id {} instead",
            fetched.subject, fetched.version, fetched.id
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn schema(id: SchemaId, subject: &str, version: i32) -> Schema {
        Schema {
            id,
            subject: subject.to_string(),
            version,
            schema_type: None,
            schema: "\"string\"".to_string(),
            references: vec![],
        }
    }

    #[test]
    fn test_plan_with_cache() {
        let cache = SchemaCache::new();
        cache.insert(schema(42, "orders", 3));

        assert!(matches!(plan(Some(&cache), &LookupKey::Id(42)), Plan::Hit(s) if s.id == 42));
        assert!(matches!(plan(Some(&cache), &LookupKey::Id(7)), Plan::FetchLocations(7)));
        let sv = LookupKey::SubjectVersion { subject: "orders".into(), version: 3 };
        assert!(matches!(plan(Some(&cache), &sv), Plan::Hit(_)));
        let missing = LookupKey::SubjectVersion { subject: "orders".into(), version: 4 };
        assert!(matches!(
            plan(Some(&cache), &missing),
            Plan::FetchSubjectVersion { version: 4, .. }
        ));
    }

    #[test]
    fn test_latest_always_fetches() {
        let cache = SchemaCache::new();
        cache.insert(schema(42, "orders", 3));
        assert!(matches!(
            plan(Some(&cache), &LookupKey::Latest("orders".into())),
            Plan::FetchLatest(s) if s == "orders"
        ));
    }

    #[test]
    fn test_plan_without_cache() {
        assert!(matches!(plan(None, &LookupKey::Id(42)), Plan::FetchLocations(42)));
    }

    #[test]
    fn test_choose_location_takes_first() {
        let locations = vec![
            SubjectVersion { subject: "orders".into(), version: 3 },
            SubjectVersion { subject: "orders-copy".into(), version: 1 },
        ];
        assert_eq!(choose_location(42, &locations).expect("non-empty").subject, "orders");

        let err = choose_location(99, &[]).expect_err("empty list");
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert_eq!(err.key(), "id=99");
    }

    #[test]
    fn test_verify_resolved() {
        let cache = SchemaCache::new();
        let fetched = cache.insert(schema(41, "orders", 3));
        let err = verify_resolved(Some(&cache), 42, fetched.clone()).expect_err("mismatch");
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(err.to_string().contains("resolved to id 41"));

        assert!(verify_resolved(Some(&cache), 41, fetched.clone()).is_ok());
        assert!(verify_resolved(None, 41, fetched.clone()).is_ok());
        assert!(verify_resolved(None, 42, fetched).is_err());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(LookupKey::Id(42).to_string(), "id=42");
        assert_eq!(
            LookupKey::SubjectVersion { subject: "orders".into(), version: 3 }.to_string(),
            "subject=orders version=3"
        );
        assert_eq!(LookupKey::Latest("orders".into()).to_string(), "subject=orders version=latest");
    }
}
