//! Lazy-fill orchestration over the cache and the registry API.

use std::sync::Arc;

use index::SchemaCache;
use transport::{DynTransport, RegistryApi};
use types::{Schema, SchemaId, SchemaResponse};

use crate::error::{Operation, RegistryError, Result};
use crate::inflight::{FlightGuard, InFlight};
use crate::plan::{choose_location, plan, verify_resolved, LookupKey, Plan};

/// Resolves lookup keys to schema records, filling the cache on misses.
///
/// `cache` is `None` when the owning client was built with caching disabled;
/// every lookup then goes to the registry and nothing is retained.
pub struct Resolver {
    api: RegistryApi,
    cache: Option<Arc<SchemaCache>>,
    in_flight: InFlight<LookupKey>,
}

impl Resolver {
    /// Builds a resolver over a transport and an optional cache.
    pub fn new(transport: DynTransport, cache: Option<Arc<SchemaCache>>) -> Self {
        Self { api: RegistryApi::new(transport), cache, in_flight: InFlight::new() }
    }

    /// Typed registry API used for fetches.
    pub fn api(&self) -> &RegistryApi { &self.api }

    /// The cache, if caching is enabled.
    pub fn cache(&self) -> Option<&Arc<SchemaCache>> { self.cache.as_ref() }

    /// Resolves a schema id.
    ///
    /// On a miss the registry is asked where the id is registered, the first
    /// listed (subject, version) is fetched (filling both indices), and the
    /// id index is consulted again. A record is never fabricated: an empty
    /// location list or a location that yields a different id is a
    /// [`RegistryError::Resolution`].
    pub async fn resolve_by_id(&self, id: SchemaId) -> Result<Arc<Schema>> {
        let key = LookupKey::Id(id);
        if let Plan::Hit(schema) = plan(self.cache_ref(), &key) {
            tracing::trace!(schema_id = id, "Schema id served from cache");
            return Ok(schema);
        }

        let _flight = self.coalesce(&key).await;
        if let Plan::Hit(schema) = plan(self.cache_ref(), &key) {
            tracing::trace!(schema_id = id, "Schema id filled by a concurrent resolution");
            return Ok(schema);
        }

        let locations = self
            .api
            .subject_versions_by_id(id)
            .await
            .map_err(|e| RegistryError::from_transport(Operation::GetById, key.to_string(), e))?;
        let location = choose_location(id, &locations)?;
        tracing::debug!(
            schema_id = id,
            subject = %location.subject,
            version = location.version,
            candidates = locations.len(),
            "Resolving schema id through subject version"
        );

        let fetched = self
            .resolve_subject_version_as(Operation::GetById, &location.subject, location.version)
            .await?;
        verify_resolved(self.cache_ref(), id, fetched)
    }

    /// Resolves an exact subject and version, cache first.
    pub async fn resolve_subject_version(
        &self,
        subject: &str,
        version: i32,
    ) -> Result<Arc<Schema>> {
        self.resolve_subject_version_as(Operation::GetBySubjectVersion, subject, version).await
    }

    /// Fetches the registry's latest version of a subject.
    ///
    /// Never answered from the cache; the fetched record replaces whatever
    /// this cache previously held as the subject's newest version.
    pub async fn resolve_latest(&self, subject: &str) -> Result<Arc<Schema>> {
        let key = LookupKey::Latest(subject.to_string());
        let response = self
            .api
            .latest_schema(subject)
            .await
            .map_err(|e| RegistryError::from_transport(Operation::GetLatest, key.to_string(), e))?;
        let schema = self.store(Operation::GetLatest, &key, response)?;
        tracing::debug!(
            schema_id = schema.id,
            subject = %schema.subject,
            version = schema.version,
            "Latest schema refreshed"
        );
        Ok(schema)
    }

    async fn resolve_subject_version_as(
        &self,
        operation: Operation,
        subject: &str,
        version: i32,
    ) -> Result<Arc<Schema>> {
        let key = LookupKey::SubjectVersion { subject: subject.to_string(), version };
        if let Plan::Hit(schema) = plan(self.cache_ref(), &key) {
            return Ok(schema);
        }

        let _flight = self.coalesce(&key).await;
        if let Plan::Hit(schema) = plan(self.cache_ref(), &key) {
            return Ok(schema);
        }

        let response = self
            .api
            .schema_by_subject_version(subject, version)
            .await
            .map_err(|e| RegistryError::from_transport(operation, key.to_string(), e))?;
        let schema = self.store(operation, &key, response)?;
        tracing::debug!(
            schema_id = schema.id,
            subject = %schema.subject,
            version = schema.version,
            "Schema fetched from registry"
        );
        Ok(schema)
    }

    /// Validates a response and, with caching enabled, inserts it into both indices.
    fn store(
        &self,
        operation: Operation,
        key: &LookupKey,
        response: SchemaResponse,
    ) -> Result<Arc<Schema>> {
        let schema = Schema::try_from(response).map_err(|e| RegistryError::Decode {
            operation,
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(match &self.cache {
            Some(cache) => cache.insert(schema),
            None => Arc::new(schema),
        })
    }

    /// Serializes resolutions of one key. Without a cache there is nothing a
    /// waiter could be served from, so uncached lookups run concurrently.
    async fn coalesce(&self, key: &LookupKey) -> Option<FlightGuard<'_, LookupKey>> {
        match self.cache {
            Some(_) => Some(self.in_flight.acquire(key.clone()).await),
            None => None,
        }
    }

    fn cache_ref(&self) -> Option<&SchemaCache> { self.cache.as_deref() }
}
