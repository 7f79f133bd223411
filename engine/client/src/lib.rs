#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Registry client facade.
//!
//! [`RegistryClient`] is the one public entry point for schema lookups. It is
//! parameterized by [`ClientOptions`] rather than split into cached and
//! uncached types:
//!
//! - with caching enabled, id and subject/version lookups are answered from
//!   the dual index when possible and fill it on a miss;
//! - with caching disabled, every lookup goes to the registry;
//! - with codec creation enabled, [`RegistryClient::codec_for_id`] builds and
//!   memoizes a payload codec per schema id.
//!
//! `get_latest` always asks the registry. Listings and reverse-reference
//! lookups are passed through uncached.
//!
//! Every failure is a [`RegistryError`] naming the operation and the key.

mod options;

use std::collections::HashMap;
use std::sync::Arc;

use codec::Serde;
use index::{CacheStats, SchemaCache};
use parking_lot::RwLock;
use resolution::{LookupKey, Resolver};
use transport::{AuthConfig, DynTransport, RegistryApi, TransportConfig, TransportError};
use types::{Schema, SchemaId, VersionSelector};

pub use options::ClientOptions;
pub use resolution::{ErrorKind, Operation, RegistryError, Result};

/// Errors raised while building a client from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The HTTP transport could not be constructed.
    #[error("Failed to build registry transport: {0}")]
    Transport(#[from] TransportError),
}

/// Caching client for a schema registry.
///
/// `Send + Sync`; share it behind an `Arc`.
pub struct RegistryClient {
    resolver: Resolver,
    options: ClientOptions,
    codecs: RwLock<HashMap<SchemaId, Arc<dyn Serde>>>,
}

impl RegistryClient {
    /// Builds a client over any transport.
    pub fn new(transport: DynTransport, options: ClientOptions) -> Self {
        let cache = options.cache_enabled.then(|| Arc::new(SchemaCache::new()));
        tracing::debug!(
            endpoint = transport.endpoint(),
            cache_enabled = options.cache_enabled,
            codec_creation_enabled = options.codec_creation_enabled,
            "Registry client created"
        );
        Self {
            resolver: Resolver::new(transport, cache),
            options,
            codecs: RwLock::new(HashMap::new()),
        }
    }

    /// Builds an HTTP client from a validated [`config::Config`].
    pub fn from_config(config: &config::Config) -> std::result::Result<Self, BuildError> {
        config.validate()?;
        let transport = http::HttpTransport::from_config(&transport_config(&config.registry))?;
        Ok(Self::new(Arc::new(transport), ClientOptions::from(&config.cache)))
    }

    /// The options this client was built with.
    pub fn options(&self) -> ClientOptions { self.options }

    /// Base URL of the registry.
    pub fn endpoint(&self) -> &str { self.api().transport().endpoint() }

    /// Schema registered under `id`.
    pub async fn get_by_id(&self, id: SchemaId) -> Result<Arc<Schema>> {
        self.resolver.resolve_by_id(id).await
    }

    /// Schema registered at exactly `subject` / `version`.
    ///
    /// `version` must be positive; use [`RegistryClient::get_latest`] or
    /// [`RegistryClient::get_by_selector`] for the latest version.
    pub async fn get_by_subject_version(
        &self,
        subject: &str,
        version: i32,
    ) -> Result<Arc<Schema>> {
        if version <= 0 {
            return Err(RegistryError::Resolution {
                operation: Operation::GetBySubjectVersion,
                key: LookupKey::SubjectVersion { subject: subject.to_string(), version }
                    .to_string(),
                reason: format!("version must be positive, got {}", version),
            });
        }
        self.resolver.resolve_subject_version(subject, version).await
    }

    /// The registry's current latest schema for `subject`. Always remote.
    pub async fn get_latest(&self, subject: &str) -> Result<Arc<Schema>> {
        self.resolver.resolve_latest(subject).await
    }

    /// Dispatches on a parsed [`VersionSelector`].
    pub async fn get_by_selector(
        &self,
        subject: &str,
        selector: VersionSelector,
    ) -> Result<Arc<Schema>> {
        match selector {
            VersionSelector::Number(version) => self.get_by_subject_version(subject, version).await,
            VersionSelector::Latest => self.get_latest(subject).await,
        }
    }

    /// All subjects known to the registry.
    pub async fn list_subjects(&self) -> Result<Vec<String>> {
        self.api()
            .subjects()
            .await
            .map_err(|e| RegistryError::from_transport(Operation::ListSubjects, "subjects", e))
    }

    /// All versions registered under `subject`.
    pub async fn list_versions(&self, subject: &str) -> Result<Vec<i32>> {
        self.api().versions(subject).await.map_err(|e| {
            RegistryError::from_transport(Operation::ListVersions, subject_key(subject), e)
        })
    }

    /// Ids of schemas referencing `subject` at `version`.
    pub async fn get_referenced_by(
        &self,
        subject: &str,
        version: VersionSelector,
    ) -> Result<Vec<SchemaId>> {
        self.api().referenced_by(subject, version).await.map_err(|e| {
            let key = format!("{} version={}", subject_key(subject), version);
            RegistryError::from_transport(Operation::GetReferencedBy, key, e)
        })
    }

    /// Schema formats the registry supports.
    pub async fn list_schema_types(&self) -> Result<Vec<String>> {
        self.api()
            .schema_types()
            .await
            .map_err(|e| RegistryError::from_transport(Operation::ListSchemaTypes, "types", e))
    }

    /// Payload codec for the schema registered under `id`.
    ///
    /// The codec is built on first use from the schema's declared type and
    /// reused afterwards.
    ///
    /// # Errors
    /// [`RegistryError::CodecDisabled`] unless the client was built with
    /// codec creation; [`RegistryError::Codec`] when the schema has no codec
    /// or its text does not parse; any lookup error of
    /// [`RegistryClient::get_by_id`].
    pub async fn codec_for_id(&self, id: SchemaId) -> Result<Arc<dyn Serde>> {
        let key = LookupKey::Id(id);
        if !self.options.codec_creation_enabled {
            return Err(RegistryError::CodecDisabled {
                operation: Operation::CodecForId,
                key: key.to_string(),
            });
        }
        if let Some(codec) = self.codecs.read().get(&id) {
            return Ok(Arc::clone(codec));
        }

        let schema = self.get_by_id(id).await?;
        let built: Arc<dyn Serde> = codec::for_schema(&schema)
            .map_err(|e| RegistryError::Codec {
                operation: Operation::CodecForId,
                key: key.to_string(),
                reason: e.to_string(),
            })?
            .into();
        tracing::debug!(schema_id = id, format = %built.format(), "Payload codec built");

        Ok(Arc::clone(self.codecs.write().entry(id).or_insert(built)))
    }

    /// Deletes `subject` from the registry and forgets its cached versions.
    ///
    /// Returns the versions the registry reports as deleted. Records are
    /// dropped from both indices together, along with any codecs built for
    /// them, so a later lookup of the subject goes back to the registry.
    pub async fn delete_subject(&self, subject: &str, permanent: bool) -> Result<Vec<i32>> {
        let versions = self.api().delete_subject(subject, permanent).await.map_err(|e| {
            RegistryError::from_transport(Operation::DeleteSubject, subject_key(subject), e)
        })?;
        let removed = self.resolver.cache().map(|c| c.remove_subject(subject)).unwrap_or_default();
        if !removed.is_empty() {
            let mut codecs = self.codecs.write();
            for schema in &removed {
                codecs.remove(&schema.id);
            }
        }
        tracing::debug!(
            subject,
            permanent,
            deleted = versions.len(),
            evicted = removed.len(),
            "Subject deleted"
        );
        Ok(versions)
    }

    /// Statistics of the local cache, or `None` with caching disabled.
    pub fn cache(&self) -> Option<CacheStats> { self.resolver.cache().map(|c| c.stats()) }

    /// Drops every cached schema and codec.
    pub fn clear_cache(&self) {
        if let Some(cache) = self.resolver.cache() {
            cache.clear();
        }
        self.codecs.write().clear();
    }

    fn api(&self) -> &RegistryApi { self.resolver.api() }
}

fn subject_key(subject: &str) -> String { format!("subject={}", subject) }

/// Maps the `[registry]` config section onto the transport's settings.
///
/// A token selects bearer auth; otherwise a username selects basic auth.
pub fn transport_config(registry: &config::RegistryConfig) -> TransportConfig {
    let auth = match (&registry.token, &registry.username) {
        (Some(token), _) => Some(AuthConfig {
            auth_type: "bearer".to_string(),
            username: None,
            password: None,
            token: Some(token.clone()),
        }),
        (None, Some(username)) => Some(AuthConfig {
            auth_type: "basic".to_string(),
            username: Some(username.clone()),
            password: registry.password.clone(),
            token: None,
        }),
        (None, None) => None,
    };
    TransportConfig { endpoint: registry.url.clone(), timeout_secs: registry.timeout_secs, auth }
}
