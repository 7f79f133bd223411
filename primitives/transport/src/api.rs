//! Typed endpoint calls.
//!
//! [`RegistryApi`] issues exactly one transport request per method and
//! decodes the body. It performs no caching and no retries.

use serde::de::DeserializeOwned;
use types::{SchemaId, SchemaPayload, SchemaResponse, SubjectVersion, VersionSelector};

use crate::{DynTransport, Endpoint, Method, Result, TransportError};

/// Typed view over a [`DynTransport`].
#[derive(Clone)]
pub struct RegistryApi {
    transport: DynTransport,
}

impl RegistryApi {
    /// Wraps a transport.
    pub fn new(transport: DynTransport) -> Self { Self { transport } }

    /// The underlying transport.
    pub fn transport(&self) -> &DynTransport { &self.transport }

    /// Schema text for an id, without subject or version.
    pub async fn schema_by_id(&self, id: SchemaId) -> Result<SchemaPayload> {
        self.get(&Endpoint::SchemaById(id)).await
    }

    /// Every (subject, version) an id is registered at, in registry order.
    pub async fn subject_versions_by_id(&self, id: SchemaId) -> Result<Vec<SubjectVersion>> {
        self.get(&Endpoint::SubjectVersionsById(id)).await
    }

    /// Schema formats the registry supports.
    pub async fn schema_types(&self) -> Result<Vec<String>> {
        self.get(&Endpoint::SchemaTypes).await
    }

    /// All subjects.
    pub async fn subjects(&self) -> Result<Vec<String>> { self.get(&Endpoint::Subjects).await }

    /// All versions registered under a subject.
    pub async fn versions(&self, subject: &str) -> Result<Vec<i32>> {
        self.get(&Endpoint::Versions(subject.to_string())).await
    }

    /// The schema registered at an exact subject and version.
    pub async fn schema_by_subject_version(
        &self,
        subject: &str,
        version: i32,
    ) -> Result<SchemaResponse> {
        self.get(&Endpoint::SchemaBySubjectVersion(subject.to_string(), version)).await
    }

    /// The registry's current latest schema for a subject.
    pub async fn latest_schema(&self, subject: &str) -> Result<SchemaResponse> {
        self.get(&Endpoint::LatestSchema(subject.to_string())).await
    }

    /// Ids of schemas that reference the given subject version.
    pub async fn referenced_by(
        &self,
        subject: &str,
        version: VersionSelector,
    ) -> Result<Vec<SchemaId>> {
        self.get(&Endpoint::ReferencedBy(subject.to_string(), version)).await
    }

    /// Deletes a subject and returns the versions it held.
    pub async fn delete_subject(&self, subject: &str, permanent: bool) -> Result<Vec<i32>> {
        let endpoint = Endpoint::DeleteSubject { subject: subject.to_string(), permanent };
        self.call(Method::Delete, &endpoint).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        self.call(Method::Get, endpoint).await
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, endpoint: &Endpoint) -> Result<T> {
        let bytes = self.transport.request(method, &endpoint.path(), None).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            TransportError::Serialization(format!(
                "{} returned an undecodable body: {}",
                endpoint.name(),
                e
            ))
        })
    }
}
