#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Core data model for the schema cache.
//!
//! This crate defines the immutable [`Schema`] record shared by every other
//! crate in the workspace, the wire-level DTOs the registry REST API returns,
//! and the [`VersionSelector`] used to address either a concrete version or
//! the registry's notion of "latest".
//!
//! Nothing here performs I/O. Records are constructed from decoded wire
//! payloads through [`TryFrom<SchemaResponse>`] so that malformed responses
//! are rejected before they can reach a cache index.

/// Schema record, schema format tag, and reference triples.
pub mod schema;
/// Version addressing (`latest` or a concrete number).
pub mod version;
/// Wire DTOs for the registry REST API.
pub mod wire;

pub use schema::{InvalidSchema, Schema, SchemaReference, SchemaType};
pub use version::{VersionParseError, VersionSelector};
pub use wire::{ErrorBody, SchemaPayload, SchemaResponse, SubjectVersion};

/// Registry-assigned, globally unique schema identifier.
pub type SchemaId = i32;

/// Media type used for every registry request and response.
pub const CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";
