//! The immutable schema record.
//!
//! A [`Schema`] is created only from a successful registry response and is
//! never mutated afterwards; caches hold it behind an `Arc` and replace it
//! wholesale when the registry reports newer content.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wire::SchemaResponse;
use crate::SchemaId;

/// Schema definition format as reported by the registry.
///
/// A missing `schemaType` on the wire means the legacy default (AVRO); the
/// record keeps that absence as `None` rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaType {
    /// Apache Avro
    #[serde(rename = "AVRO")]
    Avro,
    /// Protocol Buffers
    #[serde(rename = "PROTOBUF")]
    Protobuf,
    /// JSON Schema
    #[serde(rename = "JSON", alias = "JSONSCHEMA")]
    JsonSchema,
}

impl SchemaType {
    /// Get the registry's string representation of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Avro => "AVRO",
            SchemaType::Protobuf => "PROTOBUF",
            SchemaType::JsonSchema => "JSON",
        }
    }
}

impl FromStr for SchemaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVRO" => Ok(SchemaType::Avro),
            "PROTOBUF" => Ok(SchemaType::Protobuf),
            "JSON" | "JSONSCHEMA" => Ok(SchemaType::JsonSchema),
            _ => Err(format!("Unknown schema type: {}", s)),
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

/// A named pointer from one schema to another schema it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaReference {
    /// Name under which the referencing schema imports the dependency
    pub name: String,
    /// Subject of the referenced schema
    pub subject: String,
    /// Version of the referenced schema within its subject
    pub version: i32,
}

/// A schema as registered under one subject and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Registry-assigned identifier of the schema content
    pub id: SchemaId,
    /// Subject the schema is registered under
    pub subject: String,
    /// Version within the subject (always positive)
    pub version: i32,
    /// Declared format, `None` for legacy registrations
    #[serde(rename = "schemaType", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Raw schema definition text
    pub schema: String,
    /// Ordered references to other schemas
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SchemaReference>,
}

impl Schema {
    /// Format the schema should be handled as, applying the AVRO default.
    pub fn effective_type(&self) -> SchemaType { self.schema_type.unwrap_or(SchemaType::Avro) }

    /// Whether this record occupies the given subject/version slot.
    pub fn is_at(&self, subject: &str, version: i32) -> bool {
        self.subject == subject && self.version == version
    }
}

/// A registry response that cannot be turned into a [`Schema`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSchema {
    /// The response carried an empty subject.
    #[error("schema {id} has an empty subject")]
    EmptySubject {
        /// Identifier from the response
        id: SchemaId,
    },
    /// The response carried a zero or negative version.
    #[error("schema {id} under '{subject}' has non-positive version {version}")]
    NonPositiveVersion {
        /// Identifier from the response
        id: SchemaId,
        /// Subject from the response
        subject: String,
        /// Offending version
        version: i32,
    },
}

impl TryFrom<SchemaResponse> for Schema {
    type Error = InvalidSchema;

    fn try_from(resp: SchemaResponse) -> Result<Self, Self::Error> {
        if resp.subject.is_empty() {
            return Err(InvalidSchema::EmptySubject { id: resp.id });
        }
        if resp.version <= 0 {
            return Err(InvalidSchema::NonPositiveVersion {
                id: resp.id,
                subject: resp.subject,
                version: resp.version,
            });
        }
        Ok(Schema {
            id: resp.id,
            subject: resp.subject,
            version: resp.version,
            schema_type: resp.schema_type,
            schema: resp.schema,
            references: resp.references,
        })
    }
}
