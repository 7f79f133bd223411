//! Wire DTOs for the registry REST API.
//!
//! These mirror the JSON bodies the registry returns. They are decoded by the
//! transport layer and converted into [`crate::Schema`] records by callers.

use serde::{Deserialize, Serialize};

use crate::schema::{SchemaReference, SchemaType};
use crate::SchemaId;

/// Body of `GET /subjects/{subject}/versions/{version}` (and `.../latest`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaResponse {
    /// Schema identifier
    pub id: SchemaId,
    /// Subject the schema is registered under
    pub subject: String,
    /// Version within the subject
    pub version: i32,
    /// Declared format, absent for legacy AVRO registrations
    #[serde(rename = "schemaType", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Raw schema definition text
    pub schema: String,
    /// References to other schemas
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SchemaReference>,
}

/// Body of `GET /schemas/ids/{id}`: schema text without subject/version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPayload {
    /// Raw schema definition text
    pub schema: String,
    /// Declared format
    #[serde(rename = "schemaType", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// References to other schemas
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SchemaReference>,
}

/// One location a schema id is registered at.
///
/// `GET /schemas/ids/{id}/versions` returns a list of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectVersion {
    /// Subject name
    pub subject: String,
    /// Version within the subject
    pub version: i32,
}

/// Structured error body the registry returns with non-2xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Registry-specific error code (e.g. `40401` subject not found)
    #[serde(default)]
    pub error_code: i32,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_schema_response() {
        let body = r#"{
            "subject": "orders-value",
            "version": 3,
            "id": 42,
            "schemaType": "AVRO",
            "schema": "{\"type\":\"string\"}",
            "references": [{"name": "Customer", "subject": "customers-value", "version": 1}]
        }"#;
        let resp: SchemaResponse = serde_json::from_str(body).expect("valid body");
        assert_eq!(resp.id, 42);
        assert_eq!(resp.schema_type, Some(SchemaType::Avro));
        assert_eq!(resp.references.len(), 1);
        assert_eq!(resp.references[0].subject, "customers-value");
    }

    #[test]
    fn test_decode_legacy_response_without_type() {
        let body = r#"{"subject":"s","version":1,"id":7,"schema":"\"int\""}"#;
        let resp: SchemaResponse = serde_json::from_str(body).expect("valid body");
        assert_eq!(resp.schema_type, None);
        assert!(resp.references.is_empty());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let body = r#"{"subject":"s","version":1,"schema":"\"int\""}"#;
        assert!(serde_json::from_str::<SchemaResponse>(body).is_err());
    }

    #[test]
    fn test_decode_error_body() {
        let body = r#"{"error_code":40401,"message":"Subject 'x' not found."}"#;
        let err: ErrorBody = serde_json::from_str(body).expect("valid body");
        assert_eq!(err.error_code, 40401);
        assert!(err.message.contains("not found"));
    }
}
