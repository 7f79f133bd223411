#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Payload codecs for registry-governed messages.
//!
//! Every wire format implements the one [`Serde`] capability: encode a
//! [`serde_json::Value`] to bytes and decode bytes back. The concrete codec is
//! chosen from configuration through [`SerdeFormat`] (or from a schema's
//! declared type through [`for_schema`]), never by inspecting payloads.
//!
//! | Format | Codec | Value shape |
//! |---|---|---|
//! | `string` | [`StringSerde`] | JSON string |
//! | `int` | [`IntSerde`] | JSON integer, decimal text on the wire |
//! | `json` | [`JsonSerde`] | any JSON |
//! | `avro` | [`AvroSerde`] | JSON resolved against an Avro schema |
//!
//! [`framing`] adds and strips the registry's `[0x00][id][payload]` header.

mod avro;
/// Registry wire framing.
pub mod framing;
mod json;
mod scalar;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use types::{Schema, SchemaType};

pub use avro::AvroSerde;
pub use framing::{frame, unframe, MAGIC_BYTE};
pub use json::JsonSerde;
pub use scalar::{IntSerde, StringSerde};

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised while building or running a codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value does not have the shape the codec encodes.
    #[error("Invalid value for {format} codec: {reason}")]
    InvalidValue {
        /// Codec format
        format: SerdeFormat,
        /// What was wrong
        reason: String,
    },
    /// The bytes could not be decoded.
    #[error("Invalid data for {format} codec: {reason}")]
    InvalidData {
        /// Codec format
        format: SerdeFormat,
        /// What was wrong
        reason: String,
    },
    /// The schema text is not a valid Avro schema.
    #[error("Invalid Avro schema: {0}")]
    Schema(String),
    /// No codec exists for the requested format.
    #[error("Unsupported format: {0}")]
    Unsupported(String),
    /// A framed message was malformed.
    #[error("Framing error: {0}")]
    Framing(String),
}

/// Wire format of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerdeFormat {
    /// UTF-8 text
    String,
    /// Decimal integer text
    Int,
    /// JSON document
    #[default]
    Json,
    /// Avro binary datum
    Avro,
}

impl SerdeFormat {
    /// Lower-case format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SerdeFormat::String => "string",
            SerdeFormat::Int => "int",
            SerdeFormat::Json => "json",
            SerdeFormat::Avro => "avro",
        }
    }
}

impl FromStr for SerdeFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(SerdeFormat::String),
            "int" => Ok(SerdeFormat::Int),
            "json" => Ok(SerdeFormat::Json),
            "avro" => Ok(SerdeFormat::Avro),
            other => Err(CodecError::Unsupported(other.to_string())),
        }
    }
}

impl fmt::Display for SerdeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Encode/decode capability shared by every payload format.
pub trait Serde: Send + Sync {
    /// Encodes a value to wire bytes.
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decodes wire bytes to a value.
    fn decode(&self, data: &[u8]) -> Result<Value>;

    /// The format this codec implements.
    fn format(&self) -> SerdeFormat;
}

/// Builds the codec for a configured format.
///
/// `schema` is required for [`SerdeFormat::Avro`] and ignored otherwise.
pub fn build(format: SerdeFormat, schema: Option<&str>) -> Result<Box<dyn Serde>> {
    Ok(match format {
        SerdeFormat::String => Box::new(StringSerde),
        SerdeFormat::Int => Box::new(IntSerde),
        SerdeFormat::Json => Box::new(JsonSerde),
        SerdeFormat::Avro => {
            let schema = schema.ok_or_else(|| {
                CodecError::Schema("the avro codec needs a schema definition".to_string())
            })?;
            Box::new(AvroSerde::new(schema)?)
        }
    })
}

/// Builds the codec matching a registered schema's declared type.
pub fn for_schema(schema: &Schema) -> Result<Box<dyn Serde>> {
    match schema.effective_type() {
        SchemaType::Avro => build(SerdeFormat::Avro, Some(&schema.schema)),
        SchemaType::JsonSchema => build(SerdeFormat::Json, None),
        SchemaType::Protobuf => Err(CodecError::Unsupported(SchemaType::Protobuf.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn registered(schema_type: Option<SchemaType>, text: &str) -> Schema {
        Schema {
            id: 1,
            subject: "orders".to_string(),
            version: 1,
            schema_type,
            schema: text.to_string(),
            references: vec![],
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("AVRO".parse::<SerdeFormat>().expect("known"), SerdeFormat::Avro);
        assert_eq!("int".parse::<SerdeFormat>().expect("known"), SerdeFormat::Int);
        assert!(matches!("xml".parse::<SerdeFormat>(), Err(CodecError::Unsupported(_))));
        assert_eq!(SerdeFormat::default(), SerdeFormat::Json);
    }

    #[test]
    fn test_build_selects_codec() {
        assert_eq!(build(SerdeFormat::String, None).expect("codec").format(), SerdeFormat::String);
        assert_eq!(build(SerdeFormat::Int, None).expect("codec").format(), SerdeFormat::Int);
        assert!(matches!(build(SerdeFormat::Avro, None), Err(CodecError::Schema(_))));

        let avro = build(SerdeFormat::Avro, Some(r#""string""#)).expect("codec");
        let bytes = avro.encode(&json!("hi")).expect("encode");
        assert_eq!(avro.decode(&bytes).expect("decode"), json!("hi"));
    }

    #[test]
    fn test_for_schema_follows_declared_type() {
        let legacy = registered(None, r#""long""#);
        assert_eq!(for_schema(&legacy).expect("avro").format(), SerdeFormat::Avro);

        let json_schema = registered(Some(SchemaType::JsonSchema), r#"{"type":"object"}"#);
        assert_eq!(for_schema(&json_schema).expect("json").format(), SerdeFormat::Json);

        let proto = registered(Some(SchemaType::Protobuf), "syntax = \"proto3\";");
        assert!(matches!(for_schema(&proto), Err(CodecError::Unsupported(_))));
    }
}
