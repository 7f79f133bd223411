//! Scalar codecs: plain text and decimal integers.

use serde_json::Value;

use crate::{CodecError, Result, Serde, SerdeFormat};

/// UTF-8 text payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerde;

impl Serde for StringSerde {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::String(s) => Ok(s.as_bytes().to_vec()),
            other => Err(CodecError::InvalidValue {
                format: SerdeFormat::String,
                reason: format!("expected a string, got {}", other),
            }),
        }
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(data).map_err(|e| CodecError::InvalidData {
            format: SerdeFormat::String,
            reason: e.to_string(),
        })?;
        Ok(Value::String(text.to_string()))
    }

    fn format(&self) -> SerdeFormat { SerdeFormat::String }
}

/// Integers carried as decimal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntSerde;

impl Serde for IntSerde {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        value.as_i64().map(|n| n.to_string().into_bytes()).ok_or_else(|| {
            CodecError::InvalidValue {
                format: SerdeFormat::Int,
                reason: format!("expected an integer, got {}", value),
            }
        })
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        let invalid = |reason: String| CodecError::InvalidData { format: SerdeFormat::Int, reason };
        let text = std::str::from_utf8(data).map_err(|e| invalid(e.to_string()))?;
        let n: i64 = text.trim().parse().map_err(|e| invalid(format!("{} ({:?})", e, text)))?;
        Ok(Value::from(n))
    }

    fn format(&self) -> SerdeFormat { SerdeFormat::Int }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_string_codec() {
        assert_eq!(StringSerde.encode(&json!("orders")).expect("encode"), b"orders".to_vec());
        assert_eq!(StringSerde.decode(b"orders").expect("decode"), json!("orders"));
        assert!(matches!(StringSerde.encode(&json!(5)), Err(CodecError::InvalidValue { .. })));
        assert!(matches!(StringSerde.decode(&[0xff, 0xfe]), Err(CodecError::InvalidData { .. })));
    }

    #[test]
    fn test_int_codec() {
        assert_eq!(IntSerde.encode(&json!(-42)).expect("encode"), b"-42".to_vec());
        assert_eq!(IntSerde.decode(b"1234").expect("decode"), json!(1234));
        assert!(IntSerde.encode(&json!("42")).is_err());
        assert!(IntSerde.encode(&json!(1.5)).is_err());
        assert!(IntSerde.decode(b"forty-two").is_err());
    }
}
