use serde_json::Value;

use crate::{CodecError, Result, Serde, SerdeFormat};

/// JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerde;

impl Serde for JsonSerde {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CodecError::InvalidValue {
            format: SerdeFormat::Json,
            reason: e.to_string(),
        })
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        serde_json::from_slice(data).map_err(|e| CodecError::InvalidData {
            format: SerdeFormat::Json,
            reason: e.to_string(),
        })
    }

    fn format(&self) -> SerdeFormat { SerdeFormat::Json }
}
