use apache_avro::types::Value as AvroValue;
use apache_avro::{from_avro_datum, to_avro_datum, Schema as AvroSchema};
use serde_json::Value;

use crate::{CodecError, Result, Serde, SerdeFormat};

/// Avro binary datums written and read with a single schema.
///
/// JSON values are resolved against the schema before encoding, so objects
/// become records and integers are narrowed to the declared width.
#[derive(Debug, Clone)]
pub struct AvroSerde {
    schema: AvroSchema,
}

impl AvroSerde {
    /// Parses `definition` as an Avro schema.
    pub fn new(definition: &str) -> Result<Self> {
        let schema =
            AvroSchema::parse_str(definition).map_err(|e| CodecError::Schema(e.to_string()))?;
        Ok(Self { schema })
    }

    /// The parsed schema.
    pub fn schema(&self) -> &AvroSchema { &self.schema }
}

impl Serde for AvroSerde {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let invalid = |reason: String| CodecError::InvalidValue { format: SerdeFormat::Avro, reason };
        let datum = AvroValue::from(value.clone())
            .resolve(&self.schema)
            .map_err(|e| invalid(e.to_string()))?;
        to_avro_datum(&self.schema, datum).map_err(|e| invalid(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        let invalid = |reason: String| CodecError::InvalidData { format: SerdeFormat::Avro, reason };
        let datum = from_avro_datum(&self.schema, &mut &data[..], None)
            .map_err(|e| invalid(e.to_string()))?;
        Value::try_from(datum).map_err(|e| invalid(e.to_string()))
    }

    fn format(&self) -> SerdeFormat { SerdeFormat::Avro }
}
