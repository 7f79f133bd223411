//! The registry wire header: `[0x00][schema id, i32 big-endian][payload]`.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use types::SchemaId;

use crate::{CodecError, Result};

/// Leading byte of every framed message.
pub const MAGIC_BYTE: u8 = 0x00;

const HEADER_LEN: usize = 5;

/// Prefixes `payload` with the magic byte and `schema_id`.
pub fn frame(schema_id: SchemaId, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_u8(MAGIC_BYTE);
    buf.put_i32(schema_id);
    buf.put_slice(payload);
    buf.freeze()
}

/// Splits a framed message into its schema id and payload.
pub fn unframe(data: &[u8]) -> Result<(SchemaId, &[u8])> {
    if data.len() < HEADER_LEN {
        return Err(CodecError::Framing(format!(
            "message of {} bytes is shorter than the {} byte header",
            data.len(),
            HEADER_LEN
        )));
    }
    if data[0] != MAGIC_BYTE {
        return Err(CodecError::Framing(format!(
            "invalid magic byte: expected 0x{:02x}, got 0x{:02x}",
            MAGIC_BYTE, data[0]
        )));
    }

    let mut id_bytes = &data[1..HEADER_LEN];
    Ok((id_bytes.get_i32(), &data[HEADER_LEN..]))
}
