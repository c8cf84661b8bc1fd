//! Packing of byte buffers into fixed-length field vectors.
//!
//! Layout: `[len, chunk_0, chunk_1, ..., 0, 0, ...]` where each chunk holds
//! [`BYTES_PER_FIELD`] bytes right-aligned in a 32-byte word whose leading byte
//! is always zero, keeping the chunk below the modulus.

use crate::errors::{EncodingError, MalformedInputError};
use crate::field::Fr;

/// Payload bytes carried by each packed element.
pub const BYTES_PER_FIELD: usize = Fr::SIZE_IN_BYTES - 1;

/// Number of elements (length prefix included) needed to pack `byte_len` bytes.
pub const fn packed_size(byte_len: usize) -> usize {
    1 + byte_len.div_ceil(BYTES_PER_FIELD)
}

/// Packs `buffer` into exactly `target_len` field elements.
///
/// Fails when the packed form needs more than `target_len` elements.
pub fn buffer_as_fields(buffer: &[u8], target_len: usize) -> Result<Vec<Fr>, EncodingError> {
    let required = packed_size(buffer.len());
    if required > target_len {
        return Err(EncodingError::BufferTooLong {
            required,
            capacity: target_len,
        });
    }

    let mut fields = Vec::with_capacity(target_len);
    fields.push(Fr::from(buffer.len() as u64));
    for chunk in buffer.chunks(BYTES_PER_FIELD) {
        let mut word = [0u8; Fr::SIZE_IN_BYTES];
        word[1..1 + chunk.len()].copy_from_slice(chunk);
        fields.push(Fr::from_be_bytes_mod_order(&word));
    }
    fields.resize(target_len, Fr::ZERO);
    Ok(fields)
}

/// Number of meaningful elements in a packed vector, read from its length prefix.
pub fn packed_len(fields: &[Fr]) -> Result<usize, MalformedInputError> {
    let prefix = fields
        .first()
        .ok_or_else(|| MalformedInputError::InvalidPackedBuffer("missing length prefix".into()))?;
    let byte_len = prefix
        .to_u64()
        .ok()
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| {
            MalformedInputError::InvalidPackedBuffer(format!("length prefix {prefix} too large"))
        })?;
    Ok(packed_size(byte_len))
}

/// Inverse of [`buffer_as_fields`]; trailing zero padding is ignored.
pub fn buffer_from_fields(fields: &[Fr]) -> Result<Vec<u8>, MalformedInputError> {
    let used = packed_len(fields)?;
    if used > fields.len() {
        return Err(MalformedInputError::InvalidPackedBuffer(format!(
            "length prefix requires {used} elements, only {} available",
            fields.len()
        )));
    }
    // The prefix fits in a usize, checked by packed_len.
    let byte_len = fields[0].to_u64().unwrap_or_default() as usize;

    let mut buffer = Vec::with_capacity((used - 1) * BYTES_PER_FIELD);
    for field in &fields[1..used] {
        buffer.extend_from_slice(&field.to_bytes()[1..]);
    }
    buffer.truncate(byte_len);
    Ok(buffer)
}
