//! Verification key hashing.
//!
//! A serialized key is a sequence of 32-byte big-endian field elements. Its
//! hash is the Poseidon2 accumulation of those elements.

use class_id_common::{Fr, MalformedInputError, Result};
use class_id_hasher::poseidon2_hash_accumulate;

/// Hashes a serialized verification key into the private function leaf.
pub trait VerificationKeyHasher: Sync {
    fn hash_vk(&self, vk: &[u8]) -> Result<Fr>;
}

/// Keys laid out as consecutive field elements (MegaHonk flavour).
#[derive(Debug, Clone, Copy, Default)]
pub struct MegaHonkVkHasher;

impl VerificationKeyHasher for MegaHonkVkHasher {
    fn hash_vk(&self, vk: &[u8]) -> Result<Fr> {
        hash_vk(vk)
    }
}

pub fn vk_as_fields(vk: &[u8]) -> Result<Vec<Fr>> {
    if vk.len() % Fr::SIZE_IN_BYTES != 0 {
        return Err(MalformedInputError::InvalidVerificationKeyLength {
            len: vk.len(),
            chunk: Fr::SIZE_IN_BYTES,
        }
        .into());
    }
    let fields = vk
        .chunks_exact(Fr::SIZE_IN_BYTES)
        .map(Fr::from_be_bytes)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(fields)
}

pub fn hash_vk(vk: &[u8]) -> Result<Fr> {
    Ok(poseidon2_hash_accumulate(&vk_as_fields(vk)?))
}

#[cfg(test)]
mod tests {
    use class_id_common::{ClassIdError, EncodingError};
    use class_id_hasher::poseidon2_hash;

    use super::*;

    fn encode(values: &[u64]) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| Fr::from(*v).to_bytes())
            .collect()
    }

    #[test]
    fn decodes_consecutive_words() {
        let fields = vk_as_fields(&encode(&[1, 2, 3])).unwrap();
        assert_eq!(fields, vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)]);
    }

    #[test]
    fn rejects_partial_words() {
        let err = vk_as_fields(&[0u8; 33]).unwrap_err();
        assert!(matches!(
            err,
            ClassIdError::MalformedInput(MalformedInputError::InvalidVerificationKeyLength {
                len: 33,
                chunk: 32
            })
        ));
    }

    #[test]
    fn rejects_words_above_modulus() {
        let err = vk_as_fields(&[0xff; 32]).unwrap_err();
        assert!(matches!(
            err,
            ClassIdError::Encoding(EncodingError::ValueExceedsModulus { .. })
        ));
    }

    #[test]
    fn hash_accumulates_fields() {
        let vk = encode(&[4, 5]);
        let expected = poseidon2_hash(&[Fr::from(4u64), Fr::from(5u64)]);
        assert_eq!(MegaHonkVkHasher.hash_vk(&vk).unwrap(), expected);
        assert_eq!(hash_vk(&[]).unwrap(), Fr::ZERO);
    }
}
