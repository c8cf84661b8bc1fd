use class_id_common::Fr;
use sha2::{Digest, Sha256};

pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// SHA-256 digest read as a big-endian integer and reduced into the field.
pub fn sha256_fr(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(&sha256(bytes))
}

/// Digest of several byte slices hashed as their concatenation.
pub fn sha256_fr_concat<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Fr {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Fr::from_be_bytes_mod_order(&hasher.finalize())
}
