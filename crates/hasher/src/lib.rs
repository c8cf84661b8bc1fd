pub mod constants;
pub mod merkle;
pub mod poseidon2;
pub mod selector;
pub mod sha256;

pub use constants::{
    GeneratorIndex, ARTIFACT_HASH_VERSION, MAX_PACKED_PUBLIC_BYTECODE_SIZE_IN_FIELDS,
};
pub use merkle::{
    merkle_depth, merkle_root, merkle_root_sequential, merkle_root_with, MerkleHasher,
    Poseidon2MerkleHasher, Sha256MerkleHasher,
};
pub use poseidon2::{
    hash as poseidon2_hash, hash_accumulate as poseidon2_hash_accumulate,
    hash_bytes as poseidon2_hash_bytes, hash_with_separator as poseidon2_hash_with_separator,
};
pub use selector::{
    compute_function_selector, function_selector_from_types, selector_from_signature,
};
pub use sha256::{sha256, sha256_fr};
