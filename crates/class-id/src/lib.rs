//! Deterministic class identifiers for compiled contract artifacts.
//!
//! ```text
//! artifact ── private/utility leaves ── SHA-256 trees ──┐
//!          └─ {name, outputs} ── metadata hash ─────────┴─ artifact hash ─┐
//!          └─ private (selector, vk hash) ── Poseidon2 tree ──────────────┼─ class id
//!          └─ public dispatch bytecode ── packed fields ── accumulate ────┘
//! ```

pub mod artifact_hash;
pub mod class_id;
pub mod options;
pub mod vk;

pub use artifact_hash::{
    compute_artifact_hash, compute_artifact_hash_preimage, compute_artifact_metadata_hash,
    compute_function_tree_root, function_artifact_leaf, ArtifactHashPreimage,
};
pub use class_id::{
    check_deployed_class_id, compute_class_id, compute_class_id_preimage, compute_contract_class,
    compute_contract_class_with, compute_private_functions_root,
    compute_public_bytecode_commitment, private_function_leaf, public_function, ClassIdCheck,
    ClassIdPreimage, ClassIdSource, ContractClass,
};
pub use class_id_common::{load_contract_artifact, load_contract_artifact_from_path};
pub use options::ClassIdOptions;
pub use vk::{hash_vk, vk_as_fields, MegaHonkVkHasher, VerificationKeyHasher};
