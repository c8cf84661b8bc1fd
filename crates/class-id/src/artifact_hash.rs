//! Artifact hash.
//!
//! Commits to the private and utility functions (selector, return types and
//! bytecode of each) and to the contract's public output tables. All hashing
//! here is SHA-256 reduced into the field.

use class_id_common::{
    function_signature_with_names, ContractArtifact, FunctionArtifact, FunctionType, Fr,
    MalformedInputError, Result, Selector,
};
use class_id_hasher::{
    compute_function_selector, merkle_root_with, sha256_fr, Sha256MerkleHasher,
    ARTIFACT_HASH_VERSION,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, span, Level};

use crate::options::ClassIdOptions;

/// Inputs of the artifact hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactHashPreimage {
    pub private_function_root: Fr,
    pub utility_function_root: Fr,
    pub metadata_hash: Fr,
}

impl ArtifactHashPreimage {
    /// `sha256(VERSION || private_root || utility_root || metadata_hash)`
    pub fn hash(&self) -> Fr {
        let mut preimage = Vec::with_capacity(1 + 3 * Fr::SIZE_IN_BYTES);
        preimage.push(ARTIFACT_HASH_VERSION);
        preimage.extend_from_slice(&self.private_function_root.to_bytes());
        preimage.extend_from_slice(&self.utility_function_root.to_bytes());
        preimage.extend_from_slice(&self.metadata_hash.to_bytes());
        sha256_fr(&preimage)
    }
}

/// Hash of the JSON-encoded return types.
pub fn function_metadata_hash(function: &FunctionArtifact) -> Result<Fr> {
    let encoded = serde_json::to_vec(&function.return_types).map_err(MalformedInputError::from)?;
    Ok(sha256_fr(&encoded))
}

/// Leaf of a function in its role's tree, with the selector it is sorted by.
pub fn function_artifact_leaf(function: &FunctionArtifact) -> Result<(Selector, Fr)> {
    let selector = compute_function_selector(&function.name, &function.parameters)?;
    let metadata_hash = function_metadata_hash(function)?;
    let bytecode_hash = sha256_fr(&function.bytecode);

    let mut preimage = Vec::with_capacity(1 + 4 + 2 * Fr::SIZE_IN_BYTES);
    preimage.push(ARTIFACT_HASH_VERSION);
    preimage.extend_from_slice(&selector.to_bytes());
    preimage.extend_from_slice(&metadata_hash.to_bytes());
    preimage.extend_from_slice(&bytecode_hash.to_bytes());

    debug!(
        signature = %function_signature_with_names(&function.name, &function.parameters),
        %selector,
        %bytecode_hash,
        "artifact leaf"
    );
    Ok((selector, sha256_fr(&preimage)))
}

/// Merkle root over the leaves of every function of `function_type`.
///
/// Leaves are ordered by ascending selector; equal selectors keep artifact order.
pub fn compute_function_tree_root(
    artifact: &ContractArtifact,
    function_type: FunctionType,
    options: &ClassIdOptions,
) -> Result<Fr> {
    let functions: Vec<&FunctionArtifact> = artifact.functions_of(function_type).collect();
    let mut leaves = options.map_functions(functions, function_artifact_leaf)?;
    leaves.sort_by_key(|(selector, _)| *selector);

    let leaves: Vec<Fr> = leaves.into_iter().map(|(_, leaf)| leaf).collect();
    let root = merkle_root_with(&leaves, &Sha256MerkleHasher, options.parallel);
    debug!(%function_type, leaves = leaves.len(), %root, "function tree root");
    Ok(root)
}

/// Hash of the canonical JSON of `{name, outputs}`.
///
/// Object keys are emitted in sorted order, so the hash does not depend on the
/// key order of the input document.
pub fn compute_artifact_metadata_hash(artifact: &ContractArtifact) -> Result<Fr> {
    let outputs =
        serde_json::to_value(artifact.outputs.canonicalized()).map_err(MalformedInputError::from)?;
    let mut metadata = Map::new();
    metadata.insert("name".to_string(), Value::String(artifact.name.clone()));
    metadata.insert("outputs".to_string(), outputs);
    let encoded = serde_json::to_vec(&metadata).map_err(MalformedInputError::from)?;
    Ok(sha256_fr(&encoded))
}

pub fn compute_artifact_hash_preimage(
    artifact: &ContractArtifact,
    options: &ClassIdOptions,
) -> Result<ArtifactHashPreimage> {
    let _span = span!(Level::INFO, "artifact_hash", contract = %artifact.name).entered();

    let private_function_root =
        compute_function_tree_root(artifact, FunctionType::Private, options)?;
    let utility_function_root =
        compute_function_tree_root(artifact, FunctionType::Utility, options)?;
    let metadata_hash = compute_artifact_metadata_hash(artifact)?;

    Ok(ArtifactHashPreimage {
        private_function_root,
        utility_function_root,
        metadata_hash,
    })
}

pub fn compute_artifact_hash(artifact: &ContractArtifact, options: &ClassIdOptions) -> Result<Fr> {
    Ok(compute_artifact_hash_preimage(artifact, options)?.hash())
}
