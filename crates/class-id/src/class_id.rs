//! Contract class identifier.
//!
//! The class ID is `H(CONTRACT_LEAF, artifact_hash, private_functions_root,
//! public_bytecode_commitment)`, Poseidon2 with domain separation. The private
//! functions root commits to each private function's selector and verification
//! key; the public commitment covers the packed bytecode of the single public
//! dispatch function.

use std::fmt;

use class_id_common::{
    buffer_as_fields, function_signature_with_names, packed_len, ContractArtifact,
    ContractShapeError, FunctionArtifact, FunctionType, Fr, Result, Selector,
};
use class_id_hasher::{
    compute_function_selector, merkle_root_with, poseidon2_hash_accumulate,
    poseidon2_hash_with_separator, GeneratorIndex, Poseidon2MerkleHasher,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, Level};

use crate::artifact_hash::{compute_artifact_hash_preimage, ArtifactHashPreimage};
use crate::options::ClassIdOptions;
use crate::vk::{MegaHonkVkHasher, VerificationKeyHasher};

/// The three values hashed into a class ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassIdPreimage {
    pub artifact_hash: Fr,
    pub private_functions_root: Fr,
    pub public_bytecode_commitment: Fr,
}

impl ClassIdPreimage {
    pub fn class_id(&self) -> Fr {
        poseidon2_hash_with_separator(
            &[
                self.artifact_hash,
                self.private_functions_root,
                self.public_bytecode_commitment,
            ],
            GeneratorIndex::ContractLeaf,
        )
    }
}

/// A derived class ID together with every intermediate commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractClass {
    pub id: Fr,
    #[serde(flatten)]
    pub preimage: ClassIdPreimage,
    pub artifact_hash_preimage: ArtifactHashPreimage,
}

impl fmt::Display for ContractClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "artifact hash:              {}", self.preimage.artifact_hash)?;
        writeln!(
            f,
            "private functions root:     {}",
            self.preimage.private_functions_root
        )?;
        writeln!(
            f,
            "public bytecode commitment: {}",
            self.preimage.public_bytecode_commitment
        )?;
        write!(f, "class id:                   {}", self.id)
    }
}

/// `H(FUNCTION_LEAF, selector, vk_hash)`
pub fn private_function_leaf(selector: Selector, vk_hash: Fr) -> Fr {
    poseidon2_hash_with_separator(&[selector.to_field(), vk_hash], GeneratorIndex::FunctionLeaf)
}

pub fn compute_private_functions_root(
    artifact: &ContractArtifact,
    vk_hasher: &dyn VerificationKeyHasher,
    options: &ClassIdOptions,
) -> Result<Fr> {
    let functions: Vec<&FunctionArtifact> = artifact.functions_of(FunctionType::Private).collect();
    let mut leaves = options.map_functions(functions, |function| {
        let selector = compute_function_selector(&function.name, &function.parameters)?;
        let vk_hash = match &function.verification_key {
            Some(vk) => vk_hasher.hash_vk(vk)?,
            None => Fr::ZERO,
        };
        debug!(
            signature = %function_signature_with_names(&function.name, &function.parameters),
            %selector,
            %vk_hash,
            "private function"
        );
        Ok((selector, private_function_leaf(selector, vk_hash)))
    })?;
    leaves.sort_by_key(|(selector, _)| *selector);

    let leaves: Vec<Fr> = leaves.into_iter().map(|(_, leaf)| leaf).collect();
    Ok(merkle_root_with(
        &leaves,
        &Poseidon2MerkleHasher::new(GeneratorIndex::FunctionLeaf),
        options.parallel,
    ))
}

/// The single public function, if any.
///
/// Contracts route every public call through one dispatch function; finding
/// more than one is a shape error.
pub fn public_function(artifact: &ContractArtifact) -> Result<Option<&FunctionArtifact>> {
    let public: Vec<&FunctionArtifact> = artifact.functions_of(FunctionType::Public).collect();
    match public.as_slice() {
        [] => Ok(None),
        [function] => Ok(Some(*function)),
        _ => Err(ContractShapeError::MultiplePublicFunctions {
            names: public.iter().map(|f| f.name.clone()).collect(),
        }
        .into()),
    }
}

/// Poseidon2 accumulation of the meaningful prefix of the packed public bytecode.
pub fn compute_public_bytecode_commitment(
    artifact: &ContractArtifact,
    options: &ClassIdOptions,
) -> Result<Fr> {
    let Some(function) = public_function(artifact)? else {
        return Ok(Fr::ZERO);
    };
    if function.bytecode.is_empty() {
        return Ok(Fr::ZERO);
    }
    let fields = buffer_as_fields(
        &function.bytecode,
        options.max_packed_public_bytecode_fields,
    )?;
    let len = packed_len(&fields)?;
    debug!(
        function = %function.name,
        bytes = function.bytecode.len(),
        fields = len,
        "packed public bytecode"
    );
    Ok(poseidon2_hash_accumulate(&fields[..len]))
}

pub fn compute_class_id_preimage(
    artifact: &ContractArtifact,
    vk_hasher: &dyn VerificationKeyHasher,
    options: &ClassIdOptions,
) -> Result<(ClassIdPreimage, ArtifactHashPreimage)> {
    let artifact_hash_preimage = compute_artifact_hash_preimage(artifact, options)?;
    let preimage = ClassIdPreimage {
        artifact_hash: artifact_hash_preimage.hash(),
        private_functions_root: compute_private_functions_root(artifact, vk_hasher, options)?,
        public_bytecode_commitment: compute_public_bytecode_commitment(artifact, options)?,
    };
    Ok((preimage, artifact_hash_preimage))
}

/// Derives the class of `artifact` with a custom verification key hasher.
pub fn compute_contract_class_with(
    artifact: &ContractArtifact,
    vk_hasher: &dyn VerificationKeyHasher,
    options: &ClassIdOptions,
) -> Result<ContractClass> {
    let _span = span!(Level::INFO, "class_id", contract = %artifact.name).entered();

    let (preimage, artifact_hash_preimage) =
        compute_class_id_preimage(artifact, vk_hasher, options)?;
    let id = preimage.class_id();
    info!(
        artifact_hash = %preimage.artifact_hash,
        private_functions_root = %preimage.private_functions_root,
        public_bytecode_commitment = %preimage.public_bytecode_commitment,
        class_id = %id,
        "computed class id"
    );
    Ok(ContractClass {
        id,
        preimage,
        artifact_hash_preimage,
    })
}

pub fn compute_contract_class(
    artifact: &ContractArtifact,
    options: &ClassIdOptions,
) -> Result<ContractClass> {
    compute_contract_class_with(artifact, &MegaHonkVkHasher, options)
}

/// Class ID of `artifact` with default options.
pub fn compute_class_id(artifact: &ContractArtifact) -> Result<Fr> {
    Ok(compute_contract_class(artifact, &ClassIdOptions::default())?.id)
}

/// Source of deployed class IDs, e.g. a node client.
pub trait ClassIdSource {
    type Error: std::error::Error;

    /// Class ID of the contract deployed at `address`, `None` if nothing is deployed there.
    fn class_id_at(&self, address: Fr) -> std::result::Result<Option<Fr>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassIdCheck {
    Match,
    Mismatch { deployed: Fr, computed: Fr },
    NotDeployed,
}

/// Compares a computed class ID with the one deployed at `address`.
pub fn check_deployed_class_id<S: ClassIdSource>(
    source: &S,
    address: Fr,
    computed: Fr,
) -> std::result::Result<ClassIdCheck, S::Error> {
    let check = match source.class_id_at(address)? {
        None => ClassIdCheck::NotDeployed,
        Some(deployed) if deployed == computed => ClassIdCheck::Match,
        Some(deployed) => ClassIdCheck::Mismatch { deployed, computed },
    };
    debug!(%address, ?check, "checked deployed class id");
    Ok(check)
}

#[cfg(test)]
mod tests {
    use class_id_common::{ClassIdError, EncodingError};

    use super::*;

    fn public(name: &str, bytecode: &[u8]) -> FunctionArtifact {
        FunctionArtifact::new(name, FunctionType::Public).with_bytecode(bytecode)
    }

    #[test]
    fn private_leaf_is_domain_separated() {
        let selector = Selector::new(0x1234_5678);
        let leaf = private_function_leaf(selector, Fr::ZERO);
        assert_eq!(
            leaf,
            poseidon2_hash_with_separator(&[Fr::from(0x1234_5678u32), Fr::ZERO], 11u32)
        );
    }

    #[test]
    fn no_public_function_commits_to_zero() {
        let artifact = ContractArtifact::new("Token", vec![]);
        let options = ClassIdOptions::default();
        assert_eq!(
            compute_public_bytecode_commitment(&artifact, &options).unwrap(),
            Fr::ZERO
        );
    }

    #[test]
    fn empty_public_bytecode_commits_to_zero() {
        let artifact = ContractArtifact::new("Token", vec![public("public_dispatch", &[])]);
        let options = ClassIdOptions::default();
        assert_eq!(
            compute_public_bytecode_commitment(&artifact, &options).unwrap(),
            Fr::ZERO
        );
    }

    #[test]
    fn commitment_accumulates_packed_prefix() {
        let bytecode = vec![7u8; 40];
        let artifact = ContractArtifact::new("Token", vec![public("public_dispatch", &bytecode)]);
        let fields = buffer_as_fields(&bytecode, 3).unwrap();
        assert_eq!(
            compute_public_bytecode_commitment(&artifact, &ClassIdOptions::default()).unwrap(),
            poseidon2_hash_accumulate(&fields)
        );
    }

    #[test]
    fn two_public_functions_are_rejected() {
        let artifact = ContractArtifact::new(
            "Token",
            vec![public("public_dispatch", &[1]), public("mint", &[2])],
        );
        let err = compute_public_bytecode_commitment(&artifact, &ClassIdOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ClassIdError::ContractShape(ContractShapeError::MultiplePublicFunctions { ref names })
                if names == &["public_dispatch", "mint"]
        ));
    }

    #[test]
    fn bytecode_above_capacity_is_an_encoding_error() {
        let artifact = ContractArtifact::new("Token", vec![public("public_dispatch", &[0; 100])]);
        let options = ClassIdOptions {
            max_packed_public_bytecode_fields: 3,
            ..ClassIdOptions::default()
        };
        assert!(matches!(
            compute_public_bytecode_commitment(&artifact, &options),
            Err(ClassIdError::Encoding(EncodingError::BufferTooLong {
                required: 5,
                capacity: 3
            }))
        ));
    }

    #[test]
    fn verification_key_enters_private_leaf() {
        let without = ContractArtifact::new(
            "Token",
            vec![FunctionArtifact::new("transfer", FunctionType::Private)],
        );
        let with = ContractArtifact::new(
            "Token",
            vec![FunctionArtifact::new("transfer", FunctionType::Private)
                .with_verification_key(Fr::from(3u64).to_bytes())],
        );
        let options = ClassIdOptions::default();
        let a = compute_private_functions_root(&without, &MegaHonkVkHasher, &options).unwrap();
        let b = compute_private_functions_root(&with, &MegaHonkVkHasher, &options).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_verification_key_is_fatal() {
        let artifact = ContractArtifact::new(
            "Token",
            vec![FunctionArtifact::new("transfer", FunctionType::Private)
                .with_verification_key(vec![0u8; 31])],
        );
        assert!(matches!(
            compute_class_id(&artifact),
            Err(ClassIdError::MalformedInput(_))
        ));
    }
}
