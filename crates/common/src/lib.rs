pub mod abi;
pub mod artifact;
pub mod buffer_codec;
pub mod errors;
pub mod field;
pub mod loader;
pub mod selector;

pub use abi::{
    function_signature, function_signature_with_names, signature_from_types, AbiParameter,
    AbiType, AbiVariable, Sign, Visibility,
};
pub use artifact::{
    ContractArtifact, ContractOutputs, FunctionAbi, FunctionArtifact, FunctionType,
};
pub use buffer_codec::{buffer_as_fields, buffer_from_fields, packed_len, BYTES_PER_FIELD};
pub use errors::{ClassIdError, ContractShapeError, EncodingError, MalformedInputError, Result};
pub use field::Fr;
pub use loader::{load_contract_artifact, load_contract_artifact_from_path};
pub use selector::Selector;
