use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::abi::{AbiParameter, AbiType};
use crate::errors::MalformedInputError;

/// Role of a contract function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    Private,
    Public,
    Utility,
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::Utility => "utility",
        };
        f.write_str(name)
    }
}

/// ABI-only description of a function (no bytecode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionAbi {
    pub name: String,
    pub function_type: FunctionType,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_initializer: bool,
    #[serde(default)]
    pub parameters: Vec<AbiParameter>,
    #[serde(default)]
    pub return_types: Vec<AbiType>,
    #[serde(default)]
    pub error_types: Map<String, Value>,
}

/// A compiled function together with its bytecode and optional verification key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionArtifact {
    pub name: String,
    pub function_type: FunctionType,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_initializer: bool,
    #[serde(default)]
    pub parameters: Vec<AbiParameter>,
    #[serde(default)]
    pub return_types: Vec<AbiType>,
    #[serde(default)]
    pub error_types: Map<String, Value>,
    /// Raw bytecode, base64 in JSON
    #[serde(default, with = "base64_bytes")]
    pub bytecode: Vec<u8>,
    /// Raw verification key, base64 in JSON
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_bytes_opt"
    )]
    pub verification_key: Option<Vec<u8>>,
}

impl FunctionArtifact {
    pub fn new(name: impl Into<String>, function_type: FunctionType) -> Self {
        Self {
            name: name.into(),
            function_type,
            is_internal: false,
            is_static: false,
            is_initializer: false,
            parameters: Vec::new(),
            return_types: Vec::new(),
            error_types: Map::new(),
            bytecode: Vec::new(),
            verification_key: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<AbiParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_return_types(mut self, return_types: Vec<AbiType>) -> Self {
        self.return_types = return_types;
        self
    }

    pub fn with_bytecode(mut self, bytecode: impl Into<Vec<u8>>) -> Self {
        self.bytecode = bytecode.into();
        self
    }

    pub fn with_verification_key(mut self, vk: impl Into<Vec<u8>>) -> Self {
        self.verification_key = Some(vk.into());
        self
    }

    pub fn abi(&self) -> FunctionAbi {
        FunctionAbi {
            name: self.name.clone(),
            function_type: self.function_type,
            is_internal: self.is_internal,
            is_static: self.is_static,
            is_initializer: self.is_initializer,
            parameters: self.parameters.clone(),
            return_types: self.return_types.clone(),
            error_types: self.error_types.clone(),
        }
    }
}

/// Public symbol tables emitted by the compiler.
///
/// Kept as untyped JSON: they only take part in the metadata hash.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContractOutputs {
    #[serde(default)]
    pub structs: Map<String, Value>,
    #[serde(default)]
    pub globals: Map<String, Value>,
}

impl ContractOutputs {
    /// Struct categories whose entries are ordered by `path` before hashing.
    pub const PATH_SORTED_CATEGORIES: [&'static str; 2] = ["events", "functions"];

    /// Copy of the outputs in canonical form.
    ///
    /// Map keys are already ordered by `serde_json::Map`; entries of the
    /// path-sorted categories are sorted by ascending `path`.
    pub fn canonicalized(&self) -> Self {
        let mut structs = self.structs.clone();
        for category in Self::PATH_SORTED_CATEGORIES {
            if let Some(Value::Array(entries)) = structs.get_mut(category) {
                entries.sort_by(|a, b| path_of(a).cmp(path_of(b)));
            }
        }
        Self {
            structs,
            globals: self.globals.clone(),
        }
    }
}

fn path_of(value: &Value) -> &str {
    value.get("path").and_then(Value::as_str).unwrap_or_default()
}

/// A compiled contract: the root entity owning all functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub name: String,
    pub functions: Vec<FunctionArtifact>,
    #[serde(default)]
    pub non_dispatch_public_functions: Vec<FunctionAbi>,
    #[serde(default)]
    pub outputs: ContractOutputs,
    /// Debug file map, excluded from every hash
    #[serde(default)]
    pub file_map: Map<String, Value>,
}

impl ContractArtifact {
    pub fn new(name: impl Into<String>, functions: Vec<FunctionArtifact>) -> Self {
        Self {
            name: name.into(),
            functions,
            non_dispatch_public_functions: Vec::new(),
            outputs: ContractOutputs::default(),
            file_map: Map::new(),
        }
    }

    /// Functions of the given role, in artifact order
    pub fn functions_of(
        &self,
        function_type: FunctionType,
    ) -> impl Iterator<Item = &FunctionArtifact> + '_ {
        self.functions
            .iter()
            .filter(move |f| f.function_type == function_type)
    }

    /// Checks the fields the derivation relies on beyond what serde enforces.
    pub fn validate(&self) -> Result<(), MalformedInputError> {
        if self.name.is_empty() {
            return Err(MalformedInputError::MissingField {
                field: "name",
                context: "contract artifact".into(),
            });
        }
        for (index, function) in self.functions.iter().enumerate() {
            if function.name.is_empty() {
                return Err(MalformedInputError::MissingField {
                    field: "name",
                    context: format!("function #{index}"),
                });
            }
        }
        Ok(())
    }
}

pub(crate) mod base64_bytes {
    use base64::engine::general_purpose;
    use base64::Engine as _;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(de::Error::custom)
    }
}

pub(crate) mod base64_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => super::base64_bytes::serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::base64_bytes")] Vec<u8>);

        let wrapped: Option<Wrapper> = Option::deserialize(deserializer)?;
        Ok(wrapped.map(|Wrapper(bytes)| bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_artifact_from_processed_json() {
        let function: FunctionArtifact = serde_json::from_value(json!({
            "name": "transfer",
            "functionType": "private",
            "parameters": [{"name": "to", "type": {"kind": "field"}, "visibility": "private"}],
            "returnTypes": [],
            "bytecode": "AQID",
            "verificationKey": "BAU=",
            "isInitializer": true
        }))
        .unwrap();
        assert_eq!(function.function_type, FunctionType::Private);
        assert_eq!(function.bytecode, vec![1, 2, 3]);
        assert_eq!(function.verification_key, Some(vec![4, 5]));
        assert!(function.is_initializer);
        assert!(!function.is_static);
    }

    #[test]
    fn missing_bytecode_and_key_default_to_empty() {
        let function: FunctionArtifact =
            serde_json::from_value(json!({"name": "f", "functionType": "utility"})).unwrap();
        assert!(function.bytecode.is_empty());
        assert!(function.verification_key.is_none());
    }

    #[test]
    fn rejects_unknown_function_type_and_bad_base64() {
        assert!(serde_json::from_value::<FunctionArtifact>(
            json!({"name": "f", "functionType": "internal"})
        )
        .is_err());
        assert!(serde_json::from_value::<FunctionArtifact>(
            json!({"name": "f", "functionType": "public", "bytecode": "not base64!"})
        )
        .is_err());
    }

    #[test]
    fn validate_rejects_unnamed_functions() {
        let artifact = ContractArtifact::new(
            "Token",
            vec![
                FunctionArtifact::new("mint", FunctionType::Private),
                FunctionArtifact::new("", FunctionType::Utility),
            ],
        );
        let err = artifact.validate().unwrap_err();
        assert!(err.to_string().contains("function #1"), "{err}");
    }

    #[test]
    fn canonicalized_sorts_function_structs_by_path() {
        let outputs = ContractOutputs {
            structs: serde_json::from_value(json!({
                "functions": [
                    {"kind": "struct", "path": "Token::transfer_abi", "fields": []},
                    {"kind": "struct", "path": "Token::mint_abi", "fields": []}
                ],
                "notes": [{"path": "z"}, {"path": "a"}]
            }))
            .unwrap(),
            globals: Map::new(),
        };
        let canonical = outputs.canonicalized();
        assert_eq!(
            canonical.structs["functions"][0]["path"],
            json!("Token::mint_abi")
        );
        // Other categories keep their order.
        assert_eq!(canonical.structs["notes"][0]["path"], json!("z"));
    }

    #[test]
    fn functions_of_filters_by_role() {
        let artifact = ContractArtifact::new(
            "Token",
            vec![
                FunctionArtifact::new("a", FunctionType::Private),
                FunctionArtifact::new("b", FunctionType::Public),
                FunctionArtifact::new("c", FunctionType::Private),
            ],
        );
        let names: Vec<_> = artifact
            .functions_of(FunctionType::Private)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["a", "c"]);
    }
}
