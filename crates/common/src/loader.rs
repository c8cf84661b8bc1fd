//! Artifact loading.
//!
//! Two input shapes are accepted: the processed artifact (camelCase,
//! `functionType` per function) and the compiler's raw contract output, where
//! the role of a function is encoded in `custom_attributes` and return types
//! live in the `outputs.structs.functions` table.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::abi::{AbiParameter, AbiType};
use crate::artifact::{ContractArtifact, ContractOutputs, FunctionArtifact, FunctionType};
use crate::errors::MalformedInputError;

/// Name of the single public entry point kept with bytecode
pub const PUBLIC_DISPATCH: &str = "public_dispatch";

#[derive(Debug, Deserialize)]
struct RawContract {
    name: String,
    functions: Vec<RawFunction>,
    #[serde(default)]
    outputs: RawOutputs,
    #[serde(default)]
    file_map: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    custom_attributes: Vec<String>,
    #[serde(default)]
    abi: RawFunctionAbi,
    #[serde(default)]
    bytecode: String,
    #[serde(default, alias = "verificationKey")]
    verification_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFunctionAbi {
    #[serde(default)]
    parameters: Vec<AbiParameter>,
    #[serde(default)]
    error_types: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOutputs {
    #[serde(default)]
    structs: Map<String, Value>,
    #[serde(default)]
    globals: Map<String, Value>,
}

/// Reads and parses an artifact file in either format.
pub fn load_contract_artifact_from_path(
    path: impl AsRef<Path>,
) -> Result<ContractArtifact, MalformedInputError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| MalformedInputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_contract_artifact(&content)
}

/// Parses an artifact document in either format and validates it.
pub fn load_contract_artifact(json: &str) -> Result<ContractArtifact, MalformedInputError> {
    let document: Value = serde_json::from_str(json)?;
    let artifact = if is_raw_compiler_output(&document) {
        debug!("loading raw compiler output");
        from_compiler_output(serde_json::from_value(document)?)?
    } else {
        serde_json::from_value(document)?
    };
    artifact.validate()?;
    Ok(artifact)
}

/// Raw output carries `custom_attributes` or a nested `abi` on its functions.
fn is_raw_compiler_output(document: &Value) -> bool {
    document
        .get("functions")
        .and_then(Value::as_array)
        .is_some_and(|functions| {
            functions
                .iter()
                .any(|f| f.get("custom_attributes").is_some() || f.get("abi").is_some())
        })
}

fn function_type_from_attributes(attributes: &[String]) -> Option<FunctionType> {
    let has = |attr: &str| attributes.iter().any(|a| a == attr);
    if has("private") {
        Some(FunctionType::Private)
    } else if has("public") {
        Some(FunctionType::Public)
    } else if has("utility") {
        Some(FunctionType::Utility)
    } else {
        None
    }
}

/// `functions` struct table entries sorted by ascending path
fn function_structs(structs: &Map<String, Value>) -> Result<Vec<AbiType>, MalformedInputError> {
    let Some(entries) = structs.get("functions") else {
        return Ok(Vec::new());
    };
    let types: Vec<AbiType> = serde_json::from_value(entries.clone())?;
    let mut structs: Vec<AbiType> = types
        .into_iter()
        .filter(|t| matches!(t, AbiType::Struct { .. }))
        .collect();
    structs.sort_by(|a, b| a.struct_path().cmp(&b.struct_path()));
    Ok(structs)
}

/// Return type of `fn_name`, declared as the `return_type` field of `<Contract>::<fn>_abi`.
fn extract_return_types(contract: &str, fn_name: &str, structs: &[AbiType]) -> Vec<AbiType> {
    let path = format!("{contract}::{fn_name}_abi");
    structs
        .iter()
        .find_map(|s| match s {
            AbiType::Struct { path: p, fields } if *p == path => fields
                .iter()
                .find(|f| f.name == "return_type")
                .map(|f| vec![f.ty.clone()]),
            _ => None,
        })
        .unwrap_or_default()
}

fn decode_base64(
    function: &str,
    field: &'static str,
    encoded: &str,
) -> Result<Vec<u8>, MalformedInputError> {
    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|source| MalformedInputError::InvalidBase64 {
            function: function.to_string(),
            field,
            source,
        })
}

fn from_compiler_output(raw: RawContract) -> Result<ContractArtifact, MalformedInputError> {
    let structs = function_structs(&raw.outputs.structs)?;

    let mut functions = Vec::with_capacity(raw.functions.len());
    let mut non_dispatch_public_functions = Vec::new();
    for function in raw.functions {
        let function_type = function_type_from_attributes(&function.custom_attributes)
            .ok_or_else(|| MalformedInputError::UnknownFunctionType {
                function: function.name.clone(),
            })?;
        let has = |attr: &str| function.custom_attributes.iter().any(|a| a == attr);
        let return_types = extract_return_types(&raw.name, &function.name, &structs);

        let mut artifact = FunctionArtifact {
            is_internal: has("internal"),
            is_static: has("view"),
            is_initializer: has("initializer") || has("constructor"),
            name: function.name,
            function_type,
            parameters: function.abi.parameters,
            return_types,
            error_types: function.abi.error_types,
            bytecode: Vec::new(),
            verification_key: None,
        };

        if function_type == FunctionType::Public && artifact.name != PUBLIC_DISPATCH {
            debug!(function = %artifact.name, "dropping bytecode of non-dispatch public function");
            non_dispatch_public_functions.push(artifact.abi());
            continue;
        }

        artifact.bytecode = decode_base64(&artifact.name, "bytecode", &function.bytecode)?;
        artifact.verification_key = function
            .verification_key
            .as_deref()
            .map(|vk| decode_base64(&artifact.name, "verification_key", vk))
            .transpose()?;
        functions.push(artifact);
    }

    let structs_record: Map<String, Value> = structs
        .into_iter()
        .filter_map(|s| match s {
            AbiType::Struct { path, fields } => {
                Some(serde_json::to_value(fields).map(|fields| (path, fields)))
            }
            _ => None,
        })
        .collect::<Result<_, _>>()?;

    Ok(ContractArtifact {
        name: raw.name,
        functions,
        non_dispatch_public_functions,
        outputs: ContractOutputs {
            structs: structs_record,
            globals: raw.outputs.globals,
        },
        file_map: raw.file_map,
    })
}
