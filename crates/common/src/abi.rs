use serde::{Deserialize, Serialize};

/// Signedness of an ABI integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Unsigned,
    Signed,
}

/// Type of a parameter, return value or struct field in a compiled contract ABI.
///
/// Field order inside each variant follows the compiler's JSON output, which
/// matters because return types are hashed in their serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AbiType {
    Field,
    Boolean,
    Integer {
        sign: Sign,
        width: u32,
    },
    Array {
        length: u64,
        #[serde(rename = "type")]
        element: Box<AbiType>,
    },
    String {
        length: u64,
    },
    Struct {
        path: String,
        fields: Vec<AbiVariable>,
    },
    Tuple {
        fields: Vec<AbiType>,
    },
}

/// A named, typed slot (struct field or parameter without visibility)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbiVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AbiType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Databus,
}

/// One function parameter. Order within a function is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AbiType,
    #[serde(default)]
    pub visibility: Visibility,
}

impl AbiType {
    pub const fn unsigned(width: u32) -> Self {
        Self::Integer {
            sign: Sign::Unsigned,
            width,
        }
    }

    pub const fn signed(width: u32) -> Self {
        Self::Integer {
            sign: Sign::Signed,
            width,
        }
    }

    pub fn array(element: Self, length: u64) -> Self {
        Self::Array {
            length,
            element: Box::new(element),
        }
    }

    pub fn structure(path: impl Into<String>, fields: Vec<(&str, Self)>) -> Self {
        Self::Struct {
            path: path.into(),
            fields: fields
                .into_iter()
                .map(|(name, ty)| AbiVariable {
                    name: name.to_string(),
                    ty,
                })
                .collect(),
        }
    }

    /// Canonical type signature used for selector derivation.
    ///
    /// Structs render as a tuple of their field types; neither the struct path
    /// nor field names take part.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }

    fn write_signature(&self, out: &mut String) {
        match self {
            Self::Field => out.push_str("Field"),
            Self::Boolean => out.push_str("bool"),
            Self::Integer {
                sign: Sign::Unsigned,
                width,
            } => out.push_str(&format!("u{width}")),
            Self::Integer {
                sign: Sign::Signed,
                width,
            } => out.push_str(&format!("i{width}")),
            Self::Array { length, element } => {
                out.push('[');
                element.write_signature(out);
                out.push_str(&format!(";{length}]"));
            }
            Self::String { length } => out.push_str(&format!("str<{length}>")),
            Self::Tuple { fields } => write_tuple(out, fields.iter()),
            Self::Struct { fields, .. } => write_tuple(out, fields.iter().map(|f| &f.ty)),
        }
    }

    /// Struct path if this is a struct type
    pub fn struct_path(&self) -> Option<&str> {
        match self {
            Self::Struct { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_aztec_address(&self) -> bool {
        self.struct_path()
            .is_some_and(|p| p.ends_with("address::AztecAddress"))
    }

    pub fn is_eth_address(&self) -> bool {
        self.struct_path()
            .is_some_and(|p| p.ends_with("address::EthAddress"))
    }

    pub fn is_address(&self) -> bool {
        self.is_aztec_address() || self.is_eth_address()
    }

    pub fn is_function_selector(&self) -> bool {
        self.struct_path()
            .is_some_and(|p| p.ends_with("types::abis::function_selector::FunctionSelector"))
    }

    /// A struct whose single field is `inner: Field`
    pub fn is_wrapped_field(&self) -> bool {
        match self {
            Self::Struct { fields, .. } => {
                matches!(fields.as_slice(), [f] if f.name == "inner" && f.ty == Self::Field)
            }
            _ => false,
        }
    }
}

fn write_tuple<'a>(out: &mut String, types: impl Iterator<Item = &'a AbiType>) {
    out.push('(');
    for (i, ty) in types.enumerate() {
        if i > 0 {
            out.push(',');
        }
        ty.write_signature(out);
    }
    out.push(')');
}

impl AbiParameter {
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::default(),
        }
    }
}

/// `name(T1,T2,...)`, the string hashed into a function selector.
pub fn function_signature(name: &str, parameters: &[AbiParameter]) -> String {
    signature_from_types(name, parameters.iter().map(|p| &p.ty))
}

/// Same as [`function_signature`] for call sites that only know the types.
pub fn signature_from_types<'a>(
    name: &str,
    types: impl IntoIterator<Item = &'a AbiType>,
) -> String {
    let rendered: Vec<String> = types.into_iter().map(AbiType::signature).collect();
    format!("{name}({})", rendered.join(","))
}

/// Human readable signature with parameter names, e.g. `transfer(to: Field, amount: u128)`.
/// Only for display; never hashed.
pub fn function_signature_with_names(name: &str, parameters: &[AbiParameter]) -> String {
    let rendered: Vec<String> = parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.signature()))
        .collect();
    format!("{name}({})", rendered.join(", "))
}
