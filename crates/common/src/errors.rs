use thiserror::Error;

/// A value does not fit the width it is declared with.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Value {value} is greater or equal to field modulus")]
    ValueExceedsModulus { value: String },
    #[error("Buffer of {len} bytes does not fit in a {max}-byte field element")]
    BufferTooWide { len: usize, max: usize },
    #[error("Field element {value} does not fit in {bits} bits")]
    ValueTooWide { value: String, bits: u32 },
    #[error("Selector must fit in {size} bytes (got value {value})")]
    SelectorOverflow { value: String, size: usize },
    #[error("Invalid selector length {len} (expected {expected})")]
    InvalidSelectorLength { len: usize, expected: usize },
    #[error("Buffer too long: {required} fields > {capacity}")]
    BufferTooLong { required: usize, capacity: usize },
    #[error("Signature cannot contain whitespace: '{0}'")]
    WhitespaceInSignature(String),
    #[error("Invalid hex string '{input}': {reason}")]
    InvalidHex { input: String, reason: String },
}

/// The artifact document lacks something the derivation needs.
#[derive(Debug, Error)]
pub enum MalformedInputError {
    #[error("Cannot read artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid artifact JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: &'static str, context: String },
    #[error("Function '{function}' has no private, public or utility attribute")]
    UnknownFunctionType { function: String },
    #[error("Invalid base64 in '{field}' of function '{function}': {source}")]
    InvalidBase64 {
        function: String,
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },
    #[error("Verification key length {len} is not a multiple of {chunk} bytes")]
    InvalidVerificationKeyLength { len: usize, chunk: usize },
    #[error("Invalid packed buffer: {0}")]
    InvalidPackedBuffer(String),
}

/// The artifact violates a structural assumption of the derivation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContractShapeError {
    #[error("Expected at most one public function, found {}: {names:?}", names.len())]
    MultiplePublicFunctions { names: Vec<String> },
}

#[derive(Debug, Error)]
pub enum ClassIdError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),
    #[error(transparent)]
    ContractShape(#[from] ContractShapeError),
}

/// Result type for class ID derivation
pub type Result<T> = std::result::Result<T, ClassIdError>;
