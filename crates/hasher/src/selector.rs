//! Function selector derivation.

use class_id_common::{function_signature, signature_from_types, AbiParameter, AbiType};
use class_id_common::{EncodingError, Selector};
use tracing::trace;

use crate::poseidon2;

/// Selector of a canonical signature such as `transfer(Field,u128)`.
///
/// The signature is hashed as UTF-8 bytes; the selector is the last four bytes
/// of the big-endian digest.
pub fn selector_from_signature(signature: &str) -> Result<Selector, EncodingError> {
    if signature.chars().any(char::is_whitespace) {
        return Err(EncodingError::WhitespaceInSignature(signature.to_string()));
    }
    let digest = poseidon2::hash_bytes(signature.as_bytes()).to_bytes();
    let selector = Selector::from_be_bytes(&digest[digest.len() - Selector::SIZE..])?;
    trace!(%signature, %selector, "derived selector");
    Ok(selector)
}

pub fn compute_function_selector(
    name: &str,
    parameters: &[AbiParameter],
) -> Result<Selector, EncodingError> {
    selector_from_signature(&function_signature(name, parameters))
}

pub fn function_selector_from_types<'a>(
    name: &str,
    types: impl IntoIterator<Item = &'a AbiType>,
) -> Result<Selector, EncodingError> {
    selector_from_signature(&signature_from_types(name, types))
}
