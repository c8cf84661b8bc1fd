//! Poseidon2 over the BN254 scalar field.
//!
//! The permutation is the width-4 barretenberg instance (x^5 S-box, 8 full and
//! 56 partial rounds) as exposed by Noir's BN254 black-box solver. On top of it
//! sits a sponge with rate 3 and capacity 1 whose initial capacity element
//! encodes the input length.

use acir::FieldElement;
use bn254_blackbox_solver::poseidon2_permutation;
use class_id_common::field::Scalar;
use class_id_common::Fr;
use num_traits::Zero;

use crate::constants::GeneratorIndex;

/// T: State size
pub const T: usize = 4;

/// Number of state elements absorbed per permutation.
pub const RATE: usize = T - 1;

/// Bytes packed into each field element by [`hash_bytes`].
pub const BYTES_PER_CHUNK: usize = 31;

fn to_acir(value: Scalar) -> FieldElement {
    FieldElement::from_be_bytes_reduce(&Fr::from_scalar(value).to_bytes())
}

fn from_acir(value: FieldElement) -> Scalar {
    Fr::from_be_bytes_mod_order(&value.to_be_bytes()).inner()
}

fn permute(state: &[Scalar; T]) -> [Scalar; T] {
    let input: Vec<FieldElement> = state.iter().copied().map(to_acir).collect();
    let output = poseidon2_permutation(&input, T as u32)
        .expect("input has T elements; which is the width the permutation requires");
    let mut out = [Scalar::zero(); T];
    for (dst, src) in out.iter_mut().zip(output) {
        *dst = from_acir(src);
    }
    out
}

/// Applies the raw permutation to a full state.
pub fn permutation(state: &[Fr; T]) -> [Fr; T] {
    permute(&state.map(|x| x.inner())).map(Fr::from_scalar)
}

/// Sponge hash of a variable-length input.
///
/// An empty input still goes through one permutation.
pub fn hash(inputs: &[Fr]) -> Fr {
    let mut state = [Scalar::zero(); T];
    state[RATE] = Scalar::from((inputs.len() as u128) << 64);

    if inputs.is_empty() {
        state = permute(&state);
    }
    for chunk in inputs.chunks(RATE) {
        for (slot, value) in state.iter_mut().zip(chunk) {
            *slot += value.inner();
        }
        state = permute(&state);
    }
    Fr::from_scalar(state[0])
}

/// Hashes `inputs` prefixed with a domain separator.
pub fn hash_with_separator(inputs: &[Fr], separator: impl Into<Fr>) -> Fr {
    let mut preimage = Vec::with_capacity(inputs.len() + 1);
    preimage.push(separator.into());
    preimage.extend_from_slice(inputs);
    hash(&preimage)
}

/// Shorthand for the two generators used by the class ID derivation.
pub fn hash_with_generator(inputs: &[Fr], generator: GeneratorIndex) -> Fr {
    hash_with_separator(inputs, generator)
}

/// Left fold `acc = H(acc, x)` seeded with the first element.
///
/// Returns zero for an empty input and the element itself for a single one.
pub fn hash_accumulate(inputs: &[Fr]) -> Fr {
    let Some((first, rest)) = inputs.split_first() else {
        return Fr::ZERO;
    };
    rest.iter().fold(*first, |acc, x| hash(&[acc, *x]))
}

/// Hashes arbitrary bytes.
///
/// Input is cut in 31-byte chunks; each chunk is read as a little-endian
/// integer so that it always fits in the field.
pub fn hash_bytes(bytes: &[u8]) -> Fr {
    let fields: Vec<Fr> = bytes.chunks(BYTES_PER_CHUNK).map(chunk_to_field).collect();
    hash(&fields)
}

fn chunk_to_field(chunk: &[u8]) -> Fr {
    let mut buf = [0u8; Fr::SIZE_IN_BYTES];
    buf[..chunk.len()].copy_from_slice(chunk);
    buf.reverse();
    Fr::from_be_bytes_mod_order(&buf)
}
