//! BN254 scalar field element.
//!
//! Every value hashed or combined by the class ID derivation is an [`Fr`]. The
//! canonical byte form is 32 bytes big-endian; construction from bytes or
//! integers never wraps silently unless the `_mod_order` constructor is used.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zkhash::ark_ff::{BigInteger, Field, PrimeField};
use zkhash::fields::bn256::FpBN256;

use crate::errors::EncodingError;

/// Underlying arkworks field type.
pub type Scalar = FpBN256;

/// BN254 scalar modulus, big-endian.
pub const MODULUS_BYTES: [u8; Fr::SIZE_IN_BYTES] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fr(Scalar);

impl Fr {
    pub const SIZE_IN_BYTES: usize = 32;

    pub const ZERO: Self = Self(<Scalar as Field>::ZERO);
    pub const ONE: Self = Self(<Scalar as Field>::ONE);

    pub const fn from_scalar(inner: Scalar) -> Self {
        Self(inner)
    }

    pub const fn inner(&self) -> Scalar {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Builds a field element from at most 32 big-endian bytes.
    ///
    /// Shorter buffers are left-padded with zeros. Fails if the buffer is wider
    /// than a field element or encodes a value `>= p`.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.len() > Self::SIZE_IN_BYTES {
            return Err(EncodingError::BufferTooWide {
                len: bytes.len(),
                max: Self::SIZE_IN_BYTES,
            });
        }
        let mut buf = [0u8; Self::SIZE_IN_BYTES];
        buf[Self::SIZE_IN_BYTES - bytes.len()..].copy_from_slice(bytes);
        if buf >= MODULUS_BYTES {
            return Err(EncodingError::ValueExceedsModulus {
                value: format!("0x{}", hex::encode(buf)),
            });
        }
        Ok(Self(Scalar::from_be_bytes_mod_order(&buf)))
    }

    /// Interprets `bytes` as a big-endian integer of any length and reduces it mod p.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Scalar::from_be_bytes_mod_order(bytes))
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE_IN_BYTES] {
        let repr = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; Self::SIZE_IN_BYTES];
        out[Self::SIZE_IN_BYTES - repr.len()..].copy_from_slice(&repr);
        out
    }

    /// Narrows the element to a `u64`, failing when the value needs more than 64 bits.
    pub fn to_u64(&self) -> Result<u64, EncodingError> {
        let bytes = self.to_bytes();
        let (high, low) = bytes.split_at(Self::SIZE_IN_BYTES - 8);
        if high.iter().any(|b| *b != 0) {
            return Err(EncodingError::ValueTooWide {
                value: self.to_string(),
                bits: 64,
            });
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(low);
        Ok(u64::from_be_bytes(word))
    }

    /// Parses a hex string, with or without `0x` prefix, of at most 64 digits.
    pub fn from_hex(input: &str) -> Result<Self, EncodingError> {
        let digits = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);
        if digits.is_empty() || digits.len() > Self::SIZE_IN_BYTES * 2 {
            return Err(EncodingError::InvalidHex {
                input: input.to_string(),
                reason: format!("expected 1 to {} hex digits", Self::SIZE_IN_BYTES * 2),
            });
        }
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let bytes = hex::decode(&padded).map_err(|e| EncodingError::InvalidHex {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_be_bytes(&bytes)
    }
}

impl From<u64> for Fr {
    fn from(value: u64) -> Self {
        Self(Scalar::from(value))
    }
}

impl From<u32> for Fr {
    fn from(value: u32) -> Self {
        Self(Scalar::from(value))
    }
}

impl From<bool> for Fr {
    fn from(value: bool) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<Scalar> for Fr {
    fn from(value: Scalar) -> Self {
        Self(value)
    }
}

impl From<Fr> for Scalar {
    fn from(value: Fr) -> Self {
        value.0
    }
}

impl Ord for Fr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.into_bigint().cmp(&other.0.into_bigint())
    }
}

impl PartialOrd for Fr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::LowerHex for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fr<{self}>")
    }
}

impl FromStr for Fr {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Serialized as a `0x`-prefixed 64-digit hex string
impl Serialize for Fr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Fr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}
