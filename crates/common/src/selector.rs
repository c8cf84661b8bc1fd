use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EncodingError;
use crate::field::Fr;

/// 4-byte function identifier.
///
/// Derived from a function signature by the hasher crate; this type only
/// carries the value and its encodings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Selector(u32);

impl Selector {
    /// Width of a selector in bytes
    pub const SIZE: usize = 4;

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Fails when `value` does not fit in [`Selector::SIZE`] bytes.
    pub fn try_from_u64(value: u64) -> Result<Self, EncodingError> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| EncodingError::SelectorOverflow {
                value: value.to_string(),
                size: Self::SIZE,
            })
    }

    /// Reads a selector from exactly [`Selector::SIZE`] big-endian bytes.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let word: [u8; Self::SIZE] =
            bytes
                .try_into()
                .map_err(|_| EncodingError::InvalidSelectorLength {
                    len: bytes.len(),
                    expected: Self::SIZE,
                })?;
        Ok(Self(u32::from_be_bytes(word)))
    }

    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.0.to_be_bytes()
    }

    pub fn to_field(&self) -> Fr {
        Fr::from(self.0)
    }

    pub fn from_field(field: Fr) -> Result<Self, EncodingError> {
        let value = field.to_u64().map_err(|_| EncodingError::SelectorOverflow {
            value: field.to_string(),
            size: Self::SIZE,
        })?;
        Self::try_from_u64(value)
    }

    /// Parses `0x`-prefixed (or bare) hex that must decode to exactly 4 bytes.
    pub fn from_hex(input: &str) -> Result<Self, EncodingError> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        let bytes = hex::decode(digits).map_err(|e| EncodingError::InvalidHex {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_be_bytes(&bytes)
    }
}

impl From<u32> for Selector {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector<{self}>")
    }
}

impl FromStr for Selector {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Selector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_values_wider_than_four_bytes() {
        assert_eq!(
            Selector::try_from_u64(u64::from(u32::MAX)).unwrap(),
            Selector::new(u32::MAX)
        );
        assert!(matches!(
            Selector::try_from_u64(1 << 32),
            Err(EncodingError::SelectorOverflow { size: 4, .. })
        ));
        assert!(Selector::from_field(Fr::from(1u64 << 32)).is_err());
    }

    #[test]
    fn byte_and_hex_encodings() {
        let selector = Selector::new(0x1234_abcd);
        assert_eq!(selector.to_bytes(), [0x12, 0x34, 0xab, 0xcd]);
        assert_eq!(selector.to_string(), "0x1234abcd");
        assert_eq!("0x1234abcd".parse::<Selector>().unwrap(), selector);
        assert_eq!(
            Selector::from_hex("0x1234"),
            Err(EncodingError::InvalidSelectorLength {
                len: 2,
                expected: 4
            })
        );
    }

    #[test]
    fn field_conversion_roundtrips() {
        let selector = Selector::new(0xdead_beef);
        assert_eq!(selector.to_field(), Fr::from(0xdead_beefu64));
        assert_eq!(Selector::from_field(selector.to_field()).unwrap(), selector);
    }

    #[test]
    fn ordering_matches_field_ordering() {
        let a = Selector::new(5);
        let b = Selector::new(0x8000_0000);
        assert!(a < b);
        assert!(a.to_field() < b.to_field());
    }
}
