use class_id_common::Fr;

/// Domain separators mixed into Poseidon2 hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GeneratorIndex {
    /// Private function leaf and private function tree nodes
    FunctionLeaf = 11,
    /// Final class identifier
    ContractLeaf = 16,
}

impl GeneratorIndex {
    pub const fn value(self) -> u32 {
        self as u32
    }

    pub fn as_field(self) -> Fr {
        Fr::from(self.value())
    }
}

impl From<GeneratorIndex> for Fr {
    fn from(index: GeneratorIndex) -> Self {
        index.as_field()
    }
}

/// Capacity, in field elements, of the packed public bytecode.
pub const MAX_PACKED_PUBLIC_BYTECODE_SIZE_IN_FIELDS: usize = 3000;

/// Version byte prefixed to every artifact-hash preimage.
pub const ARTIFACT_HASH_VERSION: u8 = 1;
