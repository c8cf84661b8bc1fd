use class_id_common::{FunctionArtifact, Result};
use class_id_hasher::MAX_PACKED_PUBLIC_BYTECODE_SIZE_IN_FIELDS;
use rayon::prelude::*;

/// Options for deriving a class ID
#[derive(Debug, Clone)]
pub struct ClassIdOptions {
    /// Capacity of the packed public bytecode, in field elements.
    pub max_packed_public_bytecode_fields: usize,
    /// Hash function leaves and Merkle levels on the rayon pool.
    pub parallel: bool,
}

impl Default for ClassIdOptions {
    fn default() -> Self {
        Self {
            max_packed_public_bytecode_fields: MAX_PACKED_PUBLIC_BYTECODE_SIZE_IN_FIELDS,
            parallel: true,
        }
    }
}

impl ClassIdOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Maps `f` over `functions`, preserving order.
    pub(crate) fn map_functions<'a, T, F>(
        &self,
        functions: Vec<&'a FunctionArtifact>,
        f: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&'a FunctionArtifact) -> Result<T> + Sync + Send,
    {
        if self.parallel {
            functions.into_par_iter().map(f).collect()
        } else {
            functions.into_iter().map(f).collect()
        }
    }
}
