use class_id_common::Fr;
use class_id_hasher::{
    merkle_depth, merkle_root, merkle_root_sequential, GeneratorIndex, MerkleHasher,
    Poseidon2MerkleHasher, Sha256MerkleHasher,
};
use proptest::prelude::*;

fn arb_leaves(max: usize) -> impl Strategy<Value = Vec<Fr>> {
    proptest::collection::vec(any::<u64>().prop_map(Fr::from), 1..max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn padding_is_explicit_zero_leaves(leaves in arb_leaves(12)) {
        let hasher = Sha256MerkleHasher;
        let mut padded = leaves.clone();
        padded.resize(leaves.len().next_power_of_two(), Fr::ZERO);
        prop_assert_eq!(merkle_root(&leaves, &hasher), merkle_root(&padded, &hasher));
    }

    #[test]
    fn parallel_matches_sequential(leaves in arb_leaves(20)) {
        let hasher = Poseidon2MerkleHasher::new(GeneratorIndex::FunctionLeaf);
        prop_assert_eq!(
            merkle_root(&leaves, &hasher),
            merkle_root_sequential(&leaves, &hasher)
        );
    }
}

#[test]
fn two_leaves_hash_once() {
    let hasher = Poseidon2MerkleHasher::new(GeneratorIndex::FunctionLeaf);
    let (a, b) = (Fr::from(7u64), Fr::from(8u64));
    assert_eq!(merkle_root(&[a, b], &hasher), hasher.hash(a, b));
    assert_eq!(merkle_depth(2), 1);
}

#[test]
fn four_leaves_build_two_levels() {
    let hasher = Sha256MerkleHasher;
    let leaves: Vec<Fr> = (1u64..=4).map(Fr::from).collect();
    let expected = hasher.hash(
        hasher.hash(leaves[0], leaves[1]),
        hasher.hash(leaves[2], leaves[3]),
    );
    assert_eq!(merkle_root(&leaves, &hasher), expected);
}

#[test]
fn empty_root_is_zero_for_every_hasher() {
    let poseidon = Poseidon2MerkleHasher::new(GeneratorIndex::ContractLeaf);
    assert_eq!(merkle_root(&[], &poseidon), Fr::ZERO);
    assert_eq!(merkle_root_sequential(&[], &Sha256MerkleHasher), Fr::ZERO);
}
