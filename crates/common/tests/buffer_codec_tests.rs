use class_id_common::buffer_codec::packed_size;
use class_id_common::{buffer_as_fields, buffer_from_fields, packed_len, EncodingError, Fr};
use proptest::prelude::*;

proptest! {
    #[test]
    fn unpack_inverts_pack(buffer in proptest::collection::vec(any::<u8>(), 0..400), slack in 0usize..4) {
        let target = packed_size(buffer.len()) + slack;
        let fields = buffer_as_fields(&buffer, target).unwrap();
        prop_assert_eq!(fields.len(), target);
        prop_assert_eq!(packed_len(&fields).unwrap(), packed_size(buffer.len()));
        prop_assert_eq!(buffer_from_fields(&fields).unwrap(), buffer);
    }

    #[test]
    fn every_chunk_keeps_leading_zero_byte(buffer in proptest::collection::vec(any::<u8>(), 1..200)) {
        let fields = buffer_as_fields(&buffer, packed_size(buffer.len())).unwrap();
        for field in &fields[1..] {
            prop_assert_eq!(field.to_bytes()[0], 0);
        }
    }

    #[test]
    fn capacity_is_a_hard_limit(len in 1usize..300) {
        let buffer = vec![0xa5u8; len];
        let required = packed_size(len);
        prop_assert_eq!(
            buffer_as_fields(&buffer, required - 1),
            Err(EncodingError::BufferTooLong { required, capacity: required - 1 })
        );
    }
}

#[test]
fn all_ones_chunk_is_below_modulus() {
    let buffer = vec![0xffu8; 31];
    let fields = buffer_as_fields(&buffer, 2).unwrap();
    let mut expected = [0xffu8; 32];
    expected[0] = 0;
    assert_eq!(fields[1].to_bytes(), expected);
    assert_eq!(Fr::from_be_bytes(&expected).unwrap(), fields[1]);
}
