//! Property-based tests untuk invariant arena dan codec

use cornflake::core::{Arena, FILL_BYTE};
use cornflake::protocol::{EchoCodec, GetMessage, SgArray};
use cornflake::Error;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Capacity selalu sama dengan permintaan, dan seluruh region berisi fill pattern
    #[test]
    fn reserve_exact_capacity(total in 1usize..=64 * 1024) {
        let arena = Arena::reserve(total).unwrap();
        prop_assert_eq!(arena.capacity(), total);
        prop_assert!(!arena.base_address().is_null());
        prop_assert!(arena.as_slice().iter().all(|&b| b == FILL_BYTE));
    }

    /// set_valid_len menerima [0, capacity] dan menolak sisanya tanpa mengubah state
    #[test]
    fn valid_len_bounds(capacity in 1usize..=16 * 1024, n in 0usize..=32 * 1024) {
        let mut arena = Arena::reserve(capacity).unwrap();
        let res = arena.set_valid_len(n);
        if n <= capacity {
            prop_assert!(res.is_ok());
            prop_assert_eq!(arena.valid_len(), n);
        } else {
            let rejected = matches!(res, Err(Error::ValidLengthOutOfRange { .. }));
            prop_assert!(rejected);
            prop_assert_eq!(arena.valid_len(), capacity);
        }
    }

    /// Round trip tidak memindahkan payload: alamat tetap base arena
    #[test]
    fn roundtrip_aliases_arena(capacity in 1usize..=16 * 1024, field in 1usize..=16 * 1024) {
        let arena = Arena::reserve(capacity).unwrap();
        let codec = EchoCodec::new(field);
        let mut msg = GetMessage::default();

        match codec.serialize(&mut msg, &arena) {
            Ok(sga) => {
                prop_assert!(field <= capacity);
                prop_assert_eq!(sga.num_segments(), 1);
                let back: GetMessage = codec.deserialize(&sga).unwrap();
                prop_assert_eq!(back.key_len(), field);
                prop_assert_eq!(back.key_addr(), arena.base_address());
            }
            Err(e) => {
                prop_assert!(field > capacity);
                let rejected = matches!(e, Error::FieldSizeExceedsCapacity { .. });
                prop_assert!(rejected);
            }
        }
    }

    /// Deserialize meng-alias buffer yang diterima, apa pun isinya
    #[test]
    fn deserialize_aliases_receive_buffer(payload in proptest::collection::vec(any::<u8>(), 1..2048)) {
        let sga = SgArray::single(&payload);
        let msg: GetMessage = EchoCodec::new(payload.len()).deserialize(&sga).unwrap();
        prop_assert_eq!(msg.key_addr(), payload.as_ptr());
        prop_assert_eq!(msg.key_len(), payload.len());
    }
}
