#![no_main]
use libfuzzer_sys::fuzz_target;
use storecursor::input::{DataInput, SliceInput, StoreInput};
use storecursor::store::MemoryStore;

fuzz_target!(|data: &[u8]| {
    // Readers must never panic on arbitrary bytes, only return store errors,
    // and both inputs must decode the same varints.
    let Some((&op, rest)) = data.split_first() else {
        return;
    };
    let store = MemoryStore::new(rest);
    let mut input = StoreInput::new(&store);
    let count = usize::from(op & 0x3F);

    match op >> 6 {
        0 => {
            let _ = input.unpack_long_array_delta_compression(count);
        }
        1 => {
            let _ = input.unpack_long_skip(count);
        }
        2 => {
            let mut slice = SliceInput::new(rest);
            while let (Ok(a), Ok(b)) = (input.unpack_long(), slice.unpack_long()) {
                assert_eq!(a, b);
            }
        }
        _ => {
            let _ = input.read_char();
            let _ = input.read_int();
            let _ = input.read_double();
            let mut buf = vec![0u8; count];
            let _ = input.read_fully(&mut buf);
        }
    }
});
