#![no_main]
use libfuzzer_sys::fuzz_target;
use storecursor::store::{MemoryStore, PagedStore, Store, StoreOptions};

fuzz_target!(|data: &[u8]| {
    // Paged reads must agree byte for byte with a flat store.
    let Some((&shift, rest)) = data.split_first() else {
        return;
    };
    let opts = StoreOptions {
        page_size: 1 << (shift % 10),
        ..Default::default()
    };
    let Ok(paged) = PagedStore::from_bytes(rest, opts) else {
        return;
    };
    let flat = MemoryStore::new(rest);
    for offset in 0..rest.len() as u64 {
        assert_eq!(paged.get_byte(offset).ok(), flat.get_byte(offset).ok());
        assert_eq!(paged.get_long(offset).ok(), flat.get_long(offset).ok());
    }
});
