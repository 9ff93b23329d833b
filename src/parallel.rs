// Concurrent decoding of independent arrays from one store.
//
// Each array gets its own `StoreInput`; readers never share a cursor.
// The store only has to tolerate concurrent reads (`Sync`).

use rayon::prelude::*;

use crate::error::Result;
use crate::input::{DataInput, StoreInput};
use crate::store::Store;

/// Decode delta-compressed arrays located at `(offset, size)` pairs.
///
/// Results are returned in input order; the first failure is reported.
pub fn unpack_delta_arrays<S>(store: &S, arrays: &[(u64, usize)]) -> Result<Vec<Vec<u64>>>
where
    S: Store + Sync + ?Sized,
{
    arrays
        .par_iter()
        .map(|&(offset, size)| {
            StoreInput::at(store, offset).unpack_long_array_delta_compression(size)
        })
        .collect()
}
