use alloc::vec::Vec;

mod invalidation;
mod property_units;

/// Splits `data` into consecutive chunks whose sizes are derived from
/// `splits`. Every byte ends up in exactly one chunk; chunks may be empty.
pub(crate) fn chunked(data: &[u8], splits: &[usize]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    let mut rest = data;
    for split in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(split % (rest.len() + 1));
        chunks.push(head.to_vec());
        rest = tail;
    }
    chunks.push(rest.to_vec());
    chunks
}

/// Iteration count for property tests.
pub(crate) fn quickcheck_tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}
