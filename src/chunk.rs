use std::slice::Chunks;

/// Tracks per playlist write request.
pub const WRITE_CHUNK_SIZE: usize = 50;

/// Split `items` into groups of `size`; the last group may be shorter.
///
/// # Panics
///
/// Panics if `size` is zero.
pub fn chunked<T>(items: &[T], size: usize) -> Chunks<'_, T> {
    assert!(size > 0, "chunk size must be positive");
    items.chunks(size)
}
