//! Splits the current account list into fixed-size, zero-indexed pages.
//!
//! Pages are recomputed on every call, so a page is a view of the current
//! state rather than a stable cursor: boundaries shift as accounts are
//! created or deleted between requests.

use std::num::NonZeroUsize;

use crate::Error;

/// Number of pages needed to hold `len` items, `ceil(len / page_size)`.
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// Returns the `index`-th contiguous chunk of `items`.
/// Fails with [`Error::OutOfRange`] when `index >= page_count(items.len(), page_size)`.
pub fn page<T>(items: &[T], index: usize, page_size: NonZeroUsize) -> Result<&[T], Error> {
    items
        .chunks(page_size.get())
        .nth(index)
        .ok_or_else(|| Error::OutOfRange {
            page: index,
            pages: page_count(items.len(), page_size),
        })
}
