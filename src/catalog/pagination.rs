//! Fixed-size pages over the filtered view

/// Skills shown per page
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Page `index` (1-based) of `items`.
///
/// An index outside `1..=page_count` yields an empty slice; clamping is left
/// to the caller.
pub fn page<T>(items: &[T], index: usize, page_size: usize) -> &[T] {
    if index == 0 || page_size == 0 {
        return &[];
    }
    let start = (index - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `len` items; 0 when there are none
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Bring `index` into `1..=page_count`, or 1 when there are no pages
pub fn clamp_page(index: usize, page_count: usize) -> usize {
    index.clamp(1, page_count.max(1))
}
