//! Deterministic slicing of an already-fetched result list.
//!
//! Pages are 1-based. Nothing here stores a page count: it is always
//! recomputed from the current list length.

/// Number of pages needed for `total` items, `0` when there is nothing to show
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Slice of `items` shown on `page` (1-based); out-of-range pages yield an empty slice
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }

    let start = match (page - 1).checked_mul(page_size) {
        Some(start) if start < items.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// One rendered page plus the numbers needed to draw pagination controls
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn new(items: &'a [T], page: usize, page_size: usize) -> Self {
        Self {
            items: paginate(items, page, page_size),
            page,
            page_count: page_count(items.len(), page_size),
            total: items.len(),
        }
    }

    /// Pagination controls are only drawn when there is more than one page
    pub fn shows_controls(&self) -> bool {
        self.page_count > 1
    }
}
