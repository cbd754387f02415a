//! Page windows over filtered ticket sequences

use serde::Serialize;
use std::num::NonZeroUsize;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered to the user
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// One page of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    /// The page actually served after clamping
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Transforms the items, keeping the window metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Number of pages needed for `total_items`, never less than one
#[must_use]
pub fn total_pages(total_items: usize, page_size: NonZeroUsize) -> usize {
    total_items.div_ceil(page_size.get()).max(1)
}

/// Cuts the `page`-th window (1-based) out of `items`
///
/// Out-of-range pages resolve to the nearest valid page instead of an
/// empty window: 0 becomes 1 and anything past the end becomes the last page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: NonZeroUsize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size.get();
    let end = (start + page_size.get()).min(total_items);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        total_items,
        total_pages,
        page,
        page_size: page_size.get(),
    }
}
