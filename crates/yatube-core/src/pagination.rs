//! Fixed-size pagination over an ordered result set.
//!
//! Page numbers are 1-indexed and out-of-range requests are clamped rather
//! than rejected: anything below 1 becomes page 1, anything past the end
//! becomes the last page, and an unparsable page parameter means page 1.
//! There is always at least one page, even when the result set is empty.

use serde::Serialize;

/// Default number of posts per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Page arithmetic for a result set of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_items: u64,
    page_size: u64,
}

impl Paginator {
    /// A zero page size is treated as one item per page.
    pub fn new(total_items: u64, page_size: u64) -> Self {
        Self {
            total_items,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn num_pages(&self) -> u64 {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    /// Clamp a requested page number into `1..=num_pages`.
    pub fn clamp(&self, requested: i64) -> u64 {
        if requested < 1 {
            return 1;
        }
        (requested as u64).min(self.num_pages())
    }

    /// Offset of the first item on page `number`.
    pub fn offset(&self, number: u64) -> u64 {
        number.saturating_sub(1) * self.page_size
    }

    /// Build the page for a clamped `number` from its items.
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            page_size: self.page_size,
            total_items: self.total_items,
            num_pages: self.num_pages(),
        }
    }
}

/// Parse the raw `page` query value. Missing or non-integer values mean page 1.
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// One page of items plus what a pager needs to render itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub num_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        let items = self.items.into_iter().map(f).collect();
        Page {
            items,
            number: self.number,
            page_size: self.page_size,
            total_items: self.total_items,
            num_pages: self.num_pages,
        }
    }

    /// Replace the items wholesale, keeping the page metadata.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            number: self.number,
            page_size: self.page_size,
            total_items: self.total_items,
            num_pages: self.num_pages,
        }
    }
}
