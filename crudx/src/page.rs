use serde::{Deserialize, Serialize};

/// Page size substituted when a request asks for size 0.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination parameters: a 1-based page index and a page size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pageable {
    pub page: i64,
    pub size: i64,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pageable {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// Row offset of the first element of this page.
    ///
    /// Page 0 is treated as page 1. A negative page index is not rejected;
    /// only the resulting offset is floored to 0.
    pub fn offset(&self) -> i64 {
        let page = if self.page == 0 { 1 } else { self.page };
        let offset = (page - 1) * self.limit();
        if offset < 0 {
            0
        } else {
            offset
        }
    }

    /// Row limit for this page: the requested size, with 0 replaced by
    /// [`DEFAULT_PAGE_SIZE`]. No upper bound is enforced here.
    pub fn limit(&self) -> i64 {
        if self.size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size
        }
    }
}

/// A page of results with pagination metadata.
///
/// `total_elements` always reflects the full matching set, not the page.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        let size = pageable.limit();
        let total_pages = if size <= 0 {
            0
        } else {
            total_elements.div_ceil(size as u64)
        };
        Self {
            content,
            page: pageable.page,
            size,
            total_elements,
            total_pages,
        }
    }

    /// Replaces the page content, keeping the pagination metadata.
    pub fn with_content<R>(self, content: Vec<R>) -> Page<R> {
        Page {
            content,
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
