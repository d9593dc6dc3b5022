//! Pagination utilities for service layer
//!
//! `PageRequest` normalizes the raw query inputs, `PageResult` carries one
//! page plus the derived counters.

use common::types::PaginationInfo;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Pagination parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub page_size: u64,
    /// lower-cased substring; `None` matches everything
    pub filter: Option<String>,
}

impl PageRequest {
    /// Clamp page and size to at least 1 and lower-case the filter.
    pub fn new(page: u64, page_size: u64, filter: Option<&str>) -> Self {
        let filter = filter.map(str::to_lowercase).filter(|f| !f.is_empty());
        Self { page: page.max(1), page_size: page_size.max(1), filter }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE, None) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_records: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_records: u64) -> Self {
        let total_pages = total_records.div_ceil(request.page_size);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_records,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }

    pub fn pagination(&self) -> PaginationInfo {
        PaginationInfo {
            page: self.page,
            page_size: self.page_size,
            total_records: self.total_records,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}
