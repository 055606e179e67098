use serde::Serialize;

use crate::error::{GridError, Result};

/// Default number of rows per page
pub const DEFAULT_PER_PAGE: usize = 10;

/// Slices the active row set into fixed-size pages and tracks the current one.
///
/// Page numbers are 1-based. With no rows there are no pages and the current
/// page stays at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginator {
    per_page: usize,
    current_page: usize,
    /// Natural-order row positions of each page
    pages: Vec<Vec<usize>>,
    total_rows: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Paginator {
    /// Create a paginator; a zero page size is treated as 1
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            current_page: 1,
            pages: Vec::new(),
            total_rows: 0,
        }
    }

    /// Split `rows` into pages and pull the current page back into range
    pub fn paginate(&mut self, rows: &[usize]) {
        self.pages = rows.chunks(self.per_page).map(<[usize]>::to_vec).collect();
        self.total_rows = rows.len();
        self.current_page = self.current_page.clamp(1, self.total_pages().max(1));
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Change the page size. Takes effect on the next [`paginate`](Self::paginate).
    pub fn set_per_page(&mut self, per_page: usize) -> Result<()> {
        if per_page == 0 {
            return Err(GridError::InvalidConfig("perPage must be greater than 0".into()));
        }
        self.per_page = per_page;
        Ok(())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn pages(&self) -> &[Vec<usize>] {
        &self.pages
    }

    /// Rows of a page (1-based)
    pub fn page(&self, page: usize) -> Option<&[usize]> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(Vec::as_slice)
    }

    /// Rows of the current page; empty when there are no pages
    pub fn current_rows(&self) -> &[usize] {
        self.page(self.current_page).unwrap_or(&[])
    }

    /// Move to `page`.
    ///
    /// Returns `Ok(false)` when `page` is already current, and an error when it
    /// lies outside `1..=total_pages`; neither changes the current page.
    pub fn go_to(&mut self, page: usize) -> Result<bool> {
        let total = self.total_pages();
        if page < 1 || page > total {
            return Err(GridError::PageOutOfRange { page, total });
        }
        if page == self.current_page {
            return Ok(false);
        }
        self.current_page = page;
        Ok(true)
    }

    /// Return to the first page
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page == self.total_pages()
    }

    /// 1-based `(start, end)` row numbers shown on the current page,
    /// or `None` when there are no rows
    pub fn bounds(&self) -> Option<(usize, usize)> {
        let rows = self.page(self.current_page)?;
        let start = (self.current_page - 1) * self.per_page;
        Some((start + 1, start + rows.len()))
    }
}
