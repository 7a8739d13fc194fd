use serde::Serialize;
use utoipa::ToSchema;

/// Upper bound for any page size requested by a client.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Highest page number accepted; keeps `offset()` within SQLite's signed range.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// A resolved page request: `page` starts at 1, `limit` is within 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Resolve optional query values, falling back to `default_limit`.
    pub fn resolve(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> Self {
        let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
        let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: PageRequest) -> Self {
        let total_pages = total.div_ceil(page.limit);
        Self {
            items,
            total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_applies_defaults_and_clamps() {
        assert_eq!(
            PageRequest::resolve(None, None, 10),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::resolve(Some(0), Some(1000), 10),
            PageRequest { page: 1, limit: 100 }
        );
        assert_eq!(PageRequest::resolve(Some(3), Some(0), 20).limit, 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = PageRequest::resolve(Some(3), Some(20), 10);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn huge_page_is_clamped() {
        let page = PageRequest::resolve(Some(i64::MAX as u64), None, 10);
        assert_eq!(page.page, MAX_PAGE);
        assert!(page.offset() <= i64::MAX as u64);

        let page = PageRequest::resolve(Some(u64::MAX), Some(100), 10);
        assert!(page.offset() <= i64::MAX as u64);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest::resolve(Some(1), Some(10), 10);
        assert_eq!(PaginatedResult::new(vec![1, 2, 3], 21, page).total_pages, 3);
        assert_eq!(PaginatedResult::<u8>::new(vec![], 0, page).total_pages, 0);
    }
}
