pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 30;
pub const MAX_LIMIT: u64 = 100;
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Page selection for list queries, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Zero or missing values fall back to the defaults
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Self { page, limit }
    }

    /// Row offset, saturating at the largest value the SQL bind accepts
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(MAX_OFFSET)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the unpaginated total
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_offset() {
        let req = PageRequest::new(None, Some(0));
        assert_eq!(req, PageRequest { page: 1, limit: 30 });
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let req = PageRequest::new(Some(u64::MAX), Some(100));
        assert_eq!(req.offset(), i64::MAX as u64);

        let req = PageRequest::new(Some(u64::MAX / 2), Some(2));
        assert_eq!(req.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(PageRequest::new(Some(1), Some(5000)).limit, MAX_LIMIT);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Page<()> = Page { items: vec![], total: 61, page: 1, limit: 30 };
        assert_eq!(page.total_pages(), 3);
        let empty: Page<()> = Page { items: vec![], total: 0, page: 1, limit: 30 };
        assert_eq!(empty.total_pages(), 0);
    }
}
