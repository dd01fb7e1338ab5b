//! Pagination query shared by list endpoints

use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Items per page (default 10, at most 100)
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PER_PAGE)
            .min(MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 10);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_out_of_range_values_are_normalized() {
        let q = PageQuery::new(0, 1000);
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), MAX_PER_PAGE);

        let q = PageQuery::new(3, -5);
        assert_eq!(q.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(q.offset(), 20);
    }
}
