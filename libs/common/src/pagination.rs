//! Pagination primitives shared by the listing endpoints
//!
//! Pages are zero-based. A `Page` carries the requested slice together with
//! the total number of matching rows so views can render navigation.

use serde::{Deserialize, Serialize};

/// A request for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page number
    pub page: u32,
    /// Number of items per page, never zero
    pub size: u32,
}

impl PageRequest {
    /// Page size used when the caller does not ask for one
    pub const DEFAULT_SIZE: u32 = 10;

    /// Build a page request; a zero size is bumped to one
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Row offset for `LIMIT .. OFFSET ..` queries
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Row limit for `LIMIT .. OFFSET ..` queries
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

/// Sort direction for ordered listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Split a `property[,asc|desc]` sort parameter into its parts
///
/// Returns `None` when the direction is neither `asc` nor `desc`.
pub fn parse_sort(raw: &str) -> Option<(&str, SortDirection)> {
    let mut parts = raw.splitn(2, ',');
    let property = parts.next().unwrap_or_default().trim();
    let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
        None => SortDirection::Asc,
        Some(d) if d == "asc" => SortDirection::Asc,
        Some(d) if d == "desc" => SortDirection::Desc,
        Some(_) => return None,
    };
    Some((property, direction))
}

/// One page of results plus total-count metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    /// Number of pages needed to hold every element
    pub fn total_pages(&self) -> u32 {
        if self.total_elements <= 0 {
            return 0;
        }
        let size = i64::from(self.size.max(1));
        u32::try_from((self.total_elements + size - 1) / size).unwrap_or(u32::MAX)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Transform the content while keeping the paging metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_bumped() {
        let request = PageRequest::new(3, 0);
        assert_eq!(request.size, 1);
        assert_eq!(request.offset(), 3);
    }

    #[test]
    fn test_offset_and_limit() {
        let request = PageRequest::new(2, 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
        assert_eq!(PageRequest::default(), PageRequest::new(0, 10));
    }

    #[test]
    fn test_page_navigation() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(0, 3), 7);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_previous());
        assert!(page.has_next());

        let last = Page::new(vec![7], PageRequest::new(2, 3), 7);
        assert!(last.has_previous());
        assert!(!last.has_next());

        let empty: Page<i32> = Page::new(vec![], PageRequest::default(), 0);
        assert_eq!(empty.total_pages(), 0);
        assert!(empty.is_empty());
        assert!(!empty.has_next());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2), 4).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_elements, 4);
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("username"), Some(("username", SortDirection::Asc)));
        assert_eq!(
            parse_sort("email,DESC"),
            Some(("email", SortDirection::Desc))
        );
        assert_eq!(parse_sort("email,sideways"), None);
    }
}
