//! Page request / page response types shared by every list endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page size used when the client does not send one
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Upper bound for `page_size`
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the literal `asc` sorts ascending; anything else falls back to `desc`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Paging, sorting and search parameters decoded from the query string.
///
/// Raw values are kept as sent; the accessors apply defaults and clamping so
/// the rest of the code never sees an out-of-range page.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Page number, starting at 1 (default 1)
    pub page: Option<i64>,
    /// Items per page, 1–100 (default 10)
    pub page_size: Option<i64>,
    /// Field to sort by; must be one of the resource's sortable fields
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default `desc`)
    pub sort_order: Option<String>,
    /// Substring to search for
    pub keyword: Option<String>,
    /// Field to search in; when omitted every searchable field is matched
    pub search_by: Option<String>,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn with_sort(mut self, field: &str, order: &str) -> Self {
        self.sort_by = Some(field.to_string());
        self.sort_order = Some(order.to_string());
        self
    }

    pub fn with_search(mut self, keyword: &str, field: Option<&str>) -> Self {
        self.keyword = Some(keyword.to_string());
        self.search_by = field.map(str::to_string);
        self
    }

    /// Effective page, never below 1
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1) as u64
    }

    /// Effective page size, clamped to `[1, MAX_PAGE_SIZE]`
    pub fn page_size(&self) -> u64 {
        match self.page_size {
            Some(size) => size.clamp(1, MAX_PAGE_SIZE as i64) as u64,
            None => DEFAULT_PAGE_SIZE,
        }
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page(), self.page_size())
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse(self.sort_order.as_deref())
    }

    pub fn sort_by(&self) -> Option<&str> {
        non_empty(self.sort_by.as_deref())
    }

    pub fn search_by(&self) -> Option<&str> {
        non_empty(self.search_by.as_deref())
    }

    pub fn keyword(&self) -> Option<&str> {
        non_empty(self.keyword.as_deref())
    }
}

/// Rows to skip before `page`, capped at `i64::MAX` since SQL binds offsets
/// as signed 64-bit integers. A capped offset lies past the end of any table
/// and yields an empty page.
pub fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1)
        .checked_mul(page_size)
        .map_or(MAX_OFFSET, |offset| offset.min(MAX_OFFSET))
}

const MAX_OFFSET: u64 = i64::MAX as u64;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// One page of results plus paging metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageResponse<T> {
    /// Records on the current page
    pub data: Vec<T>,
    /// Number of matching records across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u64,
    /// Page size in effect
    pub page_size: u64,
    /// Number of pages, 0 when nothing matched
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            data,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}
