//! Shared query parameter types for API handlers.

use inkwell_core::pagination::PageRequest;
use serde::Deserialize;

/// Page-number pagination with an optional title keyword
/// (`?page=&page_size=&keyword=`).
///
/// Values are clamped via [`PageRequest::new`], never rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub keyword: Option<String>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// The keyword with surrounding whitespace removed, if non-empty.
    pub fn keyword(&self) -> Option<&str> {
        non_blank(self.keyword.as_deref())
    }
}

/// Query parameters for `GET /wenjuans` and `GET /wenjuans/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SurveyListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub is_pinned: Option<bool>,
    pub title: Option<String>,
}

impl SurveyListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
