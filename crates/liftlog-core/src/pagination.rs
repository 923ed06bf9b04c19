// ABOUTME: Offset-based query model for filtered, sorted and paged collections
// ABOUTME: Provides QueryRequest parsing/validation and the PagedResult envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::constants::paging::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_SEARCH_LENGTH};
use crate::errors::FieldError;
use crate::validation::{FieldErrors, Validate};

/// Sort direction for collection queries
///
/// Accepted on the wire in any letter case (`asc`, `DESC`, `dEsC`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("asc") || value.eq_ignore_ascii_case("ascending") {
            Ok(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") || value.eq_ignore_ascii_case("descending") {
            Ok(Self::Desc)
        } else {
            Err(format!("unknown sort direction `{value}`, expected `asc` or `desc`"))
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl SortDirection {
    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Client-supplied description of search term, sort and page position
///
/// Every field is optional on the wire; accessors apply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Free-text search term
    pub search: Option<String>,
    /// Public name of the field to sort by
    pub sort_by: Option<String>,
    /// Sort direction
    pub sort_direction: Option<SortDirection>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Items per page
    pub page_size: Option<u32>,
}

impl QueryRequest {
    /// Requested page, defaulting to the first
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Requested page size, defaulting to [`DEFAULT_PAGE_SIZE`]
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Trimmed search term; blank terms count as absent
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Rows to skip for the requested page
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page().saturating_sub(1)) * u64::from(self.page_size())
    }

    /// Check paging bounds and that `sort_by` is one of `sortable`
    #[must_use]
    pub fn validate_against(&self, sortable: &[&str]) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        self.check_paging(&mut errors);
        if let Some(sort_by) = &self.sort_by {
            if !sortable.iter().any(|field| field.eq_ignore_ascii_case(sort_by)) {
                errors.add(
                    "sort_by",
                    format!("must be one of: {}", sortable.join(", ")),
                );
            }
        }
        errors.finish()
    }

    fn check_paging(&self, errors: &mut FieldErrors) {
        if self.page() < 1 {
            errors.add("page", "must be at least 1");
        }
        let page_size = self.page_size();
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            errors.add(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            );
        }
        if let Some(term) = self.search_term() {
            if term.chars().count() > MAX_SEARCH_LENGTH {
                errors.add(
                    "search",
                    format!("must be at most {MAX_SEARCH_LENGTH} characters"),
                );
            }
        }
    }
}

/// Paging bounds only; the sort whitelist is entity specific
impl Validate for QueryRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        self.check_paging(&mut errors);
        errors.finish()
    }
}

/// One page of a collection plus the totals needed to navigate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Requested page size
    pub page_size: u32,
    /// Number of items across all pages
    pub total_count: u64,
    /// Number of pages for `total_count` at `page_size`
    pub total_pages: u64,
    /// Whether a later page exists
    pub has_next_page: bool,
    /// Whether an earlier page exists
    pub has_previous_page: bool,
}

impl<T> PagedResult<T> {
    /// Assemble a page from its items and the unpaged total
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(u64::from(page_size))
        };
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
            has_next_page: u64::from(page) < total_pages,
            has_previous_page: page > 1 && total_pages > 0,
        }
    }

    /// Transform every item, keeping the paging metadata
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = QueryRequest::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
        assert!(query.search_term().is_none());
    }

    #[test]
    fn test_offset_and_blank_search() {
        let query = QueryRequest {
            search: Some("   ".into()),
            page: Some(3),
            page_size: Some(25),
            ..QueryRequest::default()
        };
        assert_eq!(query.offset(), 50);
        assert!(query.search_term().is_none());
    }

    #[test]
    fn test_validate_against_rejects_unknown_sort_and_bounds() {
        let query = QueryRequest {
            sort_by: Some("password".into()),
            page: Some(0),
            page_size: Some(MAX_PAGE_SIZE + 1),
            ..QueryRequest::default()
        };
        let errors = query.validate_against(&["name", "created_at"]);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["page", "page_size", "sort_by"]);
    }

    #[test]
    fn test_sort_field_match_is_case_insensitive() {
        let query = QueryRequest {
            sort_by: Some("Name".into()),
            ..QueryRequest::default()
        };
        assert!(query.validate_against(&["name"]).is_empty());
    }

    #[test]
    fn test_sort_direction_aliases() {
        let asc: SortDirection = serde_json::from_str("\"ASC\"").unwrap();
        let desc: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(asc, SortDirection::Asc);
        assert_eq!(desc.as_sql(), "DESC");
    }

    #[test]
    fn test_sort_direction_any_letter_case() {
        let request: QueryRequest =
            serde_json::from_value(serde_json::json!({"sort_direction": "dEsC"})).unwrap();
        assert_eq!(request.sort_direction, Some(SortDirection::Desc));

        assert_eq!("aSC".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!(" Descending ".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("sideways".parse::<SortDirection>().is_err());
        assert!(serde_json::from_str::<SortDirection>("\"up\"").is_err());
    }

    #[test]
    fn test_paged_result_navigation() {
        let page = PagedResult::new(vec![1, 2], 2, 2, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert!(page.has_previous_page);

        let last = PagedResult::new(vec![5], 3, 2, 5);
        assert!(!last.has_next_page);

        let beyond: PagedResult<i32> = PagedResult::new(Vec::new(), 9, 2, 5);
        assert!(beyond.items.is_empty());
        assert!(!beyond.has_next_page);
        assert_eq!(beyond.total_count, 5);

        let empty: PagedResult<i32> = PagedResult::new(Vec::new(), 1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_previous_page);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = PagedResult::new(vec![1, 2], 1, 2, 4).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_pages, 2);
    }
}
