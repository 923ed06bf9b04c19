// ABOUTME: Generic filter/sort/page query builder shared by every collection endpoint
// ABOUTME: Translates a QueryRequest into scoped, ordered, bounded SQL with bound parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # Query abstraction
//!
//! Each entity describes its table through [`QuerySpec`]: the columns it
//! selects, the columns free-text search looks at, and the whitelist of
//! sortable fields keyed by their public name. [`PagedQuery`] combines that
//! description with the caller's [`Scope`] and [`QueryRequest`] and produces
//! two statements: a `COUNT(*)` over the filtered set and a page of rows
//! ordered by the requested column and then by `id`.
//!
//! Search relies on SQLite's `LIKE`, which folds ASCII letters only; the
//! term is bound unchanged so both sides of the match fold the same way.
//!
//! Column names only ever come from the `QuerySpec` constants; every client
//! supplied value is a bound parameter.

use std::marker::PhantomData;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::repository::Scope;
use crate::errors::{AppError, AppResult};
use crate::pagination::{PagedResult, QueryRequest, SortDirection};

/// Static description of how an entity table is queried
pub trait QuerySpec {
    /// Table name
    const TABLE: &'static str;
    /// Comma-separated select list
    const COLUMNS: &'static str;
    /// Column restricting rows to their owner, for user-owned entities
    const OWNER_COLUMN: Option<&'static str> = None;
    /// Columns matched by free-text search
    const SEARCH_COLUMNS: &'static [&'static str] = &[];
    /// Sortable fields as (public name, column) pairs
    const SORT_FIELDS: &'static [(&'static str, &'static str)];
    /// Public name of the field sorted by when the request names none
    const DEFAULT_SORT: &'static str;
    /// Direction used when the request names none
    const DEFAULT_DIRECTION: SortDirection = SortDirection::Asc;

    /// Public names accepted in `sort_by`
    #[must_use]
    fn sortable_fields() -> Vec<&'static str> {
        Self::SORT_FIELDS.iter().map(|(name, _)| *name).collect()
    }

    /// Column for a public sort name, matched case-insensitively
    #[must_use]
    fn sort_column(name: &str) -> Option<&'static str> {
        Self::SORT_FIELDS
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, column)| *column)
    }
}

#[derive(Debug, Clone)]
enum Filter {
    Eq {
        column: &'static str,
        value: String,
    },
    InSubquery {
        column: &'static str,
        subquery: &'static str,
        value: String,
    },
}

/// A scoped, filtered, sorted and paged view over one entity table
#[derive(Debug)]
pub struct PagedQuery<'a, S: QuerySpec> {
    scope: &'a Scope,
    request: &'a QueryRequest,
    filters: Vec<Filter>,
    spec: PhantomData<S>,
}

impl<'a, S: QuerySpec> PagedQuery<'a, S> {
    /// Start a query for `request` within `scope`
    #[must_use]
    pub const fn new(scope: &'a Scope, request: &'a QueryRequest) -> Self {
        Self {
            scope,
            request,
            filters: Vec::new(),
            spec: PhantomData,
        }
    }

    /// Keep only rows whose `column` equals `value`
    #[must_use]
    pub fn filter_eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq {
            column,
            value: value.to_string(),
        });
        self
    }

    /// Keep only rows whose `column` is returned by `subquery`
    ///
    /// `subquery` must end where its single bound parameter goes, for example
    /// `SELECT exercise_type_id FROM exercise_muscle_groups WHERE muscle_group_id = `.
    #[must_use]
    pub fn filter_in(
        mut self,
        column: &'static str,
        subquery: &'static str,
        value: impl ToString,
    ) -> Self {
        self.filters.push(Filter::InSubquery {
            column,
            subquery,
            value: value.to_string(),
        });
        self
    }

    /// Statement counting every row the query matches, ignoring paging
    #[must_use]
    pub fn count_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", S::TABLE));
        self.push_where(&mut builder);
        builder
    }

    /// Statement selecting the requested page
    #[must_use]
    pub fn select_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM {}", S::COLUMNS, S::TABLE));
        self.push_where(&mut builder);

        let column = self
            .request
            .sort_by
            .as_deref()
            .and_then(S::sort_column)
            .or_else(|| S::sort_column(S::DEFAULT_SORT))
            .unwrap_or("id");
        let direction = self
            .request
            .sort_direction
            .unwrap_or(S::DEFAULT_DIRECTION)
            .as_sql();

        builder.push(format!(" ORDER BY {column} {direction}"));
        if column != "id" {
            builder.push(format!(", id {direction}"));
        }

        builder.push(" LIMIT ");
        builder.push_bind(i64::from(self.request.page_size()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(self.request.offset()).unwrap_or(i64::MAX));
        builder
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Sqlite>) {
        builder.push(" WHERE 1 = 1");

        if let (Scope::Owner(user_id), Some(owner_column)) = (self.scope, S::OWNER_COLUMN) {
            builder.push(format!(" AND {owner_column} = "));
            builder.push_bind(user_id.to_string());
        }

        for filter in &self.filters {
            match filter {
                Filter::Eq { column, value } => {
                    builder.push(format!(" AND {column} = "));
                    builder.push_bind(value.clone());
                }
                Filter::InSubquery {
                    column,
                    subquery,
                    value,
                } => {
                    builder.push(format!(" AND {column} IN ({subquery}"));
                    builder.push_bind(value.clone());
                    builder.push(")");
                }
            }
        }

        if let Some(term) = self.request.search_term() {
            if !S::SEARCH_COLUMNS.is_empty() {
                let pattern = format!("%{}%", escape_like(term));
                builder.push(" AND (");
                for (index, column) in S::SEARCH_COLUMNS.iter().enumerate() {
                    if index > 0 {
                        builder.push(" OR ");
                    }
                    builder.push(format!("{column} LIKE "));
                    builder.push_bind(pattern.clone());
                    builder.push(" ESCAPE '\\'");
                }
                builder.push(")");
            }
        }
    }

    /// Run both statements and assemble the page
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails or a row cannot be decoded
    pub async fn fetch<T>(
        &self,
        pool: &SqlitePool,
        map_row: fn(&SqliteRow) -> AppResult<T>,
    ) -> AppResult<PagedResult<T>> {
        let mut count = self.count_query();
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count {}: {e}", S::TABLE)))?;

        let mut select = self.select_query();
        let rows = select
            .build()
            .fetch_all(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list {}: {e}", S::TABLE)))?;

        let items = rows.iter().map(map_row).collect::<AppResult<Vec<_>>>()?;
        Ok(PagedResult::new(
            items,
            self.request.page(),
            self.request.page_size(),
            u64::try_from(total).unwrap_or(0),
        ))
    }
}

/// Escape LIKE wildcards so the term matches literally
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct Widgets;

    impl QuerySpec for Widgets {
        const TABLE: &'static str = "widgets";
        const COLUMNS: &'static str = "id, name, owner_id";
        const OWNER_COLUMN: Option<&'static str> = Some("owner_id");
        const SEARCH_COLUMNS: &'static [&'static str] = &["name", "notes"];
        const SORT_FIELDS: &'static [(&'static str, &'static str)] =
            &[("name", "name"), ("createdAt", "created_at")];
        const DEFAULT_SORT: &'static str = "name";
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_select_applies_scope_search_sort_and_paging() {
        let scope = Scope::Owner(Uuid::new_v4());
        let request = QueryRequest {
            search: Some(" Bench ".into()),
            sort_by: Some("CREATEDAT".into()),
            sort_direction: Some(SortDirection::Desc),
            page: Some(2),
            page_size: Some(10),
        };
        let query = PagedQuery::<Widgets>::new(&scope, &request).filter_eq("kind", "x");
        let select = query.select_query();
        let sql = select.sql();

        assert!(sql.starts_with("SELECT id, name, owner_id FROM widgets WHERE 1 = 1"));
        assert!(sql.contains("AND owner_id = ?"));
        assert!(sql.contains("AND kind = ?"));
        assert!(sql.contains("(name LIKE ? ESCAPE '\\' OR notes LIKE ?"));
        assert!(!sql.contains("LOWER("));
        assert!(sql.ends_with("ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"));
    }

    #[test]
    fn test_shared_scope_and_defaults() {
        let scope = Scope::Shared;
        let request = QueryRequest::default();
        let query = PagedQuery::<Widgets>::new(&scope, &request);

        let select = query.select_query();
        assert!(!select.sql().contains("owner_id ="));
        assert!(select.sql().contains("ORDER BY name ASC, id ASC"));

        let count = query.count_query();
        assert_eq!(count.sql(), "SELECT COUNT(*) FROM widgets WHERE 1 = 1");
    }

    #[test]
    fn test_filter_in_subquery() {
        let scope = Scope::Shared;
        let request = QueryRequest::default();
        let query = PagedQuery::<Widgets>::new(&scope, &request).filter_in(
            "id",
            "SELECT widget_id FROM links WHERE group_id = ",
            "g1",
        );
        let count = query.count_query();
        assert!(count
            .sql()
            .ends_with("AND id IN (SELECT widget_id FROM links WHERE group_id = ?)"));
    }

    #[test]
    fn test_sortable_fields() {
        assert_eq!(Widgets::sortable_fields(), vec!["name", "createdAt"]);
        assert_eq!(Widgets::sort_column("NAME"), Some("name"));
        assert_eq!(Widgets::sort_column("password"), None);
    }
}
