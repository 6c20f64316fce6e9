//! Client paging, search and sort parameters.
//!
//! [`PagingRequest`] is bound straight from a list endpoint's query string. Its
//! `apply_*` methods are the only way user input reaches a [`SelectQuery`], and
//! each one bounds or allow-list checks the input first.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use super::builder::{Condition, Filter, SelectQuery, SortDirection};
use super::value::Ident;

pub const DEFAULT_PAGE: i64 = 1;
pub const MIN_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MIN_SEARCH_LEN: usize = 3;

const SECONDS_PER_DAY: i64 = 86_400;

/// Validation failures raised while applying a [`PagingRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PagingError {
    #[error("paginate: invalid search length < 3")]
    InvalidSearchLength,

    #[error("paginate: invalid search_by col")]
    InvalidSearchColumn,

    #[error("paginate: invalid sort_by cols")]
    InvalidSortColumn,
}

impl PagingError {
    /// Stable category tag, safe to expose to clients.
    pub fn code(&self) -> &'static str {
        match self {
            PagingError::InvalidSearchLength => "INVALID_SEARCH_LENGTH",
            PagingError::InvalidSearchColumn => "INVALID_SEARCH_COLUMN",
            PagingError::InvalidSortColumn => "INVALID_SORT_COLUMN",
        }
    }
}

/// Columns a list endpoint exposes to `search_by` and `sort_by`.
///
/// Declared as a constant next to each repository. Never built from a record's
/// fields or from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAllowList {
    pub search: &'static [&'static str],
    pub sort: &'static [&'static str],
}

impl ColumnAllowList {
    pub const fn new(search: &'static [&'static str], sort: &'static [&'static str]) -> Self {
        Self { search, sort }
    }

    pub fn can_search(&self, column: &str) -> bool {
        self.search.contains(&column)
    }

    pub fn can_sort(&self, column: &str) -> bool {
        self.sort.contains(&column)
    }
}

/// Page window metadata returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PageMetadata {
    /// Current page (1-based)
    #[schema(example = 1)]
    pub page: i64,
    /// Rows per page
    #[schema(example = 10)]
    pub size: i64,
    /// Matching rows before pagination
    #[schema(example = 42)]
    pub total: i64,
}

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PagingRequest {
    /// Page number (1-based). Values below 1 become 1
    #[serde(default, deserialize_with = "lenient_int")]
    #[param(example = 1)]
    pub page: Option<i64>,

    /// Rows per page, clamped to 10..=100
    #[serde(default, deserialize_with = "lenient_int")]
    #[param(example = 10)]
    pub size: Option<i64>,

    /// Search text (at least 3 characters once `?` and `%` are removed)
    #[serde(default)]
    pub search: Option<String>,

    /// Column to search, must be one the endpoint allows
    #[serde(default)]
    pub search_by: Option<String>,

    /// Substring match instead of exact match. Accepts `1`/`t`/`true` and
    /// `0`/`f`/`false` in any case; anything else means exact
    #[serde(default, deserialize_with = "lenient_bool")]
    pub fuzzy: bool,

    /// Column to sort by, must be one the endpoint allows
    #[serde(default)]
    pub sort_by: Option<String>,

    /// `asc` or `desc`; anything else sorts ascending
    #[serde(default)]
    pub order_by: Option<String>,

    /// Unix seconds, inclusive lower bound (endpoint specific)
    #[serde(default, deserialize_with = "lenient_int")]
    pub start_date: Option<i64>,

    /// Unix seconds, inclusive upper bound (endpoint specific)
    #[serde(default, deserialize_with = "lenient_int")]
    pub end_date: Option<i64>,

    /// Unix seconds within a single day (endpoint specific)
    #[serde(default, deserialize_with = "lenient_int")]
    pub date: Option<i64>,
}

/// Accepts a number or numeric text. Anything unparseable counts as absent.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Accepts a boolean or the text forms `1`, `t`, `true`, `0`, `f`, `false`
/// (any case). Anything else counts as `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Bool(b)) => b,
        Some(Raw::Text(text)) => parse_bool(&text).unwrap_or(false),
        None => false,
    })
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Drops every `?` and `%`, then trims surrounding whitespace.
pub fn remove_malicious(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '?' && *c != '%')
        .collect::<String>()
        .trim()
        .to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn positive_timestamp(seconds: Option<i64>) -> Option<Timestamp> {
    seconds
        .filter(|s| *s > 0)
        .and_then(|s| Timestamp::from_second(s).ok())
}

impl PagingRequest {
    pub fn effective_page(&self) -> i64 {
        match self.page {
            Some(page) if page >= 1 => page,
            _ => DEFAULT_PAGE,
        }
    }

    pub fn effective_size(&self) -> i64 {
        self.size
            .unwrap_or(MIN_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// `(page - 1) * size`, saturating for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.effective_page() - 1).saturating_mul(self.effective_size())
    }

    pub fn sanitized_search(&self) -> Option<String> {
        non_empty(&self.search).map(remove_malicious)
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.order_by
            .as_deref()
            .map(SortDirection::parse_or_asc)
            .unwrap_or_default()
    }

    pub fn start_date(&self) -> Option<Timestamp> {
        positive_timestamp(self.start_date)
    }

    pub fn end_date(&self) -> Option<Timestamp> {
        positive_timestamp(self.end_date)
    }

    pub fn date(&self) -> Option<Timestamp> {
        positive_timestamp(self.date)
    }

    /// The UTC day `[start, start + 24h)` containing `date`.
    pub fn day_window(&self) -> Option<(Timestamp, Timestamp)> {
        let seconds = self.date.filter(|s| *s > 0)?;
        let start = Timestamp::from_second(seconds - seconds.rem_euclid(SECONDS_PER_DAY)).ok()?;
        let end = start.checked_add(SignedDuration::from_secs(SECONDS_PER_DAY)).ok()?;
        Some((start, end))
    }

    pub fn apply_search(
        &self,
        query: &mut SelectQuery,
        allowed: &[&str],
    ) -> Result<(), PagingError> {
        let (Some(search), Some(search_by)) = (non_empty(&self.search), non_empty(&self.search_by))
        else {
            return Ok(());
        };

        let search = remove_malicious(search);
        if search.chars().count() < MIN_SEARCH_LEN {
            return Err(PagingError::InvalidSearchLength);
        }

        let Some(column) = allowed.iter().find(|c| **c == search_by) else {
            tracing::warn!(search_by = %search_by, "Rejected search column");
            return Err(PagingError::InvalidSearchColumn);
        };

        let condition = if self.fuzzy {
            Condition::TextLike {
                column: Ident::from(column.to_string()),
                pattern: format!("%{search}%"),
            }
        } else {
            Condition::TextEq {
                column: Ident::from(column.to_string()),
                value: search,
            }
        };
        query.filter(condition);
        Ok(())
    }

    pub fn apply_sort(&self, query: &mut SelectQuery, allowed: &[&str]) -> Result<(), PagingError> {
        let Some(sort_by) = non_empty(&self.sort_by) else {
            return Ok(());
        };

        let direction = self.sort_direction();

        let Some(column) = allowed.iter().find(|c| **c == sort_by) else {
            tracing::warn!(sort_by = %sort_by, "Rejected sort column");
            return Err(PagingError::InvalidSortColumn);
        };

        query.order_by(Ident::from(column.to_string()), direction);
        Ok(())
    }

    pub fn apply_offset_limit(&self, query: &mut SelectQuery) {
        query.offset(self.offset()).limit(self.effective_size());
    }

    pub fn metadata(&self, total: i64) -> PageMetadata {
        PageMetadata {
            page: self.effective_page(),
            size: self.effective_size(),
            total,
        }
    }
}
