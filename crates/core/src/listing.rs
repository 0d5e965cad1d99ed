//! Listing parameters, sorting and pagination (search/sort/page contract).
//!
//! This module lives in `core` (no I/O) so normalization rules can be unit
//! tested without a database. The SQL side lives in `catalog_db::listing`.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Page size used when `per_page` is absent or unparseable.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Upper bound for `per_page`.
pub const MAX_PER_PAGE: i64 = 100;

// ---------------------------------------------------------------------------
// Raw request parameters
// ---------------------------------------------------------------------------

/// Common listing query parameters (`?search=&page=&per_page=&sort=&dir=`).
///
/// Every field is kept as a string and parsed leniently by
/// [`ListQuery::from_params`], so the struct can be `#[serde(flatten)]`ed
/// into entity-specific query structs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` case-insensitively; anything else is ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized query
// ---------------------------------------------------------------------------

/// Listing request after normalization: trimmed search, page >= 1 and
/// `per_page` clamped to `1..=MAX_PER_PAGE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: i64,
    pub per_page: i64,
    pub sort: Option<String>,
    pub dir: SortDirection,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort: None,
            dir: SortDirection::Asc,
        }
    }
}

impl ListQuery {
    pub fn from_params(params: &ListParams) -> Self {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let page = parse_i64(params.page.as_deref()).unwrap_or(1).max(1);
        let per_page = parse_i64(params.per_page.as_deref())
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);

        let sort = params
            .sort
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            search,
            page,
            per_page,
            sort,
            dir: SortDirection::parse(params.dir.as_deref()),
        }
    }

    /// Number of rows to skip for the current page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Resolve the requested sort column against a whitelist.
    ///
    /// Returns the whitelisted (static) column name so it can be spliced into
    /// SQL. Unknown columns yield `None`, i.e. default ordering.
    pub fn sort_column(&self, sortable: &[&'static str]) -> Option<&'static str> {
        let requested = self.sort.as_deref()?;
        sortable.iter().copied().find(|c| *c == requested)
    }
}

fn parse_i64(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

// ---------------------------------------------------------------------------
// Search and filter value parsing
// ---------------------------------------------------------------------------

/// Build a `LIKE`/`ILIKE` substring pattern, escaping the wildcard and
/// escape characters in user input.
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Parse a boolean filter flag. Accepts `true/false/1/0` (any case).
pub fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a comma-separated id list, skipping anything that is not a UUID.
pub fn parse_ids(value: Option<&str>) -> Vec<EntityId> {
    let Some(value) = value else {
        return Vec::new();
    };
    let mut ids: Vec<EntityId> = value
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

// ---------------------------------------------------------------------------
// Page envelope
// ---------------------------------------------------------------------------

/// Pagination metadata returned alongside every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub last_page: i64,
    /// 1-based position of the first row on this page, `None` when empty.
    pub from: Option<i64>,
    /// 1-based position of the last row on this page, `None` when empty.
    pub to: Option<i64>,
}

impl PageMeta {
    pub fn new(query: &ListQuery, total: i64, rows_on_page: usize) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            (total + query.per_page - 1) / query.per_page
        };
        let (from, to) = if rows_on_page == 0 {
            (None, None)
        } else {
            let first = query.offset() + 1;
            (Some(first), Some(first + rows_on_page as i64 - 1))
        };
        Self {
            total,
            current_page: query.page,
            per_page: query.per_page,
            last_page,
            from,
            to,
        }
    }
}

/// A single page of results: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(query: &ListQuery, data: Vec<T>, total: i64) -> Self {
        let meta = PageMeta::new(query, total, data.len());
        Self { data, meta }
    }

    /// Transform every row while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, per_page: Option<&str>) -> ListParams {
        ListParams {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
            ..Default::default()
        }
    }

    // --- Normalization ---

    #[test]
    fn defaults_when_params_missing() {
        let query = ListQuery::from_params(&ListParams::default());
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn page_below_one_is_first_page() {
        let query = ListQuery::from_params(&params(Some("0"), None));
        assert_eq!(query.page, 1);
        let query = ListQuery::from_params(&params(Some("-4"), None));
        assert_eq!(query.page, 1);
    }

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(ListQuery::from_params(&params(None, Some("0"))).per_page, 1);
        assert_eq!(
            ListQuery::from_params(&params(None, Some("1000"))).per_page,
            MAX_PER_PAGE
        );
        assert_eq!(
            ListQuery::from_params(&params(None, Some("abc"))).per_page,
            DEFAULT_PER_PAGE
        );
    }

    #[test]
    fn offset_skips_previous_pages() {
        let query = ListQuery::from_params(&params(Some("3"), Some("10")));
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = ListQuery::from_params(&ListParams {
            search: Some("   ".into()),
            ..Default::default()
        });
        assert_eq!(query.search, None);
    }

    // --- Sorting ---

    #[test]
    fn sort_column_must_be_whitelisted() {
        let query = ListQuery::from_params(&ListParams {
            sort: Some("name".into()),
            dir: Some("DESC".into()),
            ..Default::default()
        });
        assert_eq!(query.sort_column(&["name", "created_at"]), Some("name"));
        assert_eq!(query.dir, SortDirection::Desc);

        let query = ListQuery::from_params(&ListParams {
            sort: Some("name; DROP TABLE videos".into()),
            ..Default::default()
        });
        assert_eq!(query.sort_column(&["name"]), None);
    }

    #[test]
    fn unknown_direction_is_ascending() {
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
    }

    // --- Search / filters ---

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("drama"), "%drama%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag(Some("true")), Some(true));
        assert_eq!(parse_flag(Some("0")), Some(false));
        assert_eq!(parse_flag(Some("FALSE")), Some(false));
        assert_eq!(parse_flag(Some("maybe")), None);
        assert_eq!(parse_flag(None), None);
    }

    #[test]
    fn id_list_skips_garbage_and_duplicates() {
        let a = EntityId::now_v7();
        let raw = format!("{a}, not-a-uuid,{a}");
        assert_eq!(parse_ids(Some(&raw)), vec![a]);
        assert!(parse_ids(None).is_empty());
    }

    // --- Page metadata ---

    #[test]
    fn meta_for_partial_last_page() {
        let query = ListQuery::from_params(&params(Some("3"), Some("10")));
        let meta = PageMeta::new(&query, 25, 5);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.from, Some(21));
        assert_eq!(meta.to, Some(25));
    }

    #[test]
    fn meta_for_page_past_the_end() {
        let query = ListQuery::from_params(&params(Some("9"), Some("10")));
        let meta = PageMeta::new(&query, 25, 0);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.current_page, 9);
        assert_eq!(meta.from, None);
        assert_eq!(meta.to, None);
    }

    #[test]
    fn meta_for_empty_table() {
        let meta = PageMeta::new(&ListQuery::default(), 0, 0);
        assert_eq!(meta.last_page, 1);
    }
}
