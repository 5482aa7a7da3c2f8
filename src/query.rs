// ABOUTME: Generic list-endpoint query pipeline: field selection, sorting, filtering, pagination
// ABOUTME: Parses raw query strings and composes bounded, shaped, paginated result sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

//! # List Query Pipeline
//!
//! Turns a base "select all rows of entity E" query plus incoming
//! query-string parameters into a bounded, shaped, paginated result:
//!
//! - `fields=<comma-list>` restricts output columns; unknown names are
//!   silently ignored; absent means full shape.
//! - `sort=<comma-list>` with optional `-` prefix per entry; entries become
//!   successive `ORDER BY` clauses left-to-right; unknown names ignored.
//!   A trailing `id ASC` key keeps iteration order stable with no `sort`.
//! - `<field>=<value>` and `<field>[op]=<value>` with op in
//!   {eq, gte, gt, lte, lt, ne} become SQL comparison predicates. Reserved
//!   names (`fields`, `sort`, `page`, `limit`) are never filters.
//! - `page` / `limit` select the pagination window.
//!
//! Column names only ever come from the per-entity whitelist, so the
//! assembled SQL never interpolates caller-controlled identifiers; values
//! are always bound.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Query-string parameter names that are never treated as filters
const RESERVED_PARAMS: [&str; 4] = ["fields", "sort", "page", "limit"];

fn filter_op_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, cannot fail
        regex::Regex::new(r"^(.*)\[(eq|gte|gt|lte|lt|ne)\]$").unwrap()
    })
}

/// Comparison operator for a filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Eq,
    /// `>=`
    Gte,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `<`
    Lt,
    /// `!=`
    Ne,
}

impl FilterOp {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Self::Eq),
            "gte" => Some(Self::Gte),
            "gt" => Some(Self::Gt),
            "lte" => Some(Self::Lte),
            "lt" => Some(Self::Lt),
            "ne" => Some(Self::Ne),
            _ => None,
        }
    }

    /// SQL comparison token
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Lt => "<",
            Self::Ne => "!=",
        }
    }
}

/// One filter predicate against a whitelisted column
#[derive(Debug, Clone)]
pub struct Filter {
    /// Whitelisted column name
    pub column: &'static str,
    /// Comparison operator
    pub op: FilterOp,
    /// Raw value as it appeared in the query string
    pub value: String,
}

/// One ordering key against a whitelisted column
#[derive(Debug, Clone)]
pub struct SortKey {
    /// Whitelisted column name
    pub column: &'static str,
    /// Descending when the entry carried a `-` prefix
    pub descending: bool,
}

/// Parsed list-endpoint parameters for one entity
#[derive(Debug, Clone)]
pub struct ListParams {
    /// Selected output columns (whitelist intersection); `None` = full shape
    pub fields: Option<Vec<&'static str>>,
    /// Ordering keys in left-to-right application order
    pub sort: Vec<SortKey>,
    /// Filter predicates in query-string order
    pub filters: Vec<Filter>,
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Non-page parameters as parsed, for descriptor URL rebuilding
    carried_params: Vec<(String, String)>,
}

impl ListParams {
    /// Parse a raw query string against an entity column whitelist
    ///
    /// Unknown field names in `fields`, `sort`, and filters are silently
    /// ignored. Non-numeric `page`/`limit` fall back to defaults; values
    /// below 1 are clamped to 1.
    #[must_use]
    pub fn parse(raw_query: &str, columns: &'static [&'static str], default_limit: u32) -> Self {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(raw_query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut fields = None;
        let mut sort = Vec::new();
        let mut filters = Vec::new();
        let mut page: u32 = 1;
        let mut limit = default_limit;
        let mut carried_params = Vec::new();

        for (key, value) in &pairs {
            match key.as_str() {
                "fields" => {
                    // An empty value means no selection, not an empty shape.
                    if !value.is_empty() {
                        let selected: Vec<&'static str> = value
                            .split(',')
                            .filter_map(|f| columns.iter().find(|c| **c == f).copied())
                            .collect();
                        fields = Some(selected);
                    }
                    carried_params.push((key.clone(), value.clone()));
                }
                "sort" => {
                    for entry in value.split(',') {
                        let (name, descending) = entry
                            .strip_prefix('-')
                            .map_or((entry, false), |stripped| (stripped, true));
                        if let Some(column) = columns.iter().find(|c| **c == name).copied() {
                            sort.push(SortKey { column, descending });
                        }
                    }
                    carried_params.push((key.clone(), value.clone()));
                }
                "page" => {
                    page = value.parse::<u32>().unwrap_or(1).max(1);
                }
                "limit" => {
                    limit = value.parse::<u32>().unwrap_or(default_limit).max(1);
                }
                _ => {
                    let (name, op) = filter_op_re().captures(key).map_or(
                        (key.as_str(), FilterOp::Eq),
                        |caps| {
                            let op = caps
                                .get(2)
                                .and_then(|m| FilterOp::parse(m.as_str()))
                                .unwrap_or(FilterOp::Eq);
                            (caps.get(1).map_or("", |m| m.as_str()), op)
                        },
                    );
                    if let Some(column) = columns.iter().find(|c| **c == name).copied() {
                        filters.push(Filter {
                            column,
                            op,
                            value: value.clone(),
                        });
                    }
                    carried_params.push((key.clone(), value.clone()));
                }
            }
        }

        Self {
            fields,
            sort,
            filters,
            page,
            limit,
            carried_params,
        }
    }

    /// Append `WHERE` predicates to a query builder, binding every value
    ///
    /// Values that parse as numbers are bound numerically so comparisons
    /// against REAL/INTEGER columns behave arithmetically.
    pub fn push_filters(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        for (index, filter) in self.filters.iter().enumerate() {
            if index == 0 {
                builder.push(" WHERE ");
            } else {
                builder.push(" AND ");
            }
            builder.push(filter.column);
            builder.push(" ");
            builder.push(filter.op.as_sql());
            builder.push(" ");
            if let Ok(number) = filter.value.parse::<f64>() {
                builder.push_bind(number);
            } else {
                builder.push_bind(filter.value.clone());
            }
        }
    }

    /// Append `ORDER BY` clauses, always ending with a stable `id` key
    pub fn push_order(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push(" ORDER BY ");
        for key in &self.sort {
            builder.push(key.column);
            builder.push(if key.descending { " DESC, " } else { " ASC, " });
        }
        builder.push("id ASC");
    }

    /// Append the pagination window (`LIMIT`/`OFFSET`)
    pub fn push_window(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(self.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(self.limit) * (i64::from(self.page) - 1));
    }

    /// Rebuild the query string for a given page, carrying all non-page
    /// parameters in their original order
    fn page_url(&self, base_path: &str, page: u32) -> String {
        let mut url = format!("{base_path}?page={page}");
        for (key, value) in &self.carried_params {
            let _ = write!(
                url,
                "&{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            );
        }
        url
    }

    /// Build the pagination descriptor for a total record count
    ///
    /// Zero total records yields `total_pages = 0` and neither `next_page`
    /// nor `previous_page`.
    #[must_use]
    pub fn paginate(&self, base_path: &str, total_records: i64) -> Pagination {
        let limit = i64::from(self.limit);
        let page = i64::from(self.page);
        let total_pages = if total_records == 0 {
            0
        } else {
            (total_records + limit - 1) / limit
        };

        let next_page = (page * limit < total_records).then(|| self.page_url(base_path, self.page + 1));
        let previous_page =
            (page > 1 && total_records > 0).then(|| self.page_url(base_path, self.page - 1));

        Pagination {
            total_pages,
            total_records,
            current_page: self.page_url(base_path, self.page),
            next_page,
            previous_page,
        }
    }

    /// Shape a page of rows per the `fields` selection
    ///
    /// Rows arrive as full-shape JSON objects; absent selection returns
    /// them unchanged.
    #[must_use]
    pub fn shape_rows(&self, rows: Vec<serde_json::Value>) -> Vec<serde_json::Value> {
        let Some(selected) = &self.fields else {
            return rows;
        };

        rows.into_iter()
            .map(|row| {
                let serde_json::Value::Object(full) = row else {
                    return row;
                };
                let shaped: serde_json::Map<String, serde_json::Value> = full
                    .into_iter()
                    .filter(|(key, _)| selected.iter().any(|c| *c == key))
                    .collect();
                serde_json::Value::Object(shaped)
            })
            .collect()
    }
}

/// Pagination descriptor returned alongside every list page
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    /// `ceil(total_records / limit)`, 0 when the result set is empty
    pub total_pages: i64,
    /// Total rows matching the filters
    pub total_records: i64,
    /// Self-referential URL for this page
    pub current_page: String,
    /// URL of the next page, present iff one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    /// URL of the previous page, present iff one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<String>,
}

/// Run a parsed list query against a table, returning full-shape JSON rows
/// and the total matching record count
///
/// `columns` is the same whitelist the parameters were parsed against;
/// `row_to_json` maps a raw row to its full JSON shape.
///
/// # Errors
///
/// Returns an error if either the count or the page query fails.
pub async fn run_list_query(
    pool: &sqlx::SqlitePool,
    table: &str,
    columns: &'static [&'static str],
    params: &ListParams,
    row_to_json: impl Fn(&SqliteRow) -> serde_json::Value,
) -> Result<(Vec<serde_json::Value>, i64), sqlx::Error> {
    let mut count_builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM ");
    count_builder.push(table);
    params.push_filters(&mut count_builder);
    let total_records: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT ");
    builder.push(columns.join(", "));
    builder.push(" FROM ");
    builder.push(table);
    params.push_filters(&mut builder);
    params.push_order(&mut builder);
    params.push_window(&mut builder);

    let rows = builder.build().fetch_all(pool).await?;
    let shaped: Vec<serde_json::Value> = rows.iter().map(row_to_json).collect();

    Ok((shaped, total_records))
}

/// Read one column of a row as a JSON value
///
/// Decodes by the stored value's type so REAL columns keep their
/// fractional part and integers stay integral.
#[must_use]
pub fn row_value_json(row: &SqliteRow, column: &str) -> serde_json::Value {
    use sqlx::{TypeInfo, ValueRef};

    let Ok(raw) = row.try_get_raw(column) else {
        return serde_json::Value::Null;
    };
    match raw.type_info().name() {
        "INTEGER" => row
            .try_get::<i64, _>(column)
            .map_or(serde_json::Value::Null, serde_json::Value::from),
        "REAL" => row
            .try_get::<f64, _>(column)
            .map_or(serde_json::Value::Null, serde_json::Value::from),
        "TEXT" => row
            .try_get::<String, _>(column)
            .map_or(serde_json::Value::Null, serde_json::Value::from),
        _ => serde_json::Value::Null,
    }
}
