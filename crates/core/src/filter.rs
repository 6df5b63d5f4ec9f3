//! Filter compilation.
//!
//! Turns a typed [`FilterRequest`] into a parameterized SQL predicate list.
//! Every value becomes a bound parameter; nothing from the request is ever
//! interpolated into the SQL string. Column names come from fixed mappings
//! in this module, never from the caller.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio_rusqlite::rusqlite::types::Value as SqlValue;

use crate::Error;

/// Operator applied to a free-text filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextOp {
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Substring match (alias of contains, kept for grid-widget parity).
    Includes,
    /// Negated substring match.
    Excludes,
}

impl FromStr for TextOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "contains" => Ok(Self::Contains),
            "startsWith" => Ok(Self::StartsWith),
            "includes" => Ok(Self::Includes),
            "excludes" => Ok(Self::Excludes),
            other => Err(Error::InvalidInput(format!("unsupported filter operator: {other}"))),
        }
    }
}

/// A single free-text filter: value plus operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFilter {
    pub value: String,
    pub op: TextOp,
}

impl TextFilter {
    pub fn new(value: impl Into<String>, op: TextOp) -> Self {
        Self { value: value.into(), op }
    }
}

/// Validated filter parameters for the accounts grid.
///
/// Built at the API boundary from query parameters; unknown parameters
/// never reach this type. Absent or empty values contribute no predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub account_name: Option<TextFilter>,
    pub contact_name: Option<TextFilter>,
    pub website: Option<TextFilter>,
    pub email: Option<TextFilter>,
    pub mobile: Option<TextFilter>,
    pub address: Option<TextFilter>,
    pub industry: Option<TextFilter>,
    /// Exact-match country list, OR-combined.
    pub country: Vec<String>,
    /// Exact-match city list, OR-combined.
    pub city: Vec<String>,
    pub founded_year: Option<i64>,
}

impl FilterRequest {
    /// Text filters paired with their column names, in fixed order.
    fn text_filters(&self) -> [(&'static str, &Option<TextFilter>); 7] {
        [
            ("account_name", &self.account_name),
            ("contact_name", &self.contact_name),
            ("website", &self.website),
            ("email", &self.email),
            ("mobile", &self.mobile),
            ("address", &self.address),
            ("industry", &self.industry),
        ]
    }
}

/// A compiled filter: predicate SQL (without the `WHERE` keyword) and the
/// bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl FilterClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// The clause ready to append to a SELECT, with a leading ` WHERE `
    /// when any predicate is present.
    pub fn where_sql(&self) -> String {
        if self.sql.is_empty() { String::new() } else { format!(" WHERE {}", self.sql) }
    }
}

/// Escape SQLite `LIKE` wildcards so user input matches literally.
///
/// The produced pattern must be used with `ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
    value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Compile a filter request into a predicate list.
///
/// Deterministic: the same request always yields the identical SQL string
/// and parameter vector. Predicates are AND-combined; exact-match lists
/// become a single `IN (...)` predicate.
pub fn compile(request: &FilterRequest) -> FilterClause {
    let mut predicates = Vec::new();
    let mut params = Vec::new();

    for (column, filter) in request.text_filters() {
        let Some(filter) = filter else { continue };
        if filter.value.is_empty() {
            continue;
        }
        let escaped = escape_like(&filter.value);
        match filter.op {
            TextOp::Contains | TextOp::Includes => {
                predicates.push(format!("{column} LIKE ? ESCAPE '\\'"));
                params.push(SqlValue::Text(format!("%{escaped}%")));
            }
            TextOp::StartsWith => {
                predicates.push(format!("{column} LIKE ? ESCAPE '\\'"));
                params.push(SqlValue::Text(format!("{escaped}%")));
            }
            TextOp::Excludes => {
                predicates.push(format!("{column} NOT LIKE ? ESCAPE '\\'"));
                params.push(SqlValue::Text(format!("%{escaped}%")));
            }
        }
    }

    for (column, values) in [("country", &request.country), ("city", &request.city)] {
        let values: Vec<&String> = values.iter().filter(|v| !v.is_empty()).collect();
        if values.is_empty() {
            continue;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        predicates.push(format!("{column} IN ({placeholders})"));
        params.extend(values.into_iter().map(|v| SqlValue::Text(v.clone())));
    }

    if let Some(year) = request.founded_year {
        predicates.push("founded_year = ?".to_string());
        params.push(SqlValue::Integer(year));
    }

    FilterClause { sql: predicates.join(" AND "), params }
}
