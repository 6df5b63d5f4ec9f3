//! Account queries: grid search, distinct values, export.

use super::connection::StoreDb;
use crate::Error;
use crate::filter::{self, FilterRequest};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, params_from_iter, types::Value as SqlValue};

/// Exportable account columns, in grid order. Column selection is validated
/// against this list; identifiers reaching SQL only ever come from here.
pub const COLUMNS: &[&str] = &[
    "account_name",
    "contact_name",
    "website",
    "email",
    "mobile",
    "industry",
    "employees_range",
    "founded_year",
    "address",
    "city",
    "state",
    "country",
    "postal_code",
];

/// Fields with a distinct-values endpoint (filter dropdowns).
pub const DISTINCT_FIELDS: &[&str] = &["city", "country", "industry", "state"];

const SELECT_LIST: &str = "id, account_name, contact_name, website, email, mobile, industry, \
     employees_range, founded_year, address, city, state, country, postal_code";

/// A single company/account record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub account_name: String,
    pub contact_name: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub industry: Option<String>,
    pub employees_range: Option<String>,
    pub founded_year: Option<i64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

fn account_from_row(row: &rusqlite::Row<'_>) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        account_name: row.get(1)?,
        contact_name: row.get(2)?,
        website: row.get(3)?,
        email: row.get(4)?,
        mobile: row.get(5)?,
        industry: row.get(6)?,
        employees_range: row.get(7)?,
        founded_year: row.get(8)?,
        address: row.get(9)?,
        city: row.get(10)?,
        state: row.get(11)?,
        country: row.get(12)?,
        postal_code: row.get(13)?,
    })
}

/// One page of search results plus the grid counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub rows: Vec<Account>,
    pub records_total: u64,
    pub records_filtered: u64,
}

impl StoreDb {
    /// Insert an account, returning its row id.
    pub async fn insert(&self, account: &Account) -> Result<i64, Error> {
        let account = account.clone();
        self.conn
            .call(move |conn| -> Result<i64, Error> {
                conn.execute(
                    "INSERT INTO accounts (
                        account_name, contact_name, website, email, mobile, industry,
                        employees_range, founded_year, address, city, state, country, postal_code
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    params![
                        &account.account_name,
                        &account.contact_name,
                        &account.website,
                        &account.email,
                        &account.mobile,
                        &account.industry,
                        &account.employees_range,
                        &account.founded_year,
                        &account.address,
                        &account.city,
                        &account.state,
                        &account.country,
                        &account.postal_code,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(Error::from)
    }

    /// Run a filtered, paginated grid query.
    ///
    /// `page` is 1-based. Rows are ordered `account_name ASC, contact_name
    /// ASC` so pagination is stable across requests.
    pub async fn search(&self, request: &FilterRequest, page: u32, limit: u32) -> Result<SearchResult, Error> {
        let clause = filter::compile(request);
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);
        let limit = i64::from(limit);

        self.conn
            .call(move |conn| -> Result<SearchResult, Error> {
                let records_total: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;

                let records_filtered: i64 = conn.query_row(
                    &format!("SELECT COUNT(*) FROM accounts{}", clause.where_sql()),
                    params_from_iter(clause.params.iter().cloned()),
                    |row| row.get(0),
                )?;

                let sql = format!(
                    "SELECT {SELECT_LIST} FROM accounts{} \
                     ORDER BY account_name ASC, contact_name ASC LIMIT ? OFFSET ?",
                    clause.where_sql()
                );
                let mut stmt = conn.prepare(&sql)?;

                let mut bound = clause.params.clone();
                bound.push(SqlValue::Integer(limit));
                bound.push(SqlValue::Integer(offset));

                let rows = stmt
                    .query_map(params_from_iter(bound), account_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(SearchResult {
                    rows,
                    records_total: records_total as u64,
                    records_filtered: records_filtered as u64,
                })
            })
            .await
            .map_err(Error::from)
    }

    /// Sorted non-empty distinct values for an allowlisted field.
    pub async fn distinct_values(&self, field: &str) -> Result<Vec<String>, Error> {
        let Some(column) = DISTINCT_FIELDS.iter().find(|c| **c == field) else {
            return Err(Error::UnknownField(field.to_string()));
        };
        let sql = format!(
            "SELECT DISTINCT {column} FROM accounts \
             WHERE {column} IS NOT NULL AND {column} != '' ORDER BY {column} ASC"
        );

        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare(&sql)?;
                let values = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(values)
            })
            .await
            .map_err(Error::from)
    }

    /// Filtered rows restricted to a selected column set, for CSV export.
    ///
    /// An empty selection exports all columns. Returns the resolved header
    /// row and the data rows as display strings (NULL becomes "").
    pub async fn export(
        &self, request: &FilterRequest, columns: &[String], limit: u32,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), Error> {
        let selected: Vec<&'static str> = if columns.is_empty() {
            COLUMNS.to_vec()
        } else {
            columns
                .iter()
                .map(|name| {
                    COLUMNS
                        .iter()
                        .find(|c| **c == name.as_str())
                        .copied()
                        .ok_or_else(|| Error::UnknownField(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let clause = filter::compile(request);
        let select_list = selected
            .iter()
            .map(|c| format!("CAST({c} AS TEXT)"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {select_list} FROM accounts{} \
             ORDER BY account_name ASC, contact_name ASC LIMIT ?",
            clause.where_sql()
        );
        let width = selected.len();
        let header: Vec<String> = selected.iter().map(|c| c.to_string()).collect();

        let mut bound = clause.params.clone();
        bound.push(SqlValue::Integer(i64::from(limit)));

        self.conn
            .call(move |conn| -> Result<(Vec<String>, Vec<Vec<String>>), Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(bound), |row| {
                        let mut fields = Vec::with_capacity(width);
                        for i in 0..width {
                            fields.push(row.get::<_, Option<String>>(i)?.unwrap_or_default());
                        }
                        Ok(fields)
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((header, rows))
            })
            .await
            .map_err(Error::from)
    }
}
