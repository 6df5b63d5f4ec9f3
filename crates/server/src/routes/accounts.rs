//! The grid query endpoint.
//!
//! `GET /api/accounts` takes the flat filter parameters the grid widget
//! sends, compiles them into a typed filter at this boundary, and serves
//! the response through the look-aside cache.

use axum::extract::{Query, State};
use axum::response::Response;
use gridview_core::{Account, FilterRequest, TextFilter, TextOp, cache::cache_key};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::error::ApiError;
use crate::state::AppState;

/// Flat query parameters as sent by the grid widget.
///
/// Each text field has a sibling `<field>_op` parameter; list fields are
/// comma-separated. Parameters outside this struct are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GridQuery {
    pub account_name: Option<String>,
    pub account_name_op: Option<String>,
    pub contact_name: Option<String>,
    pub contact_name_op: Option<String>,
    pub website: Option<String>,
    pub website_op: Option<String>,
    pub email: Option<String>,
    pub email_op: Option<String>,
    pub mobile: Option<String>,
    pub mobile_op: Option<String>,
    pub address: Option<String>,
    pub address_op: Option<String>,
    pub industry: Option<String>,
    pub industry_op: Option<String>,
    /// Comma-separated exact-match list. Values containing a literal comma
    /// are not representable; they split into separate values.
    pub country: Option<String>,
    /// Comma-separated exact-match list, same comma caveat as `country`.
    pub city: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub founded_year: Option<i64>,
    /// 1-based page number.
    #[serde(deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    /// Comma-separated export column selection (export endpoint only).
    pub columns: Option<String>,
}

/// Grid widgets submit every form field, so numeric parameters routinely
/// arrive as `founded_year=`. Treat the empty string like an absent field
/// instead of failing deserialization.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

impl GridQuery {
    /// Validate and convert into the typed filter request.
    pub fn filter(&self) -> Result<FilterRequest, ApiError> {
        Ok(FilterRequest {
            account_name: text_filter(&self.account_name, &self.account_name_op)?,
            contact_name: text_filter(&self.contact_name, &self.contact_name_op)?,
            website: text_filter(&self.website, &self.website_op)?,
            email: text_filter(&self.email, &self.email_op)?,
            mobile: text_filter(&self.mobile, &self.mobile_op)?,
            address: text_filter(&self.address, &self.address_op)?,
            industry: text_filter(&self.industry, &self.industry_op)?,
            country: list(&self.country),
            city: list(&self.city),
            founded_year: self.founded_year,
        })
    }

    pub fn selected_columns(&self) -> Vec<String> {
        list(&self.columns)
    }
}

fn text_filter(value: &Option<String>, op: &Option<String>) -> Result<Option<TextFilter>, ApiError> {
    let Some(value) = value else { return Ok(None) };
    if value.is_empty() {
        return Ok(None);
    }
    let op = match op.as_deref() {
        Some(op) => op.parse::<TextOp>().map_err(ApiError::from)?,
        None => TextOp::Contains,
    };
    Ok(Some(TextFilter::new(value.clone(), op)))
}

fn list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The fields a grid response is keyed by in the cache.
#[derive(Serialize)]
struct DataKey<'a> {
    filter: &'a FilterRequest,
    page: u32,
    limit: u32,
}

/// Grid response body. Counter names follow the grid widget's contract.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsPayload {
    pub data: Vec<Account>,
    pub records_total: u64,
    pub records_filtered: u64,
    pub total_pages: u64,
}

/// GET /api/accounts
pub async fn list_accounts(
    State(state): State<AppState>, Query(query): Query<GridQuery>,
) -> Result<Response, ApiError> {
    let filter = query.filter()?;
    let limit = query.limit.unwrap_or(state.config.default_limit).clamp(1, state.config.max_limit);
    let page = query.page.unwrap_or(1).max(1);

    let key = cache_key(&state.config.data_namespace(), &DataKey { filter: &filter, page, limit })?;
    if let Some(hit) = state.cache_get(&key).await {
        return Ok(json_body(hit, true));
    }

    let result = state.store.search(&filter, page, limit).await?;
    let total_pages = result.records_filtered.div_ceil(u64::from(limit));
    let payload = AccountsPayload {
        data: result.rows,
        records_total: result.records_total,
        records_filtered: result.records_filtered,
        total_pages,
    };
    let body = serde_json::to_string(&payload).map_err(|e| {
        tracing::error!(error = %e, "response serialization failed");
        ApiError::Internal
    })?;

    state.cache_put(&key, &body, state.config.cache_ttl_secs).await;
    Ok(json_body(body, false))
}
