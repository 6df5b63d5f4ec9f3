//! CSV export endpoint.
//!
//! Takes the same filter parameters as the grid query plus a column
//! selection, and responds with an attachment. Exports are never cached;
//! they bypass the look-aside path entirely.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use super::accounts::GridQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/accounts/export
pub async fn export_csv(
    State(state): State<AppState>, Query(query): Query<GridQuery>,
) -> Result<Response, ApiError> {
    let filter = query.filter()?;
    let columns = query.selected_columns();
    // limit 0 means "no cap requested", same as leaving it off
    let limit = match query.limit {
        Some(limit) if limit > 0 => limit.min(state.config.export_max_rows),
        _ => state.config.export_max_rows,
    };

    let (header_row, rows) = state.store.export(&filter, &columns, limit).await?;
    let body = crate::csv::document(&header_row, &rows);

    let filename = format!("accounts_{}.csv", Utc::now().format("%Y-%m-%d_%H-%M-%S"));
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
    ];
    Ok((headers, body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::body::to_bytes;
    use gridview_core::Account;

    async fn seeded() -> AppState {
        let state = test_state(false).await;
        for (name, city) in [("Acme, Inc.", "Pune"), ("Brightline", "Mumbai")] {
            state
                .store
                .insert(&Account {
                    account_name: name.to_string(),
                    city: Some(city.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        state
    }

    #[tokio::test]
    async fn test_export_headers() {
        let state = seeded().await;
        let response = export_csv(State(state), Query(GridQuery::default())).await.unwrap();

        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, "text/csv; charset=utf-8");

        let disposition = response.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"accounts_"));
        assert!(disposition.ends_with(".csv\""));
    }

    #[tokio::test]
    async fn test_export_selected_columns_and_quoting() {
        let state = seeded().await;
        let query = GridQuery { columns: Some("account_name,city".to_string()), ..Default::default() };
        let response = export_csv(State(state), Query(query)).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "account_name,city");
        assert_eq!(lines[1], "\"Acme, Inc.\",Pune");
        assert_eq!(lines[2], "Brightline,Mumbai");
    }

    #[tokio::test]
    async fn test_export_applies_filter() {
        let state = seeded().await;
        let query = GridQuery {
            city: Some("Mumbai".to_string()),
            columns: Some("account_name".to_string()),
            ..Default::default()
        };
        let response = export_csv(State(state), Query(query)).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(body, "account_name\r\nBrightline\r\n");
    }

    #[tokio::test]
    async fn test_export_limit_zero_exports_all_rows() {
        let state = seeded().await;
        let query = GridQuery {
            limit: Some(0),
            columns: Some("account_name".to_string()),
            ..Default::default()
        };
        let response = export_csv(State(state), Query(query)).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(body.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_export_unknown_column_rejected() {
        let state = seeded().await;
        let query = GridQuery { columns: Some("secret_notes".to_string()), ..Default::default() };
        let err = export_csv(State(state), Query(query)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
