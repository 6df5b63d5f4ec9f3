//! API error mapping.
//!
//! Input errors surface to the caller as 400s with a short message.
//! Database failures become a generic 500; the detail is logged here and
//! never reaches the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors a route handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("internal error")]
    Internal,
}

impl From<gridview_core::Error> for ApiError {
    fn from(err: gridview_core::Error) -> Self {
        use gridview_core::Error;
        match err {
            Error::InvalidInput(msg) => Self::BadRequest(msg),
            Error::UnknownField(field) => Self::BadRequest(format!("unknown field: {field}")),
            other => {
                tracing::error!(error = %other, "database operation failed");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::BadRequest("unsupported filter operator: near".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_is_generic() {
        let err = ApiError::from(gridview_core::Error::MigrationFailed("secret detail".into()));
        assert_eq!(err.to_string(), "internal error");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_field_maps_to_bad_request() {
        let err = ApiError::from(gridview_core::Error::UnknownField("password".into()));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
