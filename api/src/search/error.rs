use poem::{error::ResponseError, http::StatusCode, web::Json, IntoResponse, Response};
use std::fmt;

/// Reasons a search request is rejected before any query is built
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The region path segment names no known region
    NotFound(String),
    /// A query parameter is outside its enumerated or numeric domain
    Validation(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchError::NotFound(msg) => write!(f, "Not found: {}", msg),
            SearchError::Validation(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

impl ResponseError for SearchError {
    fn status(&self) -> StatusCode {
        match self {
            SearchError::NotFound(_) => StatusCode::NOT_FOUND,
            SearchError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        let body = serde_json::json!({
            "success": false,
            "data": null,
            "error": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
