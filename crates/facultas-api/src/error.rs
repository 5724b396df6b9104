//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use facultas_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Box a backend error; used as `.map_err(ApiError::store)`.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::Core(e) => match e {
        CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoreError::PermissionDenied | CoreError::PeriodClosed => {
          StatusCode::FORBIDDEN
        }
        CoreError::IncompleteSubmission { .. }
        | CoreError::InvalidScore { .. }
        | CoreError::UnknownRubricItem(_)
        | CoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// Malformed JSON bodies are a plain 400, not axum's default 422.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let message = match &self {
      ApiError::Core(e) => e.to_string(),
      ApiError::NotFound(m) | ApiError::BadRequest(m) => m.clone(),
      ApiError::Store(e) => e.to_string(),
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"facultas\""),
      );
    }
    res
  }
}
