//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  /// A configured account cannot be used; reported at startup.
  #[error("account {username:?}: {reason}")]
  InvalidAccount {
    username: String,
    reason:   String,
  },
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "not signed in" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"facultas\""),
        );
        res
      }
      Error::InvalidAccount { .. } => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": self.to_string() })),
      )
        .into_response(),
    }
  }
}
