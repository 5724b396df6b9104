//! Handlers for `/sentiments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sentiments` | Students and admins. Body: `{"period_id":..,"section_id":..,"sentiment":"positive","comments":"..."}` |
//! | `GET`  | `/sentiments` | Admin. Newest 50 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use facultas_core::{
  Error as CoreError,
  roster::UserRole,
  sentiment::{self, Sentiment, StudentSentiment},
  store::EvaluationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

const LIST_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub period_id:  Option<Uuid>,
  pub section_id: Option<Uuid>,
  #[serde(default)]
  pub sentiment:  Sentiment,
  #[serde(default)]
  pub comments:   String,
}

/// `POST /sentiments`
pub async fn create<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  if !matches!(caller.role, UserRole::Student | UserRole::Admin) {
    return Err(CoreError::PermissionDenied.into());
  }
  let Json(body) = body?;

  let recorded = sentiment::record(
    &*store,
    body.period_id,
    body.section_id,
    body.sentiment,
    body.comments,
  )
  .await?;
  Ok((StatusCode::CREATED, Json(recorded)))
}

/// `GET /sentiments`
pub async fn list<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
) -> Result<Json<Vec<StudentSentiment>>, ApiError> {
  caller.require_admin()?;
  let sentiments = store
    .list_sentiments(LIST_LIMIT)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(sentiments))
}
