//! Handlers for `/rubric` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/rubric` | Ordered categories with their items |
//! | `POST`   | `/rubric/categories` | Admin. Body: `{"label":"...","description":"..."}` |
//! | `DELETE` | `/rubric/categories/:id` | Admin. Removes the category's items too |
//! | `POST`   | `/rubric/items` | Admin. Body: `{"category_id":"...","prompt":"...","max_score":5}` |
//! | `DELETE` | `/rubric/items/:id` | Admin |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use facultas_core::{
  Error as CoreError,
  rubric::{self, DEFAULT_MAX_SCORE, NewCategory, NewItem, Rubric},
  store::EvaluationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

/// `GET /rubric`
pub async fn get<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(_caller): CurrentCaller,
) -> Result<Json<Rubric>, ApiError> {
  Ok(Json(rubric::load(&*store).await?))
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
  pub label:       String,
  pub description: Option<String>,
}

/// `POST /rubric/categories`
pub async fn create_category<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<CategoryBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let label = body.label.trim();
  if label.is_empty() {
    return Err(CoreError::Invalid("category label is required".into()).into());
  }

  let category = store
    .add_category(NewCategory {
      label:       label.to_owned(),
      description: body.description.filter(|d| !d.trim().is_empty()),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(category)))
}

/// `DELETE /rubric/categories/:id`
pub async fn delete_category<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  caller.require_admin()?;
  let deleted = store.delete_category(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("category {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ItemBody {
  pub category_id: Uuid,
  pub prompt:      String,
  /// Defaults to [`DEFAULT_MAX_SCORE`].
  pub max_score:   Option<u32>,
}

/// `POST /rubric/items`
pub async fn create_item<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<ItemBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let prompt = body.prompt.trim();
  if prompt.is_empty() {
    return Err(CoreError::Invalid("item prompt is required".into()).into());
  }
  let max_score = body.max_score.unwrap_or(DEFAULT_MAX_SCORE);
  if max_score == 0 {
    return Err(CoreError::Invalid("max_score must be at least 1".into()).into());
  }

  let item = store
    .add_item(NewItem {
      category_id: body.category_id,
      prompt: prompt.to_owned(),
      max_score,
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("category {} not found", body.category_id))
    })?;
  Ok((StatusCode::CREATED, Json(item)))
}

/// `DELETE /rubric/items/:id`
pub async fn delete_item<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  caller.require_admin()?;
  let deleted = store.delete_item(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("rubric item {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
