//! Handlers for `/periods` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/periods` | Newest start date first, at most 50 |
//! | `POST`   | `/periods` | Admin. Status defaults to `draft` |
//! | `GET`    | `/periods/:id` | 404 if not found |
//! | `PUT`    | `/periods/:id/status` | Admin. Body: `{"status":"open"}` |
//! | `DELETE` | `/periods/:id` | Admin |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use facultas_core::{
  Error as CoreError,
  period::{EvaluationPeriod, NewPeriod, PeriodStatus},
  store::EvaluationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

const LIST_LIMIT: usize = 50;

/// `GET /periods`
pub async fn list<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(_caller): CurrentCaller,
) -> Result<Json<Vec<EvaluationPeriod>>, ApiError> {
  let periods = store
    .list_periods(LIST_LIMIT)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(periods))
}

/// `GET /periods/:id`
pub async fn get_one<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(_caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<EvaluationPeriod>, ApiError> {
  let period = store
    .get_period(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("period {id} not found")))?;
  Ok(Json(period))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:       String,
  #[serde(default)]
  pub status:     PeriodStatus,
  pub start_date: Option<NaiveDate>,
  pub end_date:   Option<NaiveDate>,
}

/// `POST /periods`
pub async fn create<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let name = body.name.trim();
  if name.is_empty() {
    return Err(CoreError::Invalid("period name is required".into()).into());
  }
  if let (Some(start), Some(end)) = (body.start_date, body.end_date)
    && end < start
  {
    return Err(
      CoreError::Invalid("end_date is before start_date".into()).into(),
    );
  }

  let period = store
    .add_period(NewPeriod {
      name:       name.to_owned(),
      status:     body.status,
      start_date: body.start_date,
      end_date:   body.end_date,
    })
    .await
    .map_err(ApiError::store)?;
  tracing::info!(period_id = %period.period_id, "period created");
  Ok((StatusCode::CREATED, Json(period)))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: PeriodStatus,
}

/// `PUT /periods/:id/status`
pub async fn set_status<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
  body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<EvaluationPeriod>, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let period = store
    .set_period_status(id, body.status)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("period {id} not found")))?;
  tracing::info!(period_id = %id, status = ?period.status, "period status changed");
  Ok(Json(period))
}

/// `DELETE /periods/:id`
pub async fn delete<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  caller.require_admin()?;
  let deleted = store.delete_period(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("period {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
