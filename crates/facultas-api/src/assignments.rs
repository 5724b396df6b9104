//! Handlers for `/assignments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/assignments` | Admin sees all, others their own. Optional `?period_id=` |
//! | `POST`   | `/assignments` | Admin. Role defaults to `peer` |
//! | `DELETE` | `/assignments/:id` | Admin. Drops the evaluation with it |
//!
//! `GET /assignments/:id/evaluation` lives in [`crate::evaluations`].

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use facultas_core::{
  assignment::{
    AssignmentQuery, EvaluatorAssignment, EvaluatorRole, NewAssignment,
  },
  store::EvaluationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub period_id: Option<Uuid>,
}

/// `GET /assignments[?period_id=<id>]`, newest first.
pub async fn list<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<EvaluatorAssignment>>, ApiError> {
  let query = AssignmentQuery {
    evaluator_id: (!caller.is_admin()).then_some(caller.user_id),
    period_id: params.period_id,
    ..Default::default()
  };

  let mut assignments = store
    .find_assignments(query)
    .await
    .map_err(ApiError::store)?;
  assignments.reverse();
  Ok(Json(assignments))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub period_id:    Uuid,
  pub faculty_id:   Uuid,
  pub evaluator_id: Uuid,
  #[serde(default)]
  pub role:         EvaluatorRole,
  pub section_id:   Option<Uuid>,
}

/// `POST /assignments`
pub async fn create<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let assignment = store
    .add_assignment(NewAssignment {
      period_id:    body.period_id,
      faculty_id:   body.faculty_id,
      evaluator_id: body.evaluator_id,
      role:         body.role,
      section_id:   body.section_id,
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound("period or section not found".to_owned())
    })?;

  tracing::info!(
    assignment_id = %assignment.assignment_id,
    evaluator_id = %assignment.evaluator_id,
    faculty_id = %assignment.faculty_id,
    "assignment created"
  );
  Ok((StatusCode::CREATED, Json(assignment)))
}

/// `DELETE /assignments/:id`
pub async fn delete<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  caller.require_admin()?;
  let deleted = store.delete_assignment(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("assignment {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
