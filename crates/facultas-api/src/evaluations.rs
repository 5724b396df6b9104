//! Handlers for `/evaluations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/evaluations` | Submit a full score set; see [`SubmitBody`] |
//! | `GET`  | `/evaluations/:id` | The evaluation and its responses |
//! | `GET`  | `/evaluations/:id/averages` | Per-category averages |
//! | `GET`  | `/assignments/:id/evaluation` | The assignment's evaluation, if submitted |
//!
//! An evaluation is readable by an admin, by the evaluator who wrote it, and
//! by the faculty member it is about. Anyone else gets a 403.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use facultas_core::{
  Error as CoreError,
  aggregate::{self, CategoryAverage},
  assignment::EvaluatorAssignment,
  evaluation::{Evaluation, EvaluationDetail, ScoreMap},
  identity::Caller,
  resolver,
  store::EvaluationStore,
  submission::{self, SubmitRequest},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

// ─── Submit ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /evaluations`.
///
/// Either `assignmentId` names the assignment directly, or `periodId` (with
/// optional `sectionId` and `facultyId`) is used to look up the caller's
/// assignment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
  pub assignment_id:   Option<Uuid>,
  pub period_id:       Option<Uuid>,
  pub section_id:      Option<Uuid>,
  pub faculty_id:      Option<Uuid>,
  pub overall_comment: Option<String>,
  /// Rubric item id → score.
  #[serde(default)]
  pub responses:       ScoreMap,
  /// Rubric item id → remark. Optional per item.
  #[serde(default)]
  pub comments:        BTreeMap<Uuid, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
  pub success:       bool,
  pub evaluation_id: Uuid,
}

/// Work out which assignment the submission targets.
async fn resolve_assignment<S: EvaluationStore>(
  store: &S,
  caller: &Caller,
  body: &SubmitBody,
) -> Result<Uuid, ApiError> {
  match (body.assignment_id, body.period_id) {
    (Some(assignment_id), None) => Ok(assignment_id),
    (Some(assignment_id), Some(period_id)) => {
      let assignment =
        resolver::authorize(store, caller.user_id, assignment_id).await?;
      if assignment.period_id != period_id {
        return Err(CoreError::PermissionDenied.into());
      }
      Ok(assignment_id)
    }
    (None, Some(period_id)) => {
      let assignment = resolver::find_assignment(
        store,
        caller.user_id,
        period_id,
        body.section_id,
        body.faculty_id,
      )
      .await?
      .ok_or(CoreError::PermissionDenied)?;
      Ok(assignment.assignment_id)
    }
    (None, None) => Err(ApiError::BadRequest(
      "assignmentId or periodId is required".to_owned(),
    )),
  }
}

/// `POST /evaluations`
pub async fn submit<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<SubmitBody>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
  let Json(body) = body?;
  if body.responses.is_empty() {
    return Err(ApiError::BadRequest("responses are required".to_owned()));
  }

  let assignment_id = resolve_assignment(&*store, &caller, &body).await?;

  let outcome = submission::submit(&*store, caller.user_id, SubmitRequest {
    assignment_id,
    responses: body.responses,
    comments: body.comments,
    overall_comment: body.overall_comment,
  })
  .await?;

  Ok(Json(SubmitResponse {
    success:       true,
    evaluation_id: outcome.evaluation_id,
  }))
}

// ─── Read back ───────────────────────────────────────────────────────────────

fn is_party(caller: &Caller, assignment: &EvaluatorAssignment) -> bool {
  caller.is_admin()
    || assignment.evaluator_id == caller.user_id
    || assignment.faculty_id == caller.user_id
}

/// Fetch an evaluation, enforcing who may see it.
async fn visible_evaluation<S: EvaluationStore>(
  store: &S,
  caller: &Caller,
  evaluation_id: Uuid,
) -> Result<Evaluation, ApiError> {
  let evaluation = store
    .get_evaluation(evaluation_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("evaluation {evaluation_id} not found"))
    })?;

  if caller.is_admin() {
    return Ok(evaluation);
  }

  let assignment = store
    .get_assignment(evaluation.assignment_id)
    .await
    .map_err(ApiError::store)?;
  if !assignment.is_some_and(|a| is_party(caller, &a)) {
    return Err(CoreError::PermissionDenied.into());
  }
  Ok(evaluation)
}

/// `GET /evaluations/:id`
pub async fn get_one<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<EvaluationDetail>, ApiError> {
  let evaluation = visible_evaluation(&*store, &caller, id).await?;
  let responses = store.list_responses(id).await.map_err(ApiError::store)?;
  Ok(Json(EvaluationDetail { evaluation, responses }))
}

/// `GET /evaluations/:id/averages`
pub async fn averages<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CategoryAverage>>, ApiError> {
  visible_evaluation(&*store, &caller, id).await?;
  Ok(Json(aggregate::category_averages(&*store, id).await?))
}

/// `GET /assignments/:id/evaluation`
///
/// Someone else's assignment and a missing one are both 403 for non-admins.
pub async fn for_assignment<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(assignment_id): Path<Uuid>,
) -> Result<Json<EvaluationDetail>, ApiError> {
  let assignment = store
    .get_assignment(assignment_id)
    .await
    .map_err(ApiError::store)?
    .filter(|a| is_party(&caller, a));
  if assignment.is_none() {
    return Err(if caller.is_admin() {
      ApiError::NotFound(format!("assignment {assignment_id} not found"))
    } else {
      CoreError::PermissionDenied.into()
    });
  }

  let evaluation = store
    .find_evaluation(assignment_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "assignment {assignment_id} has no evaluation yet"
      ))
    })?;
  let responses = store
    .list_responses(evaluation.evaluation_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(EvaluationDetail { evaluation, responses }))
}
