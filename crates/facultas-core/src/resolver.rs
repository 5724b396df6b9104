//! Assignment resolution: may this evaluator submit, and for what?

use uuid::Uuid;

use crate::{
  Error, Result,
  assignment::{AssignmentQuery, EvaluatorAssignment},
  store::EvaluationStore,
};

/// The assignment linking `evaluator_id` to `period_id`, further narrowed by
/// section and faculty when those are given.
///
/// More than one match is [`Error::Invalid`]: the caller has to say which
/// section or faculty member they mean.
pub async fn find_assignment<S: EvaluationStore>(
  store: &S,
  evaluator_id: Uuid,
  period_id: Uuid,
  section_id: Option<Uuid>,
  faculty_id: Option<Uuid>,
) -> Result<Option<EvaluatorAssignment>> {
  let query = AssignmentQuery {
    evaluator_id: Some(evaluator_id),
    period_id: Some(period_id),
    section_id,
    faculty_id,
  };
  let mut found = store.find_assignments(query).await.map_err(Error::store)?;
  if found.len() > 1 {
    return Err(Error::Invalid(format!(
      "{} assignments match period {period_id}; give a section or faculty id",
      found.len()
    )));
  }
  Ok(found.pop())
}

/// `true` only for a period that exists and is `open`.
pub async fn is_period_open<S: EvaluationStore>(
  store: &S,
  period_id: Uuid,
) -> Result<bool> {
  let period = store.get_period(period_id).await.map_err(Error::store)?;
  Ok(period.is_some_and(|p| p.status.accepts_submissions()))
}

/// Fetch `assignment_id` on behalf of `evaluator_id`.
///
/// A missing assignment and someone else's assignment both yield
/// [`Error::PermissionDenied`].
pub async fn authorize<S: EvaluationStore>(
  store: &S,
  evaluator_id: Uuid,
  assignment_id: Uuid,
) -> Result<EvaluatorAssignment> {
  store
    .get_assignment(assignment_id)
    .await
    .map_err(Error::store)?
    .filter(|a| a.evaluator_id == evaluator_id)
    .ok_or(Error::PermissionDenied)
}
