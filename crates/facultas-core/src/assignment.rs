//! Evaluator assignments: the permission record pairing an evaluator with the
//! faculty member they evaluate in one period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The capacity in which an evaluator scores the subject.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorRole {
  /// The subject evaluating themselves.
  #[serde(rename = "self")]
  SelfReview,
  #[default]
  Peer,
  Supervisor,
  Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorAssignment {
  pub assignment_id: Uuid,
  pub period_id:     Uuid,
  /// The faculty member being evaluated.
  pub faculty_id:    Uuid,
  pub evaluator_id:  Uuid,
  pub role:          EvaluatorRole,
  pub section_id:    Option<Uuid>,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::EvaluationStore::add_assignment`].
#[derive(Debug, Clone)]
pub struct NewAssignment {
  pub period_id:    Uuid,
  pub faculty_id:   Uuid,
  pub evaluator_id: Uuid,
  pub role:         EvaluatorRole,
  pub section_id:   Option<Uuid>,
}

/// Exact-match filter over assignments. `None` fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentQuery {
  pub evaluator_id: Option<Uuid>,
  pub period_id:    Option<Uuid>,
  pub section_id:   Option<Uuid>,
  pub faculty_id:   Option<Uuid>,
}

impl AssignmentQuery {
  pub fn matches(&self, a: &EvaluatorAssignment) -> bool {
    self.evaluator_id.is_none_or(|id| id == a.evaluator_id)
      && self.period_id.is_none_or(|id| id == a.period_id)
      && self.section_id.is_none_or(|id| a.section_id == Some(id))
      && self.faculty_id.is_none_or(|id| id == a.faculty_id)
  }
}
