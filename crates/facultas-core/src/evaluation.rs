//! Evaluations and their item-level responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-supplied scores keyed by rubric item id. Values are unvalidated.
pub type ScoreMap = BTreeMap<Uuid, i64>;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
  #[default]
  Draft,
  Submitted,
}

/// The single scored instance produced for one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
  pub evaluation_id:   Uuid,
  /// Unique: one evaluation per assignment.
  pub assignment_id:   Uuid,
  pub status:          EvaluationStatus,
  pub submitted_at:    Option<DateTime<Utc>>,
  pub overall_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResponse {
  pub evaluation_id: Uuid,
  pub item_id:       Uuid,
  pub score:         u32,
  pub comment:       Option<String>,
}

/// An evaluation together with its stored responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationDetail {
  pub evaluation: Evaluation,
  pub responses:  Vec<EvaluationResponse>,
}

// ─── Write model ─────────────────────────────────────────────────────────────

/// One validated response, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
  pub item_id: Uuid,
  pub score:   u32,
  pub comment: Option<String>,
}

/// Input to [`crate::store::EvaluationStore::replace_evaluation`].
///
/// The store creates the evaluation for `assignment_id` or reuses the existing
/// one, marks it submitted, and swaps its whole response set for `responses`.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
  pub assignment_id:   Uuid,
  pub overall_comment: Option<String>,
  pub submitted_at:    DateTime<Utc>,
  pub responses:       Vec<NewResponse>,
}

/// Result of a successful replace.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
  pub evaluation: Evaluation,
  /// `true` when no evaluation existed for the assignment beforehand.
  pub created:    bool,
}

/// A submitted score annotated with the section of its assignment; the raw
/// input to section aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionScore {
  pub section_id: Uuid,
  pub score:      u32,
}
