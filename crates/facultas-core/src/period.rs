//! Evaluation periods, the administrative window that gates submissions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a period. Administrators may move between any two states.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
  #[default]
  Draft,
  Open,
  Closed,
}

impl PeriodStatus {
  pub fn accepts_submissions(self) -> bool { matches!(self, Self::Open) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPeriod {
  pub period_id:  Uuid,
  pub name:       String,
  pub status:     PeriodStatus,
  pub start_date: Option<NaiveDate>,
  pub end_date:   Option<NaiveDate>,
}

/// Input to [`crate::store::EvaluationStore::add_period`].
#[derive(Debug, Clone, Default)]
pub struct NewPeriod {
  pub name:       String,
  pub status:     PeriodStatus,
  pub start_date: Option<NaiveDate>,
  pub end_date:   Option<NaiveDate>,
}
