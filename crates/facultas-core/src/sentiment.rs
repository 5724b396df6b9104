//! Free-form student feedback, collected alongside rubric evaluations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, store::EvaluationStore};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
  #[default]
  Positive,
  Neutral,
  Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSentiment {
  pub sentiment_id: Uuid,
  pub period_id:    Option<Uuid>,
  pub section_id:   Option<Uuid>,
  /// Taken from the section at the time of recording.
  pub faculty_id:   Option<Uuid>,
  pub sentiment:    Sentiment,
  pub comments:     String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`EvaluationStore::add_sentiment`].
#[derive(Debug, Clone)]
pub struct NewSentiment {
  pub period_id:  Option<Uuid>,
  pub section_id: Option<Uuid>,
  pub faculty_id: Option<Uuid>,
  pub sentiment:  Sentiment,
  pub comments:   String,
}

/// Record student feedback. The faculty member is looked up from the section,
/// so callers never name them directly.
pub async fn record<S: EvaluationStore>(
  store: &S,
  period_id: Option<Uuid>,
  section_id: Option<Uuid>,
  sentiment: Sentiment,
  comments: String,
) -> Result<StudentSentiment> {
  let comments = comments.trim().to_owned();
  if comments.is_empty() {
    return Err(Error::Invalid("comments are required".into()));
  }

  if let Some(id) = period_id {
    store
      .get_period(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("period {id}")))?;
  }

  let faculty_id = match section_id {
    Some(id) => store
      .get_section(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("section {id}")))?
      .faculty_id,
    None => None,
  };

  store
    .add_sentiment(NewSentiment {
      period_id,
      section_id,
      faculty_id,
      sentiment,
      comments,
    })
    .await
    .map_err(Error::store)
}
