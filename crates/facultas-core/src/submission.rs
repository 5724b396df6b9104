//! The evaluation submission pipeline.
//!
//! [`submit`] is the single entry point that turns a caller's score map into
//! durable state. All checks run before the first write, so a rejected
//! submission never leaves anything behind.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  evaluation::{NewResponse, ScoreMap, SubmissionRecord},
  resolver,
  rubric::{self, Rubric},
  store::EvaluationStore,
};

/// A full set of scores for one assignment.
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
  pub assignment_id:   Uuid,
  pub responses:       ScoreMap,
  /// Optional per-item remarks, keyed like `responses`.
  pub comments:        BTreeMap<Uuid, String>,
  pub overall_comment: Option<String>,
}

/// What a successful submission produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
  pub evaluation_id: Uuid,
  /// `false` when an earlier submission for the assignment was replaced.
  pub created:       bool,
  pub responses:     usize,
}

/// Check `responses` against `rubric` and produce the rows to persist, in
/// rubric order.
///
/// Missing items are reported before unknown keys, and unknown keys before
/// out-of-range scores.
pub fn validate(
  rubric: &Rubric,
  responses: &ScoreMap,
  comments: &BTreeMap<Uuid, String>,
) -> Result<Vec<NewResponse>> {
  let missing = rubric
    .items()
    .filter(|item| !responses.contains_key(&item.item_id))
    .count();
  if missing > 0 {
    return Err(Error::IncompleteSubmission { missing });
  }

  if let Some(unknown) = responses
    .keys()
    .chain(comments.keys())
    .find(|id| rubric.item(**id).is_none())
  {
    return Err(Error::UnknownRubricItem(*unknown));
  }

  rubric
    .items()
    .map(|item| {
      let score = responses[&item.item_id];
      if !item.accepts(score) {
        return Err(Error::InvalidScore {
          item_id: item.item_id,
          score,
          max_score: item.max_score,
        });
      }
      Ok(NewResponse {
        item_id: item.item_id,
        score:   score as u32,
        comment: comments
          .get(&item.item_id)
          .map(|c| c.trim().to_owned())
          .filter(|c| !c.is_empty()),
      })
    })
    .collect()
}

/// Submit (or resubmit) the evaluation for `request.assignment_id` as
/// `evaluator_id`.
pub async fn submit<S: EvaluationStore>(
  store: &S,
  evaluator_id: Uuid,
  request: SubmitRequest,
) -> Result<SubmitOutcome> {
  let assignment =
    resolver::authorize(store, evaluator_id, request.assignment_id)
      .await
      .inspect_err(|e| {
        if matches!(e, Error::PermissionDenied) {
          warn!(%evaluator_id, assignment_id = %request.assignment_id, "submission denied");
        }
      })?;

  if !resolver::is_period_open(store, assignment.period_id).await? {
    warn!(period_id = %assignment.period_id, "submission to a period that is not open");
    return Err(Error::PeriodClosed);
  }

  let rubric = rubric::load(store).await?;
  let responses = validate(&rubric, &request.responses, &request.comments)?;
  let count = responses.len();

  let record = SubmissionRecord {
    assignment_id: assignment.assignment_id,
    overall_comment: request
      .overall_comment
      .map(|c| c.trim().to_owned())
      .filter(|c| !c.is_empty()),
    submitted_at: Utc::now(),
    responses,
  };

  let receipt = store.replace_evaluation(record).await.map_err(Error::store)?;

  info!(
    evaluation_id = %receipt.evaluation.evaluation_id,
    assignment_id = %assignment.assignment_id,
    created = receipt.created,
    responses = count,
    "evaluation submitted"
  );

  Ok(SubmitOutcome {
    evaluation_id: receipt.evaluation.evaluation_id,
    created:       receipt.created,
    responses:     count,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rubric::{RubricCategory, RubricItem};

  fn rubric(max_scores: &[u32]) -> Rubric {
    let category_id = Uuid::new_v4();
    Rubric::new(vec![RubricCategory {
      category_id,
      label: "Teaching".into(),
      description: None,
      ordinal: 0,
      items: max_scores
        .iter()
        .enumerate()
        .map(|(i, &max_score)| RubricItem {
          item_id: Uuid::new_v4(),
          category_id,
          prompt: format!("item {i}"),
          max_score,
          ordinal: i as i64,
        })
        .collect(),
    }])
  }

  fn ids(rubric: &Rubric) -> Vec<Uuid> { rubric.items().map(|i| i.item_id).collect() }

  #[test]
  fn complete_submission_validates_in_rubric_order() {
    let r = rubric(&[5, 5]);
    let ids = ids(&r);
    let scores = ScoreMap::from([(ids[1], 3), (ids[0], 5)]);

    let rows = validate(&r, &scores, &BTreeMap::new()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].item_id, ids[0]);
    assert_eq!(rows[0].score, 5);
    assert_eq!(rows[1].score, 3);
  }

  #[test]
  fn missing_items_are_counted() {
    let r = rubric(&[5, 5, 5]);
    let ids = ids(&r);
    let scores = ScoreMap::from([(ids[0], 4)]);

    let err = validate(&r, &scores, &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, Error::IncompleteSubmission { missing: 2 }));
  }

  #[test]
  fn zero_and_over_max_are_invalid() {
    let r = rubric(&[3]);
    let id = ids(&r)[0];

    for bad in [0, 4, -1] {
      let err = validate(&r, &ScoreMap::from([(id, bad)]), &BTreeMap::new())
        .unwrap_err();
      assert!(
        matches!(err, Error::InvalidScore { score, max_score: 3, .. } if score == bad)
      );
    }
  }

  #[test]
  fn per_item_max_is_respected() {
    let r = rubric(&[5, 10]);
    let ids = ids(&r);
    let scores = ScoreMap::from([(ids[0], 5), (ids[1], 9)]);
    assert!(validate(&r, &scores, &BTreeMap::new()).is_ok());
  }

  #[test]
  fn unknown_item_is_rejected() {
    let r = rubric(&[5]);
    let stray = Uuid::new_v4();
    let scores = ScoreMap::from([(ids(&r)[0], 2), (stray, 2)]);

    let err = validate(&r, &scores, &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownRubricItem(id) if id == stray));
  }

  #[test]
  fn blank_comments_are_dropped() {
    let r = rubric(&[5, 5]);
    let ids = ids(&r);
    let scores = ScoreMap::from([(ids[0], 1), (ids[1], 2)]);
    let comments = BTreeMap::from([
      (ids[0], "  clear lectures ".to_owned()),
      (ids[1], "   ".to_owned()),
    ]);

    let rows = validate(&r, &scores, &comments).unwrap();
    assert_eq!(rows[0].comment.as_deref(), Some("clear lectures"));
    assert_eq!(rows[1].comment, None);
  }
}
