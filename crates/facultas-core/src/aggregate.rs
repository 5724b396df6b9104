//! Score aggregation. Always derived from stored responses, never stored.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  evaluation::{EvaluationResponse, SectionScore},
  roster::SectionView,
  rubric::{self, Rubric},
  store::EvaluationStore,
};

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

#[derive(Default)]
struct Tally {
  sum:   u64,
  count: usize,
}

impl Tally {
  fn add(&mut self, score: u32) {
    self.sum += u64::from(score);
    self.count += 1;
  }

  fn mean(&self) -> f64 { round2(self.sum as f64 / self.count as f64) }
}

// ─── Per category ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAverage {
  pub category_id: Uuid,
  pub label:       String,
  pub average:     f64,
  pub responses:   usize,
}

/// Average `responses` per rubric category, in rubric order. Categories with
/// no scored response are left out rather than reported as zero, and
/// responses for items no longer in the rubric are ignored.
pub fn compute_category_averages(
  rubric: &Rubric,
  responses: &[EvaluationResponse],
) -> Vec<CategoryAverage> {
  let category_of: HashMap<Uuid, Uuid> =
    rubric.items().map(|i| (i.item_id, i.category_id)).collect();

  let mut tallies: HashMap<Uuid, Tally> = HashMap::new();
  for response in responses {
    if let Some(category_id) = category_of.get(&response.item_id) {
      tallies.entry(*category_id).or_default().add(response.score);
    }
  }

  rubric
    .list_categories()
    .iter()
    .filter_map(|category| {
      let tally = tallies.get(&category.category_id)?;
      Some(CategoryAverage {
        category_id: category.category_id,
        label:       category.label.clone(),
        average:     tally.mean(),
        responses:   tally.count,
      })
    })
    .collect()
}

/// Per-category averages for one evaluation.
pub async fn category_averages<S: EvaluationStore>(
  store: &S,
  evaluation_id: Uuid,
) -> Result<Vec<CategoryAverage>> {
  store
    .get_evaluation(evaluation_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("evaluation {evaluation_id}")))?;

  let responses = store
    .list_responses(evaluation_id)
    .await
    .map_err(Error::store)?;
  let rubric = rubric::load(store).await?;

  Ok(compute_category_averages(&rubric, &responses))
}

// ─── Per section ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionAverage {
  pub section_id:   Uuid,
  pub course_label: String,
  pub faculty_name: Option<String>,
  pub term:         Option<String>,
  pub schedule:     Option<String>,
  pub average:      f64,
  pub responses:    usize,
}

/// Average every submitted score per section, highest average first.
/// Sections nobody has scored yet are omitted.
pub fn compute_section_averages(
  sections: &[SectionView],
  scores: &[SectionScore],
) -> Vec<SectionAverage> {
  let mut tallies: HashMap<Uuid, Tally> = HashMap::new();
  for s in scores {
    tallies.entry(s.section_id).or_default().add(s.score);
  }

  let mut rows: Vec<SectionAverage> = sections
    .iter()
    .filter_map(|view| {
      let tally = tallies.get(&view.section.section_id)?;
      Some(SectionAverage {
        section_id:   view.section.section_id,
        course_label: view.course_label(),
        faculty_name: view.faculty_name.clone(),
        term:         view.section.term.clone(),
        schedule:     view.section.schedule.clone(),
        average:      tally.mean(),
        responses:    tally.count,
      })
    })
    .collect();

  rows.sort_by(|a, b| {
    b.average
      .total_cmp(&a.average)
      .then_with(|| a.course_label.cmp(&b.course_label))
  });
  rows
}

/// Admin report: per-section averages across all submitted evaluations.
pub async fn section_averages<S: EvaluationStore>(
  store: &S,
) -> Result<Vec<SectionAverage>> {
  let sections = store.list_sections().await.map_err(Error::store)?;
  let scores = store.list_section_scores().await.map_err(Error::store)?;
  Ok(compute_section_averages(&sections, &scores))
}
