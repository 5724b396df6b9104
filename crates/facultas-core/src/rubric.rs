//! The rubric model: categories of scored items.
//!
//! Every submission is validated against the rubric as it exists at the
//! moment of submission, and every aggregate is grouped by its categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, store::EvaluationStore};

/// Max score given to an item when the administrator does not pick one.
pub const DEFAULT_MAX_SCORE: u32 = 5;

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A single scored prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricItem {
  pub item_id:     Uuid,
  pub category_id: Uuid,
  pub prompt:      String,
  /// Upper bound of the score range; the lower bound is always 1.
  pub max_score:   u32,
  pub ordinal:     i64,
}

impl RubricItem {
  pub fn accepts(&self, score: i64) -> bool {
    (1..=i64::from(self.max_score)).contains(&score)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCategory {
  pub category_id: Uuid,
  pub label:       String,
  pub description: Option<String>,
  pub ordinal:     i64,
  pub items:       Vec<RubricItem>,
}

/// Input to [`EvaluationStore::add_category`].
#[derive(Debug, Clone)]
pub struct NewCategory {
  pub label:       String,
  pub description: Option<String>,
}

/// Input to [`EvaluationStore::add_item`].
#[derive(Debug, Clone)]
pub struct NewItem {
  pub category_id: Uuid,
  pub prompt:      String,
  pub max_score:   u32,
}

impl NewItem {
  pub fn new(category_id: Uuid, prompt: impl Into<String>) -> Self {
    Self {
      category_id,
      prompt: prompt.into(),
      max_score: DEFAULT_MAX_SCORE,
    }
  }
}

// ─── Rubric ──────────────────────────────────────────────────────────────────

/// The full, ordered rubric.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Rubric {
  categories: Vec<RubricCategory>,
}

impl Rubric {
  /// Orders categories by ordinal then id, and items by ordinal. The item sort
  /// is stable, so items sharing an ordinal keep the order they arrived in.
  pub fn new(mut categories: Vec<RubricCategory>) -> Self {
    categories.sort_by(|a, b| {
      a.ordinal
        .cmp(&b.ordinal)
        .then_with(|| a.category_id.cmp(&b.category_id))
    });
    for category in &mut categories {
      category.items.sort_by_key(|item| item.ordinal);
    }
    Self { categories }
  }

  pub fn list_categories(&self) -> &[RubricCategory] { &self.categories }

  /// The completeness threshold for a submission.
  pub fn total_item_count(&self) -> usize {
    self.categories.iter().map(|c| c.items.len()).sum()
  }

  pub fn items(&self) -> impl Iterator<Item = &RubricItem> {
    self.categories.iter().flat_map(|c| c.items.iter())
  }

  pub fn item(&self, item_id: Uuid) -> Option<&RubricItem> {
    self.items().find(|item| item.item_id == item_id)
  }
}

/// Read the current rubric from `store`.
pub async fn load<S: EvaluationStore>(store: &S) -> Result<Rubric> {
  let categories = store.list_categories().await.map_err(Error::store)?;
  Ok(Rubric::new(categories))
}
