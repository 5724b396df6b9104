//! Error types for `facultas-core`.
//!
//! Every variant is terminal for the current attempt; nothing in the pipeline
//! retries on its own.

use thiserror::Error;
use uuid::Uuid;

/// Boxed error produced by a storage backend.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not signed in")]
  Unauthenticated,

  /// The assignment does not exist, or it belongs to someone else. Callers
  /// see the same error for both.
  #[error("assignment not found or you don't have permission")]
  PermissionDenied,

  #[error("evaluation period is not open")]
  PeriodClosed,

  #[error("please score all rubric items ({missing} missing)")]
  IncompleteSubmission { missing: usize },

  #[error("score {score} for item {item_id} is outside 1..={max_score}")]
  InvalidScore {
    item_id:   Uuid,
    score:     i64,
    max_score: u32,
  },

  #[error("rubric item {0} does not exist")]
  UnknownRubricItem(Uuid),

  #[error("{0} not found")]
  NotFound(String),

  #[error("invalid input: {0}")]
  Invalid(String),

  #[error("store failure: {0}")]
  StoreFailure(#[source] StoreError),
}

impl Error {
  /// Wrap a backend error; used as `.map_err(Error::store)`.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreFailure(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
