//! The `EvaluationStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `facultas-store-sqlite`).
//! The pipeline in this crate and the HTTP layer in `facultas-api` depend on
//! this abstraction, never on a concrete backend. A store handle is built once
//! and passed explicitly to every operation.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  assignment::{AssignmentQuery, EvaluatorAssignment, NewAssignment},
  evaluation::{
    Evaluation, EvaluationResponse, SectionScore, SubmissionReceipt,
    SubmissionRecord,
  },
  period::{EvaluationPeriod, NewPeriod, PeriodStatus},
  roster::{
    Course, NewCourse, NewProfile, NewSection, Profile, Section, SectionView,
    UserRole,
  },
  rubric::{NewCategory, NewItem, RubricCategory, RubricItem},
  sentiment::{NewSentiment, StudentSentiment},
};

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
  pub periods:      usize,
  pub rubric_items: usize,
  pub sections:     usize,
  pub sentiments:   usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a persistent evaluation store.
///
/// Lookups that find nothing return `Ok(None)` (or `Ok(false)` for deletes);
/// `Err` is reserved for the backend itself failing.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait EvaluationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Rubric ────────────────────────────────────────────────────────────

  /// Every category with its items. Items come back in insertion order;
  /// final ordering is applied by [`crate::rubric::Rubric::new`].
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<RubricCategory>, Self::Error>> + Send + '_;

  /// Append a category after the existing ones.
  fn add_category(
    &self,
    input: NewCategory,
  ) -> impl Future<Output = Result<RubricCategory, Self::Error>> + Send + '_;

  /// Delete a category and, with it, all of its items.
  fn delete_category(
    &self,
    category_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Append an item to its category. Returns `None` if the category does not
  /// exist.
  fn add_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<Option<RubricItem>, Self::Error>> + Send + '_;

  fn delete_item(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Periods ───────────────────────────────────────────────────────────

  fn add_period(
    &self,
    input: NewPeriod,
  ) -> impl Future<Output = Result<EvaluationPeriod, Self::Error>> + Send + '_;

  fn get_period(
    &self,
    period_id: Uuid,
  ) -> impl Future<Output = Result<Option<EvaluationPeriod>, Self::Error>> + Send + '_;

  /// Most recent start date first; undated periods last.
  fn list_periods(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<EvaluationPeriod>, Self::Error>> + Send + '_;

  /// Overwrite the status. Any transition is allowed.
  fn set_period_status(
    &self,
    period_id: Uuid,
    status: PeriodStatus,
  ) -> impl Future<Output = Result<Option<EvaluationPeriod>, Self::Error>> + Send + '_;

  fn delete_period(
    &self,
    period_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Roster ────────────────────────────────────────────────────────────

  /// Returns `None` if a profile with `input.profile_id` already exists.
  fn add_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Ordered by full name, optionally restricted to one role.
  fn list_profiles(
    &self,
    role: Option<UserRole>,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  fn add_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Ordered by course code.
  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  /// Returns `None` if the course does not exist.
  fn add_section(
    &self,
    input: NewSection,
  ) -> impl Future<Output = Result<Option<Section>, Self::Error>> + Send + '_;

  fn get_section(
    &self,
    section_id: Uuid,
  ) -> impl Future<Output = Result<Option<Section>, Self::Error>> + Send + '_;

  /// Every section joined with its course and faculty name, newest first.
  fn list_sections(
    &self,
  ) -> impl Future<Output = Result<Vec<SectionView>, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Returns `None` if the period, or the section when one is named, does not
  /// exist.
  fn add_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Option<EvaluatorAssignment>, Self::Error>> + Send + '_;

  fn get_assignment(
    &self,
    assignment_id: Uuid,
  ) -> impl Future<Output = Result<Option<EvaluatorAssignment>, Self::Error>> + Send + '_;

  /// Assignments matching every set field of `query`, oldest first.
  fn find_assignments(
    &self,
    query: AssignmentQuery,
  ) -> impl Future<Output = Result<Vec<EvaluatorAssignment>, Self::Error>> + Send + '_;

  /// Delete an assignment together with its evaluation and responses.
  fn delete_assignment(
    &self,
    assignment_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Evaluations ───────────────────────────────────────────────────────

  fn get_evaluation(
    &self,
    evaluation_id: Uuid,
  ) -> impl Future<Output = Result<Option<Evaluation>, Self::Error>> + Send + '_;

  /// The evaluation produced for `assignment_id`, if any.
  fn find_evaluation(
    &self,
    assignment_id: Uuid,
  ) -> impl Future<Output = Result<Option<Evaluation>, Self::Error>> + Send + '_;

  /// Create-or-replace the evaluation for `record.assignment_id` in a single
  /// transaction: mark it submitted, drop every prior response, insert
  /// `record.responses`. Either all of it lands or none of it does.
  fn replace_evaluation(
    &self,
    record: SubmissionRecord,
  ) -> impl Future<Output = Result<SubmissionReceipt, Self::Error>> + Send + '_;

  fn list_responses(
    &self,
    evaluation_id: Uuid,
  ) -> impl Future<Output = Result<Vec<EvaluationResponse>, Self::Error>> + Send + '_;

  fn count_responses(
    &self,
    evaluation_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Every response of every submitted evaluation whose assignment names a
  /// section.
  fn list_section_scores(
    &self,
  ) -> impl Future<Output = Result<Vec<SectionScore>, Self::Error>> + Send + '_;

  // ── Sentiments ────────────────────────────────────────────────────────

  fn add_sentiment(
    &self,
    input: NewSentiment,
  ) -> impl Future<Output = Result<StudentSentiment, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_sentiments(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<StudentSentiment>, Self::Error>> + Send + '_;

  // ── Reporting ─────────────────────────────────────────────────────────

  fn metrics(
    &self,
  ) -> impl Future<Output = Result<DashboardMetrics, Self::Error>> + Send + '_;
}
