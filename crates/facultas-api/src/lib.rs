//! JSON REST API for Facultas.
//!
//! Exposes an axum [`Router`] backed by any
//! [`facultas_core::store::EvaluationStore`]. Authentication, TLS, and
//! transport concerns are the caller's responsibility: the router only expects
//! an authenticated [`facultas_core::identity::Caller`] in the request
//! extensions (see [`caller::CurrentCaller`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", facultas_api::api_router(store.clone()))
//! ```

pub mod assignments;
pub mod caller;
pub mod error;
pub mod evaluations;
pub mod periods;
pub mod reports;
pub mod roster;
pub mod rubric;
pub mod sentiments;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use facultas_core::store::EvaluationStore;

pub use caller::CurrentCaller;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EvaluationStore + 'static,
{
  Router::new()
    // Rubric
    .route("/rubric", get(rubric::get::<S>))
    .route("/rubric/categories", post(rubric::create_category::<S>))
    .route("/rubric/categories/{id}", delete(rubric::delete_category::<S>))
    .route("/rubric/items", post(rubric::create_item::<S>))
    .route("/rubric/items/{id}", delete(rubric::delete_item::<S>))
    // Periods
    .route("/periods", get(periods::list::<S>).post(periods::create::<S>))
    .route(
      "/periods/{id}",
      get(periods::get_one::<S>).delete(periods::delete::<S>),
    )
    .route("/periods/{id}/status", put(periods::set_status::<S>))
    // Roster
    .route(
      "/profiles",
      get(roster::list_profiles::<S>).post(roster::create_profile::<S>),
    )
    .route("/profiles/{id}", get(roster::get_profile::<S>))
    .route(
      "/courses",
      get(roster::list_courses::<S>).post(roster::create_course::<S>),
    )
    .route(
      "/sections",
      get(roster::list_sections::<S>).post(roster::create_section::<S>),
    )
    // Assignments
    .route(
      "/assignments",
      get(assignments::list::<S>).post(assignments::create::<S>),
    )
    .route("/assignments/{id}", delete(assignments::delete::<S>))
    .route(
      "/assignments/{id}/evaluation",
      get(evaluations::for_assignment::<S>),
    )
    // Evaluations
    .route("/evaluations", post(evaluations::submit::<S>))
    .route("/evaluations/{id}", get(evaluations::get_one::<S>))
    .route("/evaluations/{id}/averages", get(evaluations::averages::<S>))
    // Reports
    .route("/reports/sections", get(reports::sections::<S>))
    .route("/reports/metrics", get(reports::metrics::<S>))
    // Sentiments
    .route(
      "/sentiments",
      get(sentiments::list::<S>).post(sentiments::create::<S>),
    )
    .with_state(store)
}

#[cfg(test)]
mod tests;
