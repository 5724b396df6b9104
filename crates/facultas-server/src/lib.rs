//! HTTP server for Facultas.
//!
//! Wraps the [`facultas_api`] router with Basic-auth identity resolution and
//! request tracing.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use facultas_core::{roster::UserRole, store::EvaluationStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use auth::{AuthConfig, authenticate};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub accounts:   Vec<Account>,
}

/// One sign-in identity. `user_id` is what assignments and sections refer to.
#[derive(Deserialize, Clone)]
pub struct Account {
  pub username:      String,
  pub user_id:       Uuid,
  pub role:          UserRole,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
#[derive(Clone)]
pub struct AppState<S: EvaluationStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: `/api/*` behind authentication, with
/// every request traced.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: EvaluationStore + 'static,
{
  Router::new()
    .nest("/api", facultas_api::api_router(state.store))
    .layer(middleware::from_fn_with_state(state.auth, authenticate))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
