//! Admin reporting endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports/sections` | Per-section averages, highest first |
//! | `GET`  | `/reports/metrics` | Dashboard counts |

use std::sync::Arc;

use axum::{Json, extract::State};
use facultas_core::{
  aggregate::{self, SectionAverage},
  store::{DashboardMetrics, EvaluationStore},
};

use crate::{caller::CurrentCaller, error::ApiError};

/// `GET /reports/sections`
pub async fn sections<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
) -> Result<Json<Vec<SectionAverage>>, ApiError> {
  caller.require_admin()?;
  Ok(Json(aggregate::section_averages(&*store).await?))
}

/// `GET /reports/metrics`
pub async fn metrics<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
) -> Result<Json<DashboardMetrics>, ApiError> {
  caller.require_admin()?;
  Ok(Json(store.metrics().await.map_err(ApiError::store)?))
}
