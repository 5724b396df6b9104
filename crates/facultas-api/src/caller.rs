//! The authenticated-caller extractor.
//!
//! Authentication itself happens in front of this router: whatever layer
//! verifies credentials inserts a [`Caller`] into the request extensions, and
//! handlers pick it up through [`CurrentCaller`].

use axum::{extract::FromRequestParts, http::request::Parts};
use facultas_core::{Error as CoreError, identity::Caller};

use crate::error::ApiError;

/// Present in a handler means the request carries a verified identity.
#[derive(Debug, Clone, Copy)]
pub struct CurrentCaller(pub Caller);

impl<S> FromRequestParts<S> for CurrentCaller
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Caller>()
      .copied()
      .map(CurrentCaller)
      .ok_or(ApiError::Core(CoreError::Unauthenticated))
  }
}
