//! The authenticated caller, as reported by the identity provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, roster::UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub user_id: Uuid,
  pub role:    UserRole,
}

impl Caller {
  pub fn is_admin(&self) -> bool { self.role == UserRole::Admin }

  pub fn require_admin(&self) -> Result<()> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(Error::PermissionDenied)
    }
  }
}
