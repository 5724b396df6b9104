//! HTTP Basic-auth identity layer.
//!
//! Credentials are checked against the configured accounts; on success the
//! matching [`Caller`] is inserted into the request extensions, where
//! `facultas_api::CurrentCaller` picks it up.

use std::{collections::HashMap, sync::Arc};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use facultas_core::identity::Caller;

use crate::{Account, error::Error};

struct Credential {
  caller:        Caller,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  password_hash: String,
}

/// Accounts accepted by this server instance, keyed by username.
pub struct AuthConfig {
  accounts: HashMap<String, Credential>,
}

impl AuthConfig {
  /// Index `accounts`, rejecting duplicate usernames and unparseable hashes.
  pub fn new(accounts: &[Account]) -> Result<Self, Error> {
    let mut map = HashMap::with_capacity(accounts.len());
    for account in accounts {
      let invalid = |reason: String| Error::InvalidAccount {
        username: account.username.clone(),
        reason,
      };

      PasswordHash::new(&account.password_hash)
        .map_err(|e| invalid(format!("bad password hash: {e}")))?;

      let credential = Credential {
        caller:        Caller { user_id: account.user_id, role: account.role },
        password_hash: account.password_hash.clone(),
      };
      if map.insert(account.username.clone(), credential).is_some() {
        return Err(invalid("listed more than once".to_owned()));
      }
    }
    Ok(Self { accounts: map })
  }

  pub fn is_empty(&self) -> bool { self.accounts.is_empty() }
}

/// Verify credentials directly from headers and return who they belong to.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Caller, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let credential = config.accounts.get(username).ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&credential.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(credential.caller)
}

/// Middleware: authenticate the request or answer 401.
pub async fn authenticate(
  State(config): State<Arc<AuthConfig>>,
  mut req: Request,
  next: Next,
) -> Response {
  match verify_auth(req.headers(), &config) {
    Ok(caller) => {
      tracing::debug!(user_id = %caller.user_id, role = ?caller.role, "authenticated");
      req.extensions_mut().insert(caller);
      next.run(req).await
    }
    Err(e) => {
      tracing::debug!("rejected credentials");
      e.into_response()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, header};
  use facultas_core::roster::UserRole;
  use uuid::Uuid;

  fn hash(password: &str) -> String {
    use argon2::{PasswordHasher, password_hash::SaltString};
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn account(username: &str, password: &str, role: UserRole) -> Account {
    Account {
      username:      username.to_string(),
      user_id:       Uuid::new_v4(),
      role,
      password_hash: hash(password),
    }
  }

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let encoded = B64.encode(format!("{user}:{pass}"));
    let mut headers = HeaderMap::new();
    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
    );
    headers
  }

  #[test]
  fn correct_credentials_yield_caller() {
    let admin = account("dean", "secret", UserRole::Admin);
    let config = AuthConfig::new(&[
      admin.clone(),
      account("prof", "other", UserRole::Faculty),
    ])
    .unwrap();

    let caller = verify_auth(&basic("dean", "secret"), &config).unwrap();
    assert_eq!(caller.user_id, admin.user_id);
    assert_eq!(caller.role, UserRole::Admin);
  }

  #[test]
  fn wrong_password() {
    let config =
      AuthConfig::new(&[account("dean", "secret", UserRole::Admin)]).unwrap();
    assert!(matches!(
      verify_auth(&basic("dean", "wrong"), &config),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn unknown_user() {
    let config =
      AuthConfig::new(&[account("dean", "secret", UserRole::Admin)]).unwrap();
    assert!(matches!(
      verify_auth(&basic("nobody", "secret"), &config),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    let config =
      AuthConfig::new(&[account("dean", "secret", UserRole::Admin)]).unwrap();
    assert!(matches!(
      verify_auth(&HeaderMap::new(), &config),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    let config =
      AuthConfig::new(&[account("dean", "secret", UserRole::Admin)]).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_static("Basic !!!not-base64!!!"),
    );
    assert!(matches!(verify_auth(&headers, &config), Err(Error::Unauthorized)));
  }

  #[test]
  fn rejects_bad_hash_and_duplicates() {
    let mut broken = account("dean", "secret", UserRole::Admin);
    broken.password_hash = "plaintext".to_string();
    assert!(matches!(
      AuthConfig::new(&[broken]),
      Err(Error::InvalidAccount { .. })
    ));

    let a = account("dean", "secret", UserRole::Admin);
    assert!(matches!(
      AuthConfig::new(&[a.clone(), a]),
      Err(Error::InvalidAccount { .. })
    ));
  }
}
