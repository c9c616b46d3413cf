//! HTTP Basic-auth actor extractor and password hashing.
//!
//! Credentials are checked against the argon2 hashes held by the store. A
//! request with missing or wrong credentials is not rejected here; it simply
//! has no actor, and the action it reaches decides whether that matters.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use grams_core::{store::GramStore, user::Actor};
use rand_core::OsRng;

use crate::{AppState, error::Error};

/// The authenticated actor for this request, if any.
pub struct CurrentActor(pub Option<Actor>);

impl CurrentActor {
  pub fn actor(&self) -> Option<&Actor> { self.0.as_ref() }
}

/// Split an `Authorization: Basic …` header into username and password.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?;
  let encoded = header_val.strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (username, password) = creds.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

/// Resolve credentials to an actor. Unknown users and wrong passwords yield
/// `Ok(None)`; only store failures are errors.
pub async fn authenticate<S: GramStore>(
  store: &S,
  username: &str,
  password: &str,
) -> Result<Option<Actor>, Error> {
  let Some(user) = store
    .find_user_by_username(username)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
  else {
    return Ok(None);
  };

  let Ok(parsed_hash) = PasswordHash::new(&user.password_hash) else {
    tracing::warn!(%username, "stored password hash is malformed");
    return Ok(None);
  };

  match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(Some(user.actor())),
    Err(_) => Ok(None),
  }
}

/// Produce the argon2 PHC string stored for a new account.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

impl<S> FromRequestParts<AppState<S>> for CurrentActor
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Some((username, password)) = basic_credentials(&parts.headers) else {
      return Ok(CurrentActor(None));
    };
    let actor = authenticate(state.store.as_ref(), &username, &password).await?;
    if actor.is_none() {
      tracing::debug!(%username, "credentials rejected");
    }
    Ok(CurrentActor(actor))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use axum::http::{Request, header};
  use grams_core::user::NewUser;
  use grams_store_sqlite::SqliteStore;

  use crate::{AppState, ServerConfig};

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .create_user(NewUser {
        username:      "user".to_string(),
        password_hash: hash_password(password).unwrap(),
      })
      .await
      .unwrap()
      .unwrap();

    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig::default()),
    }
  }

  async fn extract(req: Request<axum::body::Body>, state: &AppState<SqliteStore>) -> Option<Actor> {
    let (mut parts, _) = req.into_parts();
    CurrentActor::from_request_parts(&mut parts, state).await.unwrap().0
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[tokio::test]
  async fn correct_credentials() {
    let state = make_state("secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("user", "secret"))
      .body(axum::body::Body::empty()).unwrap();
    let actor = extract(req, &state).await.expect("actor");
    assert_eq!(actor.username, "user");
  }

  #[tokio::test]
  async fn wrong_password() {
    let state = make_state("secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("user", "wrong"))
      .body(axum::body::Body::empty()).unwrap();
    assert!(extract(req, &state).await.is_none());
  }

  #[tokio::test]
  async fn unknown_user() {
    let state = make_state("secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("nobody", "secret"))
      .body(axum::body::Body::empty()).unwrap();
    assert!(extract(req, &state).await.is_none());
  }

  #[tokio::test]
  async fn missing_header() {
    let state = make_state("secret").await;
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(extract(req, &state).await.is_none());
  }

  #[tokio::test]
  async fn invalid_base64() {
    let state = make_state("secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty()).unwrap();
    assert!(extract(req, &state).await.is_none());
  }

  #[test]
  fn password_hash_verifies() {
    let hash = hash_password("hunter22").unwrap();
    let parsed = PasswordHash::new(&hash).unwrap();
    assert!(Argon2::default().verify_password(b"hunter22", &parsed).is_ok());
    assert!(Argon2::default().verify_password(b"hunter23", &parsed).is_err());
  }
}
