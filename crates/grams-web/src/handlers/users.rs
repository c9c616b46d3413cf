//! Account endpoints: registration and the sign-in challenge.

use axum::{
  Form,
  extract::State,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Redirect, Response},
};
use grams_core::{
  store::GramStore,
  user::NewUser,
  validate::{ValidationErrors, validate_registration},
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::hash_password,
  error::Error,
  handlers::redirect_to_root,
};

#[derive(Debug, Deserialize)]
pub struct RegisterParams {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

/// `POST /users` — create an account, then sign in with HTTP Basic.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Form(params): Form<RegisterParams>,
) -> Result<Redirect, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  let username = params.username.trim().to_owned();
  validate_registration(&username, &params.password)
    .map_err(Error::Unprocessable)?;

  let password_hash = hash_password(&params.password)?;
  let user = state
    .store
    .create_user(NewUser { username, password_hash })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| {
      let mut errors = ValidationErrors::new();
      errors.add("username", "has already been taken");
      Error::Unprocessable(errors)
    })?;

  tracing::info!(user_id = %user.user_id, username = %user.username, "user registered");
  Ok(redirect_to_root())
}

/// `GET /users/sign_in` — challenge the client for Basic credentials.
pub async fn sign_in() -> Response {
  let mut res = (StatusCode::UNAUTHORIZED, "Sign in required").into_response();
  res.headers_mut().insert(
    header::WWW_AUTHENTICATE,
    HeaderValue::from_static("Basic realm=\"grams\""),
  );
  res
}
