//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
};
use grams_core::validate::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// Where unauthenticated requests are sent.
pub const SIGN_IN_PATH: &str = "/users/sign_in";

#[derive(Debug, Error)]
pub enum Error {
  #[error("authentication required")]
  Unauthenticated,
  #[error("forbidden")]
  Forbidden,
  #[error("not found: {0}")]
  NotFound(String),
  #[error("validation failed: {0}")]
  Unprocessable(ValidationErrors),
  #[error("password hash error: {0}")]
  PasswordHash(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<grams_core::Error> for Error {
  fn from(e: grams_core::Error) -> Self {
    match e {
      grams_core::Error::Unauthenticated => Error::Unauthenticated,
      grams_core::Error::Forbidden => Error::Forbidden,
      grams_core::Error::PostNotFound(id) => Error::NotFound(format!("post {id}")),
      grams_core::Error::Validation(errors) => Error::Unprocessable(errors),
      grams_core::Error::Store(e) => Error::Store(e),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthenticated => Redirect::to(SIGN_IN_PATH).into_response(),
      Error::Forbidden => {
        tracing::warn!("refused: actor does not own the post");
        (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" })))
          .into_response()
      }
      Error::NotFound(what) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{what} not found") })),
      )
        .into_response(),
      Error::Unprocessable(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "validation failed", "errors": errors })),
      )
        .into_response(),
      e @ (Error::PasswordHash(_) | Error::Store(_)) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
          .into_response()
      }
    }
  }
}
