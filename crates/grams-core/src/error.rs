//! Error types for `grams-core`.

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Why an operation was refused or failed.
///
/// Variants are listed in the order operations check for them: an
/// unauthenticated request never learns whether a post exists, and a
/// non-owner never learns whether their input would have validated.
#[derive(Debug, Error)]
pub enum Error {
  #[error("authentication required")]
  Unauthenticated,

  #[error("actor does not own this post")]
  Forbidden,

  #[error("post not found: {0}")]
  PostNotFound(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
