//! Business rules applied to user-supplied content before it is persisted.

use std::fmt;

use serde::Serialize;

/// Minimum accepted password length for new accounts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single rule violation, attributed to the input field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

/// Every rule violation found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(FieldError { field, message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn errors(&self) -> &[FieldError] { &self.0 }

  /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for e in &self.0 {
      if !first {
        f.write_str(", ")?;
      }
      write!(f, "{} {}", e.field, e.message)?;
      first = false;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

fn is_blank(s: &str) -> bool { s.trim().is_empty() }

/// A post or comment message must contain something other than whitespace.
pub fn validate_message(message: &str) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::new();
  if is_blank(message) {
    errors.add("message", "can't be blank");
  }
  errors.into_result()
}

/// Rules for a new account. Uniqueness of the username is the store's job.
pub fn validate_registration(
  username: &str,
  password: &str,
) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::new();
  if is_blank(username) {
    errors.add("username", "can't be blank");
  }
  // Basic credentials split at the first colon.
  if username.contains(':') {
    errors.add("username", "can't contain ':'");
  }
  if password.chars().count() < MIN_PASSWORD_LEN {
    errors.add(
      "password",
      format!("is too short (minimum is {MIN_PASSWORD_LEN} characters)"),
    );
  }
  errors.into_result()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn message_with_text_is_valid() {
    assert!(validate_message("Hello!").is_ok());
  }

  #[test]
  fn empty_message_is_rejected() {
    let errors = validate_message("").unwrap_err();
    assert_eq!(errors.errors().len(), 1);
    assert_eq!(errors.errors()[0].field, "message");
  }

  #[test]
  fn whitespace_only_message_is_rejected() {
    assert!(validate_message("  \n\t ").is_err());
  }

  #[test]
  fn registration_collects_every_violation() {
    let errors = validate_registration(" ", "abc").unwrap_err();
    let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
    assert_eq!(fields, ["username", "password"]);
    assert_eq!(
      errors.to_string(),
      "username can't be blank, password is too short (minimum is 6 characters)"
    );
  }

  #[test]
  fn registration_rejects_colon_in_username() {
    let errors = validate_registration("a:b", "hunter22").unwrap_err();
    assert_eq!(errors.errors().len(), 1);
    assert_eq!(errors.errors()[0].field, "username");
    assert_eq!(errors.errors()[0].message, "can't contain ':'");
  }

  #[test]
  fn registration_accepts_minimum_password() {
    assert!(validate_registration("alice", "sixsix").is_ok());
  }
}
