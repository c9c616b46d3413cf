//! Users and the actor identity derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl User {
  /// The identity this user acts as once authenticated.
  pub fn actor(&self) -> Actor {
    Actor { user_id: self.user_id, username: self.username.clone() }
  }
}

/// Input to [`crate::store::GramStore::create_user`].
/// The password must already be hashed; the store never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
}

/// An authenticated identity. Ownership checks compare `user_id` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub user_id:  Uuid,
  pub username: String,
}

impl Actor {
  pub fn owns(&self, owner_id: Uuid) -> bool { self.user_id == owner_id }
}
