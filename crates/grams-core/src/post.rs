//! Posts ("grams") and the comments attached to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Post ────────────────────────────────────────────────────────────────────

/// A short message shared by its owner. Only `message` and `updated_at` ever
/// change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    Uuid,
  pub owner_id:   Uuid,
  pub message:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::GramStore::insert_post`].
/// Timestamps and the id are always set by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub owner_id: Uuid,
  pub message:  String,
}

// ─── Comment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Uuid,
  pub author_id:  Uuid,
  pub message:    String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::GramStore::add_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
  pub post_id:   Uuid,
  pub author_id: Uuid,
  pub message:   String,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A post together with its comments, oldest comment first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
  pub post:     Post,
  pub comments: Vec<Comment>,
}

/// The editable fields of a post, as shown on the new/edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
  pub message: String,
}

/// Parse a path segment into a post id. Anything that is not a UUID cannot
/// name a post, so callers treat `None` as not found.
pub fn parse_post_id(raw: &str) -> Option<Uuid> { Uuid::parse_str(raw).ok() }
