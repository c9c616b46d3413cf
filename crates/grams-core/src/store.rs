//! The `GramStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `grams-store-sqlite`).
//! Higher layers (`grams-web`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  post::{Comment, NewComment, NewPost, Post},
  user::{NewUser, User},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Default page size for [`GramStore::list_posts`].
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Parameters for [`GramStore::list_posts`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PostQuery {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a grams persistence backend.
///
/// Lookups by id return `Ok(None)` for unknown ids; errors are reserved for
/// backend failures and constraint violations.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait GramStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `Ok(None)` if the username is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post. Content must already have been validated.
  fn insert_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Retrieve a post by id. Returns `None` if not found.
  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// List posts, newest first.
  fn list_posts(
    &self,
    query: PostQuery,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Replace a post's message and bump `updated_at`. Returns `None` if the
  /// post does not exist.
  fn update_post_message(
    &self,
    id: Uuid,
    message: String,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Delete a post and all of its comments in one transaction. Returns
  /// `false` if the post did not exist.
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Append a comment. Returns `None` if the post does not exist.
  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// All comments on a post, oldest first.
  fn list_comments(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;
}
