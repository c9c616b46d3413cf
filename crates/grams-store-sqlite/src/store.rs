//! [`SqliteStore`] — the SQLite implementation of [`GramStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use grams_core::{
  post::{Comment, NewComment, NewPost, Post},
  store::{DEFAULT_PAGE_SIZE, GramStore, PostQuery},
  user::{NewUser, User},
};

use crate::{
  Result,
  encode::{
    COMMENT_COLUMNS, POST_COLUMNS, RawComment, RawPost, RawUser, USER_COLUMNS,
    encode_dt, encode_uuid, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A grams store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single user row matching `column = value`.
  async fn user_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── GramStore impl ──────────────────────────────────────────────────────────

impl GramStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      created_at:    now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let hash     = user.password_hash.clone();
    let at_str   = encode_dt(user.created_at);

    // Check and insert run back to back on the connection thread, so no
    // other write can interleave.
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO users (user_id, username, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, username, hash, at_str],
        )?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(user))
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.user_where("user_id", encode_uuid(id)).await
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    self.user_where("username", username.to_owned()).await
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn insert_post(&self, input: NewPost) -> Result<Post> {
    let at = now();
    let post = Post {
      post_id:    Uuid::new_v4(),
      owner_id:   input.owner_id,
      message:    input.message,
      created_at: at,
      updated_at: at,
    };

    let id_str    = encode_uuid(post.post_id);
    let owner_str = encode_uuid(post.owner_id);
    let message   = post.message.clone();
    let at_str    = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, owner_id, message, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![id_str, owner_str, message, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?1");

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawPost::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self, query: PostQuery) -> Result<Vec<Post>> {
    let limit_val  = i64::try_from(query.limit.unwrap_or(DEFAULT_PAGE_SIZE))
      .unwrap_or(i64::MAX);
    let offset_val = i64::try_from(query.offset.unwrap_or(0)).unwrap_or(i64::MAX);
    let sql = format!(
      "SELECT {POST_COLUMNS} FROM posts
       ORDER BY created_at DESC, rowid DESC
       LIMIT ?1 OFFSET ?2"
    );

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val, offset_val], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn update_post_message(
    &self,
    id:      Uuid,
    message: String,
  ) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET message = ?2, updated_at = ?3 WHERE post_id = ?1",
          rusqlite::params![id_str, message, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_post(id).await
  }

  async fn delete_post(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM comments WHERE post_id = ?1",
          rusqlite::params![id_str],
        )?;
        let n = tx.execute(
          "DELETE FROM posts WHERE post_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, input: NewComment) -> Result<Option<Comment>> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id:    input.post_id,
      author_id:  input.author_id,
      message:    input.message,
      created_at: now(),
    };

    let id_str     = encode_uuid(comment.comment_id);
    let post_str   = encode_uuid(comment.post_id);
    let author_str = encode_uuid(comment.author_id);
    let message    = comment.message.clone();
    let at_str     = encode_dt(comment.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let post_exists = conn
          .query_row(
            "SELECT 1 FROM posts WHERE post_id = ?1",
            rusqlite::params![post_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !post_exists {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO comments (comment_id, post_id, author_id, message, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, post_str, author_str, message, at_str],
        )?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(comment))
  }

  async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
    let post_str = encode_uuid(post_id);
    let sql = format!(
      "SELECT {COMMENT_COLUMNS} FROM comments
       WHERE post_id = ?1
       ORDER BY created_at, rowid"
    );

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![post_str], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }
}
