//! One function per endpoint of the post and comment surface.
//!
//! Every action receives the current actor explicitly and checks, in order:
//! authentication, existence of the addressed post, ownership, and finally
//! the validity of the submitted content. Nothing is written unless all four
//! pass.

use crate::{
  Error, Result,
  post::{Comment, NewComment, NewPost, Post, PostForm, PostView, parse_post_id},
  store::{GramStore, PostQuery},
  user::Actor,
  validate::validate_message,
};

// ─── Guards ──────────────────────────────────────────────────────────────────

pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor> {
  actor.ok_or(Error::Unauthenticated)
}

pub fn authorize_owner(actor: &Actor, post: &Post) -> Result<()> {
  if actor.owns(post.owner_id) { Ok(()) } else { Err(Error::Forbidden) }
}

async fn find_post<S: GramStore>(store: &S, raw_id: &str) -> Result<Post> {
  let not_found = || Error::PostNotFound(raw_id.to_owned());
  let id = parse_post_id(raw_id).ok_or_else(not_found)?;
  store
    .get_post(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(not_found)
}

async fn find_owned_post<S: GramStore>(
  store: &S,
  actor: Option<&Actor>,
  raw_id: &str,
) -> Result<Post> {
  let actor = require_actor(actor)?;
  let post = find_post(store, raw_id).await?;
  authorize_owner(actor, &post)?;
  Ok(post)
}

// ─── Posts ───────────────────────────────────────────────────────────────────

/// Index. Open to everyone.
pub async fn list_posts<S: GramStore>(
  store: &S,
  query: PostQuery,
) -> Result<Vec<Post>> {
  store.list_posts(query).await.map_err(Error::store)
}

/// Show. Open to everyone.
pub async fn show_post<S: GramStore>(store: &S, raw_id: &str) -> Result<PostView> {
  let post = find_post(store, raw_id).await?;
  let comments = store
    .list_comments(post.post_id)
    .await
    .map_err(Error::store)?;
  Ok(PostView { post, comments })
}

pub fn new_post_form(actor: Option<&Actor>) -> Result<PostForm> {
  require_actor(actor)?;
  Ok(PostForm::default())
}

pub async fn create_post<S: GramStore>(
  store: &S,
  actor: Option<&Actor>,
  message: String,
) -> Result<Post> {
  let actor = require_actor(actor)?;
  validate_message(&message)?;
  store
    .insert_post(NewPost { owner_id: actor.user_id, message })
    .await
    .map_err(Error::store)
}

pub async fn edit_post_form<S: GramStore>(
  store: &S,
  actor: Option<&Actor>,
  raw_id: &str,
) -> Result<PostForm> {
  let post = find_owned_post(store, actor, raw_id).await?;
  Ok(PostForm { message: post.message })
}

pub async fn update_post<S: GramStore>(
  store: &S,
  actor: Option<&Actor>,
  raw_id: &str,
  message: String,
) -> Result<Post> {
  let post = find_owned_post(store, actor, raw_id).await?;
  validate_message(&message)?;
  store
    .update_post_message(post.post_id, message)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::PostNotFound(raw_id.to_owned()))
}

/// Removes the post and, atomically, every comment on it.
pub async fn destroy_post<S: GramStore>(
  store: &S,
  actor: Option<&Actor>,
  raw_id: &str,
) -> Result<()> {
  let post = find_owned_post(store, actor, raw_id).await?;
  let deleted = store
    .delete_post(post.post_id)
    .await
    .map_err(Error::store)?;
  if deleted {
    Ok(())
  } else {
    Err(Error::PostNotFound(raw_id.to_owned()))
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// Any authenticated actor may comment on any existing post.
pub async fn create_comment<S: GramStore>(
  store: &S,
  actor: Option<&Actor>,
  raw_post_id: &str,
  message: String,
) -> Result<Comment> {
  let actor = require_actor(actor)?;
  let post = find_post(store, raw_post_id).await?;
  validate_message(&message)?;
  store
    .add_comment(NewComment {
      post_id: post.post_id,
      author_id: actor.user_id,
      message,
    })
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::PostNotFound(raw_post_id.to_owned()))
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::user::{NewUser, User};

  /// Just enough of a store to exercise the guards without a database.
  #[derive(Default)]
  struct MemoryStore {
    posts:    Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
  }

  impl GramStore for MemoryStore {
    type Error = std::convert::Infallible;

    async fn create_user(&self, _: NewUser) -> Result<Option<User>, Self::Error> { unimplemented!() }
    async fn get_user(&self, _: Uuid) -> Result<Option<User>, Self::Error> { unimplemented!() }
    async fn find_user_by_username(&self, _: &str) -> Result<Option<User>, Self::Error> { unimplemented!() }

    async fn insert_post(&self, input: NewPost) -> Result<Post, Self::Error> {
      let now = Utc::now();
      let post = Post {
        post_id:    Uuid::new_v4(),
        owner_id:   input.owner_id,
        message:    input.message,
        created_at: now,
        updated_at: now,
      };
      self.posts.lock().unwrap().push(post.clone());
      Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, Self::Error> {
      Ok(self.posts.lock().unwrap().iter().find(|p| p.post_id == id).cloned())
    }

    async fn list_posts(&self, _: PostQuery) -> Result<Vec<Post>, Self::Error> {
      Ok(self.posts.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn update_post_message(&self, id: Uuid, message: String) -> Result<Option<Post>, Self::Error> {
      let mut posts = self.posts.lock().unwrap();
      Ok(posts.iter_mut().find(|p| p.post_id == id).map(|p| {
        p.message = message;
        p.updated_at = Utc::now();
        p.clone()
      }))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, Self::Error> {
      let mut posts = self.posts.lock().unwrap();
      let before = posts.len();
      posts.retain(|p| p.post_id != id);
      self.comments.lock().unwrap().retain(|c| c.post_id != id);
      Ok(posts.len() != before)
    }

    async fn add_comment(&self, input: NewComment) -> Result<Option<Comment>, Self::Error> {
      let comment = Comment {
        comment_id: Uuid::new_v4(),
        post_id:    input.post_id,
        author_id:  input.author_id,
        message:    input.message,
        created_at: Utc::now(),
      };
      self.comments.lock().unwrap().push(comment.clone());
      Ok(Some(comment))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, Self::Error> {
      Ok(
        self
          .comments
          .lock()
          .unwrap()
          .iter()
          .filter(|c| c.post_id == post_id)
          .cloned()
          .collect(),
      )
    }
  }

  fn actor(name: &str) -> Actor {
    Actor { user_id: Uuid::new_v4(), username: name.into() }
  }

  async fn seeded(owner: &Actor, message: &str) -> (MemoryStore, Post) {
    let store = MemoryStore::default();
    let post = create_post(&store, Some(owner), message.into()).await.unwrap();
    (store, post)
  }

  #[tokio::test]
  async fn create_post_records_owner() {
    let alice = actor("alice");
    let (store, post) = seeded(&alice, "Hello!").await;
    assert_eq!(post.owner_id, alice.user_id);
    assert_eq!(store.posts.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn create_post_without_actor_is_unauthenticated() {
    let store = MemoryStore::default();
    let err = create_post(&store, None, "Hello".into()).await.unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
    assert!(store.posts.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_post_with_empty_message_persists_nothing() {
    let store = MemoryStore::default();
    let err = create_post(&store, Some(&actor("alice")), String::new())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(store.posts.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn unauthenticated_is_checked_before_existence() {
    let store = MemoryStore::default();
    let err = destroy_post(&store, None, "SPACEDUCK").await.unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
  }

  #[tokio::test]
  async fn not_found_takes_precedence_over_forbidden() {
    let alice = actor("alice");
    let (store, _) = seeded(&alice, "mine").await;
    let missing = Uuid::new_v4().to_string();
    let err = update_post(&store, Some(&actor("mallory")), &missing, "x".into())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::PostNotFound(_)));
  }

  #[tokio::test]
  async fn forbidden_takes_precedence_over_validation() {
    let alice = actor("alice");
    let (store, post) = seeded(&alice, "mine").await;
    let id = post.post_id.to_string();
    let err = update_post(&store, Some(&actor("mallory")), &id, String::new())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Forbidden));
  }

  #[tokio::test]
  async fn update_by_owner_with_blank_message_leaves_post_unchanged() {
    let alice = actor("alice");
    let (store, post) = seeded(&alice, "Initial Value").await;
    let id = post.post_id.to_string();
    let err = update_post(&store, Some(&alice), &id, String::new())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    let reloaded = store.get_post(post.post_id).await.unwrap().unwrap();
    assert_eq!(reloaded.message, "Initial Value");
  }

  #[tokio::test]
  async fn edit_form_carries_current_message() {
    let alice = actor("alice");
    let (store, post) = seeded(&alice, "Initial Value").await;
    let form = edit_post_form(&store, Some(&alice), &post.post_id.to_string())
      .await
      .unwrap();
    assert_eq!(form.message, "Initial Value");
  }

  #[tokio::test]
  async fn destroy_removes_comments() {
    let alice = actor("alice");
    let (store, post) = seeded(&alice, "mine").await;
    let id = post.post_id.to_string();
    create_comment(&store, Some(&actor("bob")), &id, "nice".into())
      .await
      .unwrap();
    destroy_post(&store, Some(&alice), &id).await.unwrap();
    assert!(store.get_post(post.post_id).await.unwrap().is_none());
    assert!(store.comments.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn comment_on_unparseable_id_is_not_found() {
    let store = MemoryStore::default();
    let err = create_comment(&store, Some(&actor("bob")), "YOLOSWAG", "awesome gram".into())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::PostNotFound(id) if id == "YOLOSWAG"));
  }

  #[tokio::test]
  async fn show_lists_comments_in_creation_order() {
    let alice = actor("alice");
    let (store, post) = seeded(&alice, "mine").await;
    let id = post.post_id.to_string();
    for message in ["first", "second"] {
      create_comment(&store, Some(&alice), &id, message.into()).await.unwrap();
    }
    let view = show_post(&store, &id).await.unwrap();
    let messages: Vec<_> = view.comments.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, ["first", "second"]);
  }

  #[test]
  fn new_form_requires_actor() {
    assert!(matches!(new_post_form(None), Err(Error::Unauthenticated)));
    assert_eq!(new_post_form(Some(&actor("alice"))).unwrap(), PostForm::default());
  }
}
