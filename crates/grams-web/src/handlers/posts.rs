//! Handlers for `/posts` endpoints.
//!
//! | Method | Path | Auth | Notes |
//! |--------|------|------|-------|
//! | `GET`    | `/`, `/posts` | no | Newest first; optional `?limit` (capped at `max_page_size`), `?offset` |
//! | `GET`    | `/posts/new` | yes | Empty form |
//! | `POST`   | `/posts` | yes | Form: `message`; 422 if blank |
//! | `GET`    | `/posts/{id}` | no | Post and its comments; 404 if unknown |
//! | `GET`    | `/posts/{id}/edit` | owner | Form with the current message |
//! | `PATCH`  | `/posts/{id}` | owner | Form: `message`; 422 if blank |
//! | `DELETE` | `/posts/{id}` | owner | Also removes the post's comments |
//!
//! Unauthenticated requests to the authenticated endpoints are redirected to
//! the sign-in page; non-owners receive 403.

use axum::{
  Form, Json,
  extract::{Path, Query, State},
  response::Redirect,
};
use grams_core::{
  actions,
  post::{Post, PostForm, PostView},
  store::{GramStore, PostQuery},
};
use serde::Deserialize;

use crate::{
  AppState, auth::CurrentActor, error::Error, handlers::redirect_to_root,
};

// ─── Index ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /posts[?limit=...][&offset=...]`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Post>>, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  let max = state.config.max_page_size;
  let query = PostQuery {
    limit:  Some(params.limit.map_or(max, |l| l.min(max))),
    offset: params.offset,
  };
  let posts = actions::list_posts(state.store.as_ref(), query).await?;
  Ok(Json(posts))
}

// ─── Show ─────────────────────────────────────────────────────────────────────

/// `GET /posts/{id}`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<PostView>, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  let view = actions::show_post(state.store.as_ref(), &id).await?;
  Ok(Json(view))
}

// ─── New / Create ─────────────────────────────────────────────────────────────

/// Form body accepted by `POST /posts` and `PATCH /posts/{id}`.
#[derive(Debug, Deserialize)]
pub struct PostParams {
  #[serde(default)]
  pub message: String,
}

/// `GET /posts/new`
pub async fn new(actor: CurrentActor) -> Result<Json<PostForm>, Error> {
  Ok(Json(actions::new_post_form(actor.actor())?))
}

/// `POST /posts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  actor: CurrentActor,
  Form(params): Form<PostParams>,
) -> Result<Redirect, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  let post =
    actions::create_post(state.store.as_ref(), actor.actor(), params.message)
      .await?;
  tracing::info!(post_id = %post.post_id, owner_id = %post.owner_id, "post created");
  Ok(redirect_to_root())
}

// ─── Edit / Update ────────────────────────────────────────────────────────────

/// `GET /posts/{id}/edit`
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  actor: CurrentActor,
  Path(id): Path<String>,
) -> Result<Json<PostForm>, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  let form =
    actions::edit_post_form(state.store.as_ref(), actor.actor(), &id).await?;
  Ok(Json(form))
}

/// `PATCH /posts/{id}` (and `PUT`)
pub async fn update<S>(
  State(state): State<AppState<S>>,
  actor: CurrentActor,
  Path(id): Path<String>,
  Form(params): Form<PostParams>,
) -> Result<Redirect, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  let post = actions::update_post(
    state.store.as_ref(),
    actor.actor(),
    &id,
    params.message,
  )
  .await?;
  tracing::info!(post_id = %post.post_id, "post updated");
  Ok(redirect_to_root())
}

// ─── Destroy ──────────────────────────────────────────────────────────────────

/// `DELETE /posts/{id}`
pub async fn destroy<S>(
  State(state): State<AppState<S>>,
  actor: CurrentActor,
  Path(id): Path<String>,
) -> Result<Redirect, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  actions::destroy_post(state.store.as_ref(), actor.actor(), &id).await?;
  tracing::info!(post_id = %id, "post destroyed");
  Ok(redirect_to_root())
}
