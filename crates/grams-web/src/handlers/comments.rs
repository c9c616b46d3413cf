//! `POST /posts/{id}/comments` — any signed-in user may comment on any post.

use axum::{
  Form,
  extract::{Path, State},
  response::Redirect,
};
use grams_core::{actions, store::GramStore};
use serde::Deserialize;

use crate::{
  AppState, auth::CurrentActor, error::Error, handlers::redirect_to_root,
};

#[derive(Debug, Deserialize)]
pub struct CommentParams {
  #[serde(default)]
  pub message: String,
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  actor: CurrentActor,
  Path(post_id): Path<String>,
  Form(params): Form<CommentParams>,
) -> Result<Redirect, Error>
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  let comment = actions::create_comment(
    state.store.as_ref(),
    actor.actor(),
    &post_id,
    params.message,
  )
  .await?;
  tracing::info!(
    comment_id = %comment.comment_id,
    post_id = %comment.post_id,
    "comment created"
  );
  Ok(redirect_to_root())
}
