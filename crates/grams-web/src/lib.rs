//! HTTP layer for grams.
//!
//! Exposes an axum [`Router`] for posts, comments, and accounts, backed by any
//! [`GramStore`]. Every endpoint is a typed handler that resolves the current
//! actor and delegates to [`grams_core::actions`].

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use grams_core::store::{DEFAULT_PAGE_SIZE, GramStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{comments, posts, users};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GRAMS_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  /// Upper bound on `?limit` for the post index.
  pub max_page_size: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          3000,
      store_path:    PathBuf::from("grams.db"),
      max_page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: GramStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the grams server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GramStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/",                    get(posts::index::<S>))
    .route("/posts",               get(posts::index::<S>).post(posts::create::<S>))
    .route("/posts/new",           get(posts::new))
    .route(
      "/posts/{id}",
      get(posts::show::<S>)
        .patch(posts::update::<S>)
        .put(posts::update::<S>)
        .delete(posts::destroy::<S>),
    )
    .route("/posts/{id}/edit",     get(posts::edit::<S>))
    .route("/posts/{id}/comments", post(comments::create::<S>))
    .route("/users",               post(users::register::<S>))
    .route("/users/sign_in",       get(users::sign_in))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
