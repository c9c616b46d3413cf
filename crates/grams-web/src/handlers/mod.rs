pub mod comments;
pub mod posts;
pub mod users;

use axum::response::Redirect;

/// Where successful state changes send the client.
pub(super) const ROOT_PATH: &str = "/";

pub(super) fn redirect_to_root() -> Redirect { Redirect::to(ROOT_PATH) }
