use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::proposal;
use crate::state::AppState;

/// Routes mounted at `/proposals`.
///
/// ```text
/// GET    /mine            -> list_mine
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}/status     -> update_status
/// POST   /{id}/withdraw   -> withdraw
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(proposal::list_mine))
        .route("/{id}", get(proposal::get_by_id))
        .route("/{id}/status", patch(proposal::update_status))
        .route("/{id}/withdraw", post(proposal::withdraw))
}
