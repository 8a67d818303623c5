//! Route definitions for the `/briefs` resource and its sub-resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{brief, execution_log, matching, proposal};
use crate::state::AppState;

/// Routes mounted at `/briefs`.
///
/// ```text
/// GET, POST           /                      -> list, create
/// GET, PUT, DELETE    /{id}                  -> get_by_id, update, delete
/// POST                /{id}/publish          -> publish
/// POST                /{id}/cancel           -> cancel
/// POST                /{id}/complete         -> complete
/// GET, POST           /{id}/proposals        -> proposal::list_for_brief, proposal::create
/// GET                 /{id}/recommendations  -> matching::for_brief
/// GET, POST           /{id}/execution-log    -> execution_log::list, execution_log::append
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(brief::list).post(brief::create))
        .route(
            "/{id}",
            get(brief::get_by_id)
                .put(brief::update)
                .delete(brief::delete),
        )
        .route("/{id}/publish", post(brief::publish))
        .route("/{id}/cancel", post(brief::cancel))
        .route("/{id}/complete", post(brief::complete))
        .route(
            "/{id}/proposals",
            get(proposal::list_for_brief).post(proposal::create),
        )
        .route("/{id}/recommendations", get(matching::for_brief))
        .route(
            "/{id}/execution-log",
            get(execution_log::list).post(execution_log::append),
        )
}
