use axum::routing::get;
use axum::Router;

use crate::handlers::matching;
use crate::state::AppState;

/// Routes mounted at `/manufacturers`.
pub fn router() -> Router<AppState> {
    Router::new().route("/me/recommendations", get(matching::for_manufacturer))
}
