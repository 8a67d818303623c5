pub mod brief;
pub mod health;
pub mod manufacturer;
pub mod notification;
pub mod proposal;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /briefs                                  list, create (brand)
/// /briefs/{id}                             get, update, delete
/// /briefs/{id}/publish                     DRAFT -> OPEN (POST)
/// /briefs/{id}/cancel                      -> CANCELLED (POST)
/// /briefs/{id}/complete                    IN_PROGRESS -> COMPLETED (POST)
/// /briefs/{id}/proposals                   list (brand), submit (manufacturer)
/// /briefs/{id}/recommendations             matching manufacturers (brand)
/// /briefs/{id}/execution-log               list, append (engaged parties)
///
/// /proposals/mine                          caller's proposals (manufacturer)
/// /proposals/{id}                          get
/// /proposals/{id}/status                   accept / reject / review (PATCH, brand)
/// /proposals/{id}/withdraw                 withdraw (POST, manufacturer)
///
/// /manufacturers/me/recommendations        matching open briefs (manufacturer)
///
/// /notifications                           inbox
/// /notifications/unread-count              unread count
/// /notifications/{id}/read                 mark one read (POST)
/// /notifications/read-all                  mark all read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/briefs", brief::router())
        .nest("/proposals", proposal::router())
        .nest("/manufacturers", manufacturer::router())
        .nest("/notifications", notification::router())
}
