//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /notifications`.
///
/// Limits are clamped by the notification service, not here.
#[derive(Debug, Deserialize)]
pub struct InboxParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
