//! Read-only recommendations in both directions.

use std::sync::Arc;

use brieflink_core::error::CoreError;
use brieflink_core::matching::{
    capabilities_cover, category_reason, manufacturer_score, normalize_category,
    CATEGORY_MATCH_SCORE,
};
use brieflink_core::status::BriefStatus;
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;

use crate::store::{ProfileDirectory, RecordStore};
use crate::views::{ManufacturerSnapshot, Recommendation};

#[derive(Clone)]
pub struct MatchingEngine {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn ProfileDirectory>,
    window: i64,
}

impl MatchingEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn ProfileDirectory>,
        window: i64,
    ) -> Self {
        Self {
            store,
            directory,
            window,
        }
    }

    /// Verified manufacturers for a published brief, ordered by manufacturer ID.
    ///
    /// Draft briefs are refused. With a category on the brief only manufacturers covering it are
    /// returned, each scoring 100. Without one every verified manufacturer
    /// scores the baseline 50.
    pub async fn recommend_manufacturers_for(
        &self,
        brief_id: DbId,
    ) -> Result<Vec<Recommendation<ManufacturerSnapshot>>, CoreError> {
        let brief = self
            .store
            .find_brief(brief_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Brief",
                id: brief_id,
            })?;
        if brief.status == BriefStatus::Draft {
            return Err(CoreError::BadRequest(
                "Brief must be published before it can be matched".into(),
            ));
        }

        let category = normalize_category(&brief.category).map(|_| brief.category.trim());
        let (score, reason) = manufacturer_score(category);
        let manufacturers = self.directory.verified_manufacturers(category).await?;

        Ok(manufacturers
            .iter()
            .filter(|m| m.verification().is_verified())
            .map(|m| Recommendation {
                candidate: ManufacturerSnapshot::from(m),
                score,
                reason: reason.clone(),
            })
            .collect())
    }

    /// Open briefs in the manufacturer's capability categories, newest first.
    ///
    /// Only the most recent `window` open briefs are considered.
    pub async fn recommend_briefs_for(
        &self,
        manufacturer_id: DbId,
    ) -> Result<Vec<Recommendation<Brief>>, CoreError> {
        let capabilities = self.directory.capabilities(manufacturer_id).await?;
        if capabilities.is_empty() {
            return Ok(Vec::new());
        }

        let recent = self.store.list_open_briefs(self.window).await?;
        Ok(recent
            .into_iter()
            .filter(|b| capabilities_cover(&capabilities, &b.category))
            .map(|b| Recommendation {
                reason: category_reason(&b.category),
                score: CATEGORY_MATCH_SCORE,
                candidate: b,
            })
            .collect())
    }
}
