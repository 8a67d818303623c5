//! Read-only queries over the onboarding-owned profile tables.

use brieflink_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{BrandProfile, CapabilityRow, ManufacturerProfile};

const BRAND_COLUMNS: &str = "id, actor_id, company_name";
const MANUFACTURER_COLUMNS: &str = "id, actor_id, company_name, logo_url, verification_status";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn brand_by_actor(
        pool: &PgPool,
        actor_id: DbId,
    ) -> Result<Option<BrandProfile>, sqlx::Error> {
        let query = format!("SELECT {BRAND_COLUMNS} FROM brand_profiles WHERE actor_id = $1");
        sqlx::query_as::<_, BrandProfile>(&query)
            .bind(actor_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn brand_by_id(pool: &PgPool, id: DbId) -> Result<Option<BrandProfile>, sqlx::Error> {
        let query = format!("SELECT {BRAND_COLUMNS} FROM brand_profiles WHERE id = $1");
        sqlx::query_as::<_, BrandProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn manufacturer_by_actor(
        pool: &PgPool,
        actor_id: DbId,
    ) -> Result<Option<ManufacturerProfile>, sqlx::Error> {
        let query =
            format!("SELECT {MANUFACTURER_COLUMNS} FROM manufacturer_profiles WHERE actor_id = $1");
        sqlx::query_as::<_, ManufacturerProfile>(&query)
            .bind(actor_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn manufacturer_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ManufacturerProfile>, sqlx::Error> {
        let query =
            format!("SELECT {MANUFACTURER_COLUMNS} FROM manufacturer_profiles WHERE id = $1");
        sqlx::query_as::<_, ManufacturerProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Manufacturers by ID, ordered by ID. Missing IDs are skipped.
    pub async fn manufacturers_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ManufacturerProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {MANUFACTURER_COLUMNS} FROM manufacturer_profiles
             WHERE id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, ManufacturerProfile>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn capabilities(
        pool: &PgPool,
        manufacturer_profile_id: DbId,
    ) -> Result<Vec<CapabilityRow>, sqlx::Error> {
        sqlx::query_as::<_, CapabilityRow>(
            "SELECT manufacturer_profile_id, category, subcategories \
             FROM manufacturer_capabilities WHERE manufacturer_profile_id = $1 ORDER BY id",
        )
        .bind(manufacturer_profile_id)
        .fetch_all(pool)
        .await
    }

    /// Verified manufacturers ordered by ID, optionally restricted to those
    /// with a capability in `category` (trimmed, case-insensitive).
    pub async fn list_verified_manufacturers(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<ManufacturerProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {MANUFACTURER_COLUMNS} FROM manufacturer_profiles m \
             WHERE m.verification_status = 'verified' \
               AND ($1::TEXT IS NULL OR EXISTS ( \
                   SELECT 1 FROM manufacturer_capabilities c \
                   WHERE c.manufacturer_profile_id = m.id \
                     AND lower(btrim(c.category)) = lower(btrim($1)))) \
             ORDER BY m.id"
        );
        sqlx::query_as::<_, ManufacturerProfile>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }
}
