//! Repository for the `proposals` table.

use brieflink_core::status::{BriefStatus, ProposalStatus, StatusId};
use brieflink_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::proposal::{CreateProposal, Proposal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, brief_id, manufacturer_profile_id, price, currency, \
    delivery_timeline, target_delivery_date, details, attachments, status_id, \
    counter_offer_history, submitted_at, deleted_at, updated_at";

/// Partial unique index allowing one non-withdrawn proposal per pair.
pub const ACTIVE_PAIR_INDEX: &str = "uq_proposals_active_pair";

/// Partial unique index allowing one accepted proposal per brief.
pub const ONE_ACCEPTED_INDEX: &str = "uq_proposals_one_accepted";

fn status_ids(statuses: &[ProposalStatus]) -> Vec<StatusId> {
    statuses.iter().map(|s| s.id()).collect()
}

/// Provides persistence operations for proposals.
pub struct ProposalRepo;

impl ProposalRepo {
    /// Insert a proposal in `SUBMITTED`, but only while its brief is open.
    ///
    /// Returns `None` when the brief is not (or no longer) `OPEN`. A second
    /// active proposal for the same pair fails with a unique violation on
    /// [`ACTIVE_PAIR_INDEX`].
    pub async fn create_guarded(
        pool: &PgPool,
        input: &CreateProposal,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let t = &input.terms;
        let query = format!(
            "INSERT INTO proposals
                (brief_id, manufacturer_profile_id, price, currency, delivery_timeline,
                 target_delivery_date, details, attachments, status_id)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9
             WHERE EXISTS (
                 SELECT 1 FROM briefs
                 WHERE id = $1 AND status_id = $10 AND deleted_at IS NULL
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(input.brief_id)
            .bind(input.manufacturer_profile_id)
            .bind(t.price)
            .bind(&t.currency)
            .bind(&t.delivery_timeline)
            .bind(t.target_delivery_date)
            .bind(Json(&t.details))
            .bind(Json(&t.attachments))
            .bind(ProposalStatus::Submitted.id())
            .bind(BriefStatus::Open.id())
            .fetch_optional(pool)
            .await
    }

    /// Find a proposal by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM proposals WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The non-withdrawn proposal for a (brief, manufacturer) pair, if any.
    pub async fn find_active_for_pair(
        pool: &PgPool,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE brief_id = $1 AND manufacturer_profile_id = $2
               AND status_id <> $3 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(brief_id)
            .bind(manufacturer_profile_id)
            .bind(ProposalStatus::Withdrawn.id())
            .fetch_optional(pool)
            .await
    }

    /// All proposals on a brief, newest first.
    pub async fn list_for_brief(
        pool: &PgPool,
        brief_id: DbId,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE brief_id = $1 AND deleted_at IS NULL
             ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(brief_id)
            .fetch_all(pool)
            .await
    }

    /// All proposals submitted by a manufacturer, newest first.
    pub async fn list_for_manufacturer(
        pool: &PgPool,
        manufacturer_profile_id: DbId,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE manufacturer_profile_id = $1 AND deleted_at IS NULL
             ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(manufacturer_profile_id)
            .fetch_all(pool)
            .await
    }

    /// Move a proposal to `to` only if its current status is `from`.
    ///
    /// Returns `None` when another writer got there first.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET status_id = $3
             WHERE id = $1 AND status_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(from.id())
            .bind(to.id())
            .fetch_optional(pool)
            .await
    }

    /// Accept a proposal still in `from`, but only while its brief is `OPEN`
    /// or `MATCHED` and no sibling is already accepted.
    ///
    /// Returns `None` when any of those predicates fails. Two acceptances
    /// racing past the sibling check collide on [`ONE_ACCEPTED_INDEX`].
    pub async fn accept_guarded(
        pool: &PgPool,
        id: DbId,
        from: ProposalStatus,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET status_id = $3
             WHERE id = $1 AND status_id = $2 AND deleted_at IS NULL
               AND EXISTS (
                   SELECT 1 FROM briefs b
                   WHERE b.id = proposals.brief_id AND b.status_id = ANY($4)
                     AND b.deleted_at IS NULL
               )
               AND NOT EXISTS (
                   SELECT 1 FROM proposals s
                   WHERE s.brief_id = proposals.brief_id AND s.status_id = $3
                     AND s.deleted_at IS NULL
               )
             RETURNING {COLUMNS}"
        );
        let brief_statuses = vec![BriefStatus::Open.id(), BriefStatus::Matched.id()];
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(from.id())
            .bind(ProposalStatus::Accepted.id())
            .bind(brief_statuses)
            .fetch_optional(pool)
            .await
    }

    /// Proposals on a brief still in one of `statuses`, optionally skipping one.
    pub async fn list_in_status_for_brief(
        pool: &PgPool,
        brief_id: DbId,
        statuses: &[ProposalStatus],
        except: Option<DbId>,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE brief_id = $1 AND status_id = ANY($2) AND deleted_at IS NULL
               AND ($3::BIGINT IS NULL OR id <> $3)
             ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(brief_id)
            .bind(status_ids(statuses))
            .bind(except)
            .fetch_all(pool)
            .await
    }

    /// Reject every pending proposal on a brief except `keep`, returning the
    /// rows that changed.
    pub async fn reject_pending_except(
        pool: &PgPool,
        brief_id: DbId,
        keep: DbId,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET status_id = $3
             WHERE brief_id = $1 AND id <> $2 AND status_id = ANY($4) AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(brief_id)
            .bind(keep)
            .bind(ProposalStatus::Rejected.id())
            .bind(status_ids(&[ProposalStatus::Submitted, ProposalStatus::UnderReview]))
            .fetch_all(pool)
            .await
    }
}
