//! In-memory [`RecordStore`] and [`ProfileDirectory`].
//!
//! Used by the test suites and for running the API without a database.
//! Each store keeps all state behind one mutex, so every method is atomic
//! with respect to the others, mirroring the conditional writes of the
//! Postgres implementation. Individual operations can be made to fail with
//! [`InMemoryStore::fail_on`].

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use brieflink_core::brief::{BriefSort, SortDirection};
use brieflink_core::matching::{categories_match, Capability, VerificationStatus};
use brieflink_core::status::{BriefStatus, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::{Brief, BriefQuery, CreateBrief, UpdateBrief};
use brieflink_db::models::engagement_match::{EngagementMatch, UpsertMatch};
use brieflink_db::models::execution_log::{CreateLogEntry, ExecutionLogEntry};
use brieflink_db::models::notification::{CreateNotification, Notification};
use brieflink_db::models::profile::{BrandProfile, ManufacturerProfile};
use brieflink_db::models::proposal::{CreateProposal, Proposal};
use chrono::Utc;
use sqlx::types::Json;

use crate::store::{ProfileDirectory, ProposalInsert, RecordStore, StoreError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// InMemoryStore
// ---------------------------------------------------------------------------

/// Store operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    InsertBrief,
    TransitionBrief,
    InsertProposal,
    TransitionProposal,
    RejectPendingProposals,
    UpsertMatch,
    AppendLogEntry,
    InsertNotification,
}

#[derive(Default)]
struct Tables {
    next_id: DbId,
    briefs: Vec<Brief>,
    proposals: Vec<Proposal>,
    matches: Vec<EngagementMatch>,
    log_entries: Vec<ExecutionLogEntry>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn brief_mut(&mut self, id: DbId) -> Option<&mut Brief> {
        self.briefs
            .iter_mut()
            .find(|b| b.id == id && b.deleted_at.is_none())
    }

    fn proposal_mut(&mut self, id: DbId) -> Option<&mut Proposal> {
        self.proposals
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<StoreOp>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call of `op` fail with [`StoreError::Unavailable`].
    pub fn fail_on(&self, op: StoreOp) {
        lock(&self.failing).insert(op);
    }

    pub fn heal(&self, op: StoreOp) {
        lock(&self.failing).remove(&op);
    }

    fn check(&self, op: StoreOp) -> Result<(), StoreError> {
        if lock(&self.failing).contains(&op) {
            Err(StoreError::Unavailable(format!("{op:?} disabled")))
        } else {
            Ok(())
        }
    }

    /// Every match row, for assertions.
    pub fn matches(&self) -> Vec<EngagementMatch> {
        lock(&self.tables).matches.clone()
    }

    /// Every notification row, for assertions.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.tables).notifications.clone()
    }
}

fn sort_briefs(items: &mut [Brief], sort: BriefSort, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ord = match sort {
            BriefSort::CreatedAt => a.created_at.cmp(&b.created_at),
            BriefSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            BriefSort::Title => a.title.cmp(&b.title),
        }
        .then(a.id.cmp(&b.id));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn newest_first(items: &mut [Proposal]) {
    items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_brief(&self, input: CreateBrief) -> Result<Brief, StoreError> {
        self.check(StoreOp::InsertBrief)?;
        let mut t = lock(&self.tables);
        let now = Utc::now();
        let f = input.fields;
        let brief = Brief {
            id: t.next_id(),
            brand_profile_id: input.brand_profile_id,
            title: f.title,
            description: f.description,
            requirements: Json(f.requirements),
            budget_min: f.budget.min,
            budget_max: f.budget.max,
            currency: f.currency,
            category: f.category,
            timeline: f.timeline,
            status: BriefStatus::Draft,
            ai_generated: f.ai_generated,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        t.briefs.push(brief.clone());
        Ok(brief)
    }

    async fn find_brief(&self, id: DbId) -> Result<Option<Brief>, StoreError> {
        Ok(lock(&self.tables).brief_mut(id).map(|b| b.clone()))
    }

    async fn update_brief(
        &self,
        id: DbId,
        input: &UpdateBrief,
        allowed: &[BriefStatus],
    ) -> Result<Option<Brief>, StoreError> {
        let mut t = lock(&self.tables);
        let Some(brief) = t.brief_mut(id).filter(|b| allowed.contains(&b.status)) else {
            return Ok(None);
        };
        if let Some(v) = &input.title {
            brief.title = v.clone();
        }
        if let Some(v) = &input.description {
            brief.description = v.clone();
        }
        if let Some(v) = &input.requirements {
            brief.requirements = Json(v.clone());
        }
        if let Some(v) = input.budget {
            brief.budget_min = v.min;
            brief.budget_max = v.max;
        }
        if let Some(v) = &input.currency {
            brief.currency = v.clone();
        }
        if let Some(v) = &input.category {
            brief.category = v.clone();
        }
        if let Some(v) = &input.timeline {
            brief.timeline = v.clone();
        }
        brief.updated_at = Utc::now();
        Ok(Some(brief.clone()))
    }

    async fn transition_brief(
        &self,
        id: DbId,
        from: &[BriefStatus],
        to: BriefStatus,
    ) -> Result<Option<Brief>, StoreError> {
        self.check(StoreOp::TransitionBrief)?;
        let mut t = lock(&self.tables);
        Ok(t.brief_mut(id)
            .filter(|b| from.contains(&b.status))
            .map(|b| {
                b.status = to;
                b.updated_at = Utc::now();
                b.clone()
            }))
    }

    async fn soft_delete_brief(&self, id: DbId) -> Result<bool, StoreError> {
        let mut t = lock(&self.tables);
        Ok(t.brief_mut(id)
            .map(|b| b.deleted_at = Some(Utc::now()))
            .is_some())
    }

    async fn list_briefs_by_owner(
        &self,
        q: &BriefQuery,
    ) -> Result<(Vec<Brief>, i64), StoreError> {
        let t = lock(&self.tables);
        let mut items: Vec<Brief> = t
            .briefs
            .iter()
            .filter(|b| b.brand_profile_id == q.brand_profile_id && b.deleted_at.is_none())
            .filter(|b| q.status.map_or(true, |s| b.status == s))
            .filter(|b| {
                q.category
                    .as_deref()
                    .map_or(true, |c| categories_match(&b.category, c))
            })
            .cloned()
            .collect();
        let total = items.len() as i64;
        sort_briefs(&mut items, q.sort, q.direction);
        let page = items
            .into_iter()
            .skip(q.offset as usize)
            .take(q.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_open_briefs(&self, limit: i64) -> Result<Vec<Brief>, StoreError> {
        let t = lock(&self.tables);
        let mut items: Vec<Brief> = t
            .briefs
            .iter()
            .filter(|b| b.status == BriefStatus::Open && b.deleted_at.is_none())
            .cloned()
            .collect();
        sort_briefs(&mut items, BriefSort::CreatedAt, SortDirection::Desc);
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn find_briefs(&self, ids: &[DbId]) -> Result<Vec<Brief>, StoreError> {
        let t = lock(&self.tables);
        Ok(t.briefs
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn insert_proposal(&self, input: CreateProposal) -> Result<ProposalInsert, StoreError> {
        self.check(StoreOp::InsertProposal)?;
        let mut t = lock(&self.tables);
        let open = t
            .brief_mut(input.brief_id)
            .is_some_and(|b| b.status == BriefStatus::Open);
        if !open {
            return Ok(ProposalInsert::BriefNotOpen);
        }
        let duplicate = t.proposals.iter().any(|p| {
            p.brief_id == input.brief_id
                && p.manufacturer_profile_id == input.manufacturer_profile_id
                && p.status.is_active()
                && p.deleted_at.is_none()
        });
        if duplicate {
            return Ok(ProposalInsert::Duplicate);
        }
        let now = Utc::now();
        let terms = input.terms;
        let proposal = Proposal {
            id: t.next_id(),
            brief_id: input.brief_id,
            manufacturer_profile_id: input.manufacturer_profile_id,
            price: terms.price,
            currency: terms.currency,
            delivery_timeline: terms.delivery_timeline,
            target_delivery_date: terms.target_delivery_date,
            details: Json(terms.details),
            attachments: Json(terms.attachments),
            status: ProposalStatus::Submitted,
            counter_offer_history: Json(Vec::new()),
            submitted_at: now,
            deleted_at: None,
            updated_at: now,
        };
        t.proposals.push(proposal.clone());
        Ok(ProposalInsert::Inserted(proposal))
    }

    async fn find_proposal(&self, id: DbId) -> Result<Option<Proposal>, StoreError> {
        Ok(lock(&self.tables).proposal_mut(id).map(|p| p.clone()))
    }

    async fn find_active_proposal(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<Proposal>, StoreError> {
        let t = lock(&self.tables);
        Ok(t.proposals
            .iter()
            .find(|p| {
                p.brief_id == brief_id
                    && p.manufacturer_profile_id == manufacturer_profile_id
                    && p.status.is_active()
                    && p.deleted_at.is_none()
            })
            .cloned())
    }

    async fn list_proposals_for_brief(&self, brief_id: DbId) -> Result<Vec<Proposal>, StoreError> {
        let t = lock(&self.tables);
        let mut items: Vec<Proposal> = t
            .proposals
            .iter()
            .filter(|p| p.brief_id == brief_id && p.deleted_at.is_none())
            .cloned()
            .collect();
        newest_first(&mut items);
        Ok(items)
    }

    async fn list_proposals_for_manufacturer(
        &self,
        manufacturer_profile_id: DbId,
    ) -> Result<Vec<Proposal>, StoreError> {
        let t = lock(&self.tables);
        let mut items: Vec<Proposal> = t
            .proposals
            .iter()
            .filter(|p| {
                p.manufacturer_profile_id == manufacturer_profile_id && p.deleted_at.is_none()
            })
            .cloned()
            .collect();
        newest_first(&mut items);
        Ok(items)
    }

    async fn list_proposals_in_status(
        &self,
        brief_id: DbId,
        statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError> {
        let t = lock(&self.tables);
        let mut items: Vec<Proposal> = t
            .proposals
            .iter()
            .filter(|p| {
                p.brief_id == brief_id && statuses.contains(&p.status) && p.deleted_at.is_none()
            })
            .cloned()
            .collect();
        newest_first(&mut items);
        Ok(items)
    }

    async fn transition_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError> {
        self.check(StoreOp::TransitionProposal)?;
        let mut t = lock(&self.tables);
        Ok(t.proposal_mut(id)
            .filter(|p| p.status == from)
            .map(|p| {
                p.status = to;
                p.updated_at = Utc::now();
                p.clone()
            }))
    }

    async fn accept_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError> {
        self.check(StoreOp::TransitionProposal)?;
        let mut t = lock(&self.tables);
        let Some(brief_id) = t.proposal_mut(id).map(|p| p.brief_id) else {
            return Ok(None);
        };
        let brief_open = t
            .brief_mut(brief_id)
            .is_some_and(|b| b.status.allows_acceptance());
        let sibling_accepted = t.proposals.iter().any(|p| {
            p.brief_id == brief_id
                && p.status == ProposalStatus::Accepted
                && p.deleted_at.is_none()
        });
        if !brief_open || sibling_accepted {
            return Ok(None);
        }
        Ok(t.proposal_mut(id)
            .filter(|p| p.status == from)
            .map(|p| {
                p.status = ProposalStatus::Accepted;
                p.updated_at = Utc::now();
                p.clone()
            }))
    }

    async fn reject_pending_proposals(
        &self,
        brief_id: DbId,
        keep: DbId,
    ) -> Result<Vec<Proposal>, StoreError> {
        self.check(StoreOp::RejectPendingProposals)?;
        let mut t = lock(&self.tables);
        let now = Utc::now();
        let mut changed = Vec::new();
        for p in t.proposals.iter_mut().filter(|p| {
            p.brief_id == brief_id
                && p.id != keep
                && p.status.is_pending()
                && p.deleted_at.is_none()
        }) {
            p.status = ProposalStatus::Rejected;
            p.updated_at = now;
            changed.push(p.clone());
        }
        Ok(changed)
    }

    async fn upsert_match(&self, input: UpsertMatch) -> Result<EngagementMatch, StoreError> {
        self.check(StoreOp::UpsertMatch)?;
        let mut t = lock(&self.tables);
        let now = Utc::now();
        if let Some(existing) = t.matches.iter_mut().find(|m| {
            m.brief_id == input.brief_id
                && m.manufacturer_profile_id == input.manufacturer_profile_id
        }) {
            existing.match_type = input.match_type.as_str().to_string();
            existing.score = input.score;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let row = EngagementMatch {
            id: t.next_id(),
            brief_id: input.brief_id,
            manufacturer_profile_id: input.manufacturer_profile_id,
            match_type: input.match_type.as_str().to_string(),
            score: input.score,
            created_at: now,
            updated_at: now,
        };
        t.matches.push(row.clone());
        Ok(row)
    }

    async fn find_match(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<EngagementMatch>, StoreError> {
        let t = lock(&self.tables);
        Ok(t.matches
            .iter()
            .find(|m| {
                m.brief_id == brief_id && m.manufacturer_profile_id == manufacturer_profile_id
            })
            .cloned())
    }

    async fn append_log_entry(
        &self,
        input: CreateLogEntry,
    ) -> Result<ExecutionLogEntry, StoreError> {
        self.check(StoreOp::AppendLogEntry)?;
        let mut t = lock(&self.tables);
        let entry = ExecutionLogEntry {
            id: t.next_id(),
            brief_id: input.brief_id,
            author_actor_id: input.author_actor_id,
            entry_type: input.entry_type.as_str().to_string(),
            content: input.content,
            created_at: Utc::now(),
        };
        t.log_entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_log_entries(&self, brief_id: DbId) -> Result<Vec<ExecutionLogEntry>, StoreError> {
        let t = lock(&self.tables);
        Ok(t.log_entries
            .iter()
            .filter(|e| e.brief_id == brief_id)
            .cloned()
            .collect())
    }

    async fn insert_notification(
        &self,
        input: CreateNotification,
    ) -> Result<Notification, StoreError> {
        self.check(StoreOp::InsertNotification)?;
        let mut t = lock(&self.tables);
        let row = Notification {
            id: t.next_id(),
            recipient_actor_id: input.recipient_actor_id,
            notification_type: input.notification_type.as_str().to_string(),
            title: input.title,
            message: input.message,
            data: input.data,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        t.notifications.push(row.clone());
        Ok(row)
    }

    async fn list_notifications(
        &self,
        recipient_actor_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let t = lock(&self.tables);
        let mut items: Vec<Notification> = t
            .notifications
            .iter()
            .filter(|n| n.recipient_actor_id == recipient_actor_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn mark_notification_read(
        &self,
        recipient_actor_id: DbId,
        id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        let mut t = lock(&self.tables);
        Ok(t.notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_actor_id == recipient_actor_id)
            .map(|n| {
                n.is_read = true;
                n.read_at.get_or_insert_with(Utc::now);
                n.clone()
            }))
    }

    async fn mark_all_notifications_read(
        &self,
        recipient_actor_id: DbId,
    ) -> Result<u64, StoreError> {
        let mut t = lock(&self.tables);
        let now = Utc::now();
        let mut count = 0;
        for n in t
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_actor_id == recipient_actor_id && !n.is_read)
        {
            n.is_read = true;
            n.read_at = Some(now);
            count += 1;
        }
        Ok(count)
    }

    async fn unread_notification_count(&self, recipient_actor_id: DbId) -> Result<i64, StoreError> {
        let t = lock(&self.tables);
        Ok(t.notifications
            .iter()
            .filter(|n| n.recipient_actor_id == recipient_actor_id && !n.is_read)
            .count() as i64)
    }
}

// ---------------------------------------------------------------------------
// InMemoryDirectory
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Profiles {
    next_id: DbId,
    brands: Vec<BrandProfile>,
    manufacturers: Vec<ManufacturerProfile>,
    capabilities: HashMap<DbId, Vec<Capability>>,
}

/// Directory populated by hand, standing in for onboarding.
#[derive(Default)]
pub struct InMemoryDirectory {
    profiles: Mutex<Profiles>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_brand(&self, actor_id: DbId, company_name: &str) -> BrandProfile {
        let mut p = lock(&self.profiles);
        p.next_id += 1;
        let brand = BrandProfile {
            id: p.next_id,
            actor_id,
            company_name: company_name.to_string(),
        };
        p.brands.push(brand.clone());
        brand
    }

    pub fn add_manufacturer(
        &self,
        actor_id: DbId,
        company_name: &str,
        verification: VerificationStatus,
        categories: &[&str],
    ) -> ManufacturerProfile {
        let mut p = lock(&self.profiles);
        p.next_id += 1;
        let manufacturer = ManufacturerProfile {
            id: p.next_id,
            actor_id,
            company_name: company_name.to_string(),
            logo_url: None,
            verification_status: verification.as_str().to_string(),
        };
        let caps = categories
            .iter()
            .map(|c| Capability {
                category: (*c).to_string(),
                subcategories: Vec::new(),
            })
            .collect();
        p.capabilities.insert(manufacturer.id, caps);
        p.manufacturers.push(manufacturer.clone());
        manufacturer
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryDirectory {
    async fn brand_for_actor(&self, actor_id: DbId) -> Result<Option<BrandProfile>, StoreError> {
        let p = lock(&self.profiles);
        Ok(p.brands.iter().find(|b| b.actor_id == actor_id).cloned())
    }

    async fn brand(&self, id: DbId) -> Result<Option<BrandProfile>, StoreError> {
        let p = lock(&self.profiles);
        Ok(p.brands.iter().find(|b| b.id == id).cloned())
    }

    async fn manufacturer_for_actor(
        &self,
        actor_id: DbId,
    ) -> Result<Option<ManufacturerProfile>, StoreError> {
        let p = lock(&self.profiles);
        Ok(p.manufacturers
            .iter()
            .find(|m| m.actor_id == actor_id)
            .cloned())
    }

    async fn manufacturer(&self, id: DbId) -> Result<Option<ManufacturerProfile>, StoreError> {
        let p = lock(&self.profiles);
        Ok(p.manufacturers.iter().find(|m| m.id == id).cloned())
    }

    async fn manufacturers(&self, ids: &[DbId]) -> Result<Vec<ManufacturerProfile>, StoreError> {
        let p = lock(&self.profiles);
        let mut found: Vec<ManufacturerProfile> = p
            .manufacturers
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect();
        found.sort_by_key(|m| m.id);
        Ok(found)
    }

    async fn capabilities(&self, manufacturer_id: DbId) -> Result<Vec<Capability>, StoreError> {
        let p = lock(&self.profiles);
        Ok(p.capabilities
            .get(&manufacturer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn verified_manufacturers(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ManufacturerProfile>, StoreError> {
        let p = lock(&self.profiles);
        let mut found: Vec<ManufacturerProfile> = p
            .manufacturers
            .iter()
            .filter(|m| m.verification().is_verified())
            .filter(|m| {
                category.map_or(true, |c| {
                    p.capabilities
                        .get(&m.id)
                        .is_some_and(|caps| {
                            caps.iter().any(|cap| categories_match(&cap.category, c))
                        })
                })
            })
            .cloned()
            .collect();
        found.sort_by_key(|m| m.id);
        Ok(found)
    }
}
