//! Notification inbox and party-authored execution log entries.

mod common;

use assert_matches::assert_matches;
use brieflink_core::error::CoreError;
use brieflink_core::execution_log::{EntryType, NewLogEntry};
use brieflink_core::status::ProposalStatus;
use common::*;

fn update(content: &str) -> NewLogEntry {
    NewLogEntry {
        entry_type: EntryType::Update,
        content: content.to_string(),
    }
}

#[tokio::test]
async fn inbox_counts_lists_and_marks_read() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    h.workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .create(h.m2.id, brief.id, terms(2100.0))
        .await
        .unwrap();

    let inbox = &h.workflow.notifications;
    assert_eq!(inbox.unread_count(BRAND_ACTOR).await.unwrap(), 2);

    let listed = inbox.list(BRAND_ACTOR, false, None, None).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].id > listed[1].id);

    let read = inbox.mark_read(BRAND_ACTOR, listed[0].id).await.unwrap();
    assert!(read.is_read);
    assert!(read.read_at.is_some());
    assert_eq!(inbox.unread_count(BRAND_ACTOR).await.unwrap(), 1);

    let unread = inbox.list(BRAND_ACTOR, true, None, None).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, listed[1].id);

    assert_eq!(inbox.mark_all_read(BRAND_ACTOR).await.unwrap(), 1);
    assert_eq!(inbox.unread_count(BRAND_ACTOR).await.unwrap(), 0);
}

#[tokio::test]
async fn someone_elses_notification_is_not_found() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    h.workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    let id = h.store.notifications()[0].id;

    assert_matches!(
        h.workflow.notifications.mark_read(M1_ACTOR, id).await,
        Err(CoreError::NotFound { entity: "Notification", .. })
    );
}

#[tokio::test]
async fn inbox_paging_is_clamped() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    h.workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    let page = h
        .workflow
        .notifications
        .list(BRAND_ACTOR, false, Some(0), Some(-3))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn both_parties_can_write_once_in_progress() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();

    // Not yet in progress.
    assert_matches!(
        h.workflow
            .execution_log
            .append(brief.id, BRAND_ACTOR, update("Kick-off call booked"))
            .await,
        Err(CoreError::BadRequest(_))
    );

    h.workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();

    h.workflow
        .execution_log
        .append(brief.id, BRAND_ACTOR, update("Kick-off call booked"))
        .await
        .unwrap();
    let issue = h
        .workflow
        .execution_log
        .append(
            brief.id,
            M1_ACTOR,
            NewLogEntry {
                entry_type: EntryType::Issue,
                content: "Dye lot delayed by a week".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(issue.entry_type, "ISSUE");

    let log = h
        .workflow
        .execution_log
        .list_for_brief(brief.id, M1_ACTOR)
        .await
        .unwrap();
    assert_eq!(
        log.iter().map(|e| e.entry_type.as_str()).collect::<Vec<_>>(),
        vec!["MILESTONE", "UPDATE", "ISSUE"]
    );
}

#[tokio::test]
async fn outsiders_cannot_read_or_write_the_log() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .create(h.m2.id, brief.id, terms(2500.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();

    assert_matches!(
        h.workflow
            .execution_log
            .append(brief.id, M2_ACTOR, update("Can I still help?"))
            .await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        h.workflow.execution_log.list_for_brief(brief.id, M2_ACTOR).await,
        Err(CoreError::Forbidden(_))
    );
}

#[tokio::test]
async fn blank_entries_are_rejected() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    assert_matches!(
        h.workflow
            .execution_log
            .append(brief.id, BRAND_ACTOR, update("   "))
            .await,
        Err(CoreError::Validation(_))
    );
}

#[tokio::test]
async fn completed_briefs_take_no_more_entries() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();
    h.workflow.briefs.complete(brief.id, h.brand.id).await.unwrap();

    assert_matches!(
        h.workflow
            .execution_log
            .append(brief.id, M1_ACTOR, update("One more thing"))
            .await,
        Err(CoreError::BadRequest(_))
    );
    assert_eq!(
        h.workflow
            .execution_log
            .list_for_brief(brief.id, BRAND_ACTOR)
            .await
            .unwrap()
            .len(),
        2
    );
}
