//! Recommendation results in both directions.

mod common;

use assert_matches::assert_matches;
use brieflink_core::error::CoreError;
use brieflink_core::matching::VerificationStatus;
use brieflink_core::status::ProposalStatus;
use brieflink_workflow::WorkflowConfig;
use common::*;

#[tokio::test]
async fn apparel_brief_recommends_verified_apparel_makers() {
    let h = Harness::new();
    let brief = h.open_brief().await;

    let recs = h
        .workflow
        .matching
        .recommend_manufacturers_for(brief.id)
        .await
        .unwrap();
    let ids: Vec<_> = recs.iter().map(|r| r.candidate.id).collect();
    assert_eq!(ids, vec![h.m1.id, h.m2.id]);
    assert!(!ids.contains(&h.unverified.id));
    assert!(!ids.contains(&h.footwear.id));
    for r in &recs {
        assert_eq!(r.score, 100);
        assert_eq!(r.reason, "Matches category: Apparel");
    }
}

#[tokio::test]
async fn category_match_ignores_case_and_padding() {
    let h = Harness::new();
    let draft = h
        .workflow
        .briefs
        .create(h.brand.id, brief_fields("  APPAREL "))
        .await
        .unwrap();
    let brief = h.workflow.briefs.publish(draft.id, h.brand.id).await.unwrap();

    let recs = h
        .workflow
        .matching
        .recommend_manufacturers_for(brief.id)
        .await
        .unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs[0].reason.ends_with("APPAREL"));
}

#[tokio::test]
async fn unverified_makers_never_appear() {
    let h = Harness::new();
    h.directory.add_manufacturer(
        300,
        "Rejected Co",
        VerificationStatus::Rejected,
        &["Apparel"],
    );
    let brief = h.open_brief().await;
    let recs = h
        .workflow
        .matching
        .recommend_manufacturers_for(brief.id)
        .await
        .unwrap();
    assert!(recs
        .iter()
        .all(|r| r.candidate.verification_status == "verified"));
}

#[tokio::test]
async fn missing_brief_is_not_found() {
    let h = Harness::new();
    assert_matches!(
        h.workflow.matching.recommend_manufacturers_for(404).await,
        Err(CoreError::NotFound { entity: "Brief", id: 404 })
    );
}

#[tokio::test]
async fn draft_brief_gets_no_recommendations() {
    let h = Harness::new();
    let draft = h.draft_brief().await;
    assert_matches!(
        h.workflow.matching.recommend_manufacturers_for(draft.id).await,
        Err(CoreError::BadRequest(msg)) if msg.contains("published")
    );

    // Publishing makes it matchable.
    h.workflow.briefs.publish(draft.id, h.brand.id).await.unwrap();
    let recs = h
        .workflow
        .matching
        .recommend_manufacturers_for(draft.id)
        .await
        .unwrap();
    assert_eq!(recs.len(), 2);
}

#[tokio::test]
async fn manufacturer_sees_open_briefs_in_its_categories() {
    let h = Harness::new();
    let older = h.open_brief().await;
    let newer = h.open_brief().await;
    let _draft = h.draft_brief().await;
    let shoes = h
        .workflow
        .briefs
        .create(h.brand.id, brief_fields("Footwear"))
        .await
        .unwrap();
    h.workflow.briefs.publish(shoes.id, h.brand.id).await.unwrap();

    let recs = h.workflow.matching.recommend_briefs_for(h.m1.id).await.unwrap();
    assert_eq!(
        recs.iter().map(|r| r.candidate.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );
    assert!(recs.iter().all(|r| r.score == 100));

    let shoe_recs = h
        .workflow
        .matching
        .recommend_briefs_for(h.footwear.id)
        .await
        .unwrap();
    assert_eq!(shoe_recs.len(), 1);
    assert_eq!(shoe_recs[0].reason, "Matches category: Footwear");
}

#[tokio::test]
async fn no_capabilities_means_no_briefs() {
    let h = Harness::new();
    h.open_brief().await;
    let bare = h
        .directory
        .add_manufacturer(301, "Blank Slate", VerificationStatus::Verified, &[]);
    assert!(h
        .workflow
        .matching
        .recommend_briefs_for(bare.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn closed_briefs_drop_out_of_recommendations() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m2.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();

    assert!(h
        .workflow
        .matching
        .recommend_briefs_for(h.m1.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn scan_is_bounded_by_the_window() {
    let h = Harness::with_config(WorkflowConfig {
        recommendation_window: 2,
        ..WorkflowConfig::default()
    });
    let oldest = h.open_brief().await;
    h.open_brief().await;
    h.open_brief().await;

    let recs = h.workflow.matching.recommend_briefs_for(h.m1.id).await.unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.candidate.id != oldest.id));
}
