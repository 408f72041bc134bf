//! Catalog integration tests
//!
//! Event management under the college ownership gate, the public listings
//! and the sponsorship book. These tests need PostgreSQL
//! (`TEST_DATABASE_URL` or a local Docker daemon); Redis is not involved.

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use serial_test::serial;

use CampusBuddy::models::admin::AdminProfile;
use CampusBuddy::utils::errors::CampusBuddyError;

async fn seed_admin(ctx: &TestContext, admin_id: &str, college_id: &str, college: &str) -> AdminProfile {
    let tag = admin_id.to_lowercase();
    let admin = ctx
        .database
        .create_test_admin(admin_id, &format!("{}_admin", tag), &format!("{}@staff.example.edu", tag))
        .await
        .expect("Failed to seed admin");
    ctx.database
        .create_test_college(college_id, college, &admin.admin_id)
        .await
        .expect("Failed to seed college");
    admin
}

#[tokio::test]
#[serial]
async fn test_event_lifecycle_under_the_ownership_gate() {
    let ctx = setup_clean_context().await;
    let owner = seed_admin(&ctx, "ADM0001", "COL0001", "Nalanda College").await;
    let rival = seed_admin(&ctx, "ADM0002", "COL0002", "Rival College").await;
    let catalog = ctx.catalog_service();

    let event = catalog
        .create_event(&owner, upcoming_event("Spring Carnival"))
        .await
        .expect("Event creation should succeed");
    assert_eq!(event.event_id, "EVT0001");
    assert_eq!(event.college_id, "COL0001");
    assert_eq!(event.created_by, Some(owner.admin_id.clone()));

    // Edits replace the editable field set
    let mut edit = upcoming_event("Spring Carnival 2.0");
    edit.location = None;
    let updated = catalog
        .update_event(&owner, &event.event_id, edit_request(&edit))
        .await
        .expect("Event update should succeed");
    assert_eq!(updated.title, "Spring Carnival 2.0");
    assert!(updated.location.is_none());

    // Another college's admin can neither edit nor delete
    let err = catalog
        .update_event(&rival, &event.event_id, edit_request(&upcoming_event("Hijack")))
        .await
        .expect_err("Cross-college edit must fail");
    assert_matches!(err, CampusBuddyError::Unauthorized(_));

    let err = catalog
        .delete_event(&rival, &event.event_id)
        .await
        .expect_err("Cross-college delete must fail");
    assert_matches!(err, CampusBuddyError::Unauthorized(_));

    catalog
        .delete_event(&owner, &event.event_id)
        .await
        .expect("Owner delete should succeed");
    let err = catalog
        .update_event(&owner, &event.event_id, edit_request(&upcoming_event("Ghost")))
        .await
        .expect_err("Deleted event must be gone");
    assert_matches!(err, CampusBuddyError::EventNotFound { .. });

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_event_creation_validates_and_trims() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx, "ADM0001", "COL0001", "Nalanda College").await;
    let catalog = ctx.catalog_service();

    let mut blank = upcoming_event("   ");
    blank.title = "   ".to_string();
    let err = catalog
        .create_event(&admin, blank)
        .await
        .expect_err("Blank title must fail");
    assert_matches!(err, CampusBuddyError::InvalidInput(_));

    // Blank optional fields store as NULL
    let mut sparse = upcoming_event("  Open Mic  ");
    sparse.description = Some("   ".to_string());
    sparse.location = None;
    let event = catalog
        .create_event(&admin, sparse)
        .await
        .expect("Event creation should succeed");
    assert_eq!(event.title, "Open Mic");
    assert!(event.description.is_none());
    assert!(event.location.is_none());

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_public_listings_span_colleges() {
    let ctx = setup_clean_context().await;
    let first = seed_admin(&ctx, "ADM0001", "COL0001", "Nalanda College").await;
    let second = seed_admin(&ctx, "ADM0002", "COL0002", "Baroda College").await;
    let catalog = ctx.catalog_service();

    catalog
        .create_event(&first, upcoming_event("Nalanda Fest"))
        .await
        .expect("Event creation should succeed");
    catalog
        .create_event(&second, upcoming_event("Baroda Fest"))
        .await
        .expect("Event creation should succeed");

    let listings = catalog.public_events().await.expect("Listing should succeed");
    assert_eq!(listings.len(), 2);
    assert!(listings
        .iter()
        .any(|l| l.title == "Nalanda Fest" && l.college_name == "Nalanda College"));
    assert!(listings
        .iter()
        .any(|l| l.title == "Baroda Fest" && l.college_name == "Baroda College"));

    let colleges = catalog.colleges_portal().await.expect("Listing should succeed");
    assert_eq!(colleges.len(), 2);
    assert_eq!(colleges[0].name, "Baroda College");

    // Each admin manages only their own college's events
    let mine = catalog.manage_events(&first).await.expect("Listing should succeed");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Nalanda Fest");

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_admin_without_a_college_manages_nothing() {
    let ctx = setup_clean_context().await;
    let admin = ctx
        .database
        .create_test_admin("ADM0001", "orphan_admin", "orphan@staff.example.edu")
        .await
        .expect("Failed to seed admin");
    let catalog = ctx.catalog_service();

    let events = catalog.manage_events(&admin).await.expect("Listing should succeed");
    assert!(events.is_empty());

    let err = catalog
        .create_event(&admin, upcoming_event("Nowhere Fest"))
        .await
        .expect_err("Creation without a college must fail");
    assert_matches!(err, CampusBuddyError::CollegeNotFound { .. });

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_sponsor_linking_is_once_per_pair() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx, "ADM0001", "COL0001", "Nalanda College").await;
    let catalog = ctx.catalog_service();

    let event = catalog
        .create_event(&admin, upcoming_event("Sponsor Showcase"))
        .await
        .expect("Event creation should succeed");
    let sponsor = catalog
        .create_sponsor(&admin, sample_sponsor("chai"))
        .await
        .expect("Sponsor creation should succeed");
    assert_eq!(sponsor.sponsor_id, "SPN0001");

    let link = catalog
        .link_sponsor(
            &admin,
            &event.event_id,
            &sponsor.sponsor_id,
            Some(500_000),
            Some("  Title sponsor for the main stage  "),
        )
        .await
        .expect("Linking should succeed");
    assert_eq!(link.amount_cents, Some(500_000));
    assert_eq!(link.notes.as_deref(), Some("Title sponsor for the main stage"));

    let err = catalog
        .link_sponsor(&admin, &event.event_id, &sponsor.sponsor_id, None, None)
        .await
        .expect_err("Second link of the same pair must fail");
    assert_matches!(err, CampusBuddyError::InvalidInput(_));

    let err = catalog
        .link_sponsor(&admin, &event.event_id, "SPN0404", None, None)
        .await
        .expect_err("Unknown sponsor must fail");
    assert_matches!(err, CampusBuddyError::SponsorNotFound { .. });

    let hub = catalog.sponsorship_hub().await.expect("Hub should load");
    assert_eq!(hub.len(), 1);
    assert_eq!(hub[0].sponsor.sponsor_id, "SPN0001");
    assert_eq!(hub[0].events.len(), 1);
    assert_eq!(hub[0].events[0].title, "Sponsor Showcase");
    assert_eq!(hub[0].events[0].amount_cents, Some(500_000));

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_sponsor_creation_validates_email() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx, "ADM0001", "COL0001", "Nalanda College").await;

    let mut request = sample_sponsor("badmail");
    request.email = Some("not-an-email".to_string());
    let err = ctx
        .catalog_service()
        .create_sponsor(&admin, request)
        .await
        .expect_err("Malformed sponsor email must fail");
    assert_matches!(err, CampusBuddyError::InvalidInput(_));
    assert_eq!(ctx.database.count_records("sponsors").await.expect("count"), 0);

    ctx.cleanup().await.expect("Failed to cleanup");
}
