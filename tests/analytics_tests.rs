//! Engagement analytics integration tests
//!
//! Exercise the view/share counters, the per-college engagement refresh
//! with its single-winner rule, and the portal totals. These tests need
//! PostgreSQL (`TEST_DATABASE_URL` or a local Docker daemon); Redis is
//! not involved.

mod helpers;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use helpers::*;
use serial_test::serial;

use CampusBuddy::models::admin::AdminProfile;
use CampusBuddy::models::event::Event;
use CampusBuddy::models::user::UserProfile;
use CampusBuddy::utils::errors::CampusBuddyError;

async fn seed_admin(ctx: &TestContext) -> AdminProfile {
    let admin = ctx
        .database
        .create_test_admin("ADM0001", "metrics_admin", "metrics@staff.example.edu")
        .await
        .expect("Failed to seed admin");
    ctx.database
        .create_test_college("COL0001", "Metrics College", &admin.admin_id)
        .await
        .expect("Failed to seed college");
    admin
}

async fn seed_event(ctx: &TestContext, admin: &AdminProfile, title: &str) -> Event {
    ctx.catalog_service()
        .create_event(admin, upcoming_event(title))
        .await
        .expect("Failed to create event")
}

async fn seed_user(ctx: &TestContext, user_id: &str, username: &str) -> UserProfile {
    ctx.database
        .create_test_user(
            user_id,
            username,
            &format!("{}@students.example.edu", username),
            "seeded-pass",
        )
        .await
        .expect("Failed to seed user")
}

#[tokio::test]
#[serial]
async fn test_views_and_shares_accumulate() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx).await;
    let event = seed_event(&ctx, &admin, "Open Mic").await;
    let analytics = ctx.analytics_service();

    analytics
        .record_view(&event.event_id)
        .await
        .expect("View should record");
    analytics
        .record_view(&event.event_id)
        .await
        .expect("View should record");
    let after = analytics
        .record_share(&event.event_id)
        .await
        .expect("Share should record");

    assert_eq!(after.analytics_id, "ANL0001");
    assert_eq!(after.event_id, event.event_id);
    assert_eq!(after.views, 2);
    assert_eq!(after.shares, 1);
    assert!(!after.is_popular);

    let err = analytics
        .record_view("EVT0404")
        .await
        .expect_err("Unknown event must fail");
    assert_matches!(err, CampusBuddyError::EventNotFound { .. });

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_refresh_applies_the_weighted_score() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx).await;
    let event = seed_event(&ctx, &admin, "Tech Tarang").await;
    let user = seed_user(&ctx, "USR0001", "diya").await;
    let ugc = ctx.ugc_service();
    let analytics = ctx.analytics_service();

    // 2 posts, 3 reviews averaging 4, 10 views, 5 shares
    ugc.post_ugc(&user, &event.event_id, text_post("crowd shot"))
        .await
        .expect("Post should succeed");
    ugc.post_ugc(&user, &event.event_id, text_post("after movie"))
        .await
        .expect("Post should succeed");
    for comment in ["solid", "good", "smooth"] {
        ugc.post_review(&user, &event.event_id, review(4, comment))
            .await
            .expect("Review should succeed");
    }
    for _ in 0..10 {
        analytics
            .record_view(&event.event_id)
            .await
            .expect("View should record");
    }
    for _ in 0..5 {
        analytics
            .record_share(&event.event_id)
            .await
            .expect("Share should record");
    }

    let results = analytics
        .refresh_college("COL0001")
        .await
        .expect("Refresh should succeed");
    assert_eq!(results.len(), 1);

    let entry = &results[0];
    assert_eq!(entry.ugc_count, 2);
    assert_eq!(entry.review_count, 3);
    assert_eq!(entry.avg_rating, 4.0);
    assert_eq!(entry.views, 10);
    assert_eq!(entry.shares, 5);
    // 2*3 + 3*4 + round(4.0*2) + 10 + 5*2
    assert_eq!(entry.engagement_score, 46);
    assert!(entry.is_popular, "A college's only event is its winner");

    let stored = ctx
        .database_service()
        .analytics
        .find_by_event(&event.event_id)
        .await
        .expect("Lookup should succeed")
        .expect("Analytics row should exist");
    assert_eq!(stored.engagement_score, 46);
    assert!(stored.is_popular);

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_refresh_crowns_exactly_one_event() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx).await;
    let quiet = seed_event(&ctx, &admin, "Quiet Meetup").await;
    let busy = seed_event(&ctx, &admin, "Busy Carnival").await;
    let analytics = ctx.analytics_service();

    for _ in 0..3 {
        analytics
            .record_view(&busy.event_id)
            .await
            .expect("View should record");
    }
    analytics
        .record_view(&quiet.event_id)
        .await
        .expect("View should record");

    let results = analytics
        .refresh_college("COL0001")
        .await
        .expect("Refresh should succeed");
    let crowned: Vec<&str> = results
        .iter()
        .filter(|e| e.is_popular)
        .map(|e| e.event_id.as_str())
        .collect();
    assert_eq!(crowned, vec![busy.event_id.as_str()]);

    // The crown moves once the other event overtakes
    for _ in 0..5 {
        analytics
            .record_share(&quiet.event_id)
            .await
            .expect("Share should record");
    }
    let results = analytics
        .refresh_college("COL0001")
        .await
        .expect("Refresh should succeed");
    let crowned: Vec<&str> = results
        .iter()
        .filter(|e| e.is_popular)
        .map(|e| e.event_id.as_str())
        .collect();
    assert_eq!(crowned, vec![quiet.event_id.as_str()]);

    let stored = ctx
        .database_service()
        .analytics
        .find_by_event(&busy.event_id)
        .await
        .expect("Lookup should succeed")
        .expect("Analytics row should exist");
    assert!(!stored.is_popular, "The previous winner must be uncrowned");

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_score_ties_break_on_title_order() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx).await;
    // Creation order is the reverse of title order
    let zenith = seed_event(&ctx, &admin, "Zenith Fest").await;
    let aurora = seed_event(&ctx, &admin, "Aurora Fest").await;
    let analytics = ctx.analytics_service();

    analytics
        .record_view(&zenith.event_id)
        .await
        .expect("View should record");
    analytics
        .record_view(&aurora.event_id)
        .await
        .expect("View should record");

    let results = analytics
        .refresh_college("COL0001")
        .await
        .expect("Refresh should succeed");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Aurora Fest");
    assert_eq!(results[0].engagement_score, results[1].engagement_score);
    assert!(results[0].is_popular, "Ties resolve to the first title");
    assert!(!results[1].is_popular);

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_last_activity_takes_the_most_recent_date() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx).await;
    let event = seed_event(&ctx, &admin, "Archive Night").await;
    let user = seed_user(&ctx, "USR0001", "meher").await;
    let ugc = ctx.ugc_service();

    ugc.post_ugc(&user, &event.event_id, text_post("throwback"))
        .await
        .expect("Post should succeed");
    ugc.post_review(&user, &event.event_id, review(5, "came back twice"))
        .await
        .expect("Review should succeed");

    // Pin the activity dates so the maximum is known
    ctx.database
        .execute_sql("UPDATE ugc SET posted_on = DATE '2026-02-01'")
        .await
        .expect("Failed to backdate posts");
    ctx.database
        .execute_sql("UPDATE reviews SET date_posted = DATE '2026-03-01'")
        .await
        .expect("Failed to backdate reviews");

    let results = ctx
        .analytics_service()
        .refresh_college("COL0001")
        .await
        .expect("Refresh should succeed");
    assert_eq!(
        results[0].last_activity,
        Some(NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"))
    );

    ctx.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
#[serial]
async fn test_dashboard_totals() {
    let ctx = setup_clean_context().await;
    let admin = seed_admin(&ctx).await;
    let event = seed_event(&ctx, &admin, "Fresher Welcome").await;
    let payer = seed_user(&ctx, "USR0001", "payer").await;
    seed_user(&ctx, "USR0002", "lurker").await;

    ctx.registration_service()
        .register(&payer, &event.event_id, standard_registration(true))
        .await
        .expect("Registration should succeed");

    let stats = ctx
        .analytics_service()
        .dashboard_stats()
        .await
        .expect("Stats should build");
    assert_eq!(stats["total_events"], 1);
    assert_eq!(stats["total_colleges"], 1);
    assert_eq!(stats["total_users"], 2);
    assert_eq!(stats["total_registrations"], 1);
    assert_eq!(stats["total_payments_cents"], 49_900);
    assert_eq!(stats["total_sponsored"], 0);

    ctx.cleanup().await.expect("Failed to cleanup");
}
