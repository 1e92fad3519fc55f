//! HTTP-level integration tests for the sponsorship calendar and the
//! collaboration views derived from accepted proposals.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use common::{
    body_json, create_test_user, get_auth, mint_token, patch_json_auth, post_json_auth,
    ROLE_ID_ADMIN, ROLE_ID_CREATOR,
};
use frames_db::models::newsletter::CreateNewsletter;
use frames_db::repositories::NewsletterRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_newsletter(pool: &PgPool, owner_id: i64, title: &str) -> i64 {
    let input = CreateNewsletter {
        title: title.to_string(),
        description: None,
        category: Some("tech".to_string()),
        audience_size: Some(10000),
        open_rate: None,
        click_rate: None,
        sponsorship_price_cents: Some(40000),
        cadence: None,
    };
    NewsletterRepo::create(pool, owner_id, &input)
        .await
        .expect("newsletter creation should succeed")
        .id
}

/// Create a proposal with the given campaign window via the API.
async fn create_proposal(
    pool: &PgPool,
    admin_token: &str,
    target_ids: &[i64],
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "brand_name": "Acme Corp",
        "sponsorship_type": "dedicated",
        "campaign_start_date": start.to_string(),
        "campaign_end_date": end.to_string(),
        "product_type": "devtools",
        "ideal_target_audience": "software engineers",
        "target_newsletter_ids": target_ids,
    });
    let response = post_json_auth(app, "/api/v1/admin/proposals", body, admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Accept the join row for the given newsletter on the given run date and
/// return the created calendar event.
async fn accept_target(
    pool: &PgPool,
    creator_token: &str,
    newsletter_id: i64,
    run_date: NaiveDate,
) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/proposals", creator_token).await;
    let inbox = body_json(response).await;
    let row = inbox["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["newsletter_id"] == newsletter_id && r["status"] == "pending")
        .cloned()
        .expect("inbox should contain a pending row for the newsletter");

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "proposal_newsletter_id": row["id"],
        "action": "accept",
        "selected_run_date": run_date.to_string(),
    });
    let response = patch_json_auth(app, "/api/v1/proposals", body, creator_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["calendar_event"].clone()
}

/// Full pipeline: newsletter, proposal over `[start, end]`, acceptance on
/// `run_date`. Returns the calendar event JSON.
async fn accepted_collaboration(
    pool: &PgPool,
    creator_id: i64,
    creator_token: &str,
    admin_token: &str,
    title: &str,
    start: NaiveDate,
    end: NaiveDate,
    run_date: NaiveDate,
) -> serde_json::Value {
    let newsletter_id = seed_newsletter(pool, creator_id, title).await;
    create_proposal(pool, admin_token, &[newsletter_id], start, end).await;
    accept_target(pool, creator_token, newsletter_id, run_date).await
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Accepting a proposal makes the event visible on the creator's calendar.
#[sqlx::test(migrations = "../db/migrations")]
async fn calendar_shows_accepted_event(pool: PgPool) {
    let (creator, _) = create_test_user(&pool, "scheduler", ROLE_ID_CREATOR).await;
    let (admin, _) = create_test_user(&pool, "sponsor", ROLE_ID_ADMIN).await;
    let creator_token = mint_token(creator.id, "creator");
    let admin_token = mint_token(admin.id, "admin");

    let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
    let run = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let event = accepted_collaboration(
        &pool, creator.id, &creator_token, &admin_token, "Scheduled Letter", start, end, run,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/calendar", &creator_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let events = json["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], event["id"]);
    assert_eq!(events[0]["event_date"], "2026-09-15");
    assert_eq!(events[0]["status"], "scheduled");
    assert_eq!(events[0]["title"], "Acme Corp x Scheduled Letter");
}

/// The month/year filter narrows the listing; an out-of-range month is a
/// validation error.
#[sqlx::test(migrations = "../db/migrations")]
async fn calendar_month_filter(pool: PgPool) {
    let (creator, _) = create_test_user(&pool, "monthly", ROLE_ID_CREATOR).await;
    let (admin, _) = create_test_user(&pool, "sponsor", ROLE_ID_ADMIN).await;
    let creator_token = mint_token(creator.id, "creator");
    let admin_token = mint_token(admin.id, "admin");

    let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
    accepted_collaboration(
        &pool,
        creator.id,
        &creator_token,
        &admin_token,
        "September Letter",
        start,
        end,
        NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
    )
    .await;
    accepted_collaboration(
        &pool,
        creator.id,
        &creator_token,
        &admin_token,
        "October Letter",
        start,
        end,
        NaiveDate::from_ymd_opt(2026, 10, 10).unwrap(),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/calendar?month=10&year=2026", &creator_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let events = json["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_date"], "2026-10-10");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/calendar?month=13&year=2026", &creator_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A scheduled event can be completed or cancelled, but a cancelled event
/// is final.
#[sqlx::test(migrations = "../db/migrations")]
async fn event_status_transitions(pool: PgPool) {
    let (creator, _) = create_test_user(&pool, "transitioner", ROLE_ID_CREATOR).await;
    let (admin, _) = create_test_user(&pool, "sponsor", ROLE_ID_ADMIN).await;
    let creator_token = mint_token(creator.id, "creator");
    let admin_token = mint_token(admin.id, "admin");

    let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
    let event = accepted_collaboration(
        &pool,
        creator.id,
        &creator_token,
        &admin_token,
        "Transition Letter",
        start,
        end,
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
    )
    .await;
    let event_id = event["id"].as_i64().unwrap();

    // scheduled -> cancelled is allowed.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "cancelled" });
    let response =
        patch_json_auth(app, &format!("/api/v1/calendar/{event_id}"), body, &creator_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "cancelled");

    // cancelled -> completed is not.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "status": "completed" });
    let response =
        patch_json_auth(app, &format!("/api/v1/calendar/{event_id}"), body, &creator_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Someone else's event answers 404 on update, indistinguishable from a
/// missing id.
#[sqlx::test(migrations = "../db/migrations")]
async fn foreign_event_is_404(pool: PgPool) {
    let (owner, _) = create_test_user(&pool, "eventowner", ROLE_ID_CREATOR).await;
    let (outsider, _) = create_test_user(&pool, "snooper", ROLE_ID_CREATOR).await;
    let (admin, _) = create_test_user(&pool, "sponsor", ROLE_ID_ADMIN).await;
    let owner_token = mint_token(owner.id, "creator");
    let outsider_token = mint_token(outsider.id, "creator");
    let admin_token = mint_token(admin.id, "admin");

    let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
    let event = accepted_collaboration(
        &pool,
        owner.id,
        &owner_token,
        &admin_token,
        "Guarded Letter",
        start,
        end,
        NaiveDate::from_ymd_opt(2026, 9, 8).unwrap(),
    )
    .await;
    let event_id = event["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "completed" });
    let response =
        patch_json_auth(app, &format!("/api/v1/calendar/{event_id}"), body, &outsider_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And the outsider's calendar stays empty.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/calendar", &outsider_token).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Collaborations
// ---------------------------------------------------------------------------

/// The collaboration status is derived from today's date on every read:
/// a future run date is `scheduled`, a past run inside the campaign window
/// is `active`, and a finished campaign is `completed`.
#[sqlx::test(migrations = "../db/migrations")]
async fn collaboration_status_is_derived(pool: PgPool) {
    let (creator, _) = create_test_user(&pool, "collaborator", ROLE_ID_CREATOR).await;
    let (admin, _) = create_test_user(&pool, "sponsor", ROLE_ID_ADMIN).await;
    let creator_token = mint_token(creator.id, "creator");
    let admin_token = mint_token(admin.id, "admin");

    let today = Utc::now().date_naive();

    // Run date in the future.
    accepted_collaboration(
        &pool,
        creator.id,
        &creator_token,
        &admin_token,
        "Upcoming Letter",
        today + Duration::days(1),
        today + Duration::days(30),
        today + Duration::days(10),
    )
    .await;
    // Ran already, campaign still open.
    accepted_collaboration(
        &pool,
        creator.id,
        &creator_token,
        &admin_token,
        "Running Letter",
        today - Duration::days(10),
        today + Duration::days(10),
        today - Duration::days(5),
    )
    .await;
    // Campaign over.
    accepted_collaboration(
        &pool,
        creator.id,
        &creator_token,
        &admin_token,
        "Finished Letter",
        today - Duration::days(30),
        today - Duration::days(10),
        today - Duration::days(20),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/collaborations", &creator_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);

    let status_of = |title: &str| {
        rows.iter()
            .find(|r| r["newsletter_title"] == title)
            .map(|r| r["collaboration_status"].as_str().unwrap().to_string())
            .expect("collaboration should be listed")
    };
    assert_eq!(status_of("Upcoming Letter"), "scheduled");
    assert_eq!(status_of("Running Letter"), "active");
    assert_eq!(status_of("Finished Letter"), "completed");
}

/// The admin view spans all creators; each creator still sees only their
/// own collaborations.
#[sqlx::test(migrations = "../db/migrations")]
async fn admin_sees_all_collaborations(pool: PgPool) {
    let (alice, _) = create_test_user(&pool, "alice", ROLE_ID_CREATOR).await;
    let (bob, _) = create_test_user(&pool, "bob", ROLE_ID_CREATOR).await;
    let (admin, _) = create_test_user(&pool, "sponsor", ROLE_ID_ADMIN).await;
    let alice_token = mint_token(alice.id, "creator");
    let bob_token = mint_token(bob.id, "creator");
    let admin_token = mint_token(admin.id, "admin");

    let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
    let run = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
    accepted_collaboration(
        &pool, alice.id, &alice_token, &admin_token, "Alice Letter", start, end, run,
    )
    .await;
    accepted_collaboration(
        &pool, bob.id, &bob_token, &admin_token, "Bob Letter", start, end, run,
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/collaborations", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/collaborations", &alice_token).await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["newsletter_title"], "Alice Letter");
}
