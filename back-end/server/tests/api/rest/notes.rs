use super::helpers::*;
use crate::bootstrap::init::{setup_test_server, NoteSeed};
use axum::http::StatusCode;
use entity::user;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{json, Value};

fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Upload + moderation
// ============================================================================

#[tokio::test]
async fn test_student_upload_starts_pending_and_is_hidden() {
    let server = setup_test_server().await;
    let (user, token) = server.student("asha@example.com").await;

    let (status, note) = upload_note(&server.router, &token, &note_fields("Graphs"), Some(pdf())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["status"], "PENDING");
    assert_eq!(note["university"], "AKTU");
    assert_eq!(note["category"], "NOTE");
    assert_eq!(note["uploaded_by"], user.id.to_string());

    let file_url = note["file_url"].as_str().unwrap();
    let prefix = format!("memory://notes/{}/", user.id);
    assert!(file_url.starts_with(&prefix), "unexpected url {file_url}");
    assert!(file_url.ends_with(".pdf"));
    assert_eq!(server.storage.len().await, 1);

    let (_, listing) = get_request(&server.router, "/api/v1/notes").await;
    assert!(listing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_upload_is_approved_immediately() {
    let server = setup_test_server().await;
    let (_, token) = server.admin("admin@example.com").await;

    let mut fields = note_fields("Compiler Design PYQ");
    fields.push(("category", "UNIVERSITY_PAPER"));
    fields.push(("year", "2023"));
    fields.push(("is_premium", "true"));

    let (status, note) = upload_note(&server.router, &token, &fields, Some(pdf())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["status"], "APPROVED");
    assert_eq!(note["category"], "UNIVERSITY_PAPER");
    assert_eq!(note["year"], 2023);
    assert_eq!(note["is_premium"], true);

    let (_, listing) = get_request(&server.router, "/api/v1/notes").await;
    assert_eq!(titles(&listing), vec!["Compiler Design PYQ"]);
}

#[tokio::test]
async fn test_upload_validation() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;

    let (status, body) = upload_note(&server.router, &token, &note_fields("No file"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["category"], "unprocessable");

    let fields = vec![("title", "Missing branch"), ("semester", "3"), ("subject", "DS")];
    let (status, _) = upload_note(&server.router, &token, &fields, Some(pdf())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut fields = note_fields("Bad category");
    fields.push(("category", "POSTER"));
    let (status, _) = upload_note(&server.router, &token, &fields, Some(pdf())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(server.storage.len().await, 0);
}

#[tokio::test]
async fn test_upload_requires_sign_in() {
    let server = setup_test_server().await;

    let (status, _) = upload_note(&server.router, "garbage", &note_fields("x"), Some(pdf())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_approve_makes_note_public_and_reverify_conflicts() {
    let server = setup_test_server().await;
    let (student, _) = server.student("asha@example.com").await;
    let (_, admin_token) = server.admin("admin@example.com").await;
    let note = server
        .seed_note(Some(student.id), NoteSeed { status: "PENDING", ..NoteSeed::default() })
        .await;

    let path = format!("/api/v1/notes/{}/verify?action=approve", note.id);
    let (status, body) = put_empty(&server.router, &path, &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");

    let (_, listing) = get_request(&server.router, "/api/v1/notes").await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let reject = format!("/api/v1/notes/{}/verify?action=reject", note.id);
    let (status, body) = put_empty(&server.router, &reject, &admin_token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["category"], "conflict");
}

#[tokio::test]
async fn test_rejected_note_never_listed() {
    let server = setup_test_server().await;
    let (_, admin_token) = server.admin("admin@example.com").await;
    let note = server
        .seed_note(None, NoteSeed { status: "PENDING", ..NoteSeed::default() })
        .await;

    let path = format!("/api/v1/notes/{}/verify?action=reject", note.id);
    let (status, body) = put_empty(&server.router, &path, &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "REJECTED");

    let (_, listing) = get_request(&server.router, "/api/v1/notes").await;
    assert!(listing.as_array().unwrap().is_empty());
    let (_, board) = get_request(&server.router, "/api/v1/notes/leaderboard").await;
    assert!(board.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_verify_rejects_unknown_action_and_non_admin() {
    let server = setup_test_server().await;
    let (_, student_token) = server.student("asha@example.com").await;
    let (_, admin_token) = server.admin("admin@example.com").await;
    let note = server
        .seed_note(None, NoteSeed { status: "PENDING", ..NoteSeed::default() })
        .await;

    let path = format!("/api/v1/notes/{}/verify?action=publish", note.id);
    let (status, _) = put_empty(&server.router, &path, &admin_token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let path = format!("/api/v1/notes/{}/verify?action=approve", note.id);
    let (status, body) = put_empty(&server.router, &path, &student_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["category"], "forbidden");

    let missing = format!("/api/v1/notes/{}/verify?action=approve", uuid::Uuid::new_v4());
    let (status, _) = put_empty(&server.router, &missing, &admin_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pending_queue_is_admin_only_oldest_first() {
    let server = setup_test_server().await;
    let (_, student_token) = server.student("asha@example.com").await;
    let (_, admin_token) = server.admin("admin@example.com").await;

    server
        .seed_note(None, NoteSeed { title: "newer", status: "PENDING", age_minutes: 1, ..NoteSeed::default() })
        .await;
    server
        .seed_note(None, NoteSeed { title: "older", status: "PENDING", age_minutes: 10, ..NoteSeed::default() })
        .await;
    server.seed_note(None, NoteSeed { title: "live", ..NoteSeed::default() }).await;

    let (status, _) = get_authed(&server.router, "/api/v1/notes/pending", &student_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, queue) = get_authed(&server.router, "/api/v1/notes/pending", &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&queue), vec!["older", "newer"]);

    let (status, all) = get_authed(&server.router, "/api/v1/notes/admin/all", &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&all), vec!["live", "newer", "older"]);
}

#[tokio::test]
async fn test_admin_update_overwrites_fields() {
    let server = setup_test_server().await;
    let (_, admin_token) = server.admin("admin@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}", note.id);

    let (status, body) = put_json(
        &server.router,
        &path,
        &admin_token,
        json!({"title": "Renamed", "status": "REJECTED", "is_premium": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["status"], "REJECTED");
    assert_eq!(body["is_premium"], true);
    assert_eq!(body["subject"], "Data Structures");

    let (status, _) = put_json(&server.router, &path, &admin_token, json!({"status": "ARCHIVED"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_removes_note_and_interactions() {
    let server = setup_test_server().await;
    let (_, admin_token) = server.admin("admin@example.com").await;
    let (_, student_token) = server.student("asha@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;

    let vote_path = format!("/api/v1/notes/{}/vote", note.id);
    post_json(&server.router, &vote_path, Some(&student_token), json!({"vote_type": 1})).await;
    let review_path = format!("/api/v1/notes/{}/review", note.id);
    post_json(&server.router, &review_path, Some(&student_token), json!({"rating": 4})).await;

    let path = format!("/api/v1/notes/{}", note.id);
    let (status, _) = delete_request(&server.router, &path, &student_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = delete_request(&server.router, &path, &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note deleted successfully");

    let (status, _) = post_json(&server.router, &vote_path, Some(&student_token), json!({"vote_type": 1})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, reviews) = get_request(&server.router, &format!("/api/v1/notes/{}/reviews", note.id)).await;
    assert!(reviews.as_array().unwrap().is_empty());

    let (status, _) = delete_request(&server.router, &path, &admin_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_note_id_is_unprocessable() {
    let server = setup_test_server().await;
    let (_, admin_token) = server.admin("admin@example.com").await;

    let (status, body) = delete_request(&server.router, "/api/v1/notes/not-a-uuid", &admin_token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["category"], "unprocessable");
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_listing_filters_are_conjunctive() {
    let server = setup_test_server().await;

    server
        .seed_note(None, NoteSeed { title: "cse-3-ds", ..NoteSeed::default() })
        .await;
    server
        .seed_note(None, NoteSeed { title: "cse-5-os", semester: 5, subject: "Operating Systems", ..NoteSeed::default() })
        .await;
    server
        .seed_note(None, NoteSeed { title: "ece-3-ds", branch: "ECE", ..NoteSeed::default() })
        .await;
    server
        .seed_note(None, NoteSeed {
            title: "cse-3-paper",
            category: "UNIVERSITY_PAPER",
            year: Some(2022),
            ..NoteSeed::default()
        })
        .await;

    let (status, body) = get_request(&server.router, "/api/v1/notes?branch=CSE&semester=3").await;
    assert_eq!(status, StatusCode::OK);
    let mut found = titles(&body);
    found.sort();
    assert_eq!(found, vec!["cse-3-ds", "cse-3-paper"]);

    let (_, body) = get_request(&server.router, "/api/v1/notes?subject=operating").await;
    assert_eq!(titles(&body), vec!["cse-5-os"]);

    let (_, body) = get_request(&server.router, "/api/v1/notes?category=UNIVERSITY_PAPER&year=2022").await;
    assert_eq!(titles(&body), vec!["cse-3-paper"]);

    let (_, body) = get_request(&server.router, "/api/v1/notes?branch=ME").await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_sort_and_limit() {
    let server = setup_test_server().await;

    server
        .seed_note(None, NoteSeed { title: "old-top", rating: 4.5, vote_count: 1, age_minutes: 30, ..NoteSeed::default() })
        .await;
    server
        .seed_note(None, NoteSeed { title: "tied-more-votes", rating: 4.5, vote_count: 7, age_minutes: 20, ..NoteSeed::default() })
        .await;
    server
        .seed_note(None, NoteSeed { title: "newest", rating: 2.0, age_minutes: 0, ..NoteSeed::default() })
        .await;

    let (_, body) = get_request(&server.router, "/api/v1/notes").await;
    assert_eq!(titles(&body), vec!["newest", "tied-more-votes", "old-top"]);

    let (_, body) = get_request(&server.router, "/api/v1/notes?sort_by=rating").await;
    assert_eq!(titles(&body), vec!["tied-more-votes", "old-top", "newest"]);

    let (_, body) = get_request(&server.router, "/api/v1/notes?limit=1").await;
    assert_eq!(titles(&body), vec!["newest"]);

    let (_, body) = get_request(&server.router, "/api/v1/notes?sort_by=popularity").await;
    assert_eq!(titles(&body)[0], "newest");
}

// ============================================================================
// Access gate
// ============================================================================

#[tokio::test]
async fn test_premium_file_locked_unless_premium_member() {
    let server = setup_test_server().await;
    let (_, student_token) = server.student("free@example.com").await;
    let (_, premium_token) = server.premium_student("paid@example.com").await;

    let premium = server
        .seed_note(None, NoteSeed { title: "premium", is_premium: true, ..NoteSeed::default() })
        .await;
    let free = server
        .seed_note(None, NoteSeed { title: "free", age_minutes: 5, ..NoteSeed::default() })
        .await;

    let url_of = |body: &Value, title: &str| -> String {
        body.as_array()
            .unwrap()
            .iter()
            .find(|n| n["title"] == title)
            .map(|n| n["file_url"].as_str().unwrap().to_string())
            .unwrap()
    };

    let (_, anon) = get_request(&server.router, "/api/v1/notes").await;
    assert_eq!(url_of(&anon, "premium"), "LOCKED");
    assert_eq!(url_of(&anon, "free"), free.file_url);

    let (_, member) = get_authed(&server.router, "/api/v1/notes", &student_token).await;
    assert_eq!(url_of(&member, "premium"), "LOCKED");

    let (_, paid) = get_authed(&server.router, "/api/v1/notes", &premium_token).await;
    assert_eq!(url_of(&paid, "premium"), premium.file_url);

    let (status, bogus) = get_authed(&server.router, "/api/v1/notes", "expired-or-forged").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(url_of(&bogus, "premium"), "LOCKED");
}

#[tokio::test]
async fn test_listing_with_unknown_account_creates_nothing() {
    let server = setup_test_server().await;
    server
        .seed_note(None, NoteSeed { title: "premium", is_premium: true, ..NoteSeed::default() })
        .await;
    let token = server.platform.jwt.issue("ghost@example.com", "STUDENT").unwrap();

    let (status, body) = get_authed(&server.router, "/api/v1/notes", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["file_url"], "LOCKED");

    let ghost = user::Entity::find()
        .filter(user::Column::Email.eq("ghost@example.com"))
        .one(server.db())
        .await
        .unwrap();
    assert!(ghost.is_none());
}

// ============================================================================
// Leaderboard
// ============================================================================

#[tokio::test]
async fn test_leaderboard_counts_approved_notes() {
    let server = setup_test_server().await;
    let (asha, _) = server.student("asha@example.com").await;
    let (ravi, _) = server.student("ravi@example.com").await;
    server.set_full_name(&asha, "Asha").await;

    for _ in 0..3 {
        server.seed_note(Some(asha.id), NoteSeed::default()).await;
    }
    server.seed_note(Some(ravi.id), NoteSeed::default()).await;
    for _ in 0..5 {
        server
            .seed_note(Some(ravi.id), NoteSeed { status: "PENDING", ..NoteSeed::default() })
            .await;
    }

    let (status, board) = get_request(&server.router, "/api/v1/notes/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        board,
        json!([
            {"rank": 1, "name": "Asha", "count": 3},
            {"rank": 2, "name": "Anonymous", "count": 1},
        ])
    );

    let (_, board) = get_request(&server.router, "/api/v1/notes/leaderboard?limit=1").await;
    assert_eq!(board.as_array().unwrap().len(), 1);
}
