use super::helpers::*;
use crate::bootstrap::init::{setup_test_server, NoteSeed};
use axum::http::StatusCode;
use entity::note;
use sea_orm::EntityTrait;
use serde_json::json;
use uuid::Uuid;

// ============================================================================
// Votes
// ============================================================================

#[tokio::test]
async fn test_upvote_toggle_then_downvote() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/vote", note.id);

    let (status, body) = post_json(&server.router, &path, Some(&token), json!({"vote_type": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vote_count"], 1);
    assert_eq!(body["user_vote"], 1);

    let (_, body) = post_json(&server.router, &path, Some(&token), json!({"vote_type": 1})).await;
    assert_eq!(body["vote_count"], 0);
    assert_eq!(body["user_vote"], 0);

    let (_, body) = post_json(&server.router, &path, Some(&token), json!({"vote_type": -1})).await;
    assert_eq!(body["vote_count"], -1);
    assert_eq!(body["user_vote"], -1);
}

#[tokio::test]
async fn test_switching_vote_applies_difference() {
    let server = setup_test_server().await;
    let (_, asha) = server.student("asha@example.com").await;
    let (_, ravi) = server.student("ravi@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/vote", note.id);

    post_json(&server.router, &path, Some(&asha), json!({"vote_type": 1})).await;
    post_json(&server.router, &path, Some(&ravi), json!({"vote_type": 1})).await;
    let (_, body) = post_json(&server.router, &path, Some(&ravi), json!({"vote_type": -1})).await;

    assert_eq!(body["vote_count"], 0);
    assert_eq!(body["user_vote"], -1);

    let (status, state) = get_authed(&server.router, &path, &asha).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["vote_count"], 0);
    assert_eq!(state["user_vote"], 1);

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.vote_count, 0);
}

#[tokio::test]
async fn test_vote_rejects_bad_magnitude_and_unknown_note() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;

    let path = format!("/api/v1/notes/{}/vote", note.id);
    let (status, body) = post_json(&server.router, &path, Some(&token), json!({"vote_type": 2})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["category"], "unprocessable");

    let (status, _) = post_json(&server.router, &path, Some(&token), json!({"vote_type": "up"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing = format!("/api/v1/notes/{}/vote", Uuid::new_v4());
    let (status, body) = post_json(&server.router, &missing, Some(&token), json!({"vote_type": 1})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Note not found");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_all_apply() {
    let server = setup_test_server().await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/vote", note.id);

    let mut tasks = Vec::new();
    for i in 0..8 {
        let (_, token) = server.student(&format!("voter{i}@example.com")).await;
        let router = server.router.clone();
        let path = path.clone();
        tasks.push(tokio::spawn(async move {
            post_json(&router, &path, Some(&token), json!({"vote_type": 1})).await
        }));
    }

    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["user_vote"], 1);
    }

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.vote_count, 8);
}

#[tokio::test]
async fn test_vote_requires_sign_in() {
    let server = setup_test_server().await;
    let note = server.seed_note(None, NoteSeed::default()).await;

    let path = format!("/api/v1/notes/{}/vote", note.id);
    let (status, _) = post_json(&server.router, &path, None, json!({"vote_type": 1})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Reviews
// ============================================================================

#[tokio::test]
async fn test_reviews_aggregate_to_mean() {
    let server = setup_test_server().await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/review", note.id);

    for (i, rating) in [5, 4, 2].into_iter().enumerate() {
        let (_, token) = server.student(&format!("reviewer{i}@example.com")).await;
        let (status, _) = post_json(&server.router, &path, Some(&token), json!({"rating": rating})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating_count, 3);
    assert!((stored.rating - 11.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_second_review_conflicts_without_changing_aggregate() {
    let server = setup_test_server().await;
    let (user, token) = server.student("asha@example.com").await;
    server.set_full_name(&user, "Asha").await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/review", note.id);

    let (status, review) = post_json(
        &server.router,
        &path,
        Some(&token),
        json!({"rating": 4, "comment": "Clear diagrams"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review["rating"], 4);
    assert_eq!(review["user_name"], "Asha");
    assert_eq!(review["comment"], "Clear diagrams");

    let (status, body) = post_json(&server.router, &path, Some(&token), json!({"rating": 1})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already reviewed this note");

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating_count, 1);
    assert_eq!(stored.rating, 4.0);
}

#[tokio::test]
async fn test_review_validation_order() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;

    let path = format!("/api/v1/notes/{}/review", note.id);
    for rating in [0, 6] {
        let (status, _) = post_json(&server.router, &path, Some(&token), json!({"rating": rating})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    let missing = format!("/api/v1/notes/{}/review", Uuid::new_v4());
    let (status, _) = post_json(&server.router, &missing, Some(&token), json!({"rating": 9})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_reviews_newest_first_with_fallback_name() {
    let server = setup_test_server().await;
    let (named, named_token) = server.student("named@example.com").await;
    server.set_full_name(&named, "Named Person").await;
    let (_, anon_token) = server.student("noname@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/review", note.id);

    post_json(&server.router, &path, Some(&named_token), json!({"rating": 5})).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    post_json(&server.router, &path, Some(&anon_token), json!({"rating": 3})).await;

    let (status, reviews) = get_request(&server.router, &format!("/api/v1/notes/{}/reviews", note.id)).await;
    assert_eq!(status, StatusCode::OK);

    let reviews = reviews.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["user_name"], "Unknown");
    assert_eq!(reviews[0]["rating"], 3);
    assert_eq!(reviews[1]["user_name"], "Named Person");

    let (status, none) = get_request(&server.router, &format!("/api/v1/notes/{}/reviews", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reviews_keep_mean_consistent() {
    let server = setup_test_server().await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/review", note.id);

    let mut tasks = Vec::new();
    for (i, rating) in [5, 4, 3, 2, 1, 5].into_iter().enumerate() {
        let (_, token) = server.student(&format!("critic{i}@example.com")).await;
        let router = server.router.clone();
        let path = path.clone();
        tasks.push(tokio::spawn(async move {
            post_json(&router, &path, Some(&token), json!({"rating": rating})).await
        }));
    }

    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating_count, 6);
    assert!((stored.rating - 20.0 / 6.0).abs() < 1e-9);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_duplicate_reviews_conflict() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let path = format!("/api/v1/notes/{}/review", note.id);

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let router = server.router.clone();
        let path = path.clone();
        let token = token.clone();
        tasks.push(tokio::spawn(async move {
            post_json(&router, &path, Some(&token), json!({"rating": 4})).await
        }));
    }

    let mut statuses = Vec::new();
    for task in tasks {
        let (status, _) = task.await.unwrap();
        statuses.push(status);
    }
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(),
        3
    );

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating_count, 1);
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
async fn test_download_is_idempotent_and_listed() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;
    let first = server
        .seed_note(None, NoteSeed { title: "first", ..NoteSeed::default() })
        .await;
    let second = server
        .seed_note(None, NoteSeed { title: "second", ..NoteSeed::default() })
        .await;

    let first_path = format!("/api/v1/notes/{}/download", first.id);
    let (status, body) = post_empty(&server.router, &first_path, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Download recorded");
    let (status, _) = post_empty(&server.router, &first_path, &token).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    post_empty(&server.router, &format!("/api/v1/notes/{}/download", second.id), &token).await;

    let (status, downloads) = get_authed(&server.router, "/api/v1/auth/me/downloads", &token).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = downloads
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["second", "first"]);

    let missing = format!("/api/v1/notes/{}/download", Uuid::new_v4());
    let (status, _) = post_empty(&server.router, &missing, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_downloaded_premium_note_stays_locked_for_free_user() {
    let server = setup_test_server().await;
    let (_, free) = server.student("free@example.com").await;
    let (_, premium) = server.premium_student("paid@example.com").await;
    let note = server
        .seed_note(None, NoteSeed { is_premium: true, ..NoteSeed::default() })
        .await;

    let path = format!("/api/v1/notes/{}/download", note.id);
    let (status, _) = post_empty(&server.router, &path, &free).await;
    assert_eq!(status, StatusCode::OK);
    post_empty(&server.router, &path, &premium).await;

    let (status, downloads) = get_authed(&server.router, "/api/v1/auth/me/downloads", &free).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(downloads[0]["file_url"], "LOCKED");

    let (_, downloads) = get_authed(&server.router, "/api/v1/auth/me/downloads", &premium).await;
    assert_eq!(downloads[0]["file_url"], note.file_url.as_str());

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.file_url, note.file_url);
}
