use std::collections::HashMap;

use crate::bootstrap::init::{setup_test_server, NoteSeed};
use chrono::Utc;
use entity::{note, vote};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use server::modules::accounts::Actor;
use server::modules::interaction::{RatingAggregator, VoteLedger};
use server::modules::error::is_unique_violation;
use server::modules::ServiceError;

#[tokio::test]
async fn test_vote_count_matches_ledger_after_mixed_sequence() {
    let server = setup_test_server().await;
    let note = server.seed_note(None, NoteSeed::default()).await;

    let mut actors = Vec::new();
    for i in 0..4 {
        let (user, _) = server.student(&format!("voter{i}@example.com")).await;
        actors.push(Actor::from(&user));
    }

    // (voter, vote_type)
    let script = [
        (0, 1), (1, 1), (2, -1), (0, 1), (3, 1), (1, -1), (2, -1), (2, 1), (0, -1), (3, 1),
    ];

    let ledger = VoteLedger::new(server.db());
    let mut expected: HashMap<usize, i32> = HashMap::new();

    for (voter, vote_type) in script {
        let previous = expected.get(&voter).copied().unwrap_or(0);
        let next = if previous == vote_type { 0 } else { vote_type };
        expected.insert(voter, next);

        let outcome = ledger
            .cast_vote(&actors[voter], note.id, vote_type)
            .await
            .unwrap();
        assert_eq!(outcome.user_vote, next);
        assert_eq!(outcome.vote_count, expected.values().sum::<i32>());
    }

    let rows = vote::Entity::find()
        .filter(vote::Column::NoteId.eq(note.id))
        .all(server.db())
        .await
        .unwrap();
    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(rows.len(), expected.values().filter(|v| **v != 0).count());
    assert_eq!(stored.vote_count, rows.iter().map(|v| v.vote_type).sum::<i32>());
}

#[tokio::test]
async fn test_vote_state_without_vote_is_zero() {
    let server = setup_test_server().await;
    let note = server.seed_note(None, NoteSeed { vote_count: 0, ..NoteSeed::default() }).await;
    let (user, _) = server.student("asha@example.com").await;

    let state = VoteLedger::new(server.db())
        .vote_state(&Actor::from(&user), note.id)
        .await
        .unwrap();

    assert_eq!(state.user_vote, 0);
    assert_eq!(state.vote_count, 0);
}

#[tokio::test]
async fn test_rating_mean_independent_of_order() {
    let ratings = [1, 5, 3, 4, 4];
    let mut reversed = ratings;
    reversed.reverse();

    let mut results = Vec::new();
    for order in [ratings, reversed] {
        let server = setup_test_server().await;
        let note = server.seed_note(None, NoteSeed::default()).await;
        let aggregator = RatingAggregator::new(server.db());

        for (i, rating) in order.into_iter().enumerate() {
            let (user, _) = server.student(&format!("r{i}@example.com")).await;
            aggregator
                .add_review(&Actor::from(&user), note.id, rating, None)
                .await
                .unwrap();
        }

        let stored = note::Entity::find_by_id(note.id)
            .one(server.db())
            .await
            .unwrap()
            .unwrap();
        results.push((stored.rating, stored.rating_count));
    }

    assert_eq!(results[0].1, 5);
    assert!((results[0].0 - 3.4).abs() < 1e-9);
    assert!((results[0].0 - results[1].0).abs() < 1e-9);
    assert_eq!(results[0].1, results[1].1);
}

#[tokio::test]
async fn test_duplicate_review_rolls_back() {
    let server = setup_test_server().await;
    let note = server.seed_note(None, NoteSeed::default()).await;
    let (user, _) = server.student("asha@example.com").await;
    let actor = Actor::from(&user);
    let aggregator = RatingAggregator::new(server.db());

    aggregator.add_review(&actor, note.id, 2, None).await.unwrap();
    let err = aggregator
        .add_review(&actor, note.id, 5, Some("changed my mind".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let stored = note::Entity::find_by_id(note.id)
        .one(server.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating_count, 1);
    assert_eq!(stored.rating, 2.0);
}

#[tokio::test]
async fn test_duplicate_vote_row_is_a_unique_violation() {
    let server = setup_test_server().await;
    let (user, _) = server.student("asha@example.com").await;
    let note = server.seed_note(None, NoteSeed::default()).await;

    let row = |vote_type| vote::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        user_id: Set(user.id),
        note_id: Set(note.id),
        vote_type: Set(vote_type),
        created_at: Set(Utc::now().into()),
    };

    row(1).insert(server.db()).await.unwrap();
    let err = row(-1).insert(server.db()).await.unwrap_err();
    assert!(is_unique_violation(&err));
}
