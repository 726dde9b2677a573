//! Rating aggregator.
//!
//! A user reviews a note at most once. After each new review the note's
//! `rating` (mean, 0.0 when empty) and `rating_count` are recomputed from all
//! of its reviews inside the insert transaction.

use chrono::Utc;
use entity::{review, user};
use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use crate::modules::accounts::{Actor, Capability};
use super::lock_note;
use crate::modules::error::{is_unique_violation, ServiceError, ServiceResult};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const UNKNOWN_AUTHOR: &str = "Unknown";
const ALREADY_REVIEWED: &str = "You have already reviewed this note";

/// Review as shown to clients, with the author's display name.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub note_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub user_name: String,
}

impl ReviewView {
    fn new(review: review::Model, author_name: Option<String>) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            note_id: review.note_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            user_name: author_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        }
    }
}

pub struct RatingAggregator<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RatingAggregator<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn add_review(
        &self,
        actor: &Actor,
        note_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> ServiceResult<ReviewView> {
        actor.require(Capability::Contribute)?;

        let txn = self.db.begin().await?;

        let note = lock_note(&txn, note_id).await?;

        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ServiceError::unprocessable(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }

        let already_reviewed = review::Entity::find()
            .filter(review::Column::UserId.eq(actor.id))
            .filter(review::Column::NoteId.eq(note_id))
            .one(&txn)
            .await?
            .is_some();
        if already_reviewed {
            return Err(ServiceError::Conflict(ALREADY_REVIEWED.to_string()));
        }

        let created = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(Some(actor.id)),
            note_id: Set(note_id),
            rating: Set(rating),
            comment: Set(comment.filter(|c| !c.trim().is_empty())),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ServiceError::Conflict(ALREADY_REVIEWED.to_string())
            } else {
                err.into()
            }
        })?;

        let (mean, count) = aggregate(&txn, note_id).await?;

        let mut note = note.into_active_model();
        note.rating = Set(mean);
        note.rating_count = Set(count);
        note.update(&txn).await?;

        txn.commit().await?;

        info!(note_id = %note_id, user_id = %actor.id, rating, mean, count, "Review added");
        Ok(ReviewView::new(created, actor.full_name.clone()))
    }

    /// Newest first. Empty for unknown notes.
    pub async fn list_reviews(&self, note_id: Uuid) -> ServiceResult<Vec<ReviewView>> {
        let rows = review::Entity::find()
            .filter(review::Column::NoteId.eq(note_id))
            .order_by_desc(review::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(review, author)| ReviewView::new(review, author.and_then(|u| u.full_name)))
            .collect())
    }
}

/// Mean and count of all ratings on the note.
async fn aggregate<C: ConnectionTrait>(conn: &C, note_id: Uuid) -> ServiceResult<(f64, i32)> {
    let ratings: Vec<i32> = review::Entity::find()
        .select_only()
        .column(review::Column::Rating)
        .filter(review::Column::NoteId.eq(note_id))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(mean_rating(&ratings))
}

pub fn mean_rating(ratings: &[i32]) -> (f64, i32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    (sum as f64 / ratings.len() as f64, ratings.len() as i32)
}
