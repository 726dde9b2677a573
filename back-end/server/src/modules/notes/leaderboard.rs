//! Contributor ranking by number of approved notes.

use std::collections::HashMap;

use entity::{note, user};
use sea_orm::prelude::Uuid;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;

use super::moderation::NoteStatus;
use crate::modules::error::ServiceResult;

pub const DEFAULT_LEADERBOARD_LIMIT: u64 = 10;
pub const ANONYMOUS_NAME: &str = "Anonymous";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub count: i64,
}

/// Ranks uploaders by approved note count, ties broken by uploader id.
/// Ranks are 1-based output positions.
pub async fn leaderboard(
    db: &DatabaseConnection,
    limit: Option<u64>,
) -> ServiceResult<Vec<LeaderboardEntry>> {
    let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LEADERBOARD_LIMIT);

    let counts: Vec<(Uuid, i64)> = note::Entity::find()
        .select_only()
        .column(note::Column::UploadedBy)
        .column_as(note::Column::Id.count(), "note_count")
        .filter(note::Column::Status.eq(NoteStatus::Approved.as_str()))
        .filter(note::Column::UploadedBy.is_not_null())
        .group_by(note::Column::UploadedBy)
        .order_by_desc(note::Column::Id.count())
        .order_by_asc(note::Column::UploadedBy)
        .limit(limit)
        .into_tuple()
        .all(db)
        .await?;

    let ids: Vec<Uuid> = counts.iter().map(|(id, _)| *id).collect();
    let names: HashMap<Uuid, Option<String>> = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect();

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(idx, (user_id, count))| LeaderboardEntry {
            rank: idx + 1,
            name: names
                .get(&user_id)
                .cloned()
                .flatten()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
            count,
        })
        .collect())
}
