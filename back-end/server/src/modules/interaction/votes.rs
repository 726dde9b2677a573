//! Vote ledger.
//!
//! One signed vote per (user, note). Casting the same sign again withdraws
//! the vote; casting the other sign switches it. The note's `vote_count` is
//! recomputed from the vote rows inside the same transaction, with the note
//! row write-locked before anything is read.

use chrono::Utc;
use entity::{note, vote};
use sea_orm::prelude::Uuid;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};

use super::lock_note;
use serde::Serialize;
use tracing::info;

use crate::modules::accounts::{Actor, Capability};
use crate::modules::error::{is_unique_violation, ServiceError, ServiceResult};

// ============================================================================
// Domain Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteMagnitude {
    Up,
    Down,
}

impl VoteMagnitude {
    pub fn value(&self) -> i32 {
        match self {
            VoteMagnitude::Up => 1,
            VoteMagnitude::Down => -1,
        }
    }
}

impl TryFrom<i32> for VoteMagnitude {
    type Error = ServiceError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteMagnitude::Up),
            -1 => Ok(VoteMagnitude::Down),
            other => Err(ServiceError::unprocessable(format!(
                "vote_type must be 1 or -1, got {other}"
            ))),
        }
    }
}

/// Note total and the caller's remaining vote (0 when none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub note_id: Uuid,
    pub vote_count: i32,
    pub user_vote: i32,
}

// ============================================================================
// Vote Ledger
// ============================================================================

pub struct VoteLedger<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VoteLedger<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn cast_vote(
        &self,
        actor: &Actor,
        note_id: Uuid,
        vote_type: i32,
    ) -> ServiceResult<VoteOutcome> {
        actor.require(Capability::Contribute)?;
        let magnitude = VoteMagnitude::try_from(vote_type)?.value();

        let txn = self.db.begin().await?;

        let note = lock_note(&txn, note_id).await?;

        let existing = find_vote(&txn, actor.id, note_id).await?;

        let user_vote = match existing {
            None => {
                vote::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(actor.id),
                    note_id: Set(note_id),
                    vote_type: Set(magnitude),
                    created_at: Set(Utc::now().into()),
                }
                .insert(&txn)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        ServiceError::Conflict("Vote already being recorded".to_string())
                    } else {
                        err.into()
                    }
                })?;
                magnitude
            }
            Some(previous) if previous.vote_type == magnitude => {
                previous.delete(&txn).await?;
                0
            }
            Some(previous) => {
                let mut active = previous.into_active_model();
                active.vote_type = Set(magnitude);
                active.update(&txn).await?;
                magnitude
            }
        };

        let vote_count = tally(&txn, note_id).await?;

        let mut note = note.into_active_model();
        note.vote_count = Set(vote_count);
        note.update(&txn).await?;

        txn.commit().await?;

        info!(note_id = %note_id, user_id = %actor.id, vote_count, user_vote, "Vote recorded");
        Ok(VoteOutcome {
            note_id,
            vote_count,
            user_vote,
        })
    }

    pub async fn vote_state(&self, actor: &Actor, note_id: Uuid) -> ServiceResult<VoteOutcome> {
        let note = note::Entity::find_by_id(note_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Note not found"))?;

        let user_vote = find_vote(self.db, actor.id, note_id)
            .await?
            .map(|v| v.vote_type)
            .unwrap_or(0);

        Ok(VoteOutcome {
            note_id,
            vote_count: note.vote_count,
            user_vote,
        })
    }
}

async fn find_vote<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    note_id: Uuid,
) -> ServiceResult<Option<vote::Model>> {
    Ok(vote::Entity::find()
        .filter(vote::Column::UserId.eq(user_id))
        .filter(vote::Column::NoteId.eq(note_id))
        .one(conn)
        .await?)
}

/// Sum of all vote magnitudes on the note.
async fn tally<C: ConnectionTrait>(conn: &C, note_id: Uuid) -> ServiceResult<i32> {
    let magnitudes: Vec<i32> = vote::Entity::find()
        .select_only()
        .column(vote::Column::VoteType)
        .filter(vote::Column::NoteId.eq(note_id))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(magnitudes.into_iter().sum())
}
