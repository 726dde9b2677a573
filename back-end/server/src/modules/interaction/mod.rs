pub mod downloads;
pub mod reviews;
pub mod votes;

pub use downloads::DownloadService;
pub use reviews::{RatingAggregator, ReviewView};
pub use votes::{VoteLedger, VoteMagnitude, VoteOutcome};

use entity::note;
use sea_orm::prelude::Uuid;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect};

use crate::modules::error::{ServiceError, ServiceResult};

/// Takes the write lock on the note before anything is read.
///
/// The no-op update makes SQLite acquire its writer lock at the start of the
/// transaction, so concurrent writers queue on the busy timeout instead of
/// failing a read-to-write upgrade. On Postgres it row-locks the note.
pub(crate) async fn lock_note(
    txn: &DatabaseTransaction,
    note_id: Uuid,
) -> ServiceResult<note::Model> {
    note::Entity::update_many()
        .col_expr(note::Column::VoteCount, Expr::col(note::Column::VoteCount).into())
        .filter(note::Column::Id.eq(note_id))
        .exec(txn)
        .await?;

    note::Entity::find_by_id(note_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Note not found"))
}
