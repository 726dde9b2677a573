use chrono::Utc;
use entity::{download, note};
use sea_orm::prelude::Uuid;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use crate::modules::accounts::{Actor, Capability};
use crate::modules::error::{ServiceError, ServiceResult};

pub struct DownloadService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DownloadService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records that the caller downloaded the note. Idempotent per
    /// (user, note); returns whether a new record was created.
    pub async fn record_download(&self, actor: &Actor, note_id: Uuid) -> ServiceResult<bool> {
        actor.require(Capability::Contribute)?;

        note::Entity::find_by_id(note_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Note not found"))?;

        if self.exists(actor.id, note_id).await? {
            return Ok(false);
        }

        let inserted = download::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(actor.id),
            note_id: Set(note_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(_) => {
                info!(note_id = %note_id, user_id = %actor.id, "Download recorded");
                Ok(true)
            }
            // Lost a race against a concurrent request for the same pair
            Err(_) if self.exists(actor.id, note_id).await? => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn exists(&self, user_id: Uuid, note_id: Uuid) -> ServiceResult<bool> {
        Ok(download::Entity::find()
            .filter(download::Column::UserId.eq(user_id))
            .filter(download::Column::NoteId.eq(note_id))
            .one(self.db)
            .await?
            .is_some())
    }
}
