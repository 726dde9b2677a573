//! Note catalog service: upload relay, public listing, moderation queue and
//! admin maintenance.

use chrono::Utc;
use entity::{download, note, review, vote};
use sea_orm::prelude::Uuid;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::access::{gate_file_url, Requester};
use super::category::NoteCategory;
use super::moderation::{ModerationAction, NoteStatus};
use super::query::ListQuery;
use crate::modules::accounts::{Actor, Capability};
use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::storage::{object_path, ObjectStorage};

// ============================================================================
// Domain Types
// ============================================================================

pub const DEFAULT_UNIVERSITY: &str = "AKTU";

/// Metadata submitted alongside an uploaded file.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub university: Option<String>,
    pub branch: String,
    pub semester: i32,
    pub subject: String,
    pub category: NoteCategory,
    pub year: Option<i32>,
    pub is_premium: bool,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Admin edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub status: Option<NoteStatus>,
    pub is_premium: Option<bool>,
}

// ============================================================================
// Note Service
// ============================================================================

pub struct NoteService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NoteService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores the file and creates the note in its initial moderation state.
    pub async fn upload(
        &self,
        actor: &Actor,
        storage: &dyn ObjectStorage,
        meta: NewNote,
        file: UploadedFile,
    ) -> ServiceResult<note::Model> {
        actor.require(Capability::Contribute)?;

        if meta.title.trim().is_empty() {
            return Err(ServiceError::unprocessable("Title must not be empty"));
        }
        if file.bytes.is_empty() {
            return Err(ServiceError::unprocessable("Uploaded file is empty"));
        }

        let path = object_path(actor.id, &file.file_name);
        let file_url = storage.put(&path, file.bytes, &file.content_type).await?;

        let status = NoteStatus::initial_for(actor.role);
        let note = note::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(meta.title),
            file_url: Set(file_url),
            uploaded_by: Set(Some(actor.id)),
            status: Set(status.as_str().to_string()),
            university: Set(meta
                .university
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIVERSITY.to_string())),
            branch: Set(meta.branch),
            semester: Set(meta.semester),
            subject: Set(meta.subject),
            is_premium: Set(meta.is_premium),
            category: Set(meta.category.as_str().to_string()),
            year: Set(meta.year),
            vote_count: Set(0),
            rating: Set(0.0),
            rating_count: Set(0),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db)
        .await?;

        info!(note_id = %note.id, user_id = %actor.id, status = %status, path = %path, "Note uploaded");
        Ok(note)
    }

    /// Approved notes with premium file locations gated for the requester.
    pub async fn list_public(
        &self,
        query: &ListQuery,
        requester: Requester,
    ) -> ServiceResult<Vec<note::Model>> {
        let notes = query.apply(note::Entity::find()).all(self.db).await?;

        Ok(notes
            .into_iter()
            .map(|n| gate_file_url(n, requester))
            .collect())
    }

    /// Moderation queue, oldest first.
    pub async fn list_pending(&self, actor: &Actor) -> ServiceResult<Vec<note::Model>> {
        actor.require(Capability::Moderate)?;

        Ok(note::Entity::find()
            .filter(note::Column::Status.eq(NoteStatus::Pending.as_str()))
            .order_by_asc(note::Column::CreatedAt)
            .all(self.db)
            .await?)
    }

    pub async fn list_all(&self, actor: &Actor) -> ServiceResult<Vec<note::Model>> {
        actor.require(Capability::ManageCatalog)?;

        Ok(note::Entity::find()
            .order_by_desc(note::Column::CreatedAt)
            .all(self.db)
            .await?)
    }

    pub async fn moderate(
        &self,
        actor: &Actor,
        note_id: Uuid,
        action: ModerationAction,
    ) -> ServiceResult<note::Model> {
        actor.require(Capability::Moderate)?;

        let note = self.get(note_id).await?;
        let current: NoteStatus = note.status.parse()?;
        let next = current.apply(action)?;

        let mut active = note.into_active_model();
        active.status = Set(next.as_str().to_string());
        let note = active.update(self.db).await?;

        info!(note_id = %note.id, from = %current, to = %next, by = %actor.id, "Note moderated");
        Ok(note)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        note_id: Uuid,
        update: NoteUpdate,
    ) -> ServiceResult<note::Model> {
        actor.require(Capability::ManageCatalog)?;

        let mut active = self.get(note_id).await?.into_active_model();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(is_premium) = update.is_premium {
            active.is_premium = Set(is_premium);
        }

        let note = active.update(self.db).await?;
        info!(note_id = %note.id, by = %actor.id, "Note updated");
        Ok(note)
    }

    /// Deletes the note; its votes, reviews and downloads go with it.
    pub async fn delete(&self, actor: &Actor, note_id: Uuid) -> ServiceResult<()> {
        actor.require(Capability::ManageCatalog)?;

        let note = self.get(note_id).await?;

        // Explicit so engines without FK enforcement behave the same
        let txn = self.db.begin().await?;
        vote::Entity::delete_many()
            .filter(vote::Column::NoteId.eq(note_id))
            .exec(&txn)
            .await?;
        review::Entity::delete_many()
            .filter(review::Column::NoteId.eq(note_id))
            .exec(&txn)
            .await?;
        download::Entity::delete_many()
            .filter(download::Column::NoteId.eq(note_id))
            .exec(&txn)
            .await?;
        note.delete(&txn).await?;
        txn.commit().await?;

        info!(note_id = %note_id, by = %actor.id, "Note deleted");
        Ok(())
    }

    pub async fn get(&self, note_id: Uuid) -> ServiceResult<note::Model> {
        note::Entity::find_by_id(note_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Note not found"))
    }
}
