//! Announcements posted by admins.

use chrono::Utc;
use entity::circular;
use sea_orm::prelude::Uuid;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use crate::modules::accounts::{Actor, Capability};
use crate::modules::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Deserialize)]
pub struct NewCircular {
    pub title: String,
    pub message: Option<String>,
    pub link: Option<String>,
}

pub struct CircularService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CircularService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, actor: &Actor, new: NewCircular) -> ServiceResult<circular::Model> {
        actor.require(Capability::Publish)?;

        if new.title.trim().is_empty() {
            return Err(ServiceError::unprocessable("Title must not be empty"));
        }

        let circular = circular::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            message: Set(new.message),
            link: Set(new.link.filter(|l| !l.trim().is_empty())),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db)
        .await?;

        info!(circular_id = %circular.id, by = %actor.id, "Circular published");
        Ok(circular)
    }

    /// Newest first.
    pub async fn list(&self) -> ServiceResult<Vec<circular::Model>> {
        Ok(circular::Entity::find()
            .order_by_desc(circular::Column::CreatedAt)
            .all(self.db)
            .await?)
    }

    pub async fn delete(&self, actor: &Actor, circular_id: Uuid) -> ServiceResult<()> {
        actor.require(Capability::Publish)?;

        let circular = circular::Entity::find_by_id(circular_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Circular not found"))?;
        circular.delete(self.db).await?;

        info!(circular_id = %circular_id, by = %actor.id, "Circular deleted");
        Ok(())
    }
}
