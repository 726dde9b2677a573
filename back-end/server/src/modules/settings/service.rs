//! Admin-managed key/value settings and the public pricing view of them.

use chrono::Utc;
use entity::system_setting;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::modules::accounts::{Actor, Capability};
use crate::modules::error::{ServiceError, ServiceResult};

pub const SEMESTER_PRICE_KEY: &str = "semester_price";
pub const YEARLY_PRICE_KEY: &str = "yearly_price";

const DEFAULT_SEMESTER_PRICE: f64 = 499.0;
const DEFAULT_YEARLY_PRICE: f64 = 999.0;

/// Settings readable without signing in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicConfig {
    pub semester_price: f64,
    pub yearly_price: f64,
}

impl Default for PublicConfig {
    fn default() -> Self {
        Self {
            semester_price: DEFAULT_SEMESTER_PRICE,
            yearly_price: DEFAULT_YEARLY_PRICE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingUpsert {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

pub struct SettingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stored prices override the defaults only when they parse as numbers.
    pub async fn public_config(&self) -> ServiceResult<PublicConfig> {
        let stored = system_setting::Entity::find()
            .filter(system_setting::Column::Key.is_in([SEMESTER_PRICE_KEY, YEARLY_PRICE_KEY]))
            .all(self.db)
            .await?;

        let mut config = PublicConfig::default();
        for setting in stored {
            let Ok(value) = setting.value.trim().parse::<f64>() else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }
            match setting.key.as_str() {
                SEMESTER_PRICE_KEY => config.semester_price = value,
                YEARLY_PRICE_KEY => config.yearly_price = value,
                _ => {}
            }
        }

        Ok(config)
    }

    pub async fn list(&self, actor: &Actor) -> ServiceResult<Vec<system_setting::Model>> {
        actor.require(Capability::Configure)?;

        Ok(system_setting::Entity::find()
            .order_by_asc(system_setting::Column::Key)
            .all(self.db)
            .await?)
    }

    /// Creates or overwrites a setting. An existing description is kept
    /// unless a new one is supplied.
    pub async fn upsert(
        &self,
        actor: &Actor,
        upsert: SettingUpsert,
    ) -> ServiceResult<system_setting::Model> {
        actor.require(Capability::Configure)?;

        let key = upsert.key.trim().to_string();
        if key.is_empty() {
            return Err(ServiceError::unprocessable("Setting key must not be empty"));
        }
        let description = upsert.description.filter(|d| !d.is_empty());

        let existing = system_setting::Entity::find_by_id(key.clone())
            .one(self.db)
            .await?;

        let setting = match existing {
            Some(setting) => {
                let mut active = setting.into_active_model();
                active.value = Set(upsert.value);
                if let Some(description) = description {
                    active.description = Set(Some(description));
                }
                active.updated_at = Set(Utc::now().into());
                active.update(self.db).await?
            }
            None => {
                system_setting::ActiveModel {
                    key: Set(key),
                    value: Set(upsert.value),
                    description: Set(description),
                    updated_at: Set(Utc::now().into()),
                }
                .insert(self.db)
                .await?
            }
        };

        info!(key = %setting.key, by = %actor.id, "Setting saved");
        Ok(setting)
    }
}
