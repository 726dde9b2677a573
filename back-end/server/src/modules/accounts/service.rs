//! Account service: registration, login, lazy provisioning, profiles and
//! admin user management.

use chrono::Utc;
use entity::{download, note, user};
use sea_orm::prelude::Uuid;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::password::{hash_password, verify_password, PROVIDER_MANAGED};
use super::role::{Actor, Capability, Role};
use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::notes::{gate_file_url, Requester};

// ============================================================================
// Domain Types
// ============================================================================

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub sgpa: Option<f64>,
    pub target_cgpa: Option<f64>,
    pub study_hours: Option<f64>,
}

// ============================================================================
// Account Service
// ============================================================================

pub struct AccountService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn register(&self, email: &str, password: &str) -> ServiceResult<user::Model> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(ServiceError::unprocessable("Password must not be empty"));
        }

        if self.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already registered".to_string()));
        }

        let user = new_user(&email, hash_password(password)?, Role::Student)
            .insert(self.db)
            .await?;

        info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// Checks credentials of a locally registered account.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<user::Model> {
        let bad_credentials = || ServiceError::Unauthorized("Incorrect email or password".into());

        let email = normalize_email(email).map_err(|_| bad_credentials())?;
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(bad_credentials)?;

        if !verify_password(password, &user.hashed_password) {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(bad_credentials());
        }

        Ok(user)
    }

    /// Returns the account for a verified email, creating a STUDENT account
    /// on first sight.
    pub async fn find_or_provision(&self, email: &str) -> ServiceResult<user::Model> {
        let email = normalize_email(email)?;
        if let Some(user) = self.find_by_email(&email).await? {
            return Ok(user);
        }

        let inserted = new_user(&email, PROVIDER_MANAGED.to_string(), Role::Student)
            .insert(self.db)
            .await;

        match inserted {
            Ok(user) => {
                info!(user_id = %user.id, "Provisioned account for verified identity");
                Ok(user)
            }
            // A concurrent request may have provisioned the same email
            Err(err) => match self.find_by_email(&email).await? {
                Some(user) => Ok(user),
                None => Err(err.into()),
            },
        }
    }

    /// Account for a verified email, without provisioning one.
    pub async fn find_existing(&self, email: &str) -> ServiceResult<Option<user::Model>> {
        let email = normalize_email(email)?;
        self.find_by_email(&email).await
    }

    pub async fn get(&self, user_id: Uuid) -> ServiceResult<user::Model> {
        user::Entity::find_by_id(user_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> ServiceResult<user::Model> {
        let mut active = self.get(actor.id).await?.into_active_model();

        if let Some(full_name) = update.full_name {
            active.full_name = Set(Some(full_name));
        }
        if let Some(mobile_number) = update.mobile_number {
            active.mobile_number = Set(Some(mobile_number));
        }
        if let Some(semester) = update.semester {
            active.semester = Set(Some(semester));
        }
        if let Some(cgpa) = update.cgpa {
            active.cgpa = Set(Some(cgpa));
        }
        if let Some(sgpa) = update.sgpa {
            active.sgpa = Set(Some(sgpa));
        }
        if let Some(target_cgpa) = update.target_cgpa {
            active.target_cgpa = Set(Some(target_cgpa));
        }
        if let Some(study_hours) = update.study_hours {
            active.study_hours = Set(study_hours);
        }

        Ok(active.update(self.db).await?)
    }

    /// Every note the caller uploaded, in any moderation state.
    pub async fn my_uploads(&self, actor: &Actor) -> ServiceResult<Vec<note::Model>> {
        Ok(note::Entity::find()
            .filter(note::Column::UploadedBy.eq(actor.id))
            .order_by_desc(note::Column::CreatedAt)
            .all(self.db)
            .await?)
    }

    /// Notes the caller downloaded, most recent download first. Premium file
    /// locations stay gated by the caller's current premium status.
    pub async fn my_downloads(&self, actor: &Actor) -> ServiceResult<Vec<note::Model>> {
        let rows = download::Entity::find()
            .filter(download::Column::UserId.eq(actor.id))
            .order_by_desc(download::Column::CreatedAt)
            .find_also_related(note::Entity)
            .all(self.db)
            .await?;

        let requester = Requester::from_actor(Some(actor));
        Ok(rows
            .into_iter()
            .filter_map(|(_, note)| note)
            .map(|note| gate_file_url(note, requester))
            .collect())
    }

    pub async fn list_users(&self, actor: &Actor) -> ServiceResult<Vec<user::Model>> {
        actor.require(Capability::ManageUsers)?;

        Ok(user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(self.db)
            .await?)
    }

    pub async fn set_role(
        &self,
        actor: &Actor,
        user_id: Uuid,
        role: Role,
    ) -> ServiceResult<user::Model> {
        actor.require(Capability::ManageUsers)?;

        let mut active = self.get(user_id).await?.into_active_model();
        active.role = Set(role.as_str().to_string());
        let user = active.update(self.db).await?;

        info!(user_id = %user.id, role = %role, by = %actor.id, "Role changed");
        Ok(user)
    }

    pub async fn set_premium(
        &self,
        actor: &Actor,
        user_id: Uuid,
        is_premium: bool,
    ) -> ServiceResult<user::Model> {
        actor.require(Capability::ManageUsers)?;

        let mut active = self.get(user_id).await?.into_active_model();
        active.is_premium = Set(is_premium);
        let user = active.update(self.db).await?;

        info!(user_id = %user.id, is_premium, by = %actor.id, "Premium flag changed");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await?)
    }
}

fn new_user(email: &str, hashed_password: String, role: Role) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        hashed_password: Set(hashed_password),
        role: Set(role.as_str().to_string()),
        is_premium: Set(false),
        created_at: Set(Utc::now().into()),
        full_name: Set(None),
        mobile_number: Set(None),
        semester: Set(None),
        cgpa: Set(None),
        sgpa: Set(None),
        target_cgpa: Set(None),
        study_hours: Set(0.0),
    }
}

fn normalize_email(email: &str) -> ServiceResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::unprocessable("A valid email is required"));
    }
    Ok(email)
}
