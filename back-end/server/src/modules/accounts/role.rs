//! Roles and the capabilities they grant.
//!
//! Every operation that is not open to all signed-in users names the
//! capability it needs and checks it through [`Actor::require`].

use std::fmt;
use std::str::FromStr;

use entity::user;
use sea_orm::prelude::Uuid;

use crate::modules::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Upload, vote, review, download, subscribe
    Contribute,
    /// Approve or reject pending notes
    Moderate,
    /// Edit or delete any note, list the full catalog
    ManageCatalog,
    /// Read and write system settings
    Configure,
    /// Post and remove circulars
    Publish,
    /// Change roles and premium flags of other users
    ManageUsers,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Admin => "ADMIN",
        }
    }

    pub fn permits(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Student => matches!(capability, Capability::Contribute),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(Role::Student),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ServiceError::unprocessable(format!("Unknown role '{other}'"))),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_premium: bool,
}

impl Actor {
    pub fn require(&self, capability: Capability) -> Result<(), ServiceError> {
        if self.role.permits(capability) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Not authorized".to_string()))
        }
    }
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            // Unknown stored roles fall back to the least privileged one
            role: user.role.parse().unwrap_or(Role::Student),
            is_premium: user.is_premium,
        }
    }
}
