//! Registered accounts, including accounts provisioned on first sight by the
//! identity provider.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub hashed_password: String,
    /// `STUDENT` or `ADMIN`
    pub role: String,
    pub is_premium: bool,
    pub created_at: DateTimeWithTimeZone,

    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub sgpa: Option<f64>,
    pub target_cgpa: Option<f64>,
    pub study_hours: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::note::Entity")]
    Note,
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
    #[sea_orm(has_many = "super::download::Entity")]
    Download,
    #[sea_orm(has_many = "super::subscription::Entity")]
    Subscription,
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
