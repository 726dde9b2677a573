//! Uploaded study material.
//!
//! `vote_count`, `rating` and `rating_count` are denormalized aggregates of the
//! `votes` and `reviews` rows for the note. They are only written by the vote
//! ledger and rating aggregator in the server crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    /// Public location returned by object storage
    pub file_url: String,
    pub uploaded_by: Option<Uuid>,
    /// `PENDING`, `APPROVED` or `REJECTED`
    pub status: String,

    pub university: String,
    pub branch: String,
    pub semester: i32,
    pub subject: String,
    pub is_premium: bool,
    /// `NOTE`, `SESSIONAL_PAPER` or `UNIVERSITY_PAPER`
    pub category: String,
    pub year: Option<i32>,

    pub vote_count: i32,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub rating_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UploadedBy",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Uploader,
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
    #[sea_orm(has_many = "super::download::Entity")]
    Download,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::download::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Download.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
