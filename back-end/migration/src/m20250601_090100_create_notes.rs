use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notes::Title).string().not_null())
                    .col(ColumnDef::new(Notes::FileUrl).string().not_null())
                    .col(ColumnDef::new(Notes::UploadedBy).uuid())
                    .col(
                        ColumnDef::new(Notes::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Notes::University)
                            .string()
                            .not_null()
                            .default("AKTU"),
                    )
                    .col(ColumnDef::new(Notes::Branch).string().not_null())
                    .col(ColumnDef::new(Notes::Semester).integer().not_null())
                    .col(ColumnDef::new(Notes::Subject).string().not_null())
                    .col(
                        ColumnDef::new(Notes::IsPremium)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notes::Category)
                            .string()
                            .not_null()
                            .default("NOTE"),
                    )
                    .col(ColumnDef::new(Notes::Year).integer())
                    .col(
                        ColumnDef::new(Notes::VoteCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Notes::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Notes::RatingCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Notes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notes_uploaded_by")
                            .from(Notes::Table, Notes::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Public listing filters on status and sorts on created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_notes_status_created_at")
                    .table(Notes::Table)
                    .col(Notes::Status)
                    .col(Notes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notes_uploaded_by")
                    .table(Notes::Table)
                    .col(Notes::UploadedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notes {
    Table,
    Id,
    Title,
    FileUrl,
    UploadedBy,
    Status,
    University,
    Branch,
    Semester,
    Subject,
    IsPremium,
    Category,
    Year,
    VoteCount,
    Rating,
    RatingCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
