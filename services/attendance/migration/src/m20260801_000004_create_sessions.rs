use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::Title).string().not_null())
                    .col(ColumnDef::new(Sessions::Location).string())
                    .col(
                        ColumnDef::new(Sessions::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::WindowOpen)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sessions::WindowExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Sessions::WindowSecs).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sessions::Table, Sessions::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Sessions::Table)
                    .col(Sessions::CourseId)
                    .name("idx_sessions_course_id")
                    .to_owned(),
            )
            .await?;

        // The sweeper scans for open windows past their expiry.
        manager
            .create_index(
                Index::create()
                    .table(Sessions::Table)
                    .col(Sessions::WindowOpen)
                    .col(Sessions::WindowExpiresAt)
                    .name("idx_sessions_window_open_expires_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    CourseId,
    Title,
    Location,
    StartsAt,
    EndsAt,
    WindowOpen,
    WindowExpiresAt,
    WindowSecs,
    CreatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
}
