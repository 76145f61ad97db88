use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttendanceRecords::SessionId).uuid().not_null())
                    .col(ColumnDef::new(AttendanceRecords::UserId).uuid().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Method).small_integer())
                    .col(
                        ColumnDef::new(AttendanceRecords::Status)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::CheckedInAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(AttendanceRecords::ReviewerId).uuid())
                    .col(ColumnDef::new(AttendanceRecords::ReviewedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AttendanceRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AttendanceRecords::SessionId)
                            .col(AttendanceRecords::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::UserId)
                    .name("idx_attendance_records_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AttendanceRecords {
    Table,
    SessionId,
    UserId,
    Method,
    Status,
    CheckedInAt,
    ReviewerId,
    ReviewedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
