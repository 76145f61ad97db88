use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApprovalRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApprovalRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ApprovalRequests::Kind)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ApprovalRequests::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(ApprovalRequests::TargetId).uuid().not_null())
                    .col(
                        ColumnDef::new(ApprovalRequests::Status)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApprovalRequests::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ApprovalRequests::ReviewerId).uuid())
                    .col(ColumnDef::new(ApprovalRequests::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ApprovalRequests::Notes).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ApprovalRequests::Table)
                    .col(ApprovalRequests::SubjectId)
                    .name("idx_approval_requests_subject_id")
                    .to_owned(),
            )
            .await?;

        // Duplicate-pending lookups and the reviewer inbox both filter on these.
        manager
            .create_index(
                Index::create()
                    .table(ApprovalRequests::Table)
                    .col(ApprovalRequests::Kind)
                    .col(ApprovalRequests::Status)
                    .name("idx_approval_requests_kind_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApprovalRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ApprovalRequests {
    Table,
    Id,
    Kind,
    SubjectId,
    TargetId,
    Status,
    RequestedAt,
    ReviewerId,
    ReviewedAt,
    Notes,
}
