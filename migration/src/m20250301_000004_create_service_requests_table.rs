use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `service_requests` table and its columns.
#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    Id,
    ClientId,
    WorkerId,
    Type,
    Description,
    RequestedDate,
    Address,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceRequests::ClientId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRequests::WorkerId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRequests::Type).string().not_null())
                    .col(ColumnDef::new(ServiceRequests::Description).text().not_null())
                    .col(ColumnDef::new(ServiceRequests::RequestedDate).date().not_null())
                    .col(ColumnDef::new(ServiceRequests::Address).string().not_null())
                    .col(
                        ColumnDef::new(ServiceRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_requests_client_id")
                            .from(ServiceRequests::Table, ServiceRequests::ClientId)
                            .to(Profiles::Table, Profiles::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_requests_worker_id")
                            .from(ServiceRequests::Table, ServiceRequests::WorkerId)
                            .to(Profiles::Table, Profiles::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceRequests::Table).to_owned())
            .await
    }
}
