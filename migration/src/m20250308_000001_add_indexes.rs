use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Role,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    SenderId,
    ReceiverId,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    WorkerId,
}

#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    ClientId,
    WorkerId,
}

#[derive(DeriveIden)]
enum Images {
    Table,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Directory load filters on role.
        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_role")
                    .table(Profiles::Table)
                    .col(Profiles::Role)
                    .to_owned(),
            )
            .await?;

        // Thread lookups in both directions, ordered by time.
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_pair_created")
                    .table(Messages::Table)
                    .col(Messages::SenderId)
                    .col(Messages::ReceiverId)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Unread badge counts.
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_receiver_is_read")
                    .table(Messages::Table)
                    .col(Messages::ReceiverId)
                    .col(Messages::IsRead)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_worker_id")
                    .table(Reviews::Table)
                    .col(Reviews::WorkerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_worker_id")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::WorkerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_client_id")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_images_user_id")
                    .table(Images::Table)
                    .col(Images::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_profiles_role",
            "idx_messages_pair_created",
            "idx_messages_receiver_is_read",
            "idx_reviews_worker_id",
            "idx_service_requests_worker_id",
            "idx_service_requests_client_id",
            "idx_images_user_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
