use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

const OWNER_INDEX: &str = "idx_trips_user_id_created_at";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Trips::UserId).uuid().not_null())
                    .col(ColumnDef::new(Trips::Destination).string_len(120).not_null())
                    .col(ColumnDef::new(Trips::StartDate).date().not_null())
                    .col(ColumnDef::new(Trips::EndDate).date().not_null())
                    .col(ColumnDef::new(Trips::Budget).double().not_null().default(0.0))
                    .col(ColumnDef::new(Trips::Members).json_binary().not_null())
                    .col(ColumnDef::new(Trips::Mood).string_len(16).null())
                    .col(ColumnDef::new(Trips::Itinerary).json_binary().null())
                    .col(
                        ColumnDef::new(Trips::Favorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Trips::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trips_user_id")
                            .from(Trips::Table, Trips::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the per-owner, newest-first listing.
        manager
            .create_index(
                Index::create()
                    .name(OWNER_INDEX)
                    .table(Trips::Table)
                    .col(Trips::UserId)
                    .col(Trips::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Trips {
    Table,
    Id,
    UserId,
    Destination,
    StartDate,
    EndDate,
    Budget,
    Members,
    Mood,
    Itinerary,
    Favorite,
    CreatedAt,
    UpdatedAt,
}
