use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfileButtonClick::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileButtonClick::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProfileButtonClick::ButtonId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfileButtonClick::ProfileId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfileButtonClick::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_button_clicks_button_id")
                    .table(ProfileButtonClick::Table)
                    .col(ProfileButtonClick::ButtonId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfileVisit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileVisit::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfileVisit::ProfileId).string().not_null())
                    .col(
                        ColumnDef::new(ProfileVisit::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profile_visits_profile_id")
                    .table(ProfileVisit::Table)
                    .col(ProfileVisit::ProfileId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_profile_visits_profile_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileVisit::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_button_clicks_button_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileButtonClick::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProfileButtonClick {
    #[sea_orm(iden = "profile_button_clicks")]
    Table,
    Id,
    ButtonId,
    ProfileId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProfileVisit {
    #[sea_orm(iden = "profile_visits")]
    Table,
    Id,
    ProfileId,
    CreatedAt,
}
