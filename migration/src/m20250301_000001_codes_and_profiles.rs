use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 nfc_codes 表
        manager
            .create_table(
                Table::create()
                    .table(NfcCode::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(NfcCode::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(NfcCode::Code).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(NfcCode::CodeType)
                            .string()
                            .not_null()
                            .default("profile"),
                    )
                    .col(ColumnDef::new(NfcCode::AssignedTo).string().null())
                    .col(
                        ColumnDef::new(NfcCode::AssignedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NfcCode::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(NfcCode::Url).text().null())
                    .col(ColumnDef::new(NfcCode::RedirectUrl).text().null())
                    .col(ColumnDef::new(NfcCode::Title).string().null())
                    .col(ColumnDef::new(NfcCode::Description).text().null())
                    .col(ColumnDef::new(NfcCode::CreatedBy).string().null())
                    .col(
                        ColumnDef::new(NfcCode::CreatedAt)
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
                    .name("idx_nfc_codes_assigned_to")
                    .table(NfcCode::Table)
                    .col(NfcCode::AssignedTo)
                    .to_owned(),
            )
            .await?;

        // 创建 nfc_profiles 表
        manager
            .create_table(
                Table::create()
                    .table(NfcProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NfcProfile::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NfcProfile::CodeId).string().not_null())
                    .col(ColumnDef::new(NfcProfile::UserId).string().not_null())
                    .col(ColumnDef::new(NfcProfile::FullName).string().null())
                    .col(ColumnDef::new(NfcProfile::JobTitle).string().null())
                    .col(ColumnDef::new(NfcProfile::Company).string().null())
                    .col(ColumnDef::new(NfcProfile::Email).string().null())
                    .col(ColumnDef::new(NfcProfile::Phone).string().null())
                    .col(ColumnDef::new(NfcProfile::Website).string().null())
                    .col(ColumnDef::new(NfcProfile::Bio).text().null())
                    .col(ColumnDef::new(NfcProfile::BackgroundColor).string().null())
                    .col(ColumnDef::new(NfcProfile::TextColor).string().null())
                    .col(ColumnDef::new(NfcProfile::ButtonColor).string().null())
                    .col(ColumnDef::new(NfcProfile::ButtonTextColor).string().null())
                    .col(ColumnDef::new(NfcProfile::LogoUrl).text().null())
                    .col(ColumnDef::new(NfcProfile::FacebookUrl).string().null())
                    .col(ColumnDef::new(NfcProfile::InstagramUrl).string().null())
                    .col(ColumnDef::new(NfcProfile::LinkedinUrl).string().null())
                    .col(ColumnDef::new(NfcProfile::TwitterUrl).string().null())
                    .col(ColumnDef::new(NfcProfile::YoutubeUrl).string().null())
                    .col(
                        ColumnDef::new(NfcProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NfcProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nfc_profiles_code_id")
                            .from(NfcProfile::Table, NfcProfile::CodeId)
                            .to(NfcCode::Table, NfcCode::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_nfc_profiles_code_id")
                    .table(NfcProfile::Table)
                    .col(NfcProfile::CodeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_nfc_profiles_user_id")
                    .table(NfcProfile::Table)
                    .col(NfcProfile::UserId)
                    .to_owned(),
            )
            .await?;

        // 创建 profile_buttons 表
        manager
            .create_table(
                Table::create()
                    .table(ProfileButton::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileButton::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfileButton::ProfileId).string().not_null())
                    .col(ColumnDef::new(ProfileButton::Label).string().not_null())
                    .col(ColumnDef::new(ProfileButton::ActionType).string().not_null())
                    .col(ColumnDef::new(ProfileButton::ActionValue).text().not_null())
                    .col(
                        ColumnDef::new(ProfileButton::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProfileButton::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_buttons_profile_id")
                            .from(ProfileButton::Table, ProfileButton::ProfileId)
                            .to(NfcProfile::Table, NfcProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profile_buttons_profile_sort")
                    .table(ProfileButton::Table)
                    .col(ProfileButton::ProfileId)
                    .col(ProfileButton::SortOrder)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileButton::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NfcProfile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NfcCode::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NfcCode {
    #[sea_orm(iden = "nfc_codes")]
    Table,
    Id,
    Code,
    CodeType,
    AssignedTo,
    AssignedAt,
    IsActive,
    Url,
    RedirectUrl,
    Title,
    Description,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum NfcProfile {
    #[sea_orm(iden = "nfc_profiles")]
    Table,
    Id,
    CodeId,
    UserId,
    FullName,
    JobTitle,
    Company,
    Email,
    Phone,
    Website,
    Bio,
    BackgroundColor,
    TextColor,
    ButtonColor,
    ButtonTextColor,
    LogoUrl,
    FacebookUrl,
    InstagramUrl,
    LinkedinUrl,
    TwitterUrl,
    YoutubeUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProfileButton {
    #[sea_orm(iden = "profile_buttons")]
    Table,
    Id,
    ProfileId,
    Label,
    ActionType,
    ActionValue,
    SortOrder,
    CreatedAt,
}
