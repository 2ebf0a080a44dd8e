//! 分享相关表：social_profiles / sharing_settings / nfc_tags

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SocialProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialProfiles::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialProfiles::UserId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialProfiles::Platform)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialProfiles::Username)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SocialProfiles::Url).text().not_null())
                    .col(
                        ColumnDef::new(SocialProfiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SocialProfiles::CreatedAt)
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
                    .name("idx_social_profiles_user_id")
                    .table(SocialProfiles::Table)
                    .col(SocialProfiles::UserId)
                    .to_owned(),
            )
            .await?;

        // 每个用户一行
        manager
            .create_table(
                Table::create()
                    .table(SharingSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharingSettings::UserId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SharingSettings::AutoShare)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SharingSettings::Platforms).text().not_null())
                    .col(
                        ColumnDef::new(SharingSettings::IncludeQr)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SharingSettings::CustomMessage)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharingSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharingSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NfcTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NfcTags::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NfcTags::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(NfcTags::CardId).string_len(64).not_null())
                    .col(ColumnDef::new(NfcTags::Name).string_len(255).not_null())
                    .col(ColumnDef::new(NfcTags::CardTitle).string_len(255).not_null())
                    .col(ColumnDef::new(NfcTags::CardUrl).text().not_null())
                    .col(
                        ColumnDef::new(NfcTags::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NfcTags::WriteCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NfcTags::LastUsed)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NfcTags::CreatedAt)
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
                    .name("idx_nfc_tags_user_id")
                    .table(NfcTags::Table)
                    .col(NfcTags::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_nfc_tags_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_social_profiles_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(NfcTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SharingSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SocialProfiles {
    Table,
    Id,
    UserId,
    Platform,
    Username,
    Url,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SharingSettings {
    Table,
    UserId,
    AutoShare,
    Platforms,
    IncludeQr,
    CustomMessage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NfcTags {
    Table,
    Id,
    UserId,
    CardId,
    Name,
    CardTitle,
    CardUrl,
    IsActive,
    WriteCount,
    LastUsed,
    CreatedAt,
}
