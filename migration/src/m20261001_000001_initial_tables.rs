//! 初始表结构
//!
//! users / digital_cards / contacts 以及 card_views / card_shares 事件表。
//! 外键仅为普通字符串列，不做级联删除。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Users::DisplayName).string_len(255).null())
                    .col(ColumnDef::new(Users::AvatarUrl).text().null())
                    .col(ColumnDef::new(Users::Company).string_len(255).null())
                    .col(ColumnDef::new(Users::JobTitle).string_len(255).null())
                    .col(ColumnDef::new(Users::Phone).string_len(64).null())
                    .col(ColumnDef::new(Users::Website).text().null())
                    .col(ColumnDef::new(Users::Bio).text().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // digital_cards
        manager
            .create_table(
                Table::create()
                    .table(DigitalCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DigitalCards::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DigitalCards::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(DigitalCards::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(DigitalCards::TemplateId)
                            .string_len(32)
                            .not_null()
                            .default("modern"),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(DigitalCards::FullName).string_len(255).null())
                    .col(ColumnDef::new(DigitalCards::JobTitle).string_len(255).null())
                    .col(ColumnDef::new(DigitalCards::Company).string_len(255).null())
                    .col(ColumnDef::new(DigitalCards::Email).string_len(255).null())
                    .col(ColumnDef::new(DigitalCards::Phone).string_len(64).null())
                    .col(ColumnDef::new(DigitalCards::Website).text().null())
                    .col(ColumnDef::new(DigitalCards::Bio).text().null())
                    .col(ColumnDef::new(DigitalCards::ProfileImageUrl).text().null())
                    .col(ColumnDef::new(DigitalCards::CompanyLogoUrl).text().null())
                    .col(ColumnDef::new(DigitalCards::LinkedinUrl).text().null())
                    .col(ColumnDef::new(DigitalCards::TwitterUrl).text().null())
                    .col(ColumnDef::new(DigitalCards::InstagramUrl).text().null())
                    .col(ColumnDef::new(DigitalCards::FacebookUrl).text().null())
                    .col(
                        ColumnDef::new(DigitalCards::BackgroundColor)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DigitalCards::TextColor).string_len(16).not_null())
                    .col(
                        ColumnDef::new(DigitalCards::AccentColor)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::FontFamily)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::ShareCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::ContactCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::UpdatedAt)
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
                    .name("idx_digital_cards_user_id")
                    .table(DigitalCards::Table)
                    .col(DigitalCards::UserId)
                    .col(DigitalCards::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // contacts
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(Contacts::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Contacts::Email).string_len(255).null())
                    .col(ColumnDef::new(Contacts::Phone).string_len(64).null())
                    .col(ColumnDef::new(Contacts::Company).string_len(255).null())
                    .col(ColumnDef::new(Contacts::JobTitle).string_len(255).null())
                    .col(ColumnDef::new(Contacts::Website).text().null())
                    .col(ColumnDef::new(Contacts::Notes).text().null())
                    .col(
                        ColumnDef::new(Contacts::SourceType)
                            .string_len(32)
                            .not_null()
                            .default("manual"),
                    )
                    .col(ColumnDef::new(Contacts::SourceCardId).string_len(64).null())
                    .col(ColumnDef::new(Contacts::Tags).text().not_null())
                    .col(
                        ColumnDef::new(Contacts::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contacts::LastContacted)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::UpdatedAt)
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
                    .name("idx_contacts_user_id")
                    .table(Contacts::Table)
                    .col(Contacts::UserId)
                    .col(Contacts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // card_views（只追加）
        manager
            .create_table(
                Table::create()
                    .table(CardViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardViews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardViews::CardId).string_len(64).not_null())
                    .col(ColumnDef::new(CardViews::ViewerIp).string_len(45).null())
                    .col(ColumnDef::new(CardViews::ViewerUserAgent).text().null())
                    .col(
                        ColumnDef::new(CardViews::ViewerLocation)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(CardViews::Referrer).text().null())
                    .col(
                        ColumnDef::new(CardViews::ViewedAt)
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
                    .name("idx_card_views_card_time")
                    .table(CardViews::Table)
                    .col(CardViews::CardId)
                    .col(CardViews::ViewedAt)
                    .to_owned(),
            )
            .await?;

        // card_shares（只追加）
        manager
            .create_table(
                Table::create()
                    .table(CardShares::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardShares::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardShares::CardId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(CardShares::ShareMethod)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CardShares::SharedAt)
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
                    .name("idx_card_shares_card_time")
                    .table(CardShares::Table)
                    .col(CardShares::CardId)
                    .col(CardShares::SharedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_card_shares_card_time").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_card_views_card_time").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_contacts_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_digital_cards_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CardShares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CardViews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DigitalCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    DisplayName,
    AvatarUrl,
    Company,
    JobTitle,
    Phone,
    Website,
    Bio,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DigitalCards {
    Table,
    Id,
    UserId,
    Name,
    TemplateId,
    IsActive,
    IsPublic,
    FullName,
    JobTitle,
    Company,
    Email,
    Phone,
    Website,
    Bio,
    ProfileImageUrl,
    CompanyLogoUrl,
    LinkedinUrl,
    TwitterUrl,
    InstagramUrl,
    FacebookUrl,
    BackgroundColor,
    TextColor,
    AccentColor,
    FontFamily,
    ViewCount,
    ShareCount,
    ContactCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    UserId,
    FullName,
    Email,
    Phone,
    Company,
    JobTitle,
    Website,
    Notes,
    SourceType,
    SourceCardId,
    Tags,
    IsFavorite,
    LastContacted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CardViews {
    Table,
    Id,
    CardId,
    ViewerIp,
    ViewerUserAgent,
    ViewerLocation,
    Referrer,
    ViewedAt,
}

#[derive(DeriveIden)]
enum CardShares {
    Table,
    Id,
    CardId,
    ShareMethod,
    SharedAt,
}
