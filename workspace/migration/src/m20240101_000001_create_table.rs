use sea_orm_migration::{prelude::*, schema::*};

const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";
const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::ImageUrl).default(DEFAULT_IMAGE_URL))
                    .col(string(Users::HeaderImageUrl).default(DEFAULT_HEADER_IMAGE_URL))
                    .col(text_null(Users::Bio))
                    .col(text_null(Users::Location))
                    .col(string(Users::Password))
                    .to_owned(),
            )
            .await?;

        // Create messages table
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(pk_auto(Messages::Id))
                    .col(string_len(Messages::Text, 140))
                    .col(date_time(Messages::Timestamp).default(Expr::current_timestamp()))
                    .col(integer(Messages::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_user")
                            .from(Messages::Table, Messages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_user_timestamp")
                    .table(Messages::Table)
                    .col(Messages::UserId)
                    .col(Messages::Timestamp)
                    .to_owned(),
            )
            .await?;

        // Create follows table (self-referencing join table)
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(integer(Follows::UserBeingFollowedId))
                    .col(integer(Follows::UserFollowingId))
                    .primary_key(
                        Index::create()
                            .name("pk_follows")
                            .col(Follows::UserBeingFollowedId)
                            .col(Follows::UserFollowingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_followed")
                            .from(Follows::Table, Follows::UserBeingFollowedId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_following")
                            .from(Follows::Table, Follows::UserFollowingId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    Username,
    ImageUrl,
    HeaderImageUrl,
    Bio,
    Location,
    Password,
}

#[derive(DeriveIden)]
pub(crate) enum Messages {
    Table,
    Id,
    Text,
    Timestamp,
    UserId,
}

#[derive(DeriveIden)]
enum Follows {
    Table,
    UserBeingFollowedId,
    UserFollowingId,
}
