//! Create playlist and playlist_video tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Playlist::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Playlist::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Playlist::OwnerId).string_len(32).not_null())
                    .col(ColumnDef::new(Playlist::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Playlist::Description).text().not_null())
                    .col(
                        ColumnDef::new(Playlist::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Playlist::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_playlist_owner")
                            .from(Playlist::Table, Playlist::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_playlist_owner_id")
                    .table(Playlist::Table)
                    .col(Playlist::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlaylistVideo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlaylistVideo::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlaylistVideo::PlaylistId).string_len(32).not_null())
                    .col(ColumnDef::new(PlaylistVideo::VideoId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(PlaylistVideo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_playlist_video_playlist")
                            .from(PlaylistVideo::Table, PlaylistVideo::PlaylistId)
                            .to(Playlist::Table, Playlist::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: a video appears in a playlist at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_playlist_video_pair")
                    .table(PlaylistVideo::Table)
                    .col(PlaylistVideo::PlaylistId)
                    .col(PlaylistVideo::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_playlist_video_video_id")
                    .table(PlaylistVideo::Table)
                    .col(PlaylistVideo::VideoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlaylistVideo::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Playlist::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Playlist {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PlaylistVideo {
    Table,
    Id,
    PlaylistId,
    VideoId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
