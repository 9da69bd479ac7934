//! Playlist entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "playlist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub owner_id: String,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::playlist_video::Entity")]
    PlaylistVideo,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::playlist_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaylistVideo.def()
    }
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        super::playlist_video::Relation::Video.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::playlist_video::Relation::Playlist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
