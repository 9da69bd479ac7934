//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Lowercased, trimmed handle. Doubles as the channel name.
    #[sea_orm(unique)]
    pub username: String,

    /// Lowercased, trimmed email address.
    #[sea_orm(unique)]
    pub email: String,

    pub fullname: String,

    pub avatar_url: String,

    #[sea_orm(nullable)]
    pub cover_image_url: Option<String>,

    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Refresh token currently issued to this user.
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::video::Entity")]
    Video,
    #[sea_orm(has_many = "super::tweet::Entity")]
    Tweet,
    #[sea_orm(has_many = "super::playlist::Entity")]
    Playlist,
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl Related<super::tweet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tweet.def()
    }
}

impl Related<super::playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Playlist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
