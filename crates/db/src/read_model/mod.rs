//! Read model: multi-table reads that compute denormalized fields.
//!
//! Each read is a chain of small stage functions over a sea-orm `Select`
//! (filter, join, derive, project). Stages are public so they can be
//! inspected and tested one at a time; [`ReadModel`] composes and runs them.

mod channel_profile;
mod channel_stats;
mod playlist_videos;
mod subscriptions;
mod video_comments;
mod videos;

use std::sync::Arc;

use sea_orm::{DatabaseConnection, FromQueryResult};
use serde::Serialize;

pub use channel_profile::{
    ChannelProfile, channel_profile_query, match_username, project_public, with_is_subscribed,
    with_subscribed_to_count, with_subscribers_count,
};
pub use channel_stats::{
    ChannelStats, likes_on_videos_of, subscribers_of, subscriptions_of, videos_of, views_of,
};
pub use playlist_videos::{PlaylistWithVideos, match_playlist, videos_in_playlist};
pub use subscriptions::{channel_summaries_for, subscriber_summaries_for};
pub use video_comments::{CommentRow, VideoComment, comments_for_video, flatten_owner, join_owner, paginate};
pub use videos::{VideoOwnerRow, VideoWithOwner, liked_by, owned_by, watched_by, with_owner};

/// Default page size for paginated reads.
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Public subset of a user, embedded in other read results.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub avatar_url: String,
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    /// Build a page request, clamping `page` to at least 1 and `limit` to
    /// `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Runs read-model queries.
#[derive(Clone)]
pub struct ReadModel {
    db: Arc<DatabaseConnection>,
}

impl ReadModel {
    /// Create a new read model.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}
