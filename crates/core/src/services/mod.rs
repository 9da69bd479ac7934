//! Business logic services.

#![allow(missing_docs)]

pub mod channel;
pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod token;
pub mod tweet;
pub mod uploads;
pub mod user;
pub mod video;

pub use channel::ChannelService;
pub use comment::{CommentInput, CommentService};
pub use like::LikeService;
pub use playlist::{CreatePlaylistInput, MembershipChange, PlaylistService, UpdatePlaylistInput};
pub use subscription::SubscriptionService;
pub use token::{Claims, TokenKind, TokenPair, TokenService};
pub use tweet::{TweetInput, TweetService};
pub use uploads::MediaUpload;
pub use user::{
    ChangePasswordInput, LoginInput, LoginOutput, RegisterInput, UpdateAccountInput, UserService,
};
pub use video::{PublishVideoInput, UpdateVideoInput, VideoService};

use serde::Serialize;
use validator::ValidationError;

/// Result of a toggle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    Added,
    Removed,
}

impl ToggleState {
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Reject strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("must not be blank".into()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }
}
