//! Ownership guard for mutating operations.

use vidtube_common::{AppError, AppResult};
use vidtube_db::entities::{comment, like, playlist, subscription, tweet, video};

/// A record that belongs to exactly one user.
pub trait Owned {
    /// Noun used in the Forbidden message.
    const KIND: &'static str;

    /// ID of the user allowed to mutate this record.
    fn owner_id(&self) -> &str;
}

/// Fail with Forbidden unless `actor_id` owns `record`.
pub fn require_owner<T: Owned>(record: &T, actor_id: &str) -> AppResult<()> {
    if record.owner_id() == actor_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You are not the owner of this {}",
            T::KIND
        )))
    }
}

impl Owned for video::Model {
    const KIND: &'static str = "video";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for tweet::Model {
    const KIND: &'static str = "tweet";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for comment::Model {
    const KIND: &'static str = "comment";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for playlist::Model {
    const KIND: &'static str = "playlist";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for like::Model {
    const KIND: &'static str = "like";

    fn owner_id(&self) -> &str {
        &self.liked_by_id
    }
}

impl Owned for subscription::Model {
    const KIND: &'static str = "subscription";

    fn owner_id(&self) -> &str {
        &self.subscriber_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tweet_by(owner: &str) -> tweet::Model {
        tweet::Model {
            id: "tweet1".to_string(),
            owner_id: owner.to_string(),
            content: "hi".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_owner_passes() {
        assert!(require_owner(&tweet_by("user1"), "user1").is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let err = require_owner(&tweet_by("user1"), "user2").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "You are not the owner of this tweet");
    }

    #[test]
    fn test_like_is_owned_by_liker() {
        let like = like::Model {
            id: "like1".to_string(),
            liked_by_id: "user2".to_string(),
            video_id: Some("video1".to_string()),
            comment_id: None,
            tweet_id: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        assert!(require_owner(&like, "user2").is_ok());
        assert!(require_owner(&like, "user1").is_err());
    }
}
