//! Repository layer.
//!
//! One repository per table. Repositories own the write paths and the
//! single-record reads; multi-table reads live in [`crate::read_model`].

mod comment;
mod like;
mod playlist;
mod subscription;
mod tweet;
mod user;
mod video;
mod watch_history;

pub use comment::CommentRepository;
pub use like::{LikeKind, LikeRepository};
pub use playlist::PlaylistRepository;
pub use subscription::SubscriptionRepository;
pub use tweet::TweetRepository;
pub use user::UserRepository;
pub use video::VideoRepository;
pub use watch_history::WatchHistoryRepository;

use sea_orm::{DbErr, SqlErr};
use vidtube_common::AppError;

/// Map a driver error to an application error.
///
/// Unique violations become [`AppError::Conflict`]; everything else is a
/// database error.
#[must_use]
pub fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(detail = %detail, "Unique constraint violation");
            AppError::Conflict("Record already exists".to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_map_to_database() {
        let err = map_db_err(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, AppError::Database(msg) if msg.contains("boom")));
    }

    #[test]
    fn test_record_not_found_maps_to_database() {
        let err = map_db_err(DbErr::RecordNotFound("video".to_string()));
        assert!(err.is_server_error());
    }
}
