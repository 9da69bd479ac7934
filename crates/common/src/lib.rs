//! Shared building blocks for the VidTube crates.
//!
//! - [`Config`]: layered settings loaded from `config/*.toml` and `VIDTUBE__*`
//!   environment variables
//! - [`AppError`] / [`AppResult`]: the error type every layer returns, and its
//!   JSON error envelope
//! - [`IdGenerator`] and [`id::ensure_valid_id`]: ULID identifiers
//! - [`MediaStorage`]: where uploaded videos and images live
//!
//! ```no_run
//! use vidtube_common::{AppResult, Config, IdGenerator};
//!
//! fn boot() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     println!("{} listening, first id {id}", config.server.url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod media;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use media::{
    LocalMediaStorage, MediaKind, MediaStorage, NoOpMediaStorage, SharedMediaStorage,
    UploadedMedia, extract_public_id,
};
