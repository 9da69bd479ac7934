//! ID generation utilities.

use ulid::Ulid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Check whether `id` is a well-formed entity ID.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        id.len() == 26 && Ulid::from_string(id).is_ok()
    }
}

/// Reject malformed entity IDs before they reach the database.
pub fn ensure_valid_id(id: &str, what: &str) -> crate::AppResult<()> {
    if id.trim().is_empty() {
        return Err(crate::AppError::BadRequest(format!("{what} ID is required")));
    }
    if !IdGenerator::is_valid(id) {
        return Err(crate::AppError::BadRequest(format!("Invalid {} ID", what.to_lowercase())));
    }
    Ok(())
}
