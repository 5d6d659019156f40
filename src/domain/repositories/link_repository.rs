//! Repository trait for short link persistence.

use crate::domain::entities::Link;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Durable keyed storage for links.
///
/// Every call goes straight to the backing store; there is no caching layer.
/// The store is the single commit point for entity state: services mutate an
/// owned [`Link`] snapshot and hand it back through [`Self::update`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Infrastructure`] on database errors.
    async fn save(&self, link: &Link) -> Result<(), AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if no such code exists
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns all links owned by the given identifier, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] on database errors.
    async fn find_all_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError>;

    /// Overwrites the mutable fields (`current_clicks`, `max_clicks`,
    /// `active`, `expires_at`) of the record keyed by the link's short code.
    ///
    /// Silently does nothing if the code does not exist; callers are expected
    /// to have checked existence beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] on database errors.
    async fn update(&self, link: &Link) -> Result<(), AppError>;

    /// Removes the record for the given code. Not an error if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] on database errors.
    async fn delete(&self, code: &str) -> Result<(), AppError>;

    /// Removes every record whose expiry lies strictly in the past.
    ///
    /// # Returns
    ///
    /// The number of records removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] on database errors.
    async fn delete_expired(&self) -> Result<u64, AppError>;

    /// Removes every record. Intended for tests and reset scenarios only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] on database errors.
    async fn delete_all(&self) -> Result<(), AppError>;
}
