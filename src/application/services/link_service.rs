//! Link lifecycle service: creation, click-through, editing, deletion.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::browser::BrowserLauncher;
use crate::utils::code_generator;
use crate::utils::url_validator::validate_url;

/// Orchestrates the link lifecycle on top of the repository.
///
/// Every mutating operation checks ownership before touching the entity. The
/// service works on owned [`Link`] snapshots: it loads a value from the
/// repository, mutates the copy, and commits it back with a single `update`.
pub struct LinkService<R: LinkRepository, B: BrowserLauncher> {
    repository: Arc<R>,
    browser: Arc<B>,
    config: Config,
}

impl<R: LinkRepository, B: BrowserLauncher> LinkService<R, B> {
    /// Creates a new service over the given repository and browser launcher.
    pub fn new(repository: Arc<R>, browser: Arc<B>, config: Config) -> Self {
        Self {
            repository,
            browser,
            config,
        }
    }

    /// Creates and persists a new active link for `owner`.
    ///
    /// The click budget defaults to the configured limit when `max_clicks` is
    /// not supplied; expiry is now plus the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a URL without scheme or host, or
    /// a zero click limit. Returns [`AppError::Conflict`] if the generated
    /// code loses a race on insert.
    pub async fn create_link(
        &self,
        owner: Uuid,
        url: &str,
        max_clicks: Option<u32>,
    ) -> Result<Link, AppError> {
        validate_url(url).map_err(|e| {
            AppError::validation("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if max_clicks == Some(0) {
            return Err(AppError::validation(
                "Click limit must be positive",
                json!({ "max_clicks": 0 }),
            ));
        }

        let limit = max_clicks.unwrap_or(self.config.default_max_clicks);
        let expires_at = Utc::now() + Duration::hours(self.config.ttl_hours as i64);

        let code = self.generate_unique_code(owner, url).await?;

        let link = Link::new(code, url.to_string(), owner, limit, expires_at);
        self.repository.save(&link).await?;

        tracing::info!(
            code = %link.short_code,
            max_clicks = limit,
            expires_at = %link.expires_at,
            "created link"
        );

        Ok(link)
    }

    /// Redeems a short code: launches the browser, then registers the click.
    ///
    /// An expired link is deleted as a side effect of the attempt. The click
    /// is registered and persisted only after the browser launch succeeds.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown code
    /// - [`AppError::PermissionDenied`] when `owner` is not the link's owner
    /// - [`AppError::Gone`] when the link is expired or its budget exhausted
    /// - [`AppError::Infrastructure`] when the browser launch fails; the
    ///   stored state is untouched in that case
    pub async fn open_link(&self, owner: Uuid, code: &str) -> Result<Link, AppError> {
        let mut link = self.get_owned(owner, code).await?;

        if link.is_expired() {
            self.repository.delete(code).await?;
            tracing::info!(code, "deleted expired link on access");
            return Err(AppError::gone(
                "Link has expired and was removed",
                json!({ "code": code, "reason": "expired" }),
            ));
        }

        if !link.active {
            return Err(AppError::gone(
                "Link is no longer available (click limit reached)",
                json!({ "code": code, "reason": "limit_reached" }),
            ));
        }

        if !link.can_be_used() {
            return Err(AppError::gone(
                "Link is not usable",
                json!({ "code": code }),
            ));
        }

        self.browser.open(&link.original_url)?;

        link.register_click();
        self.repository.update(&link).await?;

        tracing::info!(
            code,
            clicks = link.current_clicks,
            max_clicks = link.max_clicks,
            "registered click"
        );

        Ok(link)
    }

    /// Returns all links owned by `owner`.
    pub async fn list_links(&self, owner: Uuid) -> Result<Vec<Link>, AppError> {
        self.repository.find_all_by_owner(owner).await
    }

    /// Updates the TTL and/or click budget of an existing link.
    ///
    /// A new TTL is measured from now, not from the original creation time.
    /// Either argument may be omitted independently. Lowering the budget to
    /// or below the current click count deactivates the link; raising it
    /// never reactivates one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for zero values,
    /// [`AppError::NotFound`] for an unknown code, and
    /// [`AppError::PermissionDenied`] for someone else's link.
    pub async fn edit_link(
        &self,
        owner: Uuid,
        code: &str,
        new_ttl_hours: Option<u32>,
        new_max_clicks: Option<u32>,
    ) -> Result<Link, AppError> {
        if new_ttl_hours == Some(0) {
            return Err(AppError::validation(
                "TTL must be positive",
                json!({ "ttl_hours": 0 }),
            ));
        }
        if new_max_clicks == Some(0) {
            return Err(AppError::validation(
                "Click limit must be positive",
                json!({ "max_clicks": 0 }),
            ));
        }

        let mut link = self.get_owned(owner, code).await?;

        if let Some(hours) = new_ttl_hours {
            link.set_expires_at(Utc::now() + Duration::hours(hours as i64));
            tracing::info!(code, expires_at = %link.expires_at, "updated link TTL");
        }

        if let Some(limit) = new_max_clicks {
            link.set_max_clicks(limit);
            tracing::info!(code, max_clicks = limit, "updated click limit");
        }

        self.repository.update(&link).await?;

        Ok(link)
    }

    /// Deletes a link owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code and
    /// [`AppError::PermissionDenied`] for someone else's link.
    pub async fn delete_link(&self, owner: Uuid, code: &str) -> Result<(), AppError> {
        self.get_owned(owner, code).await?;
        self.repository.delete(code).await?;

        tracing::info!(code, "deleted link");

        Ok(())
    }

    /// Removes every link whose expiry has passed; returns the count removed.
    pub async fn cleanup_expired_links(&self) -> Result<u64, AppError> {
        let removed = self.repository.delete_expired().await?;

        if removed > 0 {
            tracing::info!(removed, "expiry sweep removed links");
        }

        Ok(removed)
    }

    /// Loads a link and enforces that `owner` created it.
    async fn get_owned(&self, owner: Uuid, code: &str) -> Result<Link, AppError> {
        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))?;

        if link.owner_id != owner {
            return Err(AppError::permission_denied(
                "You do not own this link",
                json!({ "code": code }),
            ));
        }

        Ok(link)
    }

    /// Generates a short code that is not currently in use.
    ///
    /// The generator itself performs no uniqueness check, so the service
    /// probes the store and retries with a fresh time salt. A race between
    /// the probe and the insert still surfaces as `Conflict` from the
    /// primary-key constraint.
    async fn generate_unique_code(&self, owner: Uuid, url: &str) -> Result<String, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let code = code_generator::generate(owner, url);

            if self.repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::infrastructure(
            "Failed to generate a unique short code",
            json!({ "reason": "too many collisions" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::browser::MockBrowserLauncher;

    fn test_config() -> Config {
        Config::default()
    }

    fn stored_link(owner: Uuid, code: &str, max_clicks: u32) -> Link {
        Link::new(
            code.to_string(),
            "https://example.com".to_string(),
            owner,
            max_clicks,
            Utc::now() + Duration::hours(1),
        )
    }

    fn service(
        repo: MockLinkRepository,
        browser: MockBrowserLauncher,
    ) -> LinkService<MockLinkRepository, MockBrowserLauncher> {
        LinkService::new(Arc::new(repo), Arc::new(browser), test_config())
    }

    #[tokio::test]
    async fn test_create_link_uses_default_limit() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_save()
            .withf(|link: &Link| link.max_clicks == 3 && link.active)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repo, MockBrowserLauncher::new());
        let owner = Uuid::new_v4();

        let link = service
            .create_link(owner, "https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.owner_id, owner);
        assert_eq!(link.max_clicks, 3);
        assert_eq!(link.current_clicks, 0);
        assert_eq!(link.short_code.len(), code_generator::CODE_LENGTH);
    }

    #[tokio::test]
    async fn test_create_link_with_explicit_limit() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_save()
            .withf(|link: &Link| link.max_clicks == 10)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repo, MockBrowserLauncher::new());

        let link = service
            .create_link(Uuid::new_v4(), "https://example.com", Some(10))
            .await
            .unwrap();

        assert_eq!(link.max_clicks, 10);
    }

    #[tokio::test]
    async fn test_create_link_rejects_invalid_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_save().times(0);

        let service = service(repo, MockBrowserLauncher::new());

        let result = service
            .create_link(Uuid::new_v4(), "not-a-url", None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_link_rejects_zero_limit() {
        let mut repo = MockLinkRepository::new();
        repo.expect_save().times(0);

        let service = service(repo, MockBrowserLauncher::new());

        let result = service
            .create_link(Uuid::new_v4(), "https://example.com", Some(0))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_link_retries_on_code_collision() {
        let owner = Uuid::new_v4();

        let mut repo = MockLinkRepository::new();
        let mut probes = 0u32;
        repo.expect_find_by_code().times(2).returning(move |_| {
            probes += 1;
            if probes == 1 {
                Ok(Some(stored_link(Uuid::new_v4(), "taken12", 3)))
            } else {
                Ok(None)
            }
        });
        repo.expect_save().times(1).returning(|_| Ok(()));

        let service = service(repo, MockBrowserLauncher::new());

        let result = service.create_link(owner, "https://example.com", None).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_open_link_registers_click_after_browse() {
        let owner = Uuid::new_v4();
        let link = stored_link(owner, "abc1234", 3);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update()
            .withf(|link: &Link| link.current_clicks == 1 && link.active)
            .times(1)
            .returning(|_| Ok(()));

        let mut browser = MockBrowserLauncher::new();
        browser
            .expect_open()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repo, browser);

        let opened = service.open_link(owner, "abc1234").await.unwrap();

        assert_eq!(opened.current_clicks, 1);
    }

    #[tokio::test]
    async fn test_open_link_browser_failure_persists_nothing() {
        let owner = Uuid::new_v4();
        let link = stored_link(owner, "abc1234", 3);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update().times(0);

        let mut browser = MockBrowserLauncher::new();
        browser.expect_open().times(1).returning(|_| {
            Err(AppError::infrastructure("no display", json!({})))
        });

        let service = service(repo, browser);

        let result = service.open_link(owner, "abc1234").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::Infrastructure { .. }
        ));
    }

    #[tokio::test]
    async fn test_open_link_unknown_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let mut browser = MockBrowserLauncher::new();
        browser.expect_open().times(0);

        let service = service(repo, browser);

        let result = service.open_link(Uuid::new_v4(), "missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_open_link_owner_mismatch() {
        let link = stored_link(Uuid::new_v4(), "abc1234", 3);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update().times(0);

        let mut browser = MockBrowserLauncher::new();
        browser.expect_open().times(0);

        let service = service(repo, browser);

        let result = service.open_link(Uuid::new_v4(), "abc1234").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::PermissionDenied { .. }
        ));
    }

    #[tokio::test]
    async fn test_open_link_expired_is_deleted() {
        let owner = Uuid::new_v4();
        let mut link = stored_link(owner, "abc1234", 3);
        link.set_expires_at(Utc::now() - Duration::seconds(10));

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_delete()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|_| Ok(()));

        let mut browser = MockBrowserLauncher::new();
        browser.expect_open().times(0);

        let service = service(repo, browser);

        let result = service.open_link(owner, "abc1234").await;

        assert!(matches!(result.unwrap_err(), AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_open_link_exhausted_budget() {
        let owner = Uuid::new_v4();
        let mut link = stored_link(owner, "abc1234", 1);
        link.register_click();
        assert!(!link.active);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update().times(0);

        let mut browser = MockBrowserLauncher::new();
        browser.expect_open().times(0);

        let service = service(repo, browser);

        let result = service.open_link(owner, "abc1234").await;

        assert!(matches!(result.unwrap_err(), AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_edit_link_owner_mismatch_changes_nothing() {
        let link = stored_link(Uuid::new_v4(), "abc1234", 3);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update().times(0);

        let service = service(repo, MockBrowserLauncher::new());

        let result = service
            .edit_link(Uuid::new_v4(), "abc1234", None, Some(10))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::PermissionDenied { .. }
        ));
    }

    #[tokio::test]
    async fn test_edit_link_updates_ttl_from_now() {
        let owner = Uuid::new_v4();
        let link = stored_link(owner, "abc1234", 3);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update().times(1).returning(|_| Ok(()));

        let service = service(repo, MockBrowserLauncher::new());

        let before = Utc::now() + Duration::hours(48);
        let edited = service
            .edit_link(owner, "abc1234", Some(48), None)
            .await
            .unwrap();

        // TTL is measured from now, so the new expiry lands at or after
        // the instant computed just before the call.
        assert!(edited.expires_at >= before - Duration::seconds(5));
        assert_eq!(edited.max_clicks, 3);
    }

    #[tokio::test]
    async fn test_edit_link_lowering_limit_deactivates() {
        let owner = Uuid::new_v4();
        let mut link = stored_link(owner, "abc1234", 5);
        link.register_click();
        link.register_click();

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_update()
            .withf(|link: &Link| !link.active && link.max_clicks == 2)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repo, MockBrowserLauncher::new());

        let edited = service
            .edit_link(owner, "abc1234", None, Some(2))
            .await
            .unwrap();

        assert!(!edited.active);
    }

    #[tokio::test]
    async fn test_edit_link_rejects_zero_ttl() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);

        let service = service(repo, MockBrowserLauncher::new());

        let result = service
            .edit_link(Uuid::new_v4(), "abc1234", Some(0), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_link_owner_mismatch() {
        let link = stored_link(Uuid::new_v4(), "abc1234", 3);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        repo.expect_delete().times(0);

        let service = service(repo, MockBrowserLauncher::new());

        let result = service.delete_link(Uuid::new_v4(), "abc1234").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::PermissionDenied { .. }
        ));
    }

    #[tokio::test]
    async fn test_cleanup_reports_count() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_expired().times(1).returning(|| Ok(4));

        let service = service(repo, MockBrowserLauncher::new());

        assert_eq!(service.cleanup_expired_links().await.unwrap(), 4);
    }
}
