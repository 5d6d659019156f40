//! Browser launch side effect behind a trait seam.
//!
//! Opening a URL is the one OS-level effect the lifecycle service performs.
//! It sits behind [`BrowserLauncher`] so the service can be exercised in
//! tests without touching a desktop environment, mirroring how the rest of
//! the infrastructure layer is swapped out.

use crate::error::AppError;

/// Performs the OS-level "open this URL" action.
///
/// Failure here is fatal for the single `open_link` call in progress: the
/// click is not registered and nothing is persisted.
#[cfg_attr(test, mockall::automock)]
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), AppError>;
}

/// Launches the system default browser.
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), AppError> {
        open::that(url).map_err(|e| {
            AppError::infrastructure(
                "Failed to open URL in browser",
                serde_json::json!({ "url": url, "source": e.to_string() }),
            )
        })
    }
}

/// Browser that does nothing and always succeeds. Used in tests and headless
/// environments.
pub struct NullBrowser;

impl BrowserLauncher for NullBrowser {
    fn open(&self, _url: &str) -> Result<(), AppError> {
        Ok(())
    }
}
