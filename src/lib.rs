//! # shortlink
//!
//! A personal short-link manager. Issues compact unique codes for URLs,
//! enforces per-link expiration (TTL) and click-count budgets, and restricts
//! editing and deletion to the owning session. State is durable in SQLite
//! and survives restarts.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - The [`domain::entities::Link`] entity with
//!   its lifecycle state machine, and the [`domain::repositories::LinkRepository`]
//!   trait
//! - **Application Layer** ([`application`]) - The lifecycle service that
//!   orchestrates creation, click-through, editing, deletion, and the expiry sweep
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence and the
//!   browser-launch side effect
//!
//! The binary in `src/main.rs` is an interactive console front end; the five
//! service operations are the entire surface it consumes.
//!
//! ## Quick Start
//!
//! ```bash
//! # Optional: where to keep the database
//! export DATABASE_URL="sqlite://shortlink.db?mode=rwc"
//!
//! # Interactive menu
//! cargo run
//!
//! # Or one-shot commands
//! cargo run -- create https://example.com --max-clicks 5
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See the [`config`] module for available options.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::LinkService;
    pub use crate::config::Config;
    pub use crate::domain::entities::Link;
    pub use crate::domain::repositories::LinkRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::browser::{BrowserLauncher, NullBrowser, SystemBrowser};
    pub use crate::infrastructure::persistence::SqliteLinkRepository;
    pub use crate::state::AppState;
}
