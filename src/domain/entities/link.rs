//! Link entity: one short code mapped to a URL, with its lifecycle state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A short link with its click budget and expiry state.
///
/// The entity is a plain value type: services load a snapshot from the store,
/// mutate it through the methods below, and commit it back with a single
/// repository `update`. The short code, target URL, owner, and creation time
/// never change after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Uuid,
    pub max_clicks: u32,
    pub current_clicks: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

impl Link {
    /// Creates a fresh link: active, zero clicks, created now.
    pub fn new(
        short_code: String,
        original_url: String,
        owner_id: Uuid,
        max_clicks: u32,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            short_code,
            original_url,
            owner_id,
            max_clicks,
            current_clicks: 0,
            created_at: Utc::now(),
            expires_at,
            active: true,
        }
    }

    /// Reconstructs a link from its persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        short_code: String,
        original_url: String,
        owner_id: Uuid,
        max_clicks: u32,
        current_clicks: u32,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        active: bool,
    ) -> Self {
        Self {
            short_code,
            original_url,
            owner_id,
            max_clicks,
            current_clicks,
            created_at,
            expires_at,
            active,
        }
    }

    /// Returns true if the link's expiry instant has been reached.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the click budget is used up.
    pub fn is_limit_reached(&self) -> bool {
        self.current_clicks >= self.max_clicks
    }

    /// Returns true if the link can still be redeemed: active, not expired,
    /// and under its click budget.
    pub fn can_be_used(&self) -> bool {
        self.active && !self.is_expired() && !self.is_limit_reached()
    }

    /// Registers one redemption of the link.
    ///
    /// No-op on an inactive link, so the click count never moves once the
    /// link is deactivated. Reaching the budget deactivates the link; this
    /// is the only transition that does so implicitly.
    pub fn register_click(&mut self) {
        if !self.active {
            return;
        }

        self.current_clicks += 1;

        if self.current_clicks >= self.max_clicks {
            self.active = false;
        }
    }

    /// Forces the link inactive (expiry handling, administrative action).
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Replaces the click budget.
    ///
    /// If the existing click count already meets the new ceiling the link is
    /// deactivated. The reverse is deliberately not true: raising the ceiling
    /// above `current_clicks` leaves an inactive link inactive.
    pub fn set_max_clicks(&mut self, max_clicks: u32) {
        self.max_clicks = max_clicks;
        if self.current_clicks >= self.max_clicks {
            self.active = false;
        }
    }

    /// Replaces the expiry instant without touching click or active state.
    pub fn set_expires_at(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = expires_at;
    }
}
