#![allow(dead_code)]

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use shortlink::application::services::LinkService;
use shortlink::config::Config;
use shortlink::infrastructure::browser::NullBrowser;
use shortlink::infrastructure::persistence::SqliteLinkRepository;

/// Service wired against the real SQLite repository and a no-op browser.
pub fn create_test_service(pool: SqlitePool) -> LinkService<SqliteLinkRepository, NullBrowser> {
    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
    LinkService::new(repository, Arc::new(NullBrowser), Config::default())
}

pub fn create_test_repository(pool: SqlitePool) -> SqliteLinkRepository {
    SqliteLinkRepository::new(Arc::new(pool))
}

/// Inserts a link row directly, bypassing the service.
pub async fn insert_link(
    pool: &SqlitePool,
    code: &str,
    owner: Uuid,
    max_clicks: i64,
    current_clicks: i64,
    expires_in_seconds: i64,
    active: bool,
) {
    let now = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO links (
            short_code, original_url, owner_id,
            max_clicks, current_clicks,
            created_at, expires_at, active
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(code)
    .bind("https://example.com")
    .bind(owner.to_string())
    .bind(max_clicks)
    .bind(current_clicks)
    .bind(now)
    .bind(now + expires_in_seconds)
    .bind(active as i64)
    .execute(pool)
    .await
    .unwrap();
}

/// Reads back the raw (max_clicks, current_clicks, active) triple for a code.
pub async fn read_link_state(pool: &SqlitePool, code: &str) -> Option<(i64, i64, bool)> {
    sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT max_clicks, current_clicks, active FROM links WHERE short_code = ?1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await
    .unwrap()
    .map(|(max, cur, active)| (max, cur, active != 0))
}
