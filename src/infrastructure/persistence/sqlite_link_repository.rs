//! SQLite implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// SQLite repository for link storage and retrieval.
///
/// Uses sqlx prepared statements with explicit parameter binding. Timestamps
/// are stored as integer seconds since the epoch and `active` as 0/1, so the
/// database file stays readable with plain sqlite3 tooling.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

/// Raw row shape of the `links` table.
#[derive(sqlx::FromRow)]
struct LinkRow {
    short_code: String,
    original_url: String,
    owner_id: String,
    max_clicks: i64,
    current_clicks: i64,
    created_at: i64,
    expires_at: i64,
    active: i64,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let owner_id = Uuid::parse_str(&row.owner_id).map_err(|e| {
            AppError::infrastructure(
                "Corrupt owner id in links table",
                serde_json::json!({ "owner_id": row.owner_id, "source": e.to_string() }),
            )
        })?;

        let timestamp = |secs: i64| {
            DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
                AppError::infrastructure(
                    "Corrupt timestamp in links table",
                    serde_json::json!({ "seconds": secs }),
                )
            })
        };

        Ok(Link::from_parts(
            row.short_code,
            row.original_url,
            owner_id,
            row.max_clicks as u32,
            row.current_clicks as u32,
            timestamp(row.created_at)?,
            timestamp(row.expires_at)?,
            row.active != 0,
        ))
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn save(&self, link: &Link) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO links (
                short_code, original_url, owner_id,
                max_clicks, current_clicks,
                created_at, expires_at, active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&link.short_code)
        .bind(&link.original_url)
        .bind(link.owner_id.to_string())
        .bind(link.max_clicks as i64)
        .bind(link.current_clicks as i64)
        .bind(link.created_at.timestamp())
        .bind(link.expires_at.timestamp())
        .bind(link.active as i64)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT short_code, original_url, owner_id,
                   max_clicks, current_clicks,
                   created_at, expires_at, active
            FROM links
            WHERE short_code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::try_from).transpose()
    }

    async fn find_all_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT short_code, original_url, owner_id,
                   max_clicks, current_clicks,
                   created_at, expires_at, active
            FROM links
            WHERE owner_id = ?1
            "#,
        )
        .bind(owner_id.to_string())
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Link::try_from).collect()
    }

    async fn update(&self, link: &Link) -> Result<(), AppError> {
        // Zero affected rows (unknown code) is deliberately not an error.
        sqlx::query(
            r#"
            UPDATE links SET
                current_clicks = ?1,
                max_clicks = ?2,
                active = ?3,
                expires_at = ?4
            WHERE short_code = ?5
            "#,
        )
        .bind(link.current_clicks as i64)
        .bind(link.max_clicks as i64)
        .bind(link.active as i64)
        .bind(link.expires_at.timestamp())
        .bind(&link.short_code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM links WHERE short_code = ?1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE expires_at < ?1")
            .bind(Utc::now().timestamp())
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM links")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
