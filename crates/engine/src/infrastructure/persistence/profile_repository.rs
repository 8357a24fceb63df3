//! SQLite-backed player profile storage.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::sync::Arc;
use waystone_domain::{PlayerId, PlayerProfile};

use crate::infrastructure::ports::{ClockPort, ProfileRepo, RepoError};

/// SQLite implementation for player profile storage.
///
/// Profiles are stored as a JSON document per player.
pub struct SqliteProfileRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteProfileRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| RepoError::database("profiles_init", e))?;
            }
        }

        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("profiles_init", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS player_profiles (
                player_id TEXT PRIMARY KEY,
                profile_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("profiles_init", e))?;

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl ProfileRepo for SqliteProfileRepo {
    async fn load(&self, id: PlayerId) -> Result<Option<PlayerProfile>, RepoError> {
        let row = sqlx::query("SELECT profile_json FROM player_profiles WHERE player_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("profile_load", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("profile_json");
                let profile = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, id: PlayerId, profile: &PlayerProfile) -> Result<(), RepoError> {
        let json = serde_json::to_string(profile).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO player_profiles (player_id, profile_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(player_id) DO UPDATE SET
                profile_json = excluded.profile_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id.to_string())
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("profile_save", e))?;

        Ok(())
    }
}
