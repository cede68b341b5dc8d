//! Document store repository.
//!
//! Collections mirror the upstream document database: `token`, `progress`,
//! `system`, `user`, `team`, and the `tarkovdata` singleton that holds the
//! hideout definition. Documents are stored as JSON text and decoded into
//! typed models on read.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{ApiToken, HideoutData, RawProgress, SystemRecord, TeamRecord, UserRecord};

/// Collection names in the document store.
pub mod collections {
    pub const TOKEN: &str = "token";
    pub const PROGRESS: &str = "progress";
    pub const SYSTEM: &str = "system";
    pub const USER: &str = "user";
    pub const TEAM: &str = "team";
    pub const TARKOV_DATA: &str = "tarkovdata";
}

/// Document id of the hideout singleton in the `tarkovdata` collection.
pub const HIDEOUT_DOC_ID: &str = "hideout";

/// Database repository for all document operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read one document and decode it, or report that it does not exist.
    async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let data: String = row.get("data");
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }

    /// Write (or replace) one document.
    pub async fn put_document<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), AppError> {
        let data = serde_json::to_string(document)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO documents (collection, id, data, updated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT (collection, id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        )
        .bind(collection)
        .bind(id)
        .bind(&data)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== TOKEN OPERATIONS ====================

    /// Look up an API token by its bearer credential.
    pub async fn get_token(&self, token_id: &str) -> Result<Option<ApiToken>, AppError> {
        self.get_document(collections::TOKEN, token_id).await
    }

    /// Bump the token's call counter inside the stored document.
    pub async fn increment_token_calls(&self, token_id: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE documents \
             SET data = json_set(data, '$.calls', COALESCE(json_extract(data, '$.calls'), 0) + 1) \
             WHERE collection = ? AND id = ?",
        )
        .bind(collections::TOKEN)
        .bind(token_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== PROGRESS & TEAM OPERATIONS ====================

    /// Get a user's stored progress document.
    pub async fn get_progress(&self, user_id: &str) -> Result<Option<RawProgress>, AppError> {
        self.get_document(collections::PROGRESS, user_id).await
    }

    /// Get a user's system record.
    pub async fn get_system(&self, user_id: &str) -> Result<Option<SystemRecord>, AppError> {
        self.get_document(collections::SYSTEM, user_id).await
    }

    /// Get a user's user record.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        self.get_document(collections::USER, user_id).await
    }

    /// Get a team roster by team id.
    pub async fn get_team(&self, team_id: &str) -> Result<Option<TeamRecord>, AppError> {
        self.get_document(collections::TEAM, team_id).await
    }

    /// Get the static hideout definition singleton.
    pub async fn get_hideout(&self) -> Result<Option<HideoutData>, AppError> {
        self.get_document(collections::TARKOV_DATA, HIDEOUT_DOC_ID)
            .await
    }
}
