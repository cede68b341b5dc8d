//! API token model.

use serde::{Deserialize, Serialize};

/// Permission strings recognized on API tokens.
pub mod permissions {
    /// Read the token owner's own progress.
    pub const GET_PROGRESS: &str = "GP";
    /// Read the progress of the owner's whole team.
    pub const TEAM_PROGRESS: &str = "TP";
    /// Write progress. Part of the permission model, but no write endpoint
    /// is currently exposed.
    #[allow(dead_code)]
    pub const WRITE_PROGRESS: &str = "WP";
}

/// A stored API token. The document id doubles as the bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    /// The token's own id, as recorded inside the document.
    #[serde(default)]
    pub token: Option<String>,
    /// User id of the token's owner.
    pub owner: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Number of authenticated calls made with this token.
    #[serde(default)]
    pub calls: i64,
}

impl ApiToken {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
