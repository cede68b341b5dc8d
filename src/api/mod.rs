//! REST API module.
//!
//! Contains the versioned read endpoints the frontend and third-party
//! trackers consume, plus their response envelopes.

mod progress;
mod team;
mod token;

pub use progress::*;
pub use team::*;
pub use token::*;

use serde::Serialize;

use crate::models::FormattedProgress;

/// Response body for the token introspection endpoint.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub permissions: Vec<String>,
    pub token: String,
}

/// Response envelope for the single-user progress endpoint.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub data: FormattedProgress,
    pub meta: ProgressMeta,
}

#[derive(Debug, Serialize)]
pub struct ProgressMeta {
    #[serde(rename = "self")]
    pub self_id: String,
}

/// Response envelope for the team progress endpoint.
#[derive(Debug, Serialize)]
pub struct TeamProgressResponse {
    pub data: Vec<FormattedProgress>,
    pub meta: TeamProgressMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProgressMeta {
    #[serde(rename = "self")]
    pub self_id: String,
    pub hidden_teammates: Vec<String>,
}
