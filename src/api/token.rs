//! Token introspection endpoint.

use axum::{extract::State, Extension, Json};

use super::TokenResponse;
use crate::errors::AppError;
use crate::models::ApiToken;
use crate::AppState;

/// GET /api/v2/token - Data associated with the token in the Authorization
/// header.
pub async fn get_token(
    State(state): State<AppState>,
    Extension(api_token): Extension<ApiToken>,
) -> Result<Json<TokenResponse>, AppError> {
    let token_id = api_token
        .token
        .ok_or_else(|| AppError::Internal("Token document has no token id".to_string()))?;

    // Re-read the document so the response reflects the stored state
    let stored = state
        .repo
        .get_token(&token_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Token {} no longer exists", token_id)))?;

    Ok(Json(TokenResponse {
        permissions: stored.permissions,
        token: stored.token.unwrap_or_else(|| "Unknown".to_string()),
    }))
}
