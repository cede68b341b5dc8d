//! Player progress endpoint.

use axum::{extract::State, Extension, Json};

use super::{ProgressMeta, ProgressResponse};
use crate::errors::AppError;
use crate::models::{permissions, ApiToken};
use crate::progress::format_progress;
use crate::AppState;

/// GET /api/v2/progress - Progress data of the requesting player.
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(api_token): Extension<ApiToken>,
) -> Result<Json<ProgressResponse>, AppError> {
    if !api_token.has_permission(permissions::GET_PROGRESS) {
        return Err(AppError::Unauthorized);
    }

    let (progress, hideout) = tokio::join!(
        state.repo.get_progress(&api_token.owner),
        state.repo.get_hideout(),
    );

    let progress = progress?;
    // Undecodable hideout data must not fail the request; format unmerged
    let hideout = hideout.unwrap_or_else(|err| {
        tracing::error!("Error loading hideout data: {}", err);
        None
    });

    let data = format_progress(progress, &api_token.owner, hideout.as_ref());

    Ok(Json(ProgressResponse {
        data,
        meta: ProgressMeta {
            self_id: api_token.owner,
        },
    }))
}
