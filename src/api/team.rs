//! Team progress endpoint.
//!
//! Resolves the requester's team, fans out per-member progress reads, and
//! aggregates the formatted results with the requester's hide preferences.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::{TeamProgressMeta, TeamProgressResponse};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{permissions, ApiToken, FormattedProgress, HideoutData};
use crate::progress::{format_progress, hidden_teammates};
use crate::AppState;

/// GET /api/v2/team/progress - Progress data of all members of the
/// requester's team.
pub async fn get_team_progress(
    State(state): State<AppState>,
    Extension(api_token): Extension<ApiToken>,
) -> Result<Json<TeamProgressResponse>, AppError> {
    if !api_token.has_permission(permissions::TEAM_PROGRESS) {
        return Err(AppError::Unauthorized);
    }

    let owner = api_token.owner;

    // The requester's meta documents and the hideout singleton are
    // independent reads
    let (system, user, hideout) = tokio::join!(
        state.repo.get_system(&owner),
        state.repo.get_user(&owner),
        state.repo.get_hideout(),
    );

    // No system record means the account is broken; let it surface as a 500
    let system = system?
        .ok_or_else(|| AppError::Internal(format!("No system record for user {}", owner)))?;
    let user = user?.unwrap_or_default();
    let hideout = hideout.unwrap_or_else(|err| {
        tracing::error!("Error loading hideout data: {}", err);
        None
    });

    let (members, hidden) = match system.team {
        // Not currently in a team; the roster is just the requester
        None => (vec![owner.clone()], Vec::new()),
        Some(team_id) => {
            let team = state
                .repo
                .get_team(&team_id)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Team {} not found", team_id)))?;
            let hidden = hidden_teammates(&user.team_hide, &team.members);
            (team.members, hidden)
        }
    };

    let data = fetch_team_progress(&state.repo, &members, hideout.as_ref()).await?;

    Ok(Json(TeamProgressResponse {
        data,
        meta: TeamProgressMeta {
            self_id: owner,
            hidden_teammates: hidden,
        },
    }))
}

/// Fetch every member's progress concurrently, keeping roster order in the
/// result.
async fn fetch_team_progress(
    repo: &Arc<Repository>,
    members: &[String],
    hideout: Option<&HideoutData>,
) -> Result<Vec<FormattedProgress>, AppError> {
    let handles: Vec<_> = members
        .iter()
        .map(|member_id| {
            let repo = Arc::clone(repo);
            let member_id = member_id.clone();
            tokio::spawn(async move {
                let progress = repo.get_progress(&member_id).await;
                (member_id, progress)
            })
        })
        .collect();

    let mut team = Vec::with_capacity(handles.len());
    for handle in handles {
        let (member_id, progress) = handle
            .await
            .map_err(|err| AppError::Internal(format!("Progress fetch task failed: {}", err)))?;
        team.push(format_progress(progress?, &member_id, hideout));
    }

    Ok(team)
}
