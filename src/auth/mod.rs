//! Bearer-token authentication middleware.
//!
//! Tokens are opaque ids resolved against the `token` collection. A resolved
//! token rides along in the request extensions; every authenticated request
//! also bumps the token's call counter off the response path.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::db::Repository;
use crate::errors::ErrorBody;

/// Bearer authentication layer function.
pub async fn bearer_auth_layer(repo: Arc<Repository>, mut request: Request, next: Next) -> Response {
    // If no auth, 401
    let Some(auth_header) = request.headers().get(header::AUTHORIZATION) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let Ok(auth_header) = auth_header.to_str() else {
        return bad_request("Unknown error with Authorization header");
    };

    let Some(token_id) = parse_bearer(auth_header) else {
        return bad_request("No bearer token set");
    };

    match repo.get_token(token_id).await {
        Ok(Some(api_token)) => {
            tracing::debug!(token = %token_id, owner = %api_token.owner, "Found token");

            // Count the call without holding up the response; failures are
            // logged, never surfaced.
            let counter_repo = Arc::clone(&repo);
            let counter_id = token_id.to_string();
            tokio::spawn(async move {
                if let Err(err) = counter_repo.increment_token_calls(&counter_id).await {
                    tracing::warn!("Failed to increment token call counter: {}", err);
                }
            });

            request.extensions_mut().insert(api_token);
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!(token = %token_id, "Did not find token");
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Extract the token from an Authorization header value.
///
/// The scheme part is not validated; the token is whatever follows the first
/// space.
fn parse_bearer(auth_header: &str) -> Option<&str> {
    auth_header.split(' ').nth(1).filter(|token| !token.is_empty())
}

/// Create a 400 response with the standard error body.
fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
