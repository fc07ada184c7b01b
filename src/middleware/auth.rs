//! Bearer credential validation.
//!
//! Dispatches on the token prefix: `pat_` tokens take the personal access
//! token path, everything else is treated as a JWT. Either way, roles and
//! permissions are resolved through the permission cache, and every failure
//! collapses into the same generic 401.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use gatehouse_auth::{PAT_PREFIX, filter_by_scopes, hash_token, verify_token};
use gatehouse_core::AppError;
use gatehouse_models::{AuthType, CurrentUser};

use crate::state::AppState;

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or_else(AppError::unauthorized)?;

    let user = if token.starts_with(PAT_PREFIX) {
        authenticate_pat(&state, &token).await?
    } else {
        authenticate_jwt(&state, &token).await?
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

async fn authenticate_jwt(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = verify_token(token, &state.jwt_config)?;
    let user_id = claims.user_id().ok_or_else(AppError::unauthorized)?;

    let resolved = state
        .permissions
        .user_permissions(user_id)
        .await
        .map_err(|_| AppError::unauthorized())?;

    Ok(CurrentUser {
        user_id,
        username: claims.username,
        roles: resolved.roles,
        permissions: resolved.permissions,
        auth_type: AuthType::Jwt,
    })
}

async fn authenticate_pat(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let pat = state
        .pats
        .find_by_hash(&hash_token(token))
        .await
        .map_err(|_| AppError::unauthorized())?
        .ok_or_else(AppError::unauthorized)?;

    if !pat.is_usable(Utc::now()) {
        return Err(AppError::unauthorized());
    }

    let resolved = state
        .permissions
        .user_permissions(pat.user_id)
        .await
        .map_err(|_| AppError::unauthorized())?;

    // Strict subset: scopes only ever narrow the user's permission set.
    let effective = filter_by_scopes(&pat.scopes, &resolved.permissions);

    Ok(CurrentUser {
        user_id: pat.user_id,
        username: pat.username,
        roles: resolved.roles,
        permissions: effective,
        auth_type: AuthType::Pat,
    })
}
