use axum::http::{HeaderMap, header::AUTHORIZATION};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt::{self, Claims},
};

/// Verified caller of a protected endpoint.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i64,
    pub user_type: Option<String>,
    pub is_admin: bool,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            user_type: claims.user_type,
            is_admin: claims.is_admin,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub fn current_user(headers: &HeaderMap, app_state: &AppState) -> AppResult<CurrentUser> {
    let token = bearer_token(headers).ok_or(AppError::InvalidCredentials)?;
    let claims = jwt::verify(token, &app_state.config.jwt_secret)?;
    Ok(claims.into())
}

pub fn current_admin(headers: &HeaderMap, app_state: &AppState) -> AppResult<CurrentUser> {
    let user = current_user(headers, app_state)?;
    if !user.is_admin {
        tracing::warn!(user_id = user.user_id, "Non-admin attempted admin action");
        return Err(AppError::Forbidden);
    }
    Ok(user)
}
