use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::{cookie::read_cookie, jwt::JwtKeys};
use crate::{error::AccountError, state::AppState};

/// Reads the session cookie (or a Bearer header) and yields the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AccountError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, &state.config.session.cookie_name)
            .or_else(|| {
                parts
                    .headers
                    .get(axum::http::header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .map(str::to_string)
            })
            .ok_or(AccountError::Unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            AccountError::Unauthorized
        })?;

        Ok(AuthUser(claims.sub))
    }
}
