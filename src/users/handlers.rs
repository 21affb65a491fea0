use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{dto::PublicUser, extractors::AuthUser},
    error::AccountError,
    state::AppState,
    users::dto::{SecondStepRequest, ThirdStepRequest},
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile/details", put(update_details))
        .route("/users/profile/preferences", put(update_preferences))
        .route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn update_details(
    State(state): State<AppState>,
    Json(payload): Json<SecondStepRequest>,
) -> Result<StatusCode, AccountError> {
    state
        .accounts
        .update_profile_details(payload.user_id.as_deref(), &payload.details)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(payload): Json<ThirdStepRequest>,
) -> Result<StatusCode, AccountError> {
    state
        .accounts
        .complete_registration(payload.user_id.as_deref(), &payload.preferences)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AccountError> {
    Ok(Json(state.accounts.current_user(user_id).await?))
}
