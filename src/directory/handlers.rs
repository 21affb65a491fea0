use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use super::{cache::FIND_ROOMMATES_PATH, dto::RoommateCard};
use crate::{error::AccountError, state::AppState};

pub fn directory_routes() -> Router<AppState> {
    Router::new().route("/roommates", get(list_roommates))
}

#[instrument(skip(state))]
pub async fn list_roommates(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoommateCard>>, AccountError> {
    if let Some(cards) = state.pages.get(FIND_ROOMMATES_PATH).await {
        debug!(count = cards.len(), "roommates served from cache");
        return Ok(Json(cards));
    }

    // Taken before the read so a concurrent step 3 invalidates this rebuild.
    let generation = state.pages.generation(FIND_ROOMMATES_PATH).await;
    let cards: Vec<RoommateCard> = state
        .users
        .list_completed()
        .await?
        .into_iter()
        .map(RoommateCard::from)
        .collect();
    let stored = state
        .pages
        .put_if_current(FIND_ROOMMATES_PATH, generation, cards.clone())
        .await;
    debug!(count = cards.len(), stored, "roommates listing rebuilt");
    Ok(Json(cards))
}
