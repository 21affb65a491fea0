use crate::state::AppState;
use axum::Router;

pub mod cache;
pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::directory_routes()
}
