use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use tracing::instrument;

use crate::state::AppState;

use super::dto::Envelope;
use super::extractors::ValidatedUser;
use super::repo_types::User;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(find_all).post(create))
        .route("/users/:id", get(find_one).put(update).delete(remove))
}

#[instrument(skip(state, fields))]
pub async fn create(
    State(state): State<AppState>,
    ValidatedUser(fields): ValidatedUser,
) -> Envelope<User> {
    state.users.create(fields).await
}

#[instrument(skip(state))]
pub async fn find_all(State(state): State<AppState>) -> Envelope<Vec<User>> {
    state.users.find_all().await
}

#[instrument(skip(state))]
pub async fn find_one(State(state): State<AppState>, Path(id): Path<String>) -> Envelope<User> {
    state.users.find_one(&id).await
}

#[instrument(skip(state, fields))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedUser(fields): ValidatedUser,
) -> Envelope<()> {
    state.users.update(&id, fields).await
}

#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Envelope<()> {
    state.users.remove(&id).await
}
