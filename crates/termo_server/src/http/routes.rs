//! Route definitions and request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, instrument};

use crate::db::GameRepository;
use crate::service::{
    ActiveOutcome, AttemptOutcome, GameService, StartOutcome, UserService, UserView,
};

use super::identity::Identity;

/// Shared state for all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session state machine.
    pub games: Arc<GameService<GameRepository>>,
    /// Identity boundary and profiles.
    pub users: Arc<UserService>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/game/start", post(start_game))
        .route("/game/attempt", post(attempt_game))
        .route("/game/active", get(active_game))
        .route("/user/me", get(me))
        .with_state(state)
}

/// Opaque wrapper for collaborator failures: logged with cause, surfaced
/// as a bare 500.
struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Deserialize)]
struct StartRequest {
    word_length: u32,
    word_count: u32,
}

#[derive(Debug, Deserialize)]
struct AttemptRequest {
    attempt: String,
}

#[instrument(skip(state, body), fields(player = %user.name()))]
async fn start_game(
    State(state): State<AppState>,
    Identity(user): Identity,
    Json(body): Json<StartRequest>,
) -> Result<Json<StartOutcome>, AppError> {
    let outcome = state
        .games
        .start(*user.id(), body.word_length, body.word_count)?;
    Ok(Json(outcome))
}

#[instrument(skip(state, body), fields(player = %user.name()))]
async fn attempt_game(
    State(state): State<AppState>,
    Identity(user): Identity,
    Json(body): Json<AttemptRequest>,
) -> Result<Json<AttemptOutcome>, AppError> {
    let outcome = state.games.attempt(*user.id(), &body.attempt)?;
    Ok(Json(outcome))
}

#[instrument(skip(state), fields(player = %user.name()))]
async fn active_game(
    State(state): State<AppState>,
    Identity(user): Identity,
) -> Result<Json<ActiveOutcome>, AppError> {
    let outcome = state.games.active_session(*user.id())?;
    Ok(Json(outcome))
}

#[instrument(skip(state), fields(player = %user.name()))]
async fn me(
    State(state): State<AppState>,
    Identity(user): Identity,
) -> Result<Json<UserView>, AppError> {
    let active = match state.games.active_session(*user.id())? {
        ActiveOutcome::Success { session } => Some(session),
        ActiveOutcome::NoActiveSession => None,
    };
    Ok(Json(UserView::new(&user, active)))
}
