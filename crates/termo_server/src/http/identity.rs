//! Authenticated-player boundary.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use tracing::{debug, warn};

use crate::db::User;

use super::routes::AppState;

/// Header carrying the already-authenticated player name.
pub const PLAYER_HEADER: &str = "x-player";

/// The player behind the current request.
///
/// The engine never validates credentials; an upstream authenticator is
/// expected to have verified the caller and asserted their name in the
/// [`PLAYER_HEADER`] header. This extractor only resolves that name to a
/// user record, creating one on first sight.
#[derive(Debug, Clone)]
pub struct Identity(pub User);

impl FromRequestParts<AppState> for Identity {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(PLAYER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();

        if name.is_empty() {
            debug!("Request without player identity");
            return Err((StatusCode::UNAUTHORIZED, "missing player identity"));
        }

        match state.users.get_or_create(name) {
            Ok(user) => Ok(Self(user)),
            Err(err) => {
                warn!(error = %err, "Identity lookup failed");
                Err((StatusCode::INTERNAL_SERVER_ERROR, "internal error"))
            }
        }
    }
}
