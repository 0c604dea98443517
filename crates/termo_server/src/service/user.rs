//! User profile business logic.

use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRepository, User};
use crate::service::game::SessionView;

/// Service layer for user profile operations.
///
/// Wraps [`GameRepository`] with get-or-create semantics. This is the
/// identity boundary of the engine: callers arrive already authenticated and
/// are resolved to a user record by name.
#[derive(Debug, Clone)]
pub struct UserService {
    repository: GameRepository,
}

impl UserService {
    /// Creates a new user service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating UserService");
        Self { repository }
    }

    /// Returns an existing user by name or creates one if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_or_create(&self, name: &str) -> Result<User, DbError> {
        debug!(name = %name, "Getting or creating user");

        if let Some(user) = self.repository.get_user_by_name(name)? {
            debug!(user_id = user.id(), "Existing user found");
            return Ok(user);
        }

        info!(name = %name, "Creating new user");
        self.repository.create_user(name.to_string())
    }
}

/// Public profile data sent to the presentation layer.
#[derive(Debug, Clone, Serialize, Getters)]
pub struct UserView {
    /// Server identifier.
    id: i64,
    /// Player name.
    name: String,
    /// Number of won sessions.
    score: i32,
    /// The player's active session, if any.
    active_game: Option<SessionView>,
}

impl UserView {
    /// Builds the view from a user record and an optional session view.
    pub fn new(user: &User, active_game: Option<SessionView>) -> Self {
        Self {
            id: *user.id(),
            name: user.name().clone(),
            score: *user.score(),
            active_game,
        }
    }
}
