//! Collaborator interfaces consumed by the session state machine.
//!
//! The state machine only ever sees these seams; failures cross them as
//! opaque [`anyhow::Error`]s, unretried, and the caller branches on domain
//! outcomes instead. The SQLite [`GameRepository`] is the production
//! implementation; tests substitute an in-memory double.

use anyhow::Result;
use termo_rules::Game;

use crate::db::GameRepository;

/// Storage for game sessions.
///
/// Implementations must provide at-least-transactional semantics for the
/// append+terminal-flag pair of [`append_attempt`](Self::append_attempt),
/// and must reject an append whose index does not match the current attempt
/// count (the optimistic concurrency guard of the session state machine).
pub trait SessionRepository {
    /// Registers a new active session for the player and returns its id.
    fn create_session(&self, player: i64, secret_words: &[String]) -> Result<i64>;

    /// Fetches the player's active session snapshot, or `None`.
    fn get_active_session(&self, player: i64) -> Result<Option<Game>>;

    /// Appends a guess at the given index, atomically closing the session
    /// when `is_terminal` is set. Fails on a stale index.
    fn append_attempt(&self, session_id: i64, guess: &str, index: u32, is_terminal: bool)
    -> Result<()>;

    /// Marks a session as finished.
    fn finish_session(&self, session_id: i64) -> Result<()>;
}

/// Score keeping for won sessions.
pub trait ScoreRepository {
    /// Credits the player with one won session.
    fn increment_score(&self, player: i64) -> Result<()>;
}

impl SessionRepository for GameRepository {
    fn create_session(&self, player: i64, secret_words: &[String]) -> Result<i64> {
        Ok(self.start_game(player, secret_words)?)
    }

    fn get_active_session(&self, player: i64) -> Result<Option<Game>> {
        Ok(self.get_user_active_game(player)?)
    }

    fn append_attempt(
        &self,
        session_id: i64,
        guess: &str,
        index: u32,
        is_terminal: bool,
    ) -> Result<()> {
        Ok(self.register_attempt(session_id, guess, index, is_terminal)?)
    }

    fn finish_session(&self, session_id: i64) -> Result<()> {
        Ok(self.finish_game(session_id)?)
    }
}

impl ScoreRepository for GameRepository {
    fn increment_score(&self, player: i64) -> Result<()> {
        Ok(GameRepository::increment_score(self, player)?)
    }
}
