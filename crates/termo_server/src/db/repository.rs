//! Database repository for user profiles and game sessions.

use diesel::prelude::*;
use termo_rules::Game;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRow, NewGame, NewGameAttempt, NewGameWord, NewUser, User, schema};

/// Database repository for user and game operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Creates a new user profile with a zero score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is already taken or a database error
    /// occurs.
    #[instrument(skip(self))]
    pub fn create_user(&self, name: String) -> Result<User, DbError> {
        debug!(name = %name, "Creating user");
        let mut conn = self.connection()?;

        let user = diesel::insert_into(schema::users::table)
            .values(&NewUser::new(name))
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), name = %user.name(), "User created");
        Ok(user)
    }

    /// Gets a user by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, name: &str) -> Result<Option<User>, DbError> {
        debug!(name = %name, "Looking up user by name");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::name.eq(name))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()?;

        Ok(user)
    }

    /// Adds one won session to the user's score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn increment_score(&self, user_id: i64) -> Result<(), DbError> {
        debug!(user_id, "Incrementing score");
        let mut conn = self.connection()?;

        diesel::update(schema::users::table.find(user_id))
            .set(schema::users::score.eq(schema::users::score + 1))
            .execute(&mut conn)?;

        info!(user_id, "Score incremented");
        Ok(())
    }

    /// Registers a new game with its secret words in one transaction.
    ///
    /// Word order is frozen under `idx`, which is the session order every
    /// later read reproduces.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs; nothing is persisted
    /// on failure.
    #[instrument(skip(self, words), fields(words = words.len()))]
    pub fn start_game(&self, user_id: i64, words: &[String]) -> Result<i64, DbError> {
        debug!(user_id, "Registering new game");
        let mut conn = self.connection()?;

        let game_id = conn.transaction::<_, DbError, _>(|conn| {
            let game_id = diesel::insert_into(schema::games::table)
                .values(&NewGame::new(user_id))
                .returning(schema::games::id)
                .get_result::<i64>(conn)?;

            let rows: Vec<NewGameWord> = words
                .iter()
                .enumerate()
                .map(|(idx, word)| NewGameWord::new(game_id, word.clone(), idx as i32))
                .collect();
            diesel::insert_into(schema::game_words::table)
                .values(&rows)
                .execute(conn)?;

            Ok(game_id)
        })?;

        info!(user_id, game_id, "Game registered");
        Ok(game_id)
    }

    /// Gets the user's active game with words and attempts in stored order.
    /// Returns `None` if the user has no active game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_active_game(&self, user_id: i64) -> Result<Option<Game>, DbError> {
        debug!(user_id, "Loading active game");
        let mut conn = self.connection()?;

        let game = schema::games::table
            .filter(schema::games::user_id.eq(user_id))
            .filter(schema::games::is_active.eq(true))
            .select(GameRow::as_select())
            .first::<GameRow>(&mut conn)
            .optional()?;

        let Some(game) = game else {
            debug!(user_id, "No active game");
            return Ok(None);
        };

        let game_id = *game.id();
        let words = schema::game_words::table
            .filter(schema::game_words::game_id.eq(game_id))
            .order(schema::game_words::idx.asc())
            .select(schema::game_words::word)
            .load::<String>(&mut conn)?;

        let attempts = schema::game_attempts::table
            .filter(schema::game_attempts::game_id.eq(game_id))
            .order(schema::game_attempts::idx.asc())
            .select(schema::game_attempts::attempt)
            .load::<String>(&mut conn)?;

        debug!(
            user_id,
            game_id,
            attempts = attempts.len(),
            "Active game loaded"
        );
        Ok(Some(Game::new(game_id, words, attempts, *game.is_active())))
    }

    /// Appends an attempt at the given index, closing the game in the same
    /// transaction when `finish` is set.
    ///
    /// The unique `(game_id, idx)` constraint makes this a compare-and-swap:
    /// two concurrent appends for one game agree on the expected index and
    /// only one insert can commit, so the attempt budget can never be
    /// overrun.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on a stale index or database error; nothing is
    /// persisted on failure.
    #[instrument(skip(self, attempt))]
    pub fn register_attempt(
        &self,
        game_id: i64,
        attempt: &str,
        idx: u32,
        finish: bool,
    ) -> Result<(), DbError> {
        debug!(game_id, idx, finish, "Registering attempt");
        let mut conn = self.connection()?;

        conn.transaction::<_, DbError, _>(|conn| {
            diesel::insert_into(schema::game_attempts::table)
                .values(&NewGameAttempt::new(game_id, attempt.to_string(), idx as i32))
                .execute(conn)?;

            if finish {
                diesel::update(schema::games::table.find(game_id))
                    .set(schema::games::is_active.eq(false))
                    .execute(conn)?;
            }

            Ok(())
        })?;

        info!(game_id, idx, finish, "Attempt registered");
        Ok(())
    }

    /// Marks a game as finished/inactive.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn finish_game(&self, game_id: i64) -> Result<(), DbError> {
        debug!(game_id, "Finishing game");
        let mut conn = self.connection()?;

        diesel::update(schema::games::table.find(game_id))
            .set(schema::games::is_active.eq(false))
            .execute(&mut conn)?;

        info!(game_id, "Game finished");
        Ok(())
    }
}
