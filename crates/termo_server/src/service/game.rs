//! Game session state machine.
//!
//! Orchestrates session lifecycle (none → active → finished) over the
//! repository seams: word selection through the corpus index on start,
//! scoring through the attempt evaluator on each guess, and the win /
//! attempt-budget policy. Domain outcomes are first-class enum values the
//! caller branches on; only collaborator failures surface as errors.

use anyhow::{Context, Result};
use derive_getters::Getters;
use serde::Serialize;
use termo_rules::{AttemptResult, ChooseError, Game, WordMap, max_attempts, normalize};
use tracing::{debug, info, instrument};

use crate::service::repository::{ScoreRepository, SessionRepository};

/// Hard bounds on session configuration, independent of corpus contents.
const MIN_WORD_LENGTH: u32 = 3;
const MAX_WORD_LENGTH: u32 = 22;
const MAX_WORD_COUNT: u32 = 20;

/// Outcome of starting a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum StartOutcome {
    /// A new session was created.
    #[serde(rename = "SUCCESS")]
    Success {
        /// Attempt budget, fixed at creation.
        max_attempts: u32,
    },
    /// The player already has an active session.
    #[serde(rename = "ALREADY_IN_PROGRESS")]
    AlreadyActive,
    /// Word length out of bounds or not served by the corpus.
    #[serde(rename = "INVALID_WORD_LENGTH")]
    InvalidWordLength,
    /// Word count out of bounds or more words than the corpus holds.
    #[serde(rename = "INVALID_COUNT")]
    InvalidCount,
}

/// Outcome of recording an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum AttemptOutcome {
    /// The guess was recorded and scored.
    #[serde(rename = "SUCCESS")]
    Success {
        /// One letter-state row per secret word for this guess.
        board: AttemptResult,
        /// Whether this attempt won the session.
        won: bool,
        /// Whether the session just ended (win or budget exhaustion).
        finished: bool,
        /// Attempts recorded so far, including this one.
        attempts_used: u32,
        /// The session's fixed attempt budget.
        max_attempts: u32,
        /// Original spellings of the secret words; populated only on the
        /// terminal transition so the answers are shown exactly once.
        #[serde(skip_serializing_if = "Option::is_none")]
        revealed_words: Option<Vec<String>>,
    },
    /// The player has no active session.
    #[serde(rename = "NO_ACTIVE_GAME")]
    NoActiveSession,
    /// The guess does not match the session's word length.
    #[serde(rename = "INVALID")]
    InvalidGuess,
}

/// Display snapshot of an active session: every historical attempt re-scored.
///
/// Secret words never appear here; they are only revealed by the terminal
/// [`AttemptOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct SessionView {
    /// Length shared by every secret word.
    word_length: u32,
    /// Number of secret words.
    word_count: u32,
    /// The session's fixed attempt budget.
    max_attempts: u32,
    /// Normalized guesses in submission order.
    attempts: Vec<String>,
    /// One [`AttemptResult`] per attempt, in the same order.
    boards: Vec<AttemptResult>,
}

impl SessionView {
    /// Builds the view by re-evaluating every historical attempt.
    ///
    /// Words and attempts are immutable once stored, so recomputation always
    /// reproduces the boards scored at record time.
    pub fn from_game(game: &Game) -> Self {
        let boards = game
            .attempts()
            .iter()
            .map(|attempt| game.check_attempt(attempt))
            .collect();
        Self {
            word_length: game.word_length(),
            word_count: game.word_count(),
            max_attempts: game.attempt_budget(),
            attempts: game.attempts().clone(),
            boards,
        }
    }
}

/// Outcome of querying the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum ActiveOutcome {
    /// The player has an active session.
    #[serde(rename = "SUCCESS")]
    Success {
        /// The re-scored session snapshot.
        #[serde(flatten)]
        session: SessionView,
    },
    /// The player has no active session.
    #[serde(rename = "NO_ACTIVE_GAME")]
    NoActiveSession,
}

/// Service layer for game sessions.
///
/// Holds the immutable corpus index and a repository implementation; all
/// session state lives behind the repository, so the service itself is
/// freely shareable across request handlers.
#[derive(Debug, Clone)]
pub struct GameService<R> {
    word_map: WordMap,
    repository: R,
}

impl<R> GameService<R>
where
    R: SessionRepository + ScoreRepository,
{
    /// Builds the corpus index from a raw word list and wires the repository.
    #[instrument(skip(words, repository))]
    pub fn new<I, S>(words: I, repository: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let word_map = WordMap::from_words(words);
        info!(words = word_map.len(), "Creating GameService");
        Self {
            word_map,
            repository,
        }
    }

    /// Returns the corpus index.
    pub fn word_map(&self) -> &WordMap {
        &self.word_map
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Starts a session: validates the configuration, draws the secret
    /// words, and persists the new session.
    ///
    /// The attempt budget is fixed at creation as `word_count + 5` and is
    /// always derived, never stored.
    ///
    /// # Errors
    ///
    /// Propagates repository failures opaquely; invalid configurations are
    /// domain outcomes, not errors.
    #[instrument(skip(self))]
    pub fn start(&self, player: i64, word_length: u32, word_count: u32) -> Result<StartOutcome> {
        if self
            .repository
            .get_active_session(player)
            .context("get_active_session")?
            .is_some()
        {
            debug!(player, "Player already has an active session");
            return Ok(StartOutcome::AlreadyActive);
        }

        if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&word_length) {
            return Ok(StartOutcome::InvalidWordLength);
        }
        if word_count == 0 || word_count > MAX_WORD_COUNT {
            return Ok(StartOutcome::InvalidCount);
        }

        let words = match self
            .word_map
            .choose_random(word_length, word_count, &mut rand::rng())
        {
            Ok(words) => words,
            Err(ChooseError::InvalidSize) => return Ok(StartOutcome::InvalidWordLength),
            Err(ChooseError::NotEnoughWords) => return Ok(StartOutcome::InvalidCount),
        };

        let session_id = self
            .repository
            .create_session(player, &words)
            .context("create_session")?;

        info!(player, session_id, word_length, word_count, "Session started");
        Ok(StartOutcome::Success {
            max_attempts: max_attempts(word_length, word_count),
        })
    }

    /// Records an attempt: normalizes the guess, scores it against every
    /// secret word, appends it, and applies the win / exhaustion policy.
    ///
    /// The attempt index doubles as an optimistic concurrency token: of two
    /// concurrent attempts on one session, the repository commits exactly
    /// one, so the budget can never be overrun and a win can never be
    /// credited twice. On a win the session is closed before the score is
    /// credited, so a replayed attempt cannot reach the credit a second
    /// time.
    ///
    /// # Errors
    ///
    /// Propagates repository failures opaquely; a failed append leaves the
    /// session unchanged (no attempt recorded, no score credited).
    #[instrument(skip(self, raw_guess))]
    pub fn attempt(&self, player: i64, raw_guess: &str) -> Result<AttemptOutcome> {
        let guess = normalize(raw_guess);

        let Some(game) = self
            .repository
            .get_active_session(player)
            .context("get_active_session")?
        else {
            debug!(player, "No active session");
            return Ok(AttemptOutcome::NoActiveSession);
        };

        if guess.chars().count() as u32 != game.word_length() {
            debug!(player, "Guess length does not match the session");
            return Ok(AttemptOutcome::InvalidGuess);
        }

        let board = game.check_attempt(&guess);
        let index = game.attempts().len() as u32;
        let budget = game.attempt_budget();

        let won = game.is_won_with(&guess);
        let exhausted = index + 1 >= budget;
        let finished = won || exhausted;

        self.repository
            .append_attempt(*game.id(), &guess, index, exhausted)
            .context("append_attempt")?;

        if won {
            self.repository
                .finish_session(*game.id())
                .context("finish_session")?;
            self.repository
                .increment_score(player)
                .context("increment_score")?;
            info!(player, session_id = *game.id(), "Session won");
        } else if exhausted {
            info!(player, session_id = *game.id(), "Attempt budget exhausted");
        }

        let revealed_words = finished.then(|| {
            game.words()
                .iter()
                .map(|word| {
                    // Fall back to the normalized form when the current
                    // corpus build no longer knows the original spelling.
                    self.word_map
                        .original_of(word)
                        .map_or_else(|| word.clone(), ToString::to_string)
                })
                .collect()
        });

        Ok(AttemptOutcome::Success {
            board,
            won,
            finished,
            attempts_used: index + 1,
            max_attempts: budget,
            revealed_words,
        })
    }

    /// Fetches the player's active session with every historical attempt
    /// re-scored for display.
    ///
    /// # Errors
    ///
    /// Propagates repository failures opaquely.
    #[instrument(skip(self))]
    pub fn active_session(&self, player: i64) -> Result<ActiveOutcome> {
        let Some(game) = self
            .repository
            .get_active_session(player)
            .context("get_active_session")?
        else {
            return Ok(ActiveOutcome::NoActiveSession);
        };

        Ok(ActiveOutcome::Success {
            session: SessionView::from_game(&game),
        })
    }
}
