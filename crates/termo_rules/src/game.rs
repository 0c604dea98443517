//! Session entity and the win/attempt-budget rules.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::evaluate::{AttemptResult, evaluate_attempt};

/// Maximum number of attempts for a session.
///
/// Only the word count feeds the formula today; `word_length` is accepted so
/// the signature stays stable if the budget later scales with length, and it
/// is deliberately not stored anywhere it could drift from this formula.
pub fn max_attempts(word_length: u32, word_count: u32) -> u32 {
    let _ = word_length;
    word_count + 5
}

/// Snapshot of one player's puzzle, in progress or finished.
///
/// Secret words are normalized, equal-length, and frozen at creation;
/// attempts are normalized guesses in submission order, append-only. The
/// canonical copy lives with the persistence layer; the engine only ever
/// works on snapshots it fetched and persists the same snapshots back, which
/// is what lets transitions be serialized with optimistic concurrency
/// instead of in-process locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Game {
    /// Storage identifier.
    id: i64,
    /// Normalized secret words in session order.
    words: Vec<String>,
    /// Normalized guesses in submission order.
    attempts: Vec<String>,
    /// False exactly once the session is won or the budget is exhausted.
    is_active: bool,
}

impl Game {
    /// Length shared by every secret word, in chars.
    pub fn word_length(&self) -> u32 {
        self.words
            .first()
            .map_or(0, |word| word.chars().count() as u32)
    }

    /// Number of secret words in the session.
    pub fn word_count(&self) -> u32 {
        self.words.len() as u32
    }

    /// Attempt budget for this session, derived from [`max_attempts`].
    pub fn attempt_budget(&self) -> u32 {
        max_attempts(self.word_length(), self.word_count())
    }

    /// Scores a normalized guess against every secret word.
    #[instrument(skip(self, guess), fields(session_id = self.id))]
    pub fn check_attempt(&self, guess: &str) -> AttemptResult {
        evaluate_attempt(&self.words, guess)
    }

    /// Whether the session is won once `current_attempt` is recorded.
    ///
    /// Every secret word must appear verbatim among the recorded attempts or
    /// equal the current one; a word is only ever satisfied by an exact
    /// match, never by positional overlap.
    #[instrument(skip(self, current_attempt), fields(session_id = self.id))]
    pub fn is_won_with(&self, current_attempt: &str) -> bool {
        self.words.iter().all(|word| {
            self.attempts.iter().any(|attempt| attempt == word) || current_attempt == word
        })
    }
}
