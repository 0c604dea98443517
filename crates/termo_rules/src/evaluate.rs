//! Attempt evaluation: classifying each guess letter against every secret
//! word in a session.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::instrument;

/// Classification of one guess letter against one secret word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LetterState {
    /// Right letter in the right position.
    Correct,
    /// Right letter in the wrong position (duplicates accounted for).
    Present,
    /// Letter not in the secret word, or all its occurrences already claimed.
    Absent,
}

/// Per-position states of one guess against one secret word.
pub type WordState = Vec<LetterState>;

/// One [`WordState`] per secret word, in session order.
pub type AttemptResult = Vec<WordState>;

/// Sentinel for letters consumed by an earlier pass. Normalization strips
/// all whitespace, so this can never occur in either input.
const CONSUMED: char = '\n';

/// Evaluates a normalized guess against one normalized secret word.
///
/// Classic three-pass scan. Pass 1 marks exact positions and consumes the
/// matched secret letters so a duplicate in the guess cannot claim them
/// again. Pass 2 walks the guess left to right and lets each unresolved
/// letter claim the leftmost remaining occurrence in the secret; that claim
/// order decides which repeated letter "wins" and must not change. Pass 3
/// marks everything else absent.
///
/// Callers guarantee equal lengths; the session state machine rejects
/// mismatched guesses before evaluation ever runs.
pub fn evaluate_word(secret: &str, guess: &str) -> WordState {
    let mut secret_letters: Vec<char> = secret.chars().collect();
    let guess_letters: Vec<char> = guess.chars().collect();
    debug_assert_eq!(
        secret_letters.len(),
        guess_letters.len(),
        "guess and secret word must have equal length"
    );

    let mut states: Vec<Option<LetterState>> = vec![None; guess_letters.len()];

    // Pass 1: exact positions.
    for (i, &letter) in guess_letters.iter().enumerate() {
        if secret_letters.get(i).copied() == Some(letter) {
            states[i] = Some(LetterState::Correct);
            secret_letters[i] = CONSUMED;
        }
    }

    // Pass 2: displaced letters, leftmost remaining occurrence first.
    for (i, &letter) in guess_letters.iter().enumerate() {
        if states[i].is_some() {
            continue;
        }
        if let Some(found) = secret_letters.iter().position(|&s| s == letter) {
            states[i] = Some(LetterState::Present);
            secret_letters[found] = CONSUMED;
        }
    }

    // Pass 3: the rest is absent.
    states
        .into_iter()
        .map(|s| s.unwrap_or(LetterState::Absent))
        .collect()
}

/// Evaluates a guess independently against every secret word.
///
/// The words never interact during scoring; the result holds one
/// [`WordState`] per secret word in session order.
#[instrument(skip(secret_words, guess), fields(words = secret_words.len()))]
pub fn evaluate_attempt(secret_words: &[String], guess: &str) -> AttemptResult {
    secret_words
        .iter()
        .map(|word| evaluate_word(word, guess))
        .collect()
}
