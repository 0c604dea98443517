//! Pure rules engine for the termo word-guessing game.
//!
//! A session challenges the player to find several secret words of one
//! length inside a shared attempt budget. This crate holds everything that
//! can be computed without touching storage or the network:
//!
//! - **Normalization**: the canonical form used for every word comparison.
//! - **Corpus index**: [`WordMap`], a length-bucketed index of normalized
//!   words with random sampling.
//! - **Evaluation**: per-letter classification of a guess against each
//!   secret word, duplicate-letter safe.
//! - **Session rules**: the [`Game`] snapshot, the attempt budget, and win
//!   detection.
//!
//! All functions are deterministic (sampling takes the RNG as a parameter)
//! and all values are immutable once built, so the whole crate is safe to
//! share across threads without locking.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod evaluate;
mod game;
mod normalize;
mod words;

// Crate-level exports - evaluation
pub use evaluate::{AttemptResult, LetterState, WordState, evaluate_attempt, evaluate_word};

// Crate-level exports - session rules
pub use game::{Game, max_attempts};

// Crate-level exports - normalization
pub use normalize::normalize;

// Crate-level exports - corpus index
pub use words::{ChooseError, WordMap};
