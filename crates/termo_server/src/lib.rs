//! Termo backend - multiplayer word-guessing game server.
//!
//! Pairs the pure rules engine from `termo_rules` with the plumbing a
//! deployable service needs:
//!
//! - **db**: SQLite persistence for users, sessions, words, and attempts
//! - **service**: the session state machine and user profiles over
//!   repository seams
//! - **http**: a thin REST facade (start, attempt, active session, profile)
//!
//! The session state machine is the only stateful part, and its state lives
//! entirely behind the repository: every transition fetches a snapshot and
//! persists it back under an optimistic index guard, so concurrent request
//! handlers need no in-process locking.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod db;
mod http;
mod service;
mod wordlist;

// Crate-level exports - CLI
pub use cli::Cli;

// Crate-level exports - persistence
pub use db::{DbError, GameRepository, User};

// Crate-level exports - HTTP facade
pub use http::{AppState, Identity, PLAYER_HEADER, router};

// Crate-level exports - services
pub use service::{
    ActiveOutcome, AttemptOutcome, GameService, ScoreRepository, SessionRepository, SessionView,
    StartOutcome, UserService, UserView,
};

// Crate-level exports - word list loading
pub use wordlist::load_words;
