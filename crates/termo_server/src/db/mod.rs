//! SQLite persistence layer for user profiles and game sessions.

// Private module declarations
mod error;
mod models;
mod repository;
mod schema; // Diesel schema - internal use only

// Crate-level exports via pub use
pub use error::DbError;
pub use models::User;
pub use repository::GameRepository;

pub(crate) use models::{GameRow, NewGame, NewGameAttempt, NewGameWord, NewUser};
