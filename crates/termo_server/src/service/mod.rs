//! Business logic layer: the session state machine and user profiles.

// Private module declarations
mod game;
mod repository;
mod user;

// Crate-level exports via pub use
pub use game::{ActiveOutcome, AttemptOutcome, GameService, SessionView, StartOutcome};
pub use repository::{ScoreRepository, SessionRepository};
pub use user::{UserService, UserView};
