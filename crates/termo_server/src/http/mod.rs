//! REST facade over the game and user services.

// Private module declarations
mod identity;
mod routes;

// Crate-level exports via pub use
pub use identity::{Identity, PLAYER_HEADER};
pub use routes::{AppState, router};
