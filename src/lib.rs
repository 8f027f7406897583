// Library interface for hangman
// This allows integration tests to access internal modules

pub mod cli;
pub mod controller;
pub mod error;
pub mod game_state;
pub mod hint;
pub mod logging;
pub mod session;
pub mod timer;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use controller::{RoundController, Update};
pub use error::{GameError, Result};
pub use game_state::{BodyPart, Effect, GameState, RoundStatus, Rules, Snapshot};
pub use session::{GameInterface, UserAction, game_loop};
pub use timer::{RoundId, TickMode, Timer};
pub use wordbank::{Difficulty, Word, WordBank};
