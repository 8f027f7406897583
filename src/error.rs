use std::io;

/// Everything that can go wrong while setting up or playing a round.
///
/// Only `TimerSpawn` and `Io` are fatal; the rest are reported back to the
/// interface and the round carries on.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("unknown difficulty: {0}")]
    InvalidDifficulty(String),

    #[error("invalid guess '{0}': enter a single letter")]
    InvalidInput(String),

    #[error("cannot {action} right now: {reason}")]
    IllegalTransition {
        action: &'static str,
        reason: &'static str,
    },

    #[error("invalid word '{0}': words must contain only letters")]
    InvalidWord(String),

    #[error("failed to start round timer: {0}")]
    TimerSpawn(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl GameError {
    pub(crate) fn round_over(action: &'static str) -> Self {
        Self::IllegalTransition {
            action,
            reason: "the round is over",
        }
    }

    pub(crate) fn not_started(action: &'static str) -> Self {
        Self::IllegalTransition {
            action,
            reason: "no round has been started",
        }
    }

    /// Whether the error should end the program rather than be shown to the player.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TimerSpawn(_) | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
