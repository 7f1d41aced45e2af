use miette::Diagnostic;
use thiserror::Error;

use crate::action::GameId;

#[derive(Error, Diagnostic, Debug)]
pub enum GameError {
    #[error("Invalid player count")]
    #[diagnostic(
        code(jerry::games::invalid_player_count),
        help("A game takes {minimum} to {maximum} players, {requested} were requested")
    )]
    InvalidPlayerCount {
        requested: i64,
        minimum: usize,
        maximum: usize,
    },

    #[error("Unknown game {game_id}")]
    #[diagnostic(
        code(jerry::games::unknown_game),
        help("The game has finished, expired, or was started before the bot restarted")
    )]
    UnknownGame { game_id: GameId },

    #[error("Malformed action id")]
    #[diagnostic(
        code(jerry::games::malformed_action),
        help("Could not parse '{raw}': {reason}")
    )]
    MalformedAction { raw: String, reason: String },
}

impl GameError {
    pub fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAction {
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by a [`Renderer`](crate::session::Renderer).
///
/// Render failures never change game state; the session logs and drops them.
#[derive(Error, Diagnostic, Debug)]
#[error("Failed to render game view")]
#[diagnostic(
    code(jerry::games::render_failed),
    help("The message showing this game may have been deleted")
)]
pub struct RenderError {
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

impl RenderError {
    pub fn new(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn test_malformed_action_help_mentions_input() {
        let error = GameError::malformed("rps:nope", "missing action");
        let output = format!("{:?}", Report::new(error));
        assert!(output.contains("malformed_action"));
        assert!(output.contains("rps:nope"));
    }

    #[test]
    fn test_render_error_keeps_cause() {
        let error = RenderError::new("Unknown Message");
        assert_eq!(
            std::error::Error::source(&error).map(|e| e.to_string()),
            Some("Unknown Message".to_string())
        );
    }
}
