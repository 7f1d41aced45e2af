//! Structured action keys carried by rendered controls.
//!
//! A control never captures game state. It carries an [`ActionId`] whose
//! text form round-trips through the transport (Discord `custom_id`), and
//! the registry maps it back onto the live game:
//!
//! ```text
//! rps:<uuid>:vote:<rock|paper|scissors>
//! tictactoe:<uuid>:join
//! tictactoe:<uuid>:move:<0-8>
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::GameError;
use crate::rps::Choice;
use crate::tictactoe::CELL_COUNT;

/// Identity of one game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Rps,
    TicTacToe,
}

impl GameKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Rps => "rps",
            Self::TicTacToe => "tictactoe",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    Vote(Choice),
    Join,
    Move(usize),
}

/// Fully qualified action: which game, and what to do to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId {
    pub kind: GameKind,
    pub game: GameId,
    pub action: GameAction,
}

impl ActionId {
    pub fn new(kind: GameKind, game: GameId, action: GameAction) -> Self {
        Self { kind, game, action }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", self.kind, self.game)?;
        match self.action {
            GameAction::Vote(choice) => write!(f, "vote:{}", choice.key()),
            GameAction::Join => f.write_str("join"),
            GameAction::Move(cell) => write!(f, "move:{}", cell),
        }
    }
}

impl FromStr for ActionId {
    type Err = GameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split(':');

        let kind = match parts.next() {
            Some("rps") => GameKind::Rps,
            Some("tictactoe") => GameKind::TicTacToe,
            Some(other) => {
                return Err(GameError::malformed(raw, format!("unknown game kind '{other}'")));
            }
            None => return Err(GameError::malformed(raw, "empty action id")),
        };

        let game = parts
            .next()
            .ok_or_else(|| GameError::malformed(raw, "missing game id"))
            .and_then(|id| {
                Uuid::parse_str(id)
                    .map(GameId)
                    .map_err(|e| GameError::malformed(raw, e.to_string()))
            })?;

        let action = match (kind, parts.next(), parts.next()) {
            (GameKind::Rps, Some("vote"), Some(choice)) => GameAction::Vote(
                choice
                    .parse()
                    .map_err(|_| GameError::malformed(raw, format!("unknown choice '{choice}'")))?,
            ),
            (GameKind::TicTacToe, Some("join"), None) => GameAction::Join,
            (GameKind::TicTacToe, Some("move"), Some(cell)) => {
                let cell: usize = cell
                    .parse()
                    .map_err(|_| GameError::malformed(raw, format!("invalid cell '{cell}'")))?;
                if cell >= CELL_COUNT {
                    return Err(GameError::malformed(
                        raw,
                        format!("cell {cell} is outside the board"),
                    ));
                }
                GameAction::Move(cell)
            }
            (kind, action, _) => {
                return Err(GameError::malformed(
                    raw,
                    format!("{} has no action '{}'", kind, action.unwrap_or("")),
                ));
            }
        };

        if parts.next().is_some() {
            return Err(GameError::malformed(raw, "trailing segments"));
        }

        Ok(Self { kind, game, action })
    }
}
