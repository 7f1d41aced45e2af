//! Jerry Games - Turn-Based Game Engine
//!
//! Rock, paper, scissors and tic-tac-toe as plain state machines, plus the
//! session registry that feeds them player actions, renders their views and
//! cancels them after a period of inactivity. Nothing in here knows about
//! Discord; the transport plugs in through [`Renderer`] and [`ActionId`].

pub mod action;
pub mod error;
pub mod game;
pub mod participant;
pub mod rps;
pub mod session;
pub mod tictactoe;
pub mod view;

pub use action::{ActionId, GameAction, GameId, GameKind};
pub use error::{GameError, RenderError, Result};
pub use game::{Game, Rejection, Transition};
pub use participant::{Participant, ParticipantId};
pub use rps::{Choice, RpsGame, RpsOutcome, RpsPhase};
pub use session::{DEFAULT_TIMEOUT, GameRegistry, Renderer};
pub use tictactoe::{Board, Slot, TicTacToeGame, TicTacToePhase};
pub use view::{Accent, Button, ButtonStyle, GameView, Section};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        ActionId, Choice, Game, GameAction, GameError, GameId, GameKind, GameRegistry, GameView,
        Participant, Renderer, Result, RpsGame, TicTacToeGame, Transition,
    };
}
