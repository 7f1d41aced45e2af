use std::fmt;

use crate::{
    action::{GameAction, GameId, GameKind},
    participant::Participant,
    rps::RpsGame,
    tictactoe::TicTacToeGame,
    view::GameView,
};

/// Result of feeding an action to a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed, the view must be re-rendered
    Applied,
    /// Precondition failed, state untouched
    Ignored(Rejection),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why an action was ignored.
///
/// These usually come from stale controls (double clicks, late clicks on a
/// finished game) and are only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongPhase,
    AlreadyVoted,
    LobbyFull,
    CreatorCannotJoin,
    SeatTaken,
    NotYourTurn,
    CellTaken,
    CellOutOfRange,
    UnsupportedAction,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::WrongPhase => "game is not accepting this action right now",
            Self::AlreadyVoted => "participant already voted",
            Self::LobbyFull => "all votes are in",
            Self::CreatorCannotJoin => "creator cannot join their own game",
            Self::SeatTaken => "opponent seat is taken",
            Self::NotYourTurn => "not this participant's turn",
            Self::CellTaken => "cell is already marked",
            Self::CellOutOfRange => "cell is outside the board",
            Self::UnsupportedAction => "action does not apply to this game",
        };
        f.write_str(reason)
    }
}

/// Any game the bot can host
#[derive(Debug, Clone)]
pub enum Game {
    Rps(RpsGame),
    TicTacToe(TicTacToeGame),
}

impl Game {
    pub fn id(&self) -> GameId {
        match self {
            Self::Rps(game) => game.id(),
            Self::TicTacToe(game) => game.id(),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Self::Rps(_) => GameKind::Rps,
            Self::TicTacToe(_) => GameKind::TicTacToe,
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Rps(game) => game.is_terminal(),
            Self::TicTacToe(game) => game.is_terminal(),
        }
    }

    /// Route an action to the handler for this game
    pub fn apply(&mut self, participant: &Participant, action: GameAction) -> Transition {
        match (self, action) {
            (Self::Rps(game), GameAction::Vote(choice)) => game.register_vote(participant, choice),
            (Self::TicTacToe(game), GameAction::Join) => game.join(participant),
            (Self::TicTacToe(game), GameAction::Move(cell)) => game.make_move(participant, cell),
            _ => Transition::Ignored(Rejection::UnsupportedAction),
        }
    }

    /// Inactivity timeout fired
    pub fn expire(&mut self) -> Transition {
        match self {
            Self::Rps(game) => game.expire(),
            Self::TicTacToe(game) => game.expire(),
        }
    }

    pub fn view(&self) -> GameView {
        match self {
            Self::Rps(game) => game.view(),
            Self::TicTacToe(game) => game.view(),
        }
    }
}

impl From<RpsGame> for Game {
    fn from(game: RpsGame) -> Self {
        Self::Rps(game)
    }
}

impl From<TicTacToeGame> for Game {
    fn from(game: TicTacToeGame) -> Self {
        Self::TicTacToe(game)
    }
}
