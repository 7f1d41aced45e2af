//! Two-player tic-tac-toe.
//!
//! The creator holds ❌ and moves first. Anyone else can take ⭕ while the
//! game is looking for an opponent. Board cells are indexed row-major:
//!
//! ```text
//! 0 | 1 | 2
//! ---------
//! 3 | 4 | 5
//! ---------
//! 6 | 7 | 8
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    action::{ActionId, GameAction, GameId, GameKind},
    game::{Rejection, Transition},
    participant::Participant,
    view::{Accent, Button, ButtonStyle, GameView},
};

pub const CELL_COUNT: usize = 9;

const EMPTY_CELL: &str = "➖";

pub const WINNING_LINES: [[usize; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub fn other(&self) -> Slot {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub fn mark(&self) -> &'static str {
        match self {
            Self::One => "❌",
            Self::Two => "⭕",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicTacToePhase {
    ChooseOpponent,
    InProgress,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Slot>; CELL_COUNT],
}

impl Board {
    pub fn get(&self, cell: usize) -> Option<Slot> {
        self.cells.get(cell).copied().flatten()
    }

    pub fn cells(&self) -> &[Option<Slot>; CELL_COUNT] {
        &self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn winner(&self) -> Option<Slot> {
        WINNING_LINES.iter().find_map(|[a, b, c]| {
            let owner = self.cells[*a]?;
            (self.cells[*b] == Some(owner) && self.cells[*c] == Some(owner)).then_some(owner)
        })
    }

    fn place(&mut self, cell: usize, slot: Slot) {
        self.cells[cell] = Some(slot);
    }
}

#[derive(Debug, Clone)]
pub struct TicTacToeGame {
    id: GameId,
    board: Board,
    creator: Participant,
    opponent: Option<Participant>,
    phase: TicTacToePhase,
    turn: Slot,
}

impl TicTacToeGame {
    pub fn new(creator: Participant) -> Self {
        Self {
            id: GameId::generate(),
            board: Board::default(),
            creator,
            opponent: None,
            phase: TicTacToePhase::ChooseOpponent,
            turn: Slot::One,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn phase(&self) -> TicTacToePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Slot {
        self.turn
    }

    pub fn player(&self, slot: Slot) -> Option<&Participant> {
        match slot {
            Slot::One => Some(&self.creator),
            Slot::Two => self.opponent.as_ref(),
        }
    }

    pub fn winner(&self) -> Option<Slot> {
        self.board.winner()
    }

    pub fn is_draw(&self) -> bool {
        self.board.is_full() && self.board.winner().is_none()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            TicTacToePhase::Finished | TicTacToePhase::Cancelled
        )
    }

    pub fn join(&mut self, participant: &Participant) -> Transition {
        if self.phase != TicTacToePhase::ChooseOpponent {
            return Transition::Ignored(Rejection::WrongPhase);
        }
        if *participant == self.creator {
            return Transition::Ignored(Rejection::CreatorCannotJoin);
        }
        if self.opponent.is_some() {
            return Transition::Ignored(Rejection::SeatTaken);
        }

        self.opponent = Some(participant.clone());
        self.phase = TicTacToePhase::InProgress;
        self.turn = Slot::One;
        Transition::Applied
    }

    pub fn make_move(&mut self, participant: &Participant, cell: usize) -> Transition {
        if self.phase != TicTacToePhase::InProgress {
            return Transition::Ignored(Rejection::WrongPhase);
        }
        if self.player(self.turn) != Some(participant) {
            return Transition::Ignored(Rejection::NotYourTurn);
        }
        if cell >= CELL_COUNT {
            return Transition::Ignored(Rejection::CellOutOfRange);
        }
        if self.board.get(cell).is_some() {
            return Transition::Ignored(Rejection::CellTaken);
        }

        self.board.place(cell, self.turn);
        if self.board.winner().is_some() || self.board.is_full() {
            self.phase = TicTacToePhase::Finished;
        } else {
            self.turn = self.turn.other();
        }
        Transition::Applied
    }

    pub fn expire(&mut self) -> Transition {
        if self.is_terminal() {
            return Transition::Ignored(Rejection::WrongPhase);
        }
        self.phase = TicTacToePhase::Cancelled;
        Transition::Applied
    }

    pub fn view(&self) -> GameView {
        let accent = match self.phase {
            TicTacToePhase::ChooseOpponent | TicTacToePhase::InProgress => Accent::InPlay,
            _ => Accent::Settled,
        };
        let mut view = GameView::new("Tic Tac Toe!", accent);

        match self.phase {
            TicTacToePhase::ChooseOpponent => {
                let join = Button::new(
                    ActionId::new(GameKind::TicTacToe, self.id, GameAction::Join),
                    format!("Join Game {}", Slot::Two.mark()),
                    ButtonStyle::Primary,
                );
                view = view.text("Waiting for another player...").buttons(vec![join]);
            }
            TicTacToePhase::InProgress => {
                // Opponent is always bound in this phase.
                if let Some(player) = self.player(self.turn) {
                    view = view.text(format!(
                        "**Turn:** {} ({})",
                        player.mention(),
                        self.turn.mark()
                    ));
                }
                view = self.board_rows(view, true);
            }
            TicTacToePhase::Finished => {
                let winner = self
                    .winner()
                    .and_then(|slot| self.player(slot).map(|player| (slot, player)));
                let outcome = match winner {
                    Some((slot, player)) => {
                        format!("**Winner:** {} ({})", player.mention(), slot.mark())
                    }
                    None => "**It's a draw!**".to_string(),
                };
                view = self.board_rows(view.text(outcome), false);
            }
            TicTacToePhase::Cancelled => {
                view = self.board_rows(view.text("Game cancelled."), false);
            }
        }

        let players = [Slot::One, Slot::Two]
            .iter()
            .filter_map(|slot| {
                self.player(*slot)
                    .map(|player| format!("{} {}", slot.mark(), player.name))
            })
            .collect::<Vec<_>>()
            .join(", ");

        view.separator().text(players)
    }

    fn board_rows(&self, mut view: GameView, interactive: bool) -> GameView {
        for (row, cells) in self.board.cells().chunks(3).enumerate() {
            let buttons = cells
                .iter()
                .enumerate()
                .map(|(col, owner)| {
                    let cell = row * 3 + col;
                    Button::new(
                        ActionId::new(GameKind::TicTacToe, self.id, GameAction::Move(cell)),
                        owner.map(|slot| slot.mark()).unwrap_or(EMPTY_CELL),
                        ButtonStyle::Secondary,
                    )
                    .disabled(!interactive)
                })
                .collect();
            view = view.buttons(buttons);
        }
        view
    }
}
