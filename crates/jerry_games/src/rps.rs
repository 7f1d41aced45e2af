//! Rock, paper, scissors for any number of players.
//!
//! Everyone picks in secret; once the last expected vote lands the result is
//! revealed. With more than two players the rules generalise like this:
//!
//! - one symbol in play: tie
//! - all three symbols in play: tie, every symbol beats one and loses to another
//! - two symbols in play: everyone holding the stronger one wins

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    action::{ActionId, GameAction, GameId, GameKind},
    error::{GameError, Result},
    game::{Rejection, Transition},
    participant::{Participant, ParticipantId},
    view::{Accent, Button, ButtonStyle, GameView},
};

pub const MIN_PLAYERS: usize = 2;
/// Keeps the result message well inside Discord's embed limits
pub const MAX_PLAYERS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// The symbol this one beats
    pub fn defeats(&self) -> Choice {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Rock => "🪨",
            Self::Paper => "📄",
            Self::Scissors => "✂️",
        }
    }

    pub(crate) fn key(&self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissors => 2,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Self::Rock),
            "paper" => Ok(Self::Paper),
            "scissors" => Ok(Self::Scissors),
            other => Err(format!("unknown choice: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpsPhase {
    Pick,
    Result,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpsOutcome {
    Tie,
    Winners(Vec<ParticipantId>),
}

#[derive(Debug, Clone)]
pub struct RpsGame {
    id: GameId,
    expected: usize,
    /// Vote order is display order
    votes: Vec<(Participant, Choice)>,
    phase: RpsPhase,
    timeout: Duration,
}

impl RpsGame {
    pub fn new(players: i64, timeout: Duration) -> Result<Self> {
        let expected = usize::try_from(players)
            .ok()
            .filter(|count| (MIN_PLAYERS..=MAX_PLAYERS).contains(count))
            .ok_or(GameError::InvalidPlayerCount {
                requested: players,
                minimum: MIN_PLAYERS,
                maximum: MAX_PLAYERS,
            })?;

        Ok(Self {
            id: GameId::generate(),
            expected,
            votes: Vec::new(),
            phase: RpsPhase::Pick,
            timeout,
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn phase(&self) -> RpsPhase {
        self.phase
    }

    pub fn expected_players(&self) -> usize {
        self.expected
    }

    pub fn votes(&self) -> &[(Participant, Choice)] {
        &self.votes
    }

    pub fn vote_of(&self, participant: &ParticipantId) -> Option<Choice> {
        self.votes
            .iter()
            .find(|(voter, _)| voter.id == *participant)
            .map(|(_, choice)| *choice)
    }

    pub fn is_terminal(&self) -> bool {
        self.phase != RpsPhase::Pick
    }

    pub fn register_vote(&mut self, participant: &Participant, choice: Choice) -> Transition {
        if self.phase != RpsPhase::Pick {
            return Transition::Ignored(Rejection::WrongPhase);
        }
        if self.votes.len() >= self.expected {
            return Transition::Ignored(Rejection::LobbyFull);
        }
        if self.vote_of(&participant.id).is_some() {
            return Transition::Ignored(Rejection::AlreadyVoted);
        }

        self.votes.push((participant.clone(), choice));
        if self.votes.len() == self.expected {
            self.phase = RpsPhase::Result;
        }
        Transition::Applied
    }

    /// Winners once every vote is in, `None` while still picking
    pub fn compute_outcome(&self) -> Option<RpsOutcome> {
        if self.votes.len() < self.expected {
            return None;
        }

        let mut counts = [0usize; 3];
        for (_, choice) in &self.votes {
            counts[choice.index()] += 1;
        }

        let distinct = counts.iter().filter(|count| **count > 0).count();
        if distinct != 2 {
            return Some(RpsOutcome::Tie);
        }

        let winners: Vec<ParticipantId> = self
            .votes
            .iter()
            .filter(|(_, choice)| counts[choice.defeats().index()] > 0)
            .map(|(voter, _)| voter.id)
            .collect();

        if winners.is_empty() || winners.len() == self.votes.len() {
            return Some(RpsOutcome::Tie);
        }
        Some(RpsOutcome::Winners(winners))
    }

    pub fn expire(&mut self) -> Transition {
        if self.phase != RpsPhase::Pick {
            return Transition::Ignored(Rejection::WrongPhase);
        }
        self.phase = RpsPhase::Cancelled;
        Transition::Applied
    }

    pub fn view(&self) -> GameView {
        let accent = match self.phase {
            RpsPhase::Pick => Accent::InPlay,
            _ => Accent::Settled,
        };
        let view = GameView::new("Rock, Paper, Scissors!", accent);

        match self.phase {
            RpsPhase::Pick => {
                let choices = Choice::ALL
                    .iter()
                    .map(|choice| {
                        Button::new(
                            ActionId::new(GameKind::Rps, self.id, GameAction::Vote(*choice)),
                            choice.emoji(),
                            ButtonStyle::Secondary,
                        )
                    })
                    .collect();

                let progress = if self.votes.is_empty() {
                    format!(
                        "(0/{}) No choices made yet.\n-# *Expires in {}*",
                        self.expected,
                        describe_timeout(self.timeout)
                    )
                } else {
                    let voters = self
                        .votes
                        .iter()
                        .map(|(voter, _)| voter.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("({}/{}) {}", self.votes.len(), self.expected, voters)
                };

                view.text("Make your choice:")
                    .buttons(choices)
                    .separator()
                    .text(progress)
            }
            RpsPhase::Result => view.text(self.result_text()),
            RpsPhase::Cancelled => view.text("Game cancelled."),
        }
    }

    fn result_text(&self) -> String {
        let mut text = String::new();
        match self.compute_outcome() {
            Some(RpsOutcome::Winners(winners)) => {
                let (won, lost): (Vec<_>, Vec<_>) = self
                    .votes
                    .iter()
                    .partition(|(voter, _)| winners.contains(&voter.id));
                for (voter, choice) in won {
                    text.push_str(&format!("🏆 **{}** - {}\n", voter.name, choice));
                }
                for (voter, choice) in lost {
                    text.push_str(&format!("❌ {} - {}\n", voter.name, choice));
                }
            }
            _ => {
                text.push_str("**🤝 It's a tie!**\n");
                for (voter, choice) in &self.votes {
                    text.push_str(&format!("{} - {}\n", voter.name, choice));
                }
            }
        }
        text
    }
}

fn describe_timeout(timeout: Duration) -> String {
    let secs = timeout.as_secs();
    match secs {
        60 => "1 minute".to_string(),
        s if s >= 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{} seconds", s),
    }
}
