//! Rock-Paper-Scissors Agent Arena
//!
//! Pairs of simple predictive agents play repeated rounds of
//! rock-paper-scissors while the arena keeps running win/draw totals.
//!
//! Key pieces:
//! - `agents`: the five move-prediction strategies
//! - `session`: round resolution and per-side bookkeeping
//! - `series`: cumulative win/draw series for charting
//! - `arena`: idle/running/finished driver, also a `des::Agent`

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod agents;
pub mod arena;
pub mod config;
pub mod error;
pub mod output;
pub mod series;
pub mod session;

pub use agents::{AgentKind, Strategy};
pub use arena::{Arena, ArenaState};
pub use config::ArenaConfig;
pub use error::{ConfigError, OutputError};
pub use series::{CumulativeSeries, Scoreboard, ScoreboardStats, SeriesPoint};
pub use session::{RoundRecord, Session};

// ============================================================================
// Core Domain Types
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Scissors,
    Paper,
}

impl Move {
    /// Every move, in the order used for iteration and tie-breaks
    pub const ALL: [Move; 3] = [Move::Rock, Move::Scissors, Move::Paper];

    pub fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Scissors, Move::Paper) | (Move::Paper, Move::Rock)
        )
    }

    /// The move that defeats this one
    pub fn counter(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Scissors => Move::Rock,
            Move::Paper => Move::Scissors,
        }
    }

    /// Position in `Move::ALL`
    pub fn index(self) -> usize {
        match self {
            Move::Rock => 0,
            Move::Scissors => 1,
            Move::Paper => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Scissors => "scissors",
            Move::Paper => "paper",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    AWins,
    BWins,
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AWins => f.write_str("a"),
            Outcome::BWins => f.write_str("b"),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}

/// Which seat of the arena a player occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

// ============================================================================
// Round Resolution
// ============================================================================

pub fn resolve(move_a: Move, move_b: Move) -> Outcome {
    if move_a == move_b {
        Outcome::Draw
    } else if move_a.beats(move_b) {
        Outcome::AWins
    } else {
        Outcome::BWins
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Clone, Debug)]
pub enum Event {
    // Driver controls
    Start,
    Stop,
    Reset,
    SelectAgent { side: Side, kind: AgentKind },
    SetSpeed { speed: u32 },

    // Scheduled attempt to play one round
    Tick { generation: u64 },

    // Round completion
    RoundComplete {
        round: usize,
        move_a: Move,
        move_b: Move,
        outcome: Outcome,
    },

    // Configured total reached
    ArenaFinished { rounds: usize },
}

// ============================================================================
// Statistics Types
// ============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct ArenaStats {
    pub state: ArenaState,
    pub round: usize,
    pub total_rounds: usize,
    pub tick_delay: usize,
    pub agent_a: &'static str,
    pub agent_b: &'static str,
    pub wins_a: usize,
    pub wins_b: usize,
    pub draws: usize,
}

impl ArenaStats {
    pub fn win_rate_a(&self) -> f64 {
        rate(self.wins_a, self.round)
    }

    pub fn win_rate_b(&self) -> f64 {
        rate(self.wins_b, self.round)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.round)
    }
}

fn rate(count: usize, rounds: usize) -> f64 {
    if rounds == 0 {
        0.0
    } else {
        count as f64 / rounds as f64
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Games: {} | {}: {} | {}: {} | Draws: {}",
            self.round, self.agent_a, self.wins_a, self.agent_b, self.wins_b, self.draws
        )
    }
}

#[derive(Clone, Debug)]
pub enum Stats {
    Arena(ArenaStats),
    Scoreboard(ScoreboardStats),
}
