use serde::Serialize;

use crate::agents::Strategy;
use crate::series::CumulativeSeries;
use crate::{resolve, Move, Outcome, Side};

/// Running totals and move history for one seat
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideRecord {
    pub wins: usize,
    pub history: Vec<Move>,
}

/// One resolved round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    pub round: usize,
    pub move_a: Move,
    pub move_b: Move,
    pub outcome: Outcome,
}

/// Mutable aggregate of one ongoing match
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    round: usize,
    side_a: SideRecord,
    side_b: SideRecord,
    draws: usize,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Play one round: both agents commit before either history grows
    pub fn advance_round(&mut self, agent_a: &mut dyn Strategy, agent_b: &mut dyn Strategy) -> RoundRecord {
        let move_a = agent_a.choose_move(&self.side_a.history);
        let move_b = agent_b.choose_move(&self.side_b.history);
        self.record(move_a, move_b)
    }

    /// Apply a pair of simultaneous moves
    pub fn record(&mut self, move_a: Move, move_b: Move) -> RoundRecord {
        let outcome = resolve(move_a, move_b);
        match outcome {
            Outcome::AWins => self.side_a.wins += 1,
            Outcome::BWins => self.side_b.wins += 1,
            Outcome::Draw => self.draws += 1,
        }

        self.side_a.history.push(move_a);
        self.side_b.history.push(move_b);
        self.round += 1;

        RoundRecord {
            round: self.round,
            move_a,
            move_b,
            outcome,
        }
    }

    pub fn reset(&mut self) {
        *self = Session::default();
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn wins(&self, side: Side) -> usize {
        self.side(side).wins
    }

    pub fn wins_a(&self) -> usize {
        self.side_a.wins
    }

    pub fn wins_b(&self) -> usize {
        self.side_b.wins
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn history(&self, side: Side) -> &[Move] {
        &self.side(side).history
    }

    pub fn history_a(&self) -> &[Move] {
        &self.side_a.history
    }

    pub fn history_b(&self) -> &[Move] {
        &self.side_b.history
    }

    fn side(&self, side: Side) -> &SideRecord {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    /// Running win/draw counts after every round played so far
    pub fn series(&self) -> CumulativeSeries {
        CumulativeSeries::from_histories(&self.side_a.history, &self.side_b.history)
    }
}
