//! Cumulative win/draw series for charting.
//!
//! Entry `i` of each series holds the totals after round `i + 1`, so for every
//! index `wins_a[i] + wins_b[i] + draws[i] == i + 1`.

use serde::Serialize;

use crate::session::RoundRecord;
use crate::{resolve, Event, Move, Outcome, Stats};

/// Totals after one round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub round: usize,
    pub wins_a: usize,
    pub wins_b: usize,
    pub draws: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CumulativeSeries {
    pub wins_a: Vec<usize>,
    pub wins_b: Vec<usize>,
    pub draws: Vec<usize>,
}

impl CumulativeSeries {
    pub fn new() -> Self {
        CumulativeSeries::default()
    }

    /// Replay two histories; extra moves on the longer side are ignored
    pub fn from_histories(history_a: &[Move], history_b: &[Move]) -> Self {
        let mut series = CumulativeSeries::new();
        for (&move_a, &move_b) in history_a.iter().zip(history_b) {
            series.push(resolve(move_a, move_b));
        }
        series
    }

    pub fn push(&mut self, outcome: Outcome) {
        let (mut a, mut b, mut d) = match self.last() {
            Some(point) => (point.wins_a, point.wins_b, point.draws),
            None => (0, 0, 0),
        };
        match outcome {
            Outcome::AWins => a += 1,
            Outcome::BWins => b += 1,
            Outcome::Draw => d += 1,
        }
        self.wins_a.push(a);
        self.wins_b.push(b);
        self.draws.push(d);
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn clear(&mut self) {
        self.wins_a.clear();
        self.wins_b.clear();
        self.draws.clear();
    }

    pub fn point(&self, index: usize) -> Option<SeriesPoint> {
        if index >= self.len() {
            return None;
        }
        Some(SeriesPoint {
            round: index + 1,
            wins_a: self.wins_a[index],
            wins_b: self.wins_b[index],
            draws: self.draws[index],
        })
    }

    pub fn last(&self) -> Option<SeriesPoint> {
        self.len().checked_sub(1).and_then(|i| self.point(i))
    }

    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        (0..self.len()).filter_map(move |i| self.point(i))
    }
}

// ============================================================================
// Scoreboard Agent
// ============================================================================

#[derive(Clone, Debug, Default, Serialize)]
pub struct ScoreboardStats {
    pub rounds: Vec<RoundRecord>,
    pub series: CumulativeSeries,
}

/// Listens for completed rounds and keeps the running series
#[derive(Default)]
pub struct Scoreboard {
    rounds: Vec<RoundRecord>,
    series: CumulativeSeries,
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard::default()
    }

    pub fn series(&self) -> &CumulativeSeries {
        &self.series
    }
}

impl des::Agent<Event, Stats> for Scoreboard {
    fn act(&mut self, _current_t: usize, event: &Event) -> des::Response<Event, Stats> {
        match event {
            Event::RoundComplete {
                round,
                move_a,
                move_b,
                outcome,
            } => {
                self.rounds.push(RoundRecord {
                    round: *round,
                    move_a: *move_a,
                    move_b: *move_b,
                    outcome: *outcome,
                });
                self.series.push(*outcome);
                des::Response::new()
            }

            Event::Reset => {
                self.rounds.clear();
                self.series.clear();
                des::Response::new()
            }

            _ => des::Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::Scoreboard(ScoreboardStats {
            rounds: self.rounds.clone(),
            series: self.series.clone(),
        })
    }
}
