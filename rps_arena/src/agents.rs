use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::AgentParams;
use crate::error::ConfigError;
use crate::Move;

/// Number of most recent moves the frequency counters look at
pub const RECENT_WINDOW: usize = 10;

/// State key length for the tabular agent
pub const TABULAR_KEY_LEN: usize = 3;

// ============================================================================
// Strategy Trait
// ============================================================================

pub trait Strategy {
    fn choose_move(&mut self, history: &[Move]) -> Move;
    fn name(&self) -> &'static str;
}

fn random_move(rng: &mut StdRng) -> Move {
    Move::ALL[rng.random_range(0..Move::ALL.len())]
}

/// First maximum in `Move::ALL` order
fn most_frequent(counts: &[usize; 3]) -> Move {
    let mut best = Move::ALL[0];
    for candidate in Move::ALL {
        if counts[candidate.index()] > counts[best.index()] {
            best = candidate;
        }
    }
    best
}

fn recent_counts(history: &[Move]) -> [usize; 3] {
    let start = history.len().saturating_sub(RECENT_WINDOW);
    let mut counts = [0; 3];
    for m in &history[start..] {
        counts[m.index()] += 1;
    }
    counts
}

// ============================================================================
// Strategy Implementations
// ============================================================================

/// RANDOM: uniform over the three moves, ignores history
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomAgent {
    fn choose_move(&mut self, _history: &[Move]) -> Move {
        random_move(&mut self.rng)
    }

    fn name(&self) -> &'static str {
        AgentKind::Random.display_name()
    }
}

/// MARKOV CHAIN: find earlier occurrences of the last `window` moves and
/// counter whatever most often followed them.
pub struct WindowPatternAgent {
    window: usize,
    exploration: f64,
    rng: StdRng,
}

impl WindowPatternAgent {
    pub fn new(window: usize, exploration: f64, seed: u64) -> Self {
        WindowPatternAgent {
            window,
            exploration,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Votes for each possible follower of the trailing pattern
    fn follower_votes(&mut self, history: &[Move]) -> [usize; 3] {
        let n = self.window;
        let pattern = &history[history.len() - n..];
        let mut votes = [0; 3];

        for i in 0..history.len() - n {
            if &history[i..i + n] == pattern {
                // an occurrence with no follower still casts a random vote
                let next = match history.get(i + n) {
                    Some(&m) => m,
                    None => random_move(&mut self.rng),
                };
                votes[next.index()] += 1;
            }
        }
        votes
    }
}

impl Strategy for WindowPatternAgent {
    fn choose_move(&mut self, history: &[Move]) -> Move {
        if history.len() < self.window || self.rng.random::<f64>() < self.exploration {
            return random_move(&mut self.rng);
        }

        let votes = self.follower_votes(history);
        if votes.iter().sum::<usize>() == 0 {
            return random_move(&mut self.rng);
        }

        most_frequent(&votes).counter()
    }

    fn name(&self) -> &'static str {
        AgentKind::MarkovChain.display_name()
    }
}

/// Q-LEARNING: look up the best-valued move for the last few moves.
///
/// Learning rate and discount are carried as configuration but there is no
/// update step, so during play the table stays empty and every choice is
/// random. `set_value` seeds entries directly.
pub struct TabularAgent {
    learning_rate: f64,
    discount: f64,
    exploration: f64,
    q_table: HashMap<Vec<Move>, [Option<f64>; 3]>,
    rng: StdRng,
}

impl TabularAgent {
    pub fn new(learning_rate: f64, discount: f64, exploration: f64, seed: u64) -> Self {
        TabularAgent {
            learning_rate,
            discount,
            exploration,
            q_table: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn table_len(&self) -> usize {
        self.q_table.len()
    }

    /// Last `TABULAR_KEY_LEN` moves, or the whole history when shorter
    pub fn state_key(history: &[Move]) -> Vec<Move> {
        let start = history.len().saturating_sub(TABULAR_KEY_LEN);
        history[start..].to_vec()
    }

    pub fn set_value(&mut self, state: &[Move], action: Move, value: f64) {
        let values = self.q_table.entry(state.to_vec()).or_insert([None; 3]);
        values[action.index()] = Some(value);
    }

    fn best_action(values: &[Option<f64>; 3]) -> Option<Move> {
        let mut best: Option<(Move, f64)> = None;
        for candidate in Move::ALL {
            if let Some(value) = values[candidate.index()] {
                match best {
                    Some((_, best_value)) if value <= best_value => {}
                    _ => best = Some((candidate, value)),
                }
            }
        }
        best.map(|(m, _)| m)
    }
}

impl Strategy for TabularAgent {
    fn choose_move(&mut self, history: &[Move]) -> Move {
        let state = Self::state_key(history);

        let values = match self.q_table.get(&state) {
            Some(values) => *values,
            None => return random_move(&mut self.rng),
        };
        if self.rng.random::<f64>() < self.exploration {
            return random_move(&mut self.rng);
        }

        match Self::best_action(&values) {
            Some(action) => action,
            None => random_move(&mut self.rng),
        }
    }

    fn name(&self) -> &'static str {
        AgentKind::QLearning.display_name()
    }
}

/// MINIMAX: counter the most frequent of the last ten moves,
/// ties go to the first of rock, scissors, paper.
pub struct MinimaxAgent {
    rng: StdRng,
}

impl MinimaxAgent {
    pub fn new(seed: u64) -> Self {
        MinimaxAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for MinimaxAgent {
    fn choose_move(&mut self, history: &[Move]) -> Move {
        if history.is_empty() {
            return random_move(&mut self.rng);
        }

        let counts = recent_counts(history);
        if counts.iter().all(|&c| c == 0) {
            return random_move(&mut self.rng);
        }

        most_frequent(&counts).counter()
    }

    fn name(&self) -> &'static str {
        AgentKind::Minimax.display_name()
    }
}

/// FREQUENCY: counter the most frequent of the last ten moves using a fixed
/// rock, then scissors, then paper cascade.
pub struct FrequencyAgent {
    rng: StdRng,
}

impl FrequencyAgent {
    pub fn new(seed: u64) -> Self {
        FrequencyAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for FrequencyAgent {
    fn choose_move(&mut self, history: &[Move]) -> Move {
        if history.is_empty() {
            return random_move(&mut self.rng);
        }

        let counts = recent_counts(history);
        let rock = counts[Move::Rock.index()];
        let scissors = counts[Move::Scissors.index()];
        let paper = counts[Move::Paper.index()];

        if rock >= scissors && rock >= paper {
            Move::Paper
        } else if scissors >= paper {
            Move::Rock
        } else {
            Move::Scissors
        }
    }

    fn name(&self) -> &'static str {
        AgentKind::Frequency.display_name()
    }
}

// ============================================================================
// Agent Selection
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Random,
    MarkovChain,
    QLearning,
    Minimax,
    Frequency,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Random,
        AgentKind::MarkovChain,
        AgentKind::QLearning,
        AgentKind::Minimax,
        AgentKind::Frequency,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            AgentKind::Random => "Random AI",
            AgentKind::MarkovChain => "Markov Chain",
            AgentKind::QLearning => "Q-Learning",
            AgentKind::Minimax => "Minimax",
            AgentKind::Frequency => "Frequency",
        }
    }

    /// Short key used in config files
    pub fn key(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::MarkovChain => "markov",
            AgentKind::QLearning => "q-learning",
            AgentKind::Minimax => "minimax",
            AgentKind::Frequency => "frequency",
        }
    }

    /// Fresh, independently owned agent of this kind
    pub fn build(self, params: &AgentParams, seed: u64) -> Box<dyn Strategy> {
        match self {
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::MarkovChain => Box::new(WindowPatternAgent::new(
                params.markov_window,
                params.markov_exploration,
                seed,
            )),
            AgentKind::QLearning => Box::new(TabularAgent::new(
                params.q_learning_rate,
                params.q_discount,
                params.q_exploration,
                seed,
            )),
            AgentKind::Minimax => Box::new(MinimaxAgent::new(seed)),
            AgentKind::Frequency => Box::new(FrequencyAgent::new(seed)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AgentKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();

        match normalized.as_str() {
            "random" | "random-ai" => Ok(AgentKind::Random),
            "markov" | "markov-chain" => Ok(AgentKind::MarkovChain),
            "q-learning" | "qlearning" | "tabular" => Ok(AgentKind::QLearning),
            "minimax" => Ok(AgentKind::Minimax),
            "frequency" => Ok(AgentKind::Frequency),
            _ => Err(ConfigError::UnknownAgent(s.to_string())),
        }
    }
}
