//! Export of a finished run for external charting.
//!
//! Writes the per-round cumulative series as CSV and the run metadata plus
//! final totals as JSON.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::ArenaConfig;
use crate::error::OutputError;
use crate::series::{CumulativeSeries, ScoreboardStats};
use crate::session::RoundRecord;
use crate::{ArenaState, ArenaStats, Move, Outcome, Stats};

/// Top-level container for one run's output
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutput {
    pub metadata: SimulationMetadata,
    pub summary: MatchSummary,
    #[serde(skip)]
    pub rows: Vec<SeriesRow>,
}

/// Metadata for reproducibility
#[derive(Debug, Clone, Serialize)]
pub struct SimulationMetadata {
    pub config: ArenaConfig,
    pub seed: u64,
    pub timestamp: String,
    pub git_commit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub agent_a: String,
    pub agent_b: String,
    pub state: ArenaState,
    pub rounds_played: usize,
    pub total_rounds: usize,
    pub wins_a: usize,
    pub wins_b: usize,
    pub draws: usize,
    pub win_rate_a: f64,
    pub win_rate_b: f64,
    pub draw_rate: f64,
}

impl From<&ArenaStats> for MatchSummary {
    fn from(stats: &ArenaStats) -> Self {
        MatchSummary {
            agent_a: stats.agent_a.to_string(),
            agent_b: stats.agent_b.to_string(),
            state: stats.state,
            rounds_played: stats.round,
            total_rounds: stats.total_rounds,
            wins_a: stats.wins_a,
            wins_b: stats.wins_b,
            draws: stats.draws,
            win_rate_a: stats.win_rate_a(),
            win_rate_b: stats.win_rate_b(),
            draw_rate: stats.draw_rate(),
        }
    }
}

/// One line of the series CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesRow {
    pub round: usize,
    pub move_a: Move,
    pub move_b: Move,
    pub outcome: Outcome,
    pub wins_a: usize,
    pub wins_b: usize,
    pub draws: usize,
}

impl SimulationOutput {
    /// Build output from the final stats of an event-loop run
    pub fn from_stats(all_stats: &[Stats], config: &ArenaConfig) -> Result<Self, OutputError> {
        let arena = all_stats
            .iter()
            .find_map(|s| match s {
                Stats::Arena(a) => Some(a),
                _ => None,
            })
            .ok_or(OutputError::MissingStats("arena"))?;
        let scoreboard = all_stats
            .iter()
            .find_map(|s| match s {
                Stats::Scoreboard(b) => Some(b),
                _ => None,
            })
            .ok_or(OutputError::MissingStats("scoreboard"))?;

        Ok(Self::from_parts(arena, scoreboard, config))
    }

    pub fn from_parts(arena: &ArenaStats, scoreboard: &ScoreboardStats, config: &ArenaConfig) -> Self {
        let rows = series_rows(&scoreboard.rounds, &scoreboard.series);

        SimulationOutput {
            metadata: SimulationMetadata {
                config: config.clone(),
                seed: config.arena.seed,
                timestamp: chrono::Utc::now().to_rfc3339(),
                git_commit: git_commit(),
            },
            summary: MatchSummary::from(arena),
            rows,
        }
    }

    /// Write the per-round series to CSV
    pub fn write_series_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record([
            "round", "move_a", "move_b", "outcome", "wins_a", "wins_b", "draws",
        ])?;

        for row in &self.rows {
            wtr.write_record(&[
                row.round.to_string(),
                row.move_a.to_string(),
                row.move_b.to_string(),
                row.outcome.to_string(),
                row.wins_a.to_string(),
                row.wins_b.to_string(),
                row.draws.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write metadata and final totals to JSON
    pub fn write_summary_json<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write whatever the config's output section enables into its directory
    ///
    /// Creates:
    /// - series.csv
    /// - summary.json
    pub fn write_all<P: AsRef<Path>>(&self, dir: P) -> Result<(), OutputError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let settings = &self.metadata.config.output;
        if settings.write_series_csv {
            self.write_series_csv(dir.join("series.csv"))?;
        }
        if settings.write_summary_json {
            self.write_summary_json(dir.join("summary.json"))?;
        }
        Ok(())
    }
}

fn series_rows(rounds: &[RoundRecord], series: &CumulativeSeries) -> Vec<SeriesRow> {
    rounds
        .iter()
        .zip(series.points())
        .map(|(record, point)| SeriesRow {
            round: record.round,
            move_a: record.move_a,
            move_b: record.move_b,
            outcome: record.outcome,
            wins_a: point.wins_a,
            wins_b: point.wins_b,
            draws: point.draws,
        })
        .collect()
}

fn git_commit() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
}
