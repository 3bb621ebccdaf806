//! AI Battle Arena runner
//!
//! Plays two rock-paper-scissors agents against each other on a simulated
//! timer and writes the cumulative series for plotting.
//!
//! Usage:
//!   cargo run --release --bin rps_arena -- experiments/baseline.toml
//!   cargo run --release --bin rps_arena            # built-in defaults

use std::env;
use std::path::Path;
use std::process;

use rps_arena::output::SimulationOutput;
use rps_arena::{Arena, ArenaConfig, Event, Scoreboard, Stats};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [arena_config.toml]", args[0]);
        eprintln!("Example: {} experiments/baseline.toml", args[0]);
        process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => {
            println!("Loading arena config: {}\n", path);
            ArenaConfig::load(Path::new(path)).unwrap_or_else(|e| {
                eprintln!("Error loading config: {}", e);
                process::exit(1);
            })
        }
        None => ArenaConfig::default(),
    };

    let arena = Arena::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Error building arena: {}", e);
        process::exit(1);
    });

    println!("Rock-Paper-Scissors: AI Battle Arena");
    println!("====================================\n");
    println!("Parameters:");
    println!("  AI 1: {}", arena.agent_kind(rps_arena::Side::A));
    println!("  AI 2: {}", arena.agent_kind(rps_arena::Side::B));
    println!("  Total games: {}", arena.total_rounds());
    println!("  Tick delay: {}", arena.tick_delay());
    println!("  Seed: {}", config.arena.seed);
    println!();

    let horizon = config.horizon();

    let agents: Vec<Box<dyn des::Agent<Event, Stats>>> =
        vec![Box::new(arena), Box::new(Scoreboard::new())];
    let events = vec![(0, Event::Start)];
    let mut event_loop = des::EventLoop::new(events, agents);

    println!("Running battle...\n");
    event_loop.run(horizon);

    let stats = event_loop.stats();
    for stat in &stats {
        match stat {
            Stats::Arena(arena_stats) => {
                println!("Results:");
                println!("========\n");
                println!("{}\n", arena_stats);
                println!("  State: {:?}", arena_stats.state);
                println!(
                    "  {} win rate: {:.1}%",
                    arena_stats.agent_a,
                    arena_stats.win_rate_a() * 100.0
                );
                println!(
                    "  {} win rate: {:.1}%",
                    arena_stats.agent_b,
                    arena_stats.win_rate_b() * 100.0
                );
                println!("  Draw rate: {:.1}%\n", arena_stats.draw_rate() * 100.0);
            }
            Stats::Scoreboard(board) => {
                if let Some(last) = board.series.last() {
                    println!(
                        "Series: {} points, final (A, B, draws) = ({}, {}, {})\n",
                        board.series.len(),
                        last.wins_a,
                        last.wins_b,
                        last.draws
                    );
                }
            }
        }
    }

    let output = SimulationOutput::from_stats(&stats, &config).unwrap_or_else(|e| {
        eprintln!("Error collecting results: {}", e);
        process::exit(1);
    });

    let dir = &config.output.directory;
    if let Err(e) = output.write_all(dir) {
        eprintln!("Error writing results to {}: {}", dir.display(), e);
        process::exit(1);
    }
    println!("Results written to {}", dir.display());
}
