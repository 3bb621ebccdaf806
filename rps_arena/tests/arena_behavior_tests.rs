// Behaviour of the arena when driven through the event loop.
// All assertions go through the public Stats interface.

use approx::{abs_diff_eq, assert_relative_eq};
use rps_arena::agents::{FrequencyAgent, MinimaxAgent};
use rps_arena::config::AgentParams;
use rps_arena::{
    resolve, AgentKind, Arena, ArenaConfig, ArenaState, ArenaStats, CumulativeSeries, Event, Move,
    Outcome, Scoreboard, ScoreboardStats, Side, Stats, Strategy,
};

const DELAY: usize = 10;

fn build_loop(
    kind_a: AgentKind,
    kind_b: AgentKind,
    total_rounds: usize,
    events: Vec<(usize, Event)>,
) -> des::EventLoop<Event, Stats> {
    let arena = Arena::new(kind_a, kind_b, total_rounds, DELAY, AgentParams::default(), 42);
    let agents: Vec<Box<dyn des::Agent<Event, Stats>>> =
        vec![Box::new(arena), Box::new(Scoreboard::new())];
    des::EventLoop::new(events, agents)
}

fn collect(stats: &[Stats]) -> (ArenaStats, ScoreboardStats) {
    let mut arena = None;
    let mut board = None;
    for stat in stats {
        match stat {
            Stats::Arena(a) => arena = Some(a.clone()),
            Stats::Scoreboard(b) => board = Some(b.clone()),
        }
    }
    (
        arena.expect("Expected Arena stats"),
        board.expect("Expected Scoreboard stats"),
    )
}

// ============================================================================
// Level 1: Full runs
// ============================================================================

#[test]
fn given_started_arena_when_run_to_horizon_then_plays_exactly_total_rounds() {
    // GIVEN: Markov Chain vs Random, 300 rounds
    let mut event_loop = build_loop(AgentKind::MarkovChain, AgentKind::Random, 300, vec![(0, Event::Start)]);

    // WHEN: Run long enough for every tick
    event_loop.run(1_000_000);

    // THEN: Finished with 300 rounds and a matching scoreboard
    let (arena, board) = collect(&event_loop.stats());
    assert_eq!(arena.state, ArenaState::Finished);
    assert_eq!(arena.round, 300);
    assert_eq!(board.rounds.len(), 300);
    assert_eq!(board.series.len(), 300);
    assert_eq!(event_loop.pending(), 0);

    // THEN: Last tick happened at (rounds - 1) * delay
    assert_eq!(event_loop.current_t, 299 * DELAY);
}

#[test]
fn given_finished_run_then_series_matches_replayed_histories() {
    let mut event_loop = build_loop(AgentKind::Minimax, AgentKind::QLearning, 200, vec![(0, Event::Start)]);
    event_loop.run(1_000_000);

    let (arena, board) = collect(&event_loop.stats());
    let history_a: Vec<Move> = board.rounds.iter().map(|r| r.move_a).collect();
    let history_b: Vec<Move> = board.rounds.iter().map(|r| r.move_b).collect();

    assert_eq!(CumulativeSeries::from_histories(&history_a, &history_b), board.series);

    for (i, point) in board.series.points().enumerate() {
        assert_eq!(point.wins_a + point.wins_b + point.draws, i + 1);
    }
    for (i, record) in board.rounds.iter().enumerate() {
        assert_eq!(record.round, i + 1);
        assert_eq!(record.outcome, resolve(record.move_a, record.move_b));
    }

    let last = board.series.last().unwrap();
    assert_eq!((last.wins_a, last.wins_b, last.draws), (arena.wins_a, arena.wins_b, arena.draws));
    assert_relative_eq!(
        arena.win_rate_a() + arena.win_rate_b() + arena.draw_rate(),
        1.0,
        epsilon = 1e-12
    );
}

#[test]
fn given_random_opponent_then_outcomes_are_roughly_even() {
    // Side B plays uniformly at random regardless of A, so each outcome is 1/3 in expectation
    let mut event_loop = build_loop(AgentKind::Frequency, AgentKind::Random, 3000, vec![(0, Event::Start)]);
    event_loop.run(10_000_000);

    let (arena, _) = collect(&event_loop.stats());
    assert!(abs_diff_eq!(arena.win_rate_a(), 1.0 / 3.0, epsilon = 0.08));
    assert!(abs_diff_eq!(arena.win_rate_b(), 1.0 / 3.0, epsilon = 0.08));
    assert!(abs_diff_eq!(arena.draw_rate(), 1.0 / 3.0, epsilon = 0.08));
}

// ============================================================================
// Level 2: Driver controls
// ============================================================================

#[test]
fn given_running_arena_when_stopped_then_ticking_pauses_and_state_is_kept() {
    // GIVEN: Ticks at 0, 10, 20, 30, 40; stop at 45
    let mut event_loop = build_loop(
        AgentKind::Random,
        AgentKind::Minimax,
        50,
        vec![(0, Event::Start), (45, Event::Stop)],
    );

    // WHEN
    event_loop.run(100_000);

    // THEN: Five rounds, idle, nothing left scheduled
    let (arena, board) = collect(&event_loop.stats());
    assert_eq!(arena.state, ArenaState::Idle);
    assert_eq!(arena.round, 5);
    assert_eq!(board.series.len(), 5);
    assert_eq!(event_loop.pending(), 0);
}

#[test]
fn given_stopped_arena_when_restarted_then_continues_to_finish() {
    // GIVEN: Stop after five rounds, restart at 100
    let mut event_loop = build_loop(
        AgentKind::Frequency,
        AgentKind::Minimax,
        8,
        vec![(0, Event::Start), (45, Event::Stop), (100, Event::Start)],
    );

    event_loop.run(100_000);

    // THEN: Remaining three rounds at 100, 110, 120
    let (arena, board) = collect(&event_loop.stats());
    assert_eq!(arena.state, ArenaState::Finished);
    assert_eq!(arena.round, 8);
    assert_eq!(board.rounds.len(), 8);
    assert_eq!(event_loop.current_t, 120);
}

#[test]
fn given_quick_stop_and_start_then_only_one_tick_chain_survives() {
    // GIVEN: Stop and start again before the pending tick at 10 fires
    let mut event_loop = build_loop(
        AgentKind::Random,
        AgentKind::Random,
        1000,
        vec![(0, Event::Start), (3, Event::Stop), (4, Event::Start), (55, Event::Stop)],
    );

    event_loop.run(100_000);

    // THEN: Ticks at 0, 4, 14, 24, 34, 44, 54 only
    let (arena, _) = collect(&event_loop.stats());
    assert_eq!(arena.round, 7);
}

#[test]
fn given_rounds_played_when_reset_then_everything_is_cleared() {
    // GIVEN: Three rounds at 0, 10, 20 then a reset
    let mut event_loop = build_loop(
        AgentKind::MarkovChain,
        AgentKind::Frequency,
        100,
        vec![(0, Event::Start), (25, Event::Reset)],
    );

    event_loop.run(100_000);

    // THEN: Idle with empty counters and series
    let (arena, board) = collect(&event_loop.stats());
    assert_eq!(arena.state, ArenaState::Idle);
    assert_eq!(arena.round, 0);
    assert_eq!(arena.wins_a, 0);
    assert_eq!(arena.wins_b, 0);
    assert_eq!(arena.draws, 0);
    assert!(board.rounds.is_empty());
    assert!(board.series.is_empty());
}

#[test]
fn given_agent_and_speed_changes_then_they_apply_to_later_rounds() {
    let mut event_loop = build_loop(
        AgentKind::Random,
        AgentKind::Random,
        4,
        vec![
            (0, Event::SelectAgent {
                side: Side::B,
                kind: AgentKind::Frequency,
            }),
            (0, Event::SetSpeed { speed: 100 }),
            (1, Event::Start),
        ],
    );

    event_loop.run(100_000);

    // THEN: Delay 1 between ticks, frequency agent on side B
    let (arena, _) = collect(&event_loop.stats());
    assert_eq!(arena.agent_b, "Frequency");
    assert_eq!(arena.tick_delay, 1);
    assert_eq!(arena.round, 4);
    assert_eq!(event_loop.current_t, 4);
}

// ============================================================================
// Level 3: Agent scenarios through the public API
// ============================================================================

#[test]
fn given_three_rocks_then_minimax_plays_paper() {
    let mut agent = MinimaxAgent::new(0);
    assert_eq!(agent.choose_move(&[Move::Rock, Move::Rock, Move::Rock]), Move::Paper);
}

#[test]
fn given_five_scissors_then_five_paper_then_frequency_plays_rock() {
    let mut history = vec![Move::Scissors; 5];
    history.extend([Move::Paper; 5]);
    let mut agent = FrequencyAgent::new(0);
    assert_eq!(agent.choose_move(&history), Move::Rock);
}

#[test]
fn given_empty_history_then_counter_predictors_still_return_a_move() {
    for seed in 0..50 {
        let m = MinimaxAgent::new(seed).choose_move(&[]);
        assert!(Move::ALL.contains(&m));
        let m = FrequencyAgent::new(seed).choose_move(&[]);
        assert!(Move::ALL.contains(&m));
    }
}

#[test]
fn given_same_kind_on_both_sides_then_agents_are_independent() {
    // Identical kinds built from different seeds must not share state
    let mut arena = Arena::new(AgentKind::Random, AgentKind::Random, 500, 1, AgentParams::default(), 9);
    arena.run_to_completion();

    let session = arena.session();
    assert_ne!(session.history_a(), session.history_b());
    assert_eq!(session.round(), 500);
}

// ============================================================================
// Level 4: Configuration
// ============================================================================

#[test]
fn given_baseline_experiment_file_then_it_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("experiments/baseline.toml");
    let config = ArenaConfig::load(&path).unwrap();

    assert_eq!(config.arena.total_rounds, 5000);
    assert_eq!(config.agent_a().unwrap(), AgentKind::Random);
    assert_eq!(config.agent_b().unwrap(), AgentKind::MarkovChain);
    assert_eq!(config.tick_delay(), 51);

    let arena = Arena::from_config(&config).unwrap();
    assert_eq!(arena.state(), ArenaState::Idle);
}

#[test]
fn given_unknown_agent_then_arena_is_never_built() {
    let mut config = ArenaConfig::default();
    config.arena.agent_a = "Deep Blue".to_string();

    assert!(Arena::from_config(&config).is_err());
}

#[test]
fn given_scripted_draws_then_outcome_is_draw() {
    for m in Move::ALL {
        assert_eq!(resolve(m, m), Outcome::Draw);
    }
}
