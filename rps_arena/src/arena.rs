//! Session driver: an idle/running/finished state machine around a
//! [`Session`] and the two agents playing it.
//!
//! The arena owns no timer. A caller drives it with [`Arena::tick`], or runs
//! it inside a `des::EventLoop`, where every productive `Tick` schedules the
//! next one `tick_delay` time units later.

use serde::Serialize;

use crate::agents::{AgentKind, Strategy};
use crate::config::{tick_delay_for_speed, AgentParams, ArenaConfig};
use crate::error::ConfigError;
use crate::session::{RoundRecord, Session};
use crate::{ArenaStats, Event, Side, Stats};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ArenaState {
    Idle,
    Running,
    Finished,
}

pub struct Arena {
    state: ArenaState,
    session: Session,
    total_rounds: usize,
    tick_delay: usize,

    // Agent construction
    params: AgentParams,
    seed: u64,
    builds: u64,
    kind_a: AgentKind,
    kind_b: AgentKind,
    agent_a: Box<dyn Strategy>,
    agent_b: Box<dyn Strategy>,

    // Ticks carrying an older generation are stale
    generation: u64,
}

impl Arena {
    pub fn new(
        kind_a: AgentKind,
        kind_b: AgentKind,
        total_rounds: usize,
        tick_delay: usize,
        params: AgentParams,
        seed: u64,
    ) -> Self {
        let agent_a = kind_a.build(&params, seed);
        let agent_b = kind_b.build(&params, seed.wrapping_add(1));
        Arena {
            state: ArenaState::Idle,
            session: Session::new(),
            total_rounds,
            tick_delay: tick_delay.max(1),
            params,
            seed,
            builds: 2,
            kind_a,
            kind_b,
            agent_a,
            agent_b,
            generation: 0,
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Arena::new(
            config.agent_a()?,
            config.agent_b()?,
            config.arena.total_rounds,
            config.tick_delay(),
            config.agents.clone(),
            config.arena.seed,
        ))
    }

    // ------------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------------

    /// Idle → Running. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        if self.state != ArenaState::Idle {
            return false;
        }
        self.state = ArenaState::Running;
        self.generation += 1;
        log::info!(
            "arena started at round {}/{} ({} vs {})",
            self.session.round(),
            self.total_rounds,
            self.kind_a,
            self.kind_b
        );
        true
    }

    /// Running → Idle, keeping all counters. Returns whether the state changed.
    pub fn stop(&mut self) -> bool {
        if self.state != ArenaState::Running {
            return false;
        }
        self.state = ArenaState::Idle;
        self.generation += 1;
        log::info!("arena stopped at round {}", self.session.round());
        true
    }

    /// Any state → Idle with an empty session
    pub fn reset(&mut self) {
        self.state = ArenaState::Idle;
        self.session.reset();
        self.generation += 1;
        log::info!("arena reset");
    }

    fn finish(&mut self) {
        self.state = ArenaState::Finished;
        log::info!(
            "arena finished after {} rounds: {}",
            self.session.round(),
            self.snapshot()
        );
    }

    /// Play one round if running. Reaching the total moves to Finished.
    pub fn tick(&mut self) -> Option<RoundRecord> {
        if self.state != ArenaState::Running {
            return None;
        }
        if self.session.round() >= self.total_rounds {
            self.finish();
            return None;
        }

        let record = self
            .session
            .advance_round(self.agent_a.as_mut(), self.agent_b.as_mut());
        log::debug!(
            "round {}: {} vs {} -> {:?}",
            record.round,
            record.move_a,
            record.move_b,
            record.outcome
        );

        if self.session.round() >= self.total_rounds {
            self.finish();
        }
        Some(record)
    }

    /// Start and tick until the arena stops running. Returns rounds played.
    pub fn run_to_completion(&mut self) -> usize {
        self.start();
        let mut played = 0;
        while self.tick().is_some() {
            played += 1;
        }
        played
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// Seat a fresh agent of `kind` on `side`
    pub fn select_agent(&mut self, side: Side, kind: AgentKind) {
        let seed = self.seed.wrapping_add(self.builds);
        self.builds += 1;
        let agent = kind.build(&self.params, seed);
        match side {
            Side::A => {
                self.kind_a = kind;
                self.agent_a = agent;
            }
            Side::B => {
                self.kind_b = kind;
                self.agent_b = agent;
            }
        }
        log::info!("side {:?} now plays {}", side, kind);
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.tick_delay = tick_delay_for_speed(speed);
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> ArenaState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    pub fn tick_delay(&self) -> usize {
        self.tick_delay
    }

    pub fn agent_kind(&self, side: Side) -> AgentKind {
        match side {
            Side::A => self.kind_a,
            Side::B => self.kind_b,
        }
    }

    pub fn snapshot(&self) -> ArenaStats {
        ArenaStats {
            state: self.state,
            round: self.session.round(),
            total_rounds: self.total_rounds,
            tick_delay: self.tick_delay,
            agent_a: self.agent_a.name(),
            agent_b: self.agent_b.name(),
            wins_a: self.session.wins_a(),
            wins_b: self.session.wins_b(),
            draws: self.session.draws(),
        }
    }
}

impl des::Agent<Event, Stats> for Arena {
    fn act(&mut self, current_t: usize, event: &Event) -> des::Response<Event, Stats> {
        match event {
            Event::Start => {
                if self.start() {
                    des::Response::event(
                        current_t,
                        Event::Tick {
                            generation: self.generation,
                        },
                    )
                } else {
                    des::Response::new()
                }
            }

            Event::Tick { generation } => {
                if *generation != self.generation {
                    return des::Response::new();
                }

                let mut events = Vec::new();
                if let Some(record) = self.tick() {
                    events.push((
                        current_t,
                        Event::RoundComplete {
                            round: record.round,
                            move_a: record.move_a,
                            move_b: record.move_b,
                            outcome: record.outcome,
                        },
                    ));
                }

                match self.state {
                    ArenaState::Running => events.push((
                        current_t + self.tick_delay,
                        Event::Tick {
                            generation: self.generation,
                        },
                    )),
                    ArenaState::Finished => events.push((
                        current_t,
                        Event::ArenaFinished {
                            rounds: self.session.round(),
                        },
                    )),
                    ArenaState::Idle => {}
                }
                des::Response::events(events)
            }

            Event::Stop => {
                self.stop();
                des::Response::new()
            }

            Event::Reset => {
                self.reset();
                des::Response::new()
            }

            Event::SelectAgent { side, kind } => {
                self.select_agent(*side, *kind);
                des::Response::new()
            }

            Event::SetSpeed { speed } => {
                self.set_speed(*speed);
                des::Response::new()
            }

            _ => des::Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::Arena(self.snapshot())
    }
}
