//! Minimal discrete-event simulation engine.
//!
//! Agents react to broadcast events and may schedule further events (or spawn
//! new agents) through a [`Response`]. Events are processed in time order;
//! events scheduled for the same instant are processed in the order they were
//! scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Event<T> {
    t: usize,
    seq: usize,
    data: T,
}

impl<T> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t && self.seq == other.seq
    }
}

impl<T> Eq for Event<T> {}

impl<T> Ord for Event<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse so the earliest (t, seq) pops first
        other
            .t
            .cmp(&self.t)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What an agent wants to happen after reacting to an event.
pub struct Response<T, S> {
    pub events: Vec<(usize, T)>,
    pub agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> Response<T, S> {
    pub fn new() -> Response<T, S> {
        Response {
            events: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Schedule a single event at time `t`
    pub fn event(t: usize, data: T) -> Response<T, S> {
        Response {
            events: vec![(t, data)],
            agents: Vec::new(),
        }
    }

    /// Schedule several events
    pub fn events(events: Vec<(usize, T)>) -> Response<T, S> {
        Response {
            events,
            agents: Vec::new(),
        }
    }
}

impl<T, S> Default for Response<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Agent<T, S> {
    fn act(&mut self, _current_t: usize, _data: &T) -> Response<T, S> {
        Response::new()
    }

    fn stats(&self) -> S;
}

pub struct EventLoop<T, S> {
    queue: BinaryHeap<Event<T>>,
    next_seq: usize,
    pub current_t: usize,
    pub agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> EventLoop<T, S> {
    pub fn new(events: Vec<(usize, T)>, agents: Vec<Box<dyn Agent<T, S>>>) -> EventLoop<T, S> {
        let mut event_loop = EventLoop {
            queue: BinaryHeap::new(),
            next_seq: 0,
            current_t: 0,
            agents,
        };
        for (t, data) in events {
            event_loop.schedule(t, data);
        }
        event_loop
    }

    fn schedule(&mut self, t: usize, data: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Event { t, seq, data });
    }

    fn broadcast(&mut self) {
        if let Some(event) = self.queue.pop() {
            self.current_t = event.t;
            let mut new_events = Vec::new();
            let mut new_agents = Vec::new();
            for agent in &mut self.agents {
                let response = agent.act(self.current_t, &event.data);
                new_events.extend(response.events);
                new_agents.extend(response.agents);
            }
            for (t, data) in new_events {
                // no scheduling into the past
                if t >= self.current_t {
                    self.schedule(t, data);
                }
            }
            self.agents.extend(new_agents);
        }
    }

    /// Process events until the queue is empty or the next event is after `until`
    pub fn run(&mut self, until: usize) {
        while let Some(event) = self.queue.peek() {
            if event.t > until {
                break;
            }
            self.broadcast();
        }
    }

    /// Number of events still waiting to be processed
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> Vec<S> {
        self.agents.iter().map(|agent| agent.stats()).collect()
    }
}
