use std::slice;

use crate::{
    address::CacheGeometry,
    cache::{AccessOutcome, Cache, CacheStats},
    trace::{AccessKind, TraceAccess},
};

/// What one trace event did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Instruction fetches are not simulated.
    Ignored,
    Single(AccessOutcome),
    /// Load then store of a modify event.
    Double([AccessOutcome; 2]),
}

impl EventOutcome {
    pub fn accesses(&self) -> &[AccessOutcome] {
        match self {
            EventOutcome::Ignored => &[],
            EventOutcome::Single(outcome) => slice::from_ref(outcome),
            EventOutcome::Double(pair) => pair,
        }
    }
}

/// Replays trace events against one cache, one logical tick per memory access.
pub struct Simulator {
    cache: Cache,
    clock: u64,
    stats: CacheStats,
}

impl Simulator {
    pub fn new(geometry: CacheGeometry) -> Self {
        Self {
            cache: Cache::new(geometry),
            clock: 0,
            stats: CacheStats::new(),
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn into_stats(self) -> CacheStats {
        self.stats
    }

    pub fn step(&mut self, event: &TraceAccess) -> EventOutcome {
        match event.kind {
            AccessKind::Instruction => EventOutcome::Ignored,
            AccessKind::Load => {
                self.stats.loads += 1;
                EventOutcome::Single(self.access(event.address))
            }
            AccessKind::Store => {
                self.stats.stores += 1;
                EventOutcome::Single(self.access(event.address))
            }
            AccessKind::Modify => {
                self.stats.modifies += 1;
                let load = self.access(event.address);
                let store = self.access(event.address);
                EventOutcome::Double([load, store])
            }
        }
    }

    /// Replays every event, handing each non-ignored one to `observe`.
    pub fn run_trace<F>(&mut self, trace: &[TraceAccess], mut observe: F) -> &CacheStats
    where
        F: FnMut(&TraceAccess, &EventOutcome),
    {
        for event in trace {
            let outcome = self.step(event);
            if outcome != EventOutcome::Ignored {
                observe(event, &outcome);
            }
        }
        &self.stats
    }

    fn access(&mut self, address: u64) -> AccessOutcome {
        self.clock += 1;
        self.cache.access(address, self.clock, &mut self.stats)
    }
}
