use std::fmt;

use tracing::debug;

use crate::address::CacheGeometry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub accesses: u64,
    pub loads: u64,
    pub stores: u64,
    pub modifies: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }
}

/// How a single memory access was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessResult {
    Hit,
    /// Miss served by an invalid line of the set.
    Miss,
    /// Miss in a full set; the LRU line was overwritten.
    MissEviction,
}

impl AccessResult {
    pub fn is_hit(self) -> bool {
        matches!(self, AccessResult::Hit)
    }
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessResult::Hit => write!(f, "hit"),
            AccessResult::Miss => write!(f, "miss"),
            AccessResult::MissEviction => write!(f, "miss eviction"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    pub result: AccessResult,
    pub set_index: usize,
    pub tag: u64,
}

pub struct Cache {
    geometry: CacheGeometry,
    sets: Vec<CacheSet>,
}

impl Cache {
    pub fn new(geometry: CacheGeometry) -> Self {
        let sets = (0..geometry.num_sets())
            .map(|_| CacheSet::new(geometry.associativity))
            .collect();
        Self { geometry, sets }
    }

    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    pub fn find_line(&self, set_index: usize, tag: u64) -> Option<usize> {
        self.sets[set_index].find_line(tag)
    }

    pub fn find_free_line(&self, set_index: usize) -> Option<usize> {
        self.sets[set_index].find_free_line()
    }

    pub fn find_lru_line(&self, set_index: usize) -> usize {
        self.sets[set_index].find_lru_line()
    }

    /// Resolves one memory access at logical time `tick`, updating the set
    /// and the running totals. Order matters: hit check, then an invalid
    /// line, then the LRU victim.
    pub fn access(&mut self, address: u64, tick: u64, stats: &mut CacheStats) -> AccessOutcome {
        stats.accesses += 1;
        let set_index = self.geometry.set_index(address);
        let tag = self.geometry.tag(address);
        let set = &mut self.sets[set_index];

        let result = if let Some(line_idx) = set.find_line(tag) {
            set.touch(line_idx, tick);
            stats.hits += 1;
            AccessResult::Hit
        } else if let Some(line_idx) = set.find_free_line() {
            set.fill(line_idx, tag, tick);
            stats.misses += 1;
            AccessResult::Miss
        } else {
            let line_idx = set.find_lru_line();
            set.fill(line_idx, tag, tick);
            stats.misses += 1;
            stats.evictions += 1;
            AccessResult::MissEviction
        };

        debug!(address, set_index, tag, tick, %result, "access");
        AccessOutcome {
            result,
            set_index,
            tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLine {
    pub tag: u64,
    pub last_used: u64,
    pub valid: bool,
}

impl CacheLine {
    fn invalid() -> Self {
        Self {
            tag: 0,
            last_used: 0,
            valid: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::invalid(); ways],
        }
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    fn find_line(&self, tag: u64) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    fn find_free_line(&self) -> Option<usize> {
        self.lines.iter().position(|line| !line.valid)
    }

    // min_by_key keeps the first of equal minimums, so ties go to the lowest way.
    fn find_lru_line(&self) -> usize {
        self.lines
            .iter()
            .enumerate()
            .min_by_key(|(_, line)| line.last_used)
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    fn touch(&mut self, idx: usize, tick: u64) {
        if let Some(line) = self.lines.get_mut(idx) {
            line.last_used = tick;
        }
    }

    fn fill(&mut self, idx: usize, tag: u64, tick: u64) {
        if let Some(line) = self.lines.get_mut(idx) {
            line.valid = true;
            line.tag = tag;
            line.last_used = tick;
        }
    }
}
