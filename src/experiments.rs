use std::fmt;

use tracing::warn;

use crate::{
    address::CacheGeometry, cache::CacheStats, config::validate, replay::Simulator,
    trace::TraceFile,
};

#[derive(Clone)]
pub struct ScenarioConfig {
    pub label: String, // Label to be printed for the Result
    pub geometry: CacheGeometry,
}

pub struct ScenarioResult {
    pub label: String,
    pub trace_results: Vec<TraceResult>,
}

pub struct TraceResult {
    pub trace_name: String,
    pub stats: CacheStats,
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", self.label)?;
        for result in &self.trace_results {
            let stats = &result.stats;
            writeln!(
                f,
                "    {:<14} hit {:>6.2}% miss {:>6.2}% evictions {}",
                result.trace_name,
                stats.hit_rate() * 100.0,
                stats.miss_rate() * 100.0,
                stats.evictions
            )?;
        }
        Ok(())
    }
}

pub fn run_scenarios(traces: &[TraceFile], scenarios: &[ScenarioConfig]) -> Vec<ScenarioResult> {
    let mut results = Vec::new();
    for scenario in scenarios {
        let mut per_trace = Vec::new();
        for trace in traces {
            let mut sim = Simulator::new(scenario.geometry);
            sim.run_trace(&trace.entries, |_, _| {});
            per_trace.push(TraceResult {
                trace_name: trace.name.clone(),
                stats: sim.into_stats(),
            });
        }
        results.push(ScenarioResult {
            label: scenario.label.clone(),
            trace_results: per_trace,
        });
    }
    results
}

// Labels are only built for valid geometries; `num_sets` would overflow otherwise.
fn scenario(
    geometry: CacheGeometry,
    label: impl FnOnce(&CacheGeometry) -> String,
) -> Option<ScenarioConfig> {
    match validate(geometry) {
        Ok(geometry) => Some(ScenarioConfig {
            label: label(&geometry),
            geometry,
        }),
        Err(err) => {
            warn!("skipping scenario {geometry:?}: {err}");
            None
        }
    }
}

pub fn associativity_sweep(base: &CacheGeometry, ways: &[usize]) -> Vec<ScenarioConfig> {
    ways.iter()
        .filter_map(|&assoc| {
            let cfg = CacheGeometry {
                associativity: assoc,
                ..*base
            };
            scenario(cfg, |_| {
                if assoc == 1 {
                    "Direct-Mapped".to_string()
                } else {
                    format!("{assoc}-way SA")
                }
            })
        })
        .collect()
}

pub fn set_bits_sweep(base: &CacheGeometry, set_bits: &[u32]) -> Vec<ScenarioConfig> {
    set_bits
        .iter()
        .filter_map(|&bits| {
            let cfg = CacheGeometry {
                set_bits: bits,
                ..*base
            };
            scenario(cfg, |g| format!("s={bits} ({} sets)", g.num_sets()))
        })
        .collect()
}

pub fn block_bits_sweep(base: &CacheGeometry, block_bits: &[u32]) -> Vec<ScenarioConfig> {
    block_bits
        .iter()
        .filter_map(|&bits| {
            let cfg = CacheGeometry {
                block_bits: bits,
                ..*base
            };
            scenario(cfg, |g| format!("Block {}B", g.block_size()))
        })
        .collect()
}
