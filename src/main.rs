use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use csim::{
    config::Args,
    experiments::{
        ScenarioResult, associativity_sweep, block_bits_sweep, run_scenarios, set_bits_sweep,
    },
    CacheGeometry, Simulator, TraceFile, report,
};
use tracing::{error, info};

fn main() -> ExitCode {
    csim::log::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let geometry = args.geometry()?;
    info!(%geometry, capacity = geometry.capacity(), "cache configured");
    let trace = TraceFile::load(&args.trace)?;

    if args.sweep {
        run_sweeps(&geometry, &[trace]);
        return Ok(());
    }

    let mut sim = Simulator::new(geometry);
    let verbose = args.verbose;
    let stats = sim.run_trace(&trace.entries, |event, outcome| {
        if verbose {
            println!("{}", report::verbose_line(event, outcome));
        }
    });

    println!("{}", report::summary_line(stats));
    if let Some(path) = &args.results {
        report::write_results(path, stats)?;
    }
    Ok(())
}

fn run_sweeps(base: &CacheGeometry, traces: &[TraceFile]) {
    let ways = run_scenarios(traces, &associativity_sweep(base, &[1, 2, 4, 8, 16]));
    print_section("Associativity Sweep", &ways);

    let sets = run_scenarios(traces, &set_bits_sweep(base, &[0, 2, 4, 6, 8]));
    print_section("Set Bits Sweep", &sets);

    let blocks = run_scenarios(traces, &block_bits_sweep(base, &[2, 3, 4, 5, 6]));
    print_section("Block Size Sweep", &blocks);
}

fn print_section(title: &str, results: &[ScenarioResult]) {
    println!("\n== {title} ==");
    for scenario in results {
        print!("{scenario}");
    }
}
