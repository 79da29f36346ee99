use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::address::CacheGeometry;

/// Upper bound on `s`, so the one-shot allocation stays sane.
pub const MAX_SET_BITS: u32 = 24;
/// Upper bound on the total number of lines (`E * 2^s`).
pub const MAX_LINES: usize = 1 << 26;
const ADDRESS_BITS: u32 = u64::BITS;

/// Replays a valgrind memory trace against an LRU set-associative cache.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Print the outcome of every trace event
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of set index bits (2^s sets)
    #[arg(short = 's', value_name = "s")]
    pub set_bits: u32,

    /// Associativity, lines per set
    #[arg(short = 'E', value_name = "E")]
    pub associativity: usize,

    /// Number of block offset bits (2^b byte blocks)
    #[arg(short = 'b', value_name = "b")]
    pub block_bits: u32,

    /// Trace file to replay
    #[arg(short = 't', value_name = "tracefile")]
    pub trace: PathBuf,

    /// Also write "hits misses evictions" to this file
    #[arg(long, value_name = "path")]
    pub results: Option<PathBuf>,

    /// Sweep associativity, set bits and block bits around the given geometry
    #[arg(long)]
    pub sweep: bool,
}

impl Args {
    pub fn geometry(&self) -> Result<CacheGeometry> {
        validate(CacheGeometry::new(
            self.set_bits,
            self.associativity,
            self.block_bits,
        ))
    }
}

pub fn validate(geometry: CacheGeometry) -> Result<CacheGeometry> {
    if geometry.associativity == 0 {
        bail!("associativity (-E) must be at least 1");
    }
    if geometry.set_bits > MAX_SET_BITS {
        bail!(
            "set index bits (-s) must be at most {MAX_SET_BITS}, got {}",
            geometry.set_bits
        );
    }
    match geometry.index_bits() {
        Some(bits) if bits <= ADDRESS_BITS => {}
        _ => bail!(
            "s + b must fit in a {ADDRESS_BITS}-bit address, got s={} b={}",
            geometry.set_bits,
            geometry.block_bits
        ),
    }
    let lines = geometry.num_sets().checked_mul(geometry.associativity);
    match lines {
        Some(lines) if lines <= MAX_LINES => Ok(geometry),
        _ => bail!("cache {geometry} exceeds {MAX_LINES} lines"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("csim").chain(args.iter().copied()))
    }

    #[test]
    fn parses_classic_flags() {
        let args = parse(&[
            "-v", "-s", "4", "-E", "1", "-b", "4", "-t", "traces/yi.trace",
        ])
        .unwrap();
        assert!(args.verbose);
        assert!(!args.sweep);
        assert_eq!(args.results, None);
        assert_eq!(args.geometry().unwrap(), CacheGeometry::new(4, 1, 4));
        assert_eq!(args.trace, PathBuf::from("traces/yi.trace"));
    }

    #[test]
    fn missing_flag_is_a_usage_error() {
        assert!(parse(&["-s", "4", "-E", "1", "-t", "x.trace"]).is_err());
        assert!(parse(&["-s", "4", "-E", "1", "-b", "4"]).is_err());
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(parse(&["-s", "-1", "-E", "1", "-b", "4", "-t", "x"]).is_err());
    }

    #[test]
    fn zero_associativity_is_invalid() {
        let args = parse(&["-s", "1", "-E", "0", "-b", "1", "-t", "x"]).unwrap();
        let err = args.geometry().unwrap_err();
        assert!(err.to_string().contains("associativity"));
    }

    #[test]
    fn huge_block_bits_is_a_configuration_error() {
        let args = parse(&["-s", "3", "-E", "1", "-b", "4294967295", "-t", "x"]).unwrap();
        let err = args.geometry().unwrap_err();
        assert!(err.to_string().contains("s + b must fit"));
    }

    #[test]
    fn geometry_limits() {
        assert!(validate(CacheGeometry::new(0, 1, 0)).is_ok());
        assert!(validate(CacheGeometry::new(20, 64, 44)).is_ok());
        assert!(validate(CacheGeometry::new(MAX_SET_BITS + 1, 1, 0)).is_err());
        assert!(validate(CacheGeometry::new(20, 1, 45)).is_err());
        assert!(validate(CacheGeometry::new(24, 8, 4)).is_err());
    }
}
