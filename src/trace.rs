use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, bail};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Instruction,
    Load,
    Store,
    /// A load immediately followed by a store to the same address.
    Modify,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Instruction => write!(f, "I"),
            AccessKind::Load => write!(f, "L"),
            AccessKind::Store => write!(f, "S"),
            AccessKind::Modify => write!(f, "M"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceAccess {
    pub kind: AccessKind,
    pub address: u64,
    pub size: u32, // decoded for echoing only
}

impl TraceAccess {
    pub fn new(kind: AccessKind, address: u64) -> Self {
        Self {
            kind,
            address,
            size: 1,
        }
    }
}

impl fmt::Display for TraceAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.kind, self.address, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct TraceFile {
    pub name: String,
    pub entries: Vec<TraceAccess>,
}

impl TraceFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Unable to open trace file {}", path.display()))?;
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let trace = Self::parse(name, BufReader::new(file))
            .with_context(|| format!("Invalid trace file {}", path.display()))?;
        info!(trace = %trace.name, entries = trace.entries.len(), "loaded trace");
        Ok(trace)
    }

    pub fn parse(name: impl Into<String>, reader: impl BufRead) -> Result<Self> {
        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read line from trace")?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let entry = parse_line(trimmed).with_context(|| format!("Trace line {}", idx + 1))?;
            entries.push(entry);
        }
        Ok(Self {
            name: name.into(),
            entries,
        })
    }
}

/// Parses one `<op> <hex-addr>,<size>` record.
pub fn parse_line(line: &str) -> Result<TraceAccess> {
    let mut parts = line.split_whitespace();
    let op = parts.next().context("missing op")?;
    let operand = parts.next().context("missing address")?;
    if parts.next().is_some() {
        bail!("extra tokens after '{}'", operand);
    }
    let kind = match op {
        "I" => AccessKind::Instruction,
        "L" => AccessKind::Load,
        "S" => AccessKind::Store,
        "M" => AccessKind::Modify,
        _ => bail!("invalid op '{}'", op),
    };
    let (addr, size) = operand
        .split_once(',')
        .with_context(|| format!("missing size in '{}'", operand))?;
    let address = parse_address(addr)
        .with_context(|| format!("invalid address literal '{}'", addr))?;
    let size = size
        .trim()
        .parse()
        .with_context(|| format!("invalid size '{}'", size))?;
    Ok(TraceAccess {
        kind,
        address,
        size,
    })
}

fn parse_address(token: &str) -> Result<u64> {
    let token = token.trim();
    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    Ok(u64::from_str_radix(hex, 16)?)
}
