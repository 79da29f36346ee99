//! Set-associative LRU cache simulator for valgrind-style memory traces.

pub mod address;
pub mod cache;
pub mod config;
pub mod experiments;
pub mod log;
pub mod replay;
pub mod report;
pub mod trace;

pub use address::CacheGeometry;
pub use cache::{AccessOutcome, AccessResult, Cache, CacheStats};
pub use replay::{EventOutcome, Simulator};
pub use trace::{AccessKind, TraceAccess, TraceFile};
