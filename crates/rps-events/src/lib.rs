//! Shared record types for the Rock-Paper-Scissors population simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine in `rps-core` produces these records; drivers print or persist them.

pub mod report;
pub mod snapshot;
pub mod strategy;

// Re-export strategy types
pub use strategy::{ParseStrategyError, Strategy, STRATEGY_ORDER};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, AgentSummary, CycleSnapshot, StrategyCounts};

// Re-export report types
pub use report::{CycleReport, RunSummary, Termination};
