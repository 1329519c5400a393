//! Output
//!
//! Console summaries for each cycle and for the finished run, plus optional
//! JSON snapshot files.

use rps_events::{CycleSnapshot, RunSummary, Termination};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while persisting snapshots
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Human-readable block describing one cycle
pub fn format_cycle_summary(snapshot: &CycleSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Cycle {}:", snapshot.cycle);
    let _ = writeln!(out, "  Total Creatures: {}", snapshot.total_agents);
    let _ = writeln!(out, "  Strategy Counts:");
    for (strategy, count) in snapshot.strategy_counts.iter() {
        let _ = writeln!(out, "    {}: {}", strategy, count);
    }
    let _ = writeln!(out, "  Sample Creatures:");
    for agent in &snapshot.sample_agents {
        let _ = writeln!(out, "    ID: {}", agent.id);
        let _ = writeln!(out, "      Strategy: {}", agent.strategy);
        let _ = writeln!(out, "      Generation: {}", agent.generation);
    }
    out.push_str(&"-".repeat(40));
    out
}

/// Human-readable block describing the end of a run
pub fn format_final_summary(summary: &RunSummary) -> String {
    let reason = match summary.termination {
        Termination::MaxCycles => "cycle limit reached",
        Termination::Extinct => "population extinct",
    };

    let mut out = String::new();
    let _ = writeln!(out, "Simulation ended ({}).", reason);
    let _ = writeln!(out, "Final cycle: {}", summary.final_cycle);
    let _ = writeln!(out, "Total creatures: {}", summary.total_agents);
    let _ = writeln!(out, "Peak population: {}", summary.peak_population);
    let _ = write!(out, "Final strategy counts:");
    for (strategy, count) in summary.strategy_counts.iter() {
        let _ = write!(out, "\n {}: {}", strategy, count);
    }
    out
}

/// Writes snapshots as pretty JSON under an output directory:
///
/// - `snapshots/cycle_NNNNNN.json` for every cycle
/// - `current_state.json`, overwritten each cycle
/// - `summary.json` once the run ends
#[derive(Debug)]
pub struct SnapshotWriter {
    dir: PathBuf,
    written: usize,
}

impl SnapshotWriter {
    /// Create the writer, making sure the output directories exist
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let dir = dir.into();
        let snapshots = dir.join("snapshots");
        fs::create_dir_all(&snapshots).map_err(|source| OutputError::Io {
            path: snapshots,
            source,
        })?;
        Ok(Self { dir, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshots written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn snapshot_path(&self, cycle: u64) -> PathBuf {
        self.dir
            .join("snapshots")
            .join(format!("cycle_{:06}.json", cycle))
    }

    /// Write a snapshot and refresh `current_state.json`
    pub fn write(&mut self, snapshot: &CycleSnapshot) -> Result<PathBuf, OutputError> {
        let path = self.snapshot_path(snapshot.cycle);
        write_json(&path, snapshot)?;
        write_json(&self.dir.join("current_state.json"), snapshot)?;
        self.written += 1;
        Ok(path)
    }

    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf, OutputError> {
        let path = self.dir.join("summary.json");
        write_json(&path, summary)?;
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
