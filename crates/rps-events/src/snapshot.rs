//! Snapshot Types
//!
//! Serialization structs for the read-only view of a population after a cycle.
//!
//! Snapshots are what the driver prints each cycle and, optionally, writes to
//! disk as JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::strategy::{Strategy, STRATEGY_ORDER};

/// Generates a snapshot ID from the cycle index.
pub fn generate_snapshot_id(cycle: u64) -> String {
    format!("snap_{:06}", cycle)
}

/// Public view of one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: String,
    pub strategy: Strategy,
    pub generation: u32,
}

/// Living agents per strategy, always reported in R, P, S order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyCounts {
    #[serde(rename = "R")]
    pub rock: usize,
    #[serde(rename = "P")]
    pub paper: usize,
    #[serde(rename = "S")]
    pub scissors: usize,
}

impl StrategyCounts {
    pub fn new(rock: usize, paper: usize, scissors: usize) -> Self {
        Self {
            rock,
            paper,
            scissors,
        }
    }

    pub fn get(&self, strategy: Strategy) -> usize {
        match strategy {
            Strategy::Rock => self.rock,
            Strategy::Paper => self.paper,
            Strategy::Scissors => self.scissors,
        }
    }

    pub fn increment(&mut self, strategy: Strategy) {
        match strategy {
            Strategy::Rock => self.rock += 1,
            Strategy::Paper => self.paper += 1,
            Strategy::Scissors => self.scissors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    /// (strategy, count) pairs in R, P, S order
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, usize)> + '_ {
        STRATEGY_ORDER.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Strategies that still have living agents
    pub fn surviving(&self) -> Vec<Strategy> {
        self.iter()
            .filter(|(_, count)| *count > 0)
            .map(|(s, _)| s)
            .collect()
    }
}

impl FromIterator<Strategy> for StrategyCounts {
    fn from_iter<I: IntoIterator<Item = Strategy>>(iter: I) -> Self {
        let mut counts = StrategyCounts::default();
        for strategy in iter {
            counts.increment(strategy);
        }
        counts
    }
}

/// Read-only view of a population after a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub snapshot_id: String,
    pub run_id: Uuid,
    pub world_id: String,
    pub cycle: u64,
    pub total_agents: usize,
    pub strategy_counts: StrategyCounts,
    #[serde(default)]
    pub sample_agents: Vec<AgentSummary>,
}

impl CycleSnapshot {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_extinct(&self) -> bool {
        self.total_agents == 0
    }
}
