//! Cycle and run reports.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::StrategyCounts;

/// What happened inside a single cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Cycle index after the cycle completed
    pub cycle: u64,
    /// Agents that entered the cycle
    pub players: usize,
    pub matches: usize,
    pub draws: usize,
    pub decisive: usize,
    /// Agent that sat out with a bye, if the population was odd
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bye: Option<String>,
    /// Food accumulated across every player, bye included
    pub food_total: u64,
    pub offspring: usize,
}

impl CycleReport {
    /// Population growth factor of the cycle (0.0 for an empty cycle)
    pub fn growth(&self) -> f64 {
        if self.players == 0 {
            0.0
        } else {
            self.offspring as f64 / self.players as f64
        }
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The configured cycle limit was reached
    MaxCycles,
    /// No agents are left alive
    Extinct,
}

/// Final result of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub world_id: String,
    pub final_cycle: u64,
    pub total_agents: usize,
    pub strategy_counts: StrategyCounts,
    pub peak_population: usize,
    pub termination: Termination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth() {
        let report = CycleReport {
            players: 4,
            offspring: 6,
            ..Default::default()
        };
        assert!((report.growth() - 1.5).abs() < f64::EPSILON);
        assert_eq!(CycleReport::default().growth(), 0.0);
    }

    #[test]
    fn test_bye_omitted_when_absent() {
        let json = serde_json::to_string(&CycleReport::default()).unwrap();
        assert!(!json.contains("bye"));
    }

    #[test]
    fn test_termination_serialization() {
        assert_eq!(
            serde_json::to_string(&Termination::MaxCycles).unwrap(),
            "\"max_cycles\""
        );
        assert_eq!(
            serde_json::to_string(&Termination::Extinct).unwrap(),
            "\"extinct\""
        );
    }
}
