//! Population Engine
//!
//! Owns the living agents of one world and advances them one cycle at a time:
//! shuffle, pair, resolve, reproduce, replace.
//!
//! Each agent plays at most one match per cycle, so a cycle is linear in the
//! population size. Nobody survives a cycle; the next population consists
//! solely of the offspring of the current one.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use rps_events::{
    generate_snapshot_id, CycleReport, CycleSnapshot, StrategyCounts, STRATEGY_ORDER,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agent::{Agent, ROOT_GENERATION};
use crate::error::{SimError, SimResult};
use crate::ids::{AgentId, IdSpace, WorldId};
use crate::rules::{MatchOutcome, RewardPolicy};

/// Agents sampled into each snapshot unless configured otherwise
pub const DEFAULT_SAMPLE_SIZE: usize = 3;

/// Round a participant count down to a multiple of 3
pub fn effective_size(participants: u64) -> u64 {
    participants - participants % 3
}

/// Resolve the initial [R, P, S] split for a population of `effective` agents.
///
/// Without an explicit distribution the population is split into three equal
/// groups. An explicit one must hold exactly three non-negative values that
/// sum to `effective`.
pub fn resolve_distribution(effective: u64, distribution: Option<&[i64]>) -> SimResult<[u64; 3]> {
    let Some(values) = distribution else {
        let per_strategy = effective / 3;
        return Ok([per_strategy; 3]);
    };

    if values.len() != 3 {
        return Err(SimError::InvalidDistribution(format!(
            "expected exactly 3 values (R, P, S), got {}",
            values.len()
        )));
    }
    if let Some(negative) = values.iter().find(|v| **v < 0) {
        return Err(SimError::InvalidDistribution(format!(
            "values must be non-negative, got {}",
            negative
        )));
    }
    let sum: i128 = values.iter().map(|v| i128::from(*v)).sum();
    if sum != i128::from(effective) {
        return Err(SimError::InvalidDistribution(format!(
            "sum of distribution ({}) must equal total participants ({}, rounded down to a multiple of 3)",
            sum, effective
        )));
    }

    Ok([values[0] as u64, values[1] as u64, values[2] as u64])
}

/// Construction parameters for a [`Population`]
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSettings {
    /// Requested participants, rounded down to a multiple of 3
    pub participants: u64,
    /// Cycle limit for the driver; not enforced by the engine
    pub max_cycles: u64,
    /// Explicit [R, P, S] counts
    pub distribution: Option<Vec<i64>>,
    pub rewards: RewardPolicy,
    pub sample_size: usize,
    /// Resolve matches on the rayon pool once a cycle has this many players
    pub parallel_threshold: Option<usize>,
}

impl PopulationSettings {
    pub fn new(participants: u64, max_cycles: u64) -> Self {
        Self {
            participants,
            max_cycles,
            distribution: None,
            rewards: RewardPolicy::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            parallel_threshold: None,
        }
    }

    pub fn with_distribution(mut self, distribution: Vec<i64>) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn with_rewards(mut self, rewards: RewardPolicy) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }
}

/// Match counts for one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MatchTally {
    matches: usize,
    draws: usize,
    decisive: usize,
}

impl MatchTally {
    fn of(outcome: MatchOutcome) -> Self {
        Self {
            matches: 1,
            draws: usize::from(!outcome.is_decisive()),
            decisive: usize::from(outcome.is_decisive()),
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            matches: self.matches + other.matches,
            draws: self.draws + other.draws,
            decisive: self.decisive + other.decisive,
        }
    }
}

/// The living population of one world
#[derive(Debug)]
pub struct Population {
    world_id: WorldId,
    run_id: Uuid,
    cycle_index: u64,
    max_cycles: u64,
    initial_size: u64,
    distribution: [u64; 3],
    rewards: RewardPolicy,
    sample_size: usize,
    parallel_threshold: Option<usize>,
    agents: Vec<Agent>,
    /// Emptied buffer from the previous cycle, reused for the next offspring
    spare: Vec<Agent>,
    ids: Arc<IdSpace>,
}

impl Population {
    /// Build the initial population: Rock agents first, then Paper, then
    /// Scissors, all generation 1.
    pub fn new(settings: PopulationSettings, ids: Arc<IdSpace>) -> SimResult<Self> {
        let initial_size = effective_size(settings.participants);
        let distribution = resolve_distribution(initial_size, settings.distribution.as_deref())?;
        let world_id = WorldId::from(ids.worlds.allocate()?);

        let mut block = ids.agents.reserve(initial_size)?;
        let mut agents = Vec::with_capacity(block.len());
        for (strategy, count) in STRATEGY_ORDER.into_iter().zip(distribution) {
            agents.extend(
                block
                    .by_ref()
                    .take(count as usize)
                    .map(|id| Agent::with_id(AgentId::from(id), strategy, ROOT_GENERATION)),
            );
        }

        info!(
            world = %world_id,
            participants = initial_size,
            rock = distribution[0],
            paper = distribution[1],
            scissors = distribution[2],
            "Created population"
        );

        Ok(Self {
            world_id,
            run_id: Uuid::new_v4(),
            cycle_index: 0,
            max_cycles: settings.max_cycles,
            initial_size,
            distribution,
            rewards: settings.rewards,
            sample_size: settings.sample_size,
            parallel_threshold: settings.parallel_threshold,
            agents,
            spare: Vec::new(),
            ids,
        })
    }

    pub fn world_id(&self) -> WorldId {
        self.world_id
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn cycle_index(&self) -> u64 {
        self.cycle_index
    }

    pub fn max_cycles(&self) -> u64 {
        self.max_cycles
    }

    /// Population size after rounding, before the first cycle
    pub fn initial_size(&self) -> u64 {
        self.initial_size
    }

    /// Initial [R, P, S] counts
    pub fn distribution(&self) -> [u64; 3] {
        self.distribution
    }

    pub fn rewards(&self) -> &RewardPolicy {
        &self.rewards
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn strategy_counts(&self) -> StrategyCounts {
        self.agents.iter().map(Agent::strategy).collect()
    }

    /// Run one full cycle and replace the population with its offspring.
    ///
    /// Fails with [`SimError::CapacityExhausted`] when the agent id space
    /// cannot hold every offspring. In that case no offspring are created,
    /// the cycle index is not advanced and the population keeps the food it
    /// gathered; the run is expected to stop there.
    pub fn run_cycle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SimResult<CycleReport> {
        let mut pool = std::mem::take(&mut self.agents);
        pool.shuffle(rng);

        let tally = self.play_matches(&mut pool);

        // chunks_exact leaves the odd agent at the end of the pool
        let bye = if pool.len() % 2 == 1 {
            pool.last_mut().map(|agent| {
                agent.grant_bye(&self.rewards);
                agent.id().to_string()
            })
        } else {
            None
        };

        let players = pool.len();
        let food_total: u64 = pool.iter().map(|a| u64::from(a.food())).sum();

        let mut block = match self.ids.agents.reserve(food_total) {
            Ok(block) => block,
            Err(e) => {
                self.agents = pool;
                return Err(e);
            }
        };

        let mut offspring = std::mem::take(&mut self.spare);
        offspring.clear();
        offspring.reserve(block.len());
        for parent in pool.drain(..) {
            parent.reproduce_into(&mut block, &mut offspring);
        }

        self.spare = pool;
        self.agents = offspring;
        self.cycle_index += 1;

        let report = CycleReport {
            cycle: self.cycle_index,
            players,
            matches: tally.matches,
            draws: tally.draws,
            decisive: tally.decisive,
            bye,
            food_total,
            offspring: self.agents.len(),
        };

        debug!(
            world = %self.world_id,
            cycle = report.cycle,
            players = report.players,
            matches = report.matches,
            draws = report.draws,
            offspring = report.offspring,
            "Cycle complete"
        );
        if self.agents.is_empty() && players > 0 {
            warn!(world = %self.world_id, cycle = self.cycle_index, "Population died out");
        }

        Ok(report)
    }

    /// Resolve every consecutive pair of the shuffled pool exactly once.
    fn play_matches(&self, pool: &mut [Agent]) -> MatchTally {
        let rewards = &self.rewards;
        let play = |pair: &mut [Agent]| {
            let (first, second) = pair.split_at_mut(1);
            MatchTally::of(first[0].resolve_match(&mut second[0], rewards))
        };

        match self.parallel_threshold {
            Some(threshold) if pool.len() >= threshold => pool
                .par_chunks_exact_mut(2)
                .map(play)
                .reduce(MatchTally::default, MatchTally::merge),
            _ => pool
                .chunks_exact_mut(2)
                .map(play)
                .fold(MatchTally::default(), MatchTally::merge),
        }
    }

    /// Read-only view of the current population with a few sampled agents
    pub fn snapshot<R: Rng + ?Sized>(&self, rng: &mut R) -> CycleSnapshot {
        let sample_agents = self
            .agents
            .choose_multiple(rng, self.sample_size)
            .map(Agent::summary)
            .collect();

        CycleSnapshot {
            snapshot_id: generate_snapshot_id(self.cycle_index),
            run_id: self.run_id,
            world_id: self.world_id.to_string(),
            cycle: self.cycle_index,
            total_agents: self.agents.len(),
            strategy_counts: self.strategy_counts(),
            sample_agents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rps_events::Strategy;
    use std::collections::HashSet;

    fn ids() -> Arc<IdSpace> {
        Arc::new(IdSpace::new())
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_effective_size() {
        assert_eq!(effective_size(10), 9);
        assert_eq!(effective_size(9), 9);
        assert_eq!(effective_size(2), 0);
        assert_eq!(effective_size(9999), 9999);
    }

    #[test]
    fn test_default_distribution() {
        let population = Population::new(PopulationSettings::new(10, 5), ids()).unwrap();
        assert_eq!(population.initial_size(), 9);
        assert_eq!(population.distribution(), [3, 3, 3]);
        assert_eq!(population.len(), 9);
        assert_eq!(population.strategy_counts(), StrategyCounts::new(3, 3, 3));
    }

    #[test]
    fn test_initial_agents_in_strategy_order() {
        let settings = PopulationSettings::new(6, 1).with_distribution(vec![1, 2, 3]);
        let population = Population::new(settings, ids()).unwrap();
        let strategies: Vec<_> = population.agents().iter().map(Agent::strategy).collect();
        assert_eq!(
            strategies,
            vec![
                Strategy::Rock,
                Strategy::Paper,
                Strategy::Paper,
                Strategy::Scissors,
                Strategy::Scissors,
                Strategy::Scissors
            ]
        );
        assert!(population.agents().iter().all(|a| a.generation() == 1 && a.food() == 0));
    }

    #[test]
    fn test_explicit_distribution_accepted() {
        let settings = PopulationSettings::new(10, 5).with_distribution(vec![3, 3, 3]);
        assert!(Population::new(settings, ids()).is_ok());
    }

    #[test]
    fn test_distribution_sum_mismatch_rejected() {
        let settings = PopulationSettings::new(10, 5).with_distribution(vec![4, 3, 3]);
        let err = Population::new(settings, ids()).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("(10)"));
    }

    #[test]
    fn test_distribution_shape_rejected() {
        assert!(resolve_distribution(9, Some(&[9, 0])).unwrap_err().is_invalid_argument());
        assert!(resolve_distribution(9, Some(&[3, 3, 3, 0])).unwrap_err().is_invalid_argument());
        assert!(resolve_distribution(9, Some(&[10, -1, 0])).unwrap_err().is_invalid_argument());
        assert_eq!(resolve_distribution(9, Some(&[9, 0, 0])).unwrap(), [9, 0, 0]);
    }

    #[test]
    fn test_invalid_distribution_allocates_nothing() {
        let ids = ids();
        let settings = PopulationSettings::new(9, 5).with_distribution(vec![1, 1, 1]);
        assert!(Population::new(settings, Arc::clone(&ids)).is_err());
        assert_eq!(ids.agents.issued(), 0);
        assert_eq!(ids.worlds.issued(), 0);
    }

    #[test]
    fn test_world_ids_increase() {
        let ids = ids();
        let first = Population::new(PopulationSettings::new(3, 1), Arc::clone(&ids)).unwrap();
        let second = Population::new(PopulationSettings::new(3, 1), Arc::clone(&ids)).unwrap();
        assert_eq!(first.world_id().to_string(), "000000");
        assert_eq!(second.world_id().to_string(), "000001");
        // Agent ids are shared across worlds
        let first_ids: HashSet<_> = first.agents().iter().map(Agent::id).collect();
        assert!(second.agents().iter().all(|a| !first_ids.contains(&a.id())));
    }

    #[test]
    fn test_cycle_replaces_population() {
        let mut population = Population::new(PopulationSettings::new(300, 5), ids()).unwrap();
        let mut rng = rng();
        let before: HashSet<_> = population.agents().iter().map(Agent::id).collect();

        let report = population.run_cycle(&mut rng).unwrap();

        assert_eq!(report.cycle, 1);
        assert_eq!(population.cycle_index(), 1);
        assert_eq!(report.players, 300);
        assert_eq!(report.matches, 150);
        assert_eq!(report.draws + report.decisive, report.matches);
        assert!(report.bye.is_none());
        // Symmetric rewards put exactly 2 food into every match
        assert_eq!(report.food_total, 300);
        assert_eq!(population.len() as u64, report.food_total);
        assert!(population.agents().iter().all(|a| !before.contains(&a.id())));
        assert!(population.agents().iter().all(|a| a.generation() == 2 && a.food() == 0));
    }

    #[test]
    fn test_odd_population_gets_one_bye() {
        let settings = PopulationSettings::new(9, 5);
        let mut population = Population::new(settings, ids()).unwrap();
        let before: HashSet<String> = population
            .agents()
            .iter()
            .map(|a| a.id().to_string())
            .collect();

        let report = population.run_cycle(&mut rng()).unwrap();
        assert_eq!(report.matches, 4);
        let bye = report.bye.expect("odd population must produce a bye");
        assert!(before.contains(&bye));
        assert_eq!(report.food_total, 4 * 2 + 1);
        assert_eq!(population.len(), 9);
    }

    #[test]
    fn test_single_strategy_population_holds_steady() {
        let settings = PopulationSettings::new(3, 5).with_distribution(vec![0, 0, 3]);
        let mut population = Population::new(settings, ids()).unwrap();
        let mut rng = rng();
        // Three Scissors: one draw (2 offspring) plus a bye (1 offspring)
        let report = population.run_cycle(&mut rng).unwrap();
        assert_eq!(report.draws, 1);
        assert_eq!(population.len(), 3);
        assert_eq!(population.strategy_counts(), StrategyCounts::new(0, 0, 3));
    }

    #[test]
    fn test_empty_population_noop_cycle() {
        let mut population = Population::new(PopulationSettings::new(2, 5), ids()).unwrap();
        assert!(population.is_empty());

        let report = population.run_cycle(&mut rng()).unwrap();
        assert_eq!(report.players, 0);
        assert_eq!(report.offspring, 0);
        assert_eq!(population.cycle_index(), 1);
        assert!(population.is_empty());
    }

    #[test]
    fn test_capacity_exhaustion_keeps_population() {
        let ids = Arc::new(IdSpace::with_agent_capacity(4));
        let settings = PopulationSettings::new(3, 5);
        let mut population = Population::new(settings, ids).unwrap();

        let err = population.run_cycle(&mut rng()).unwrap_err();
        assert!(err.is_capacity_exhausted());
        assert_eq!(population.cycle_index(), 0);
        assert_eq!(population.len(), 3);
    }

    #[test]
    fn test_initial_population_beyond_capacity() {
        let ids = Arc::new(IdSpace::with_agent_capacity(5));
        let err = Population::new(PopulationSettings::new(6, 1), ids).unwrap_err();
        assert!(err.is_capacity_exhausted());
    }

    #[test]
    fn test_parallel_matches_equal_serial() {
        let settings = PopulationSettings::new(3000, 3);
        let mut serial = Population::new(settings.clone(), ids()).unwrap();
        let mut parallel =
            Population::new(settings.with_parallel_threshold(1), ids()).unwrap();

        let mut rng_a = SmallRng::seed_from_u64(7);
        let mut rng_b = SmallRng::seed_from_u64(7);
        for _ in 0..3 {
            let a = serial.run_cycle(&mut rng_a).unwrap();
            let b = parallel.run_cycle(&mut rng_b).unwrap();
            assert_eq!(a, b);
            assert_eq!(serial.strategy_counts(), parallel.strategy_counts());
        }
    }

    #[test]
    fn test_snapshot_reads_without_mutation() {
        let population = Population::new(PopulationSettings::new(30, 5), ids()).unwrap();
        let before: Vec<_> = population.agents().to_vec();

        let snapshot = population.snapshot(&mut rng());
        assert_eq!(snapshot.cycle, 0);
        assert_eq!(snapshot.snapshot_id, "snap_000000");
        assert_eq!(snapshot.total_agents, 30);
        assert_eq!(snapshot.strategy_counts, StrategyCounts::new(10, 10, 10));
        assert_eq!(snapshot.sample_agents.len(), DEFAULT_SAMPLE_SIZE);
        assert_eq!(snapshot.world_id, population.world_id().to_string());

        let sampled: HashSet<_> = snapshot.sample_agents.iter().map(|s| s.id.clone()).collect();
        assert_eq!(sampled.len(), DEFAULT_SAMPLE_SIZE, "sampling must be without replacement");

        assert_eq!(population.agents(), before.as_slice());
    }

    #[test]
    fn test_snapshot_samples_everyone_when_small() {
        let settings = PopulationSettings::new(3, 5).with_distribution(vec![1, 1, 1]);
        let population = Population::new(settings, ids()).unwrap();
        let snapshot = population.snapshot(&mut rng());
        assert_eq!(snapshot.sample_agents.len(), 3);

        let empty = Population::new(PopulationSettings::new(0, 5), ids()).unwrap();
        let snapshot = empty.snapshot(&mut rng());
        assert!(snapshot.sample_agents.is_empty());
        assert!(snapshot.is_extinct());
    }
}
