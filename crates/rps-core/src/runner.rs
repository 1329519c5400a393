//! Run Driver
//!
//! Advances a population cycle by cycle until the cycle limit is reached or
//! nobody is left, handing every cycle's report and snapshot to an observer.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rps_events::{CycleReport, CycleSnapshot, RunSummary, Termination};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::error::SimError;
use crate::ids::IdSpace;
use crate::output::OutputError;
use crate::population::Population;

/// Errors that end a run early
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Receives each completed cycle
pub trait CycleObserver {
    fn on_cycle(&mut self, report: &CycleReport, snapshot: &CycleSnapshot) -> Result<(), RunError>;
}

impl<F> CycleObserver for F
where
    F: FnMut(&CycleReport, &CycleSnapshot) -> Result<(), RunError>,
{
    fn on_cycle(&mut self, report: &CycleReport, snapshot: &CycleSnapshot) -> Result<(), RunError> {
        self(report, snapshot)
    }
}

/// Owns a population and the random source driving it
#[derive(Debug)]
pub struct Runner<R: Rng = SmallRng> {
    population: Population,
    rng: R,
    peak_population: usize,
}

impl Runner<SmallRng> {
    /// Build the population described by `config`, seeding the RNG from the
    /// configured seed or from entropy.
    pub fn from_config(config: &Config, ids: Arc<IdSpace>) -> Result<Self, SimError> {
        let population = Population::new(config.population_settings(), ids)?;
        let rng = match config.simulation.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self::new(population, rng))
    }
}

impl<R: Rng> Runner<R> {
    pub fn new(population: Population, rng: R) -> Self {
        let peak_population = population.len();
        Self {
            population,
            rng,
            peak_population,
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Why the run should stop, if it should
    pub fn termination(&self) -> Option<Termination> {
        if self.population.is_empty() {
            Some(Termination::Extinct)
        } else if self.population.cycle_index() >= self.population.max_cycles() {
            Some(Termination::MaxCycles)
        } else {
            None
        }
    }

    /// Advance a single cycle and snapshot the result
    pub fn step(&mut self) -> Result<(CycleReport, CycleSnapshot), SimError> {
        let report = self.population.run_cycle(&mut self.rng)?;
        self.peak_population = self.peak_population.max(self.population.len());
        let snapshot = self.population.snapshot(&mut self.rng);
        Ok((report, snapshot))
    }

    /// Run cycles until a termination condition holds
    pub fn run<O: CycleObserver + ?Sized>(&mut self, observer: &mut O) -> Result<RunSummary, RunError> {
        info!(
            world = %self.population.world_id(),
            participants = self.population.len(),
            max_cycles = self.population.max_cycles(),
            "Starting simulation"
        );

        let termination = loop {
            if let Some(reason) = self.termination() {
                break reason;
            }
            let (report, snapshot) = self.step()?;
            observer.on_cycle(&report, &snapshot)?;
        };

        let summary = self.summary(termination);
        info!(
            world = %summary.world_id,
            cycle = summary.final_cycle,
            total = summary.total_agents,
            termination = ?summary.termination,
            "Simulation finished"
        );
        Ok(summary)
    }

    pub fn summary(&self, termination: Termination) -> RunSummary {
        RunSummary {
            run_id: self.population.run_id(),
            world_id: self.population.world_id().to_string(),
            final_cycle: self.population.cycle_index(),
            total_agents: self.population.len(),
            strategy_counts: self.population.strategy_counts(),
            peak_population: self.peak_population,
            termination,
        }
    }
}
