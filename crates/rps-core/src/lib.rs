//! Rock-Paper-Scissors population simulation engine.
//!
//! Agents are paired at random every cycle, play one match, and turn the food
//! they win into offspring. The whole population is replaced by those
//! offspring at the end of each cycle.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rand::{rngs::SmallRng, SeedableRng};
//! use rps_core::{IdSpace, Population, PopulationSettings};
//!
//! let settings = PopulationSettings::new(10, 5).with_distribution(vec![3, 3, 3]);
//! let mut population = Population::new(settings, Arc::new(IdSpace::new())).unwrap();
//! let mut rng = SmallRng::seed_from_u64(42);
//!
//! let report = population.run_cycle(&mut rng).unwrap();
//! assert_eq!(population.len() as u64, report.food_total);
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod ids;
pub mod output;
pub mod population;
pub mod rules;
pub mod runner;

pub use agent::{Agent, ROOT_GENERATION};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use error::{SimError, SimResult};
pub use ids::{AgentId, IdAllocator, IdSpace, IdSpaceKind, WorldId, ID_CAPACITY};
pub use output::{format_cycle_summary, format_final_summary, OutputError, SnapshotWriter};
pub use population::{effective_size, resolve_distribution, Population, PopulationSettings};
pub use rules::{MatchOutcome, RewardPolicy, Scoring};
pub use runner::{CycleObserver, RunError, Runner};
