//! Agents
//!
//! One creature: identity, a fixed strategy, food gathered this cycle and its
//! generation. Agents never survive a cycle; [`Agent::reproduce`] consumes the
//! parent and returns its offspring.

use rps_events::{AgentSummary, Strategy};

use crate::error::SimResult;
use crate::ids::{AgentId, IdAllocator, IdBlock};
use crate::rules::{MatchOutcome, RewardPolicy};

/// Generation of agents created at the start of a run
pub const ROOT_GENERATION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    id: AgentId,
    strategy: Strategy,
    food: u32,
    generation: u32,
}

impl Agent {
    /// Create a root (generation 1) agent
    pub fn new(strategy: Strategy, ids: &IdAllocator) -> SimResult<Self> {
        Self::with_generation(strategy, ROOT_GENERATION, ids)
    }

    /// Create an agent of the given generation, taking the next free id
    pub fn with_generation(strategy: Strategy, generation: u32, ids: &IdAllocator) -> SimResult<Self> {
        let id = AgentId::from(ids.allocate()?);
        Ok(Self::with_id(id, strategy, generation))
    }

    /// Create a root agent from a strategy code such as `"R"`
    pub fn from_code(code: &str, ids: &IdAllocator) -> SimResult<Self> {
        let strategy: Strategy = code.parse()?;
        Self::new(strategy, ids)
    }

    pub(crate) fn with_id(id: AgentId, strategy: Strategy, generation: u32) -> Self {
        Self {
            id,
            strategy,
            food: 0,
            generation,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn food(&self) -> u32 {
        self.food
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Play one match against `opponent`, feeding both sides.
    ///
    /// A single call settles the whole pair; the outcome is reported from
    /// this agent's side.
    pub fn resolve_match(&mut self, opponent: &mut Agent, policy: &RewardPolicy) -> MatchOutcome {
        let outcome = MatchOutcome::between(self.strategy, opponent.strategy);
        let (own, theirs) = policy.payoff(outcome);
        self.food += own;
        opponent.food += theirs;
        outcome
    }

    /// Feed an agent that had no opponent this cycle
    pub fn grant_bye(&mut self, policy: &RewardPolicy) {
        self.food += policy.bye;
    }

    /// Consume this agent, producing exactly `food` offspring of the same
    /// strategy, one generation later.
    pub fn reproduce(self, ids: &IdAllocator) -> SimResult<Vec<Agent>> {
        let mut block = ids.reserve(u64::from(self.food))?;
        let mut offspring = Vec::with_capacity(block.len());
        self.reproduce_into(&mut block, &mut offspring);
        Ok(offspring)
    }

    /// Append offspring to `out`, drawing ids from a block reserved by the
    /// caller. The block must hold at least `food` ids.
    pub(crate) fn reproduce_into(self, ids: &mut IdBlock, out: &mut Vec<Agent>) {
        debug_assert!(ids.len() >= self.food as usize, "id block too small for offspring");
        let generation = self.generation + 1;
        let strategy = self.strategy;
        out.extend(
            ids.by_ref()
                .take(self.food as usize)
                .map(|id| Agent::with_id(AgentId::from(id), strategy, generation)),
        );
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.to_string(),
            strategy: self.strategy,
            generation: self.generation,
        }
    }
}
