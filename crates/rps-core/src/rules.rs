//! Match Rules
//!
//! Match outcomes and the food schedule that turns them into offspring.

use rps_events::Strategy;
use serde::{Deserialize, Serialize};

/// Result of a match, seen from the agent that resolved it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Draw,
    Win,
    Loss,
}

impl MatchOutcome {
    /// Outcome for `actor` playing against `opponent`
    pub fn between(actor: Strategy, opponent: Strategy) -> Self {
        if actor == opponent {
            MatchOutcome::Draw
        } else if actor.beats(opponent) {
            MatchOutcome::Win
        } else {
            MatchOutcome::Loss
        }
    }

    /// The same match seen from the other side
    pub fn reversed(self) -> Self {
        match self {
            MatchOutcome::Draw => MatchOutcome::Draw,
            MatchOutcome::Win => MatchOutcome::Loss,
            MatchOutcome::Loss => MatchOutcome::Win,
        }
    }

    pub fn is_decisive(self) -> bool {
        !matches!(self, MatchOutcome::Draw)
    }
}

/// Who gets credited with food after a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Both sides are credited: draws feed both, the winner takes the win reward
    #[default]
    Symmetric,
    /// Only the agent resolving the match is credited
    ActorOnly,
}

/// Food awarded per outcome.
///
/// The default is the symmetric schedule: draw 1 each, win 2, loss 0, bye 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    pub scoring: Scoring,
    pub draw: u32,
    pub win: u32,
    pub loss: u32,
    /// Food for an agent left without an opponent
    pub bye: u32,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            scoring: Scoring::Symmetric,
            draw: 1,
            win: 2,
            loss: 0,
            bye: 1,
        }
    }
}

impl RewardPolicy {
    /// Default amounts, but only the resolving agent is fed
    pub fn actor_only() -> Self {
        Self {
            scoring: Scoring::ActorOnly,
            ..Self::default()
        }
    }

    /// Food for (actor, opponent) given the actor's outcome
    pub fn payoff(&self, outcome: MatchOutcome) -> (u32, u32) {
        let actor = self.reward(outcome);
        let opponent = match self.scoring {
            Scoring::Symmetric => self.reward(outcome.reversed()),
            Scoring::ActorOnly => 0,
        };
        (actor, opponent)
    }

    /// Total food a single match puts into the population
    pub fn food_per_match(&self, outcome: MatchOutcome) -> u32 {
        let (actor, opponent) = self.payoff(outcome);
        actor + opponent
    }

    fn reward(&self, outcome: MatchOutcome) -> u32 {
        match outcome {
            MatchOutcome::Draw => self.draw,
            MatchOutcome::Win => self.win,
            MatchOutcome::Loss => self.loss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_events::STRATEGY_ORDER;

    #[test]
    fn test_outcome_between() {
        assert_eq!(
            MatchOutcome::between(Strategy::Rock, Strategy::Rock),
            MatchOutcome::Draw
        );
        assert_eq!(
            MatchOutcome::between(Strategy::Paper, Strategy::Rock),
            MatchOutcome::Win
        );
        assert_eq!(
            MatchOutcome::between(Strategy::Scissors, Strategy::Rock),
            MatchOutcome::Loss
        );
    }

    #[test]
    fn test_outcome_antisymmetric() {
        for a in STRATEGY_ORDER {
            for b in STRATEGY_ORDER {
                assert_eq!(
                    MatchOutcome::between(a, b),
                    MatchOutcome::between(b, a).reversed()
                );
            }
        }
    }

    #[test]
    fn test_symmetric_payoffs() {
        let policy = RewardPolicy::default();
        assert_eq!(policy.payoff(MatchOutcome::Draw), (1, 1));
        assert_eq!(policy.payoff(MatchOutcome::Win), (2, 0));
        assert_eq!(policy.payoff(MatchOutcome::Loss), (0, 2));
    }

    #[test]
    fn test_symmetric_food_is_conserved() {
        let policy = RewardPolicy::default();
        for outcome in [MatchOutcome::Draw, MatchOutcome::Win, MatchOutcome::Loss] {
            assert_eq!(policy.food_per_match(outcome), 2);
        }
    }

    #[test]
    fn test_actor_only_payoffs() {
        let policy = RewardPolicy::actor_only();
        assert_eq!(policy.payoff(MatchOutcome::Draw), (1, 0));
        assert_eq!(policy.payoff(MatchOutcome::Win), (2, 0));
        assert_eq!(policy.payoff(MatchOutcome::Loss), (0, 0));
    }

    #[test]
    fn test_policy_from_partial_toml() {
        let policy: RewardPolicy = toml::from_str("scoring = \"actor_only\"\nwin = 3").unwrap();
        assert_eq!(policy.scoring, Scoring::ActorOnly);
        assert_eq!(policy.win, 3);
        assert_eq!(policy.draw, 1);
        assert_eq!(policy.bye, 1);
    }
}
