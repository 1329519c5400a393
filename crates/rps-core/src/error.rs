//! Simulation errors.

use rps_events::ParseStrategyError;
use thiserror::Error;

use crate::ids::IdSpaceKind;

/// Errors raised by agent and population construction or by a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A strategy value outside {R, P, S}
    #[error("invalid strategy: '{0}', expected one of R, P, S")]
    InvalidStrategy(String),
    /// Distribution with the wrong length, a negative entry, or a bad sum
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
    /// The identifier counter ran out of values
    #[error("{space} identifier space exhausted ({capacity} identifiers)")]
    CapacityExhausted { space: IdSpaceKind, capacity: u32 },
}

impl SimError {
    /// Malformed input detected at construction time
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            SimError::InvalidStrategy(_) | SimError::InvalidDistribution(_)
        )
    }

    pub fn is_capacity_exhausted(&self) -> bool {
        matches!(self, SimError::CapacityExhausted { .. })
    }
}

impl From<ParseStrategyError> for SimError {
    fn from(e: ParseStrategyError) -> Self {
        SimError::InvalidStrategy(e.0)
    }
}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rps_events::Strategy;

    #[test]
    fn test_error_kinds() {
        let invalid = SimError::InvalidDistribution("sum 10 != 9".into());
        assert!(invalid.is_invalid_argument());
        assert!(!invalid.is_capacity_exhausted());

        let exhausted = SimError::CapacityExhausted {
            space: IdSpaceKind::Agent,
            capacity: 10,
        };
        assert!(exhausted.is_capacity_exhausted());
        assert!(!exhausted.is_invalid_argument());
        assert_eq!(
            exhausted.to_string(),
            "agent identifier space exhausted (10 identifiers)"
        );
    }

    #[test]
    fn test_from_parse_error() {
        let err: SimError = "Lizard".parse::<Strategy>().unwrap_err().into();
        assert_eq!(err, SimError::InvalidStrategy("Lizard".into()));
        assert!(err.is_invalid_argument());
    }
}
