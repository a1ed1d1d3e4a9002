//! State machine trait for status enums.
//!
//! Gives lifecycle statuses (proposal review status, and anything else that
//! only moves forward) one way to validate and perform transitions.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ProposalStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Pending, Accepted) | (Pending, Rejected))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Pending => vec![Accepted, Rejected],
///             Accepted | Rejected => vec![],
///         }
///     }
/// }
///
/// let new_status = current_status.transition_to(ProposalStatus::Accepted)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Delivery {
        Queued,
        InFlight,
        Delivered,
        Dropped,
    }

    impl StateMachine for Delivery {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Delivery::*;
            match self {
                Queued => vec![InFlight, Dropped],
                InFlight => vec![Delivered, Dropped],
                Delivered | Dropped => vec![],
            }
        }
    }

    #[test]
    fn transition_to_follows_declared_edges() {
        assert_eq!(
            Delivery::Queued.transition_to(Delivery::InFlight),
            Ok(Delivery::InFlight)
        );
        assert!(Delivery::Queued.transition_to(Delivery::Delivered).is_err());
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = Delivery::Delivered
            .transition_to(Delivery::Queued)
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Delivered"));
        assert!(text.contains("Queued"));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(Delivery::Delivered.is_terminal());
        assert!(Delivery::Dropped.is_terminal());
        assert!(!Delivery::InFlight.is_terminal());
    }
}
