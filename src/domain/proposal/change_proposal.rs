//! Change proposal entity and its review lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProposalId, StateMachine, ValidationError};

/// Review status of a proposal.
///
/// Starts `Pending`; `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Awaiting a user decision.
    #[default]
    Pending,
    /// User accepted; the replacement has been (or is being) committed.
    Accepted,
    /// User rejected; the document is never touched.
    Rejected,
}

impl ProposalStatus {
    /// Returns true while the user can still act on the proposal.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl StateMachine for ProposalStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ProposalStatus::*;
        matches!((self, target), (Pending, Accepted) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ProposalStatus::*;
        match self {
            Pending => vec![Accepted, Rejected],
            Accepted | Rejected => vec![],
        }
    }
}

/// Where a proposal claims to apply.
///
/// `start_line`/`end_line` are 1-based inclusive document lines.
/// `start`/`end` are character offsets of the markup block inside the raw
/// agent text and are only kept for extraction bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalLocation {
    pub start_line: u32,
    pub end_line: Option<u32>,
    pub start: usize,
    pub end: usize,
}

impl ProposalLocation {
    /// Last line covered, falling back to `start_line`.
    pub fn resolved_end_line(&self) -> u32 {
        self.end_line.unwrap_or(self.start_line)
    }
}

/// A structured, agent-suggested replacement for a document line range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeProposal {
    pub id: ProposalId,
    pub reason: String,
    pub original_text: String,
    pub proposed_text: String,
    pub location: Option<ProposalLocation>,
    status: ProposalStatus,
}

impl ChangeProposal {
    /// Creates a pending proposal with a freshly generated id.
    pub fn new(
        reason: impl Into<String>,
        original_text: impl Into<String>,
        proposed_text: impl Into<String>,
        location: Option<ProposalLocation>,
    ) -> Self {
        Self {
            id: ProposalId::generate(),
            reason: reason.into(),
            original_text: original_text.into(),
            proposed_text: proposed_text.into(),
            location,
            status: ProposalStatus::Pending,
        }
    }

    /// Current review status.
    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    /// True if the proposal carries a line location and can be applied.
    pub fn can_apply(&self) -> bool {
        self.location.is_some()
    }

    /// Inclusive `(start_line, end_line)` if the proposal is locatable.
    pub fn line_range(&self) -> Option<(u32, u32)> {
        self.location
            .map(|loc| (loc.start_line, loc.resolved_end_line()))
    }

    /// Marks the proposal accepted.
    ///
    /// # Errors
    ///
    /// Fails if the proposal was already reviewed.
    pub fn accept(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(ProposalStatus::Accepted)?;
        Ok(())
    }

    /// Marks the proposal rejected. Never touches any document.
    ///
    /// # Errors
    ///
    /// Fails if the proposal was already reviewed.
    pub fn reject(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(ProposalStatus::Rejected)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(start_line: u32, end_line: Option<u32>) -> ChangeProposal {
        ChangeProposal::new(
            "clarity",
            "foo",
            "bar",
            Some(ProposalLocation {
                start_line,
                end_line,
                start: 0,
                end: 10,
            }),
        )
    }

    mod status {
        use super::*;

        #[test]
        fn pending_can_move_to_either_terminal_state() {
            assert!(ProposalStatus::Pending.can_transition_to(&ProposalStatus::Accepted));
            assert!(ProposalStatus::Pending.can_transition_to(&ProposalStatus::Rejected));
        }

        #[test]
        fn reviewed_states_are_terminal() {
            assert!(ProposalStatus::Accepted.is_terminal());
            assert!(ProposalStatus::Rejected.is_terminal());
            assert!(!ProposalStatus::Accepted.can_transition_to(&ProposalStatus::Pending));
        }

        #[test]
        fn serializes_snake_case() {
            let json = serde_json::to_string(&ProposalStatus::Accepted).unwrap();
            assert_eq!(json, "\"accepted\"");
        }
    }

    mod proposal {
        use super::*;

        #[test]
        fn new_proposal_is_pending() {
            let proposal = located(2, None);
            assert_eq!(proposal.status(), ProposalStatus::Pending);
        }

        #[test]
        fn line_range_defaults_end_to_start() {
            assert_eq!(located(4, None).line_range(), Some((4, 4)));
            assert_eq!(located(5, Some(8)).line_range(), Some((5, 8)));
        }

        #[test]
        fn proposal_without_location_cannot_apply() {
            let proposal = ChangeProposal::new("", "a", "b", None);
            assert!(!proposal.can_apply());
            assert_eq!(proposal.line_range(), None);
        }

        #[test]
        fn accept_is_terminal() {
            let mut proposal = located(1, None);
            proposal.accept().unwrap();

            assert_eq!(proposal.status(), ProposalStatus::Accepted);
            assert!(proposal.reject().is_err());
            assert!(proposal.accept().is_err());
            assert_eq!(proposal.status(), ProposalStatus::Accepted);
        }

        #[test]
        fn reject_is_terminal() {
            let mut proposal = located(1, None);
            proposal.reject().unwrap();

            assert_eq!(proposal.status(), ProposalStatus::Rejected);
            assert!(proposal.accept().is_err());
        }

        #[test]
        fn ids_are_unique_per_proposal() {
            assert_ne!(located(1, None).id, located(1, None).id);
        }
    }
}
