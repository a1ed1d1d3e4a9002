//! Change-proposal protocol.
//!
//! Agents embed edit suggestions in their replies using a fixed markup
//! convention. This module extracts them, tracks their review status and
//! applies accepted ones to document text.

mod applier;
mod change_proposal;
mod markup;
mod parser;

pub use applier::{apply_proposal, pending_line_map, ApplyError};
pub use change_proposal::{ChangeProposal, ProposalLocation, ProposalStatus};
pub use markup::{
    markup_instructions, LINE_ATTR, ORIGINAL_TAG, PROPOSAL_TAG, PROPOSED_TAG, REASON_ATTR,
};
pub use parser::{parse_change_proposals, ParseSkip, ParsedMessage};
