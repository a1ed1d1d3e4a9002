//! Extraction of change proposals from free-form agent replies.
//!
//! Agent replies interleave prose with proposal blocks:
//!
//! ```text
//! <CHANGE-PROPOSAL reason="clarity">
//!   <ORIGINAL line="2-3">old text</ORIGINAL>
//!   <PROPOSED>new text</PROPOSED>
//! </CHANGE-PROPOSAL>
//! ```
//!
//! Parsing never fails. Well-formed blocks are lifted out of the visible
//! text; anything that does not match the grammar stays verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::change_proposal::{ChangeProposal, ProposalLocation};
use super::markup::{LINE_ATTR, ORIGINAL_TAG, PROPOSAL_TAG, PROPOSED_TAG, REASON_ATTR};

static PROPOSAL_BLOCK: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r#"(?s)<{p}[^>]*{r}="([^"]*)"[^>]*>\s*<{o}[^>]*{l}="([^"]*)"[^>]*>(.*?)</{o}>\s*<{n}>(.*?)</{n}>\s*</{p}>"#,
        p = regex::escape(PROPOSAL_TAG),
        o = regex::escape(ORIGINAL_TAG),
        n = regex::escape(PROPOSED_TAG),
        r = REASON_ATTR,
        l = LINE_ATTR,
    );
    Regex::new(&pattern).expect("proposal block pattern is valid")
});

/// A matched block that could not become a proposal.
///
/// The block is still removed from the visible text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSkip {
    #[error("invalid line numbers {line_attr:?} in proposal block at offset {offset}")]
    InvalidLineNumbers { line_attr: String, offset: usize },
}

/// Result of parsing one agent reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Reply text with every matched block removed, trimmed.
    pub content: String,
    /// Proposals in order of appearance, all pending.
    pub proposals: Vec<ChangeProposal>,
    /// Blocks that matched the grammar but carried unusable line numbers.
    #[serde(skip)]
    pub skipped: Vec<ParseSkip>,
}

impl ParsedMessage {
    /// True if at least one proposal was extracted.
    pub fn has_proposals(&self) -> bool {
        !self.proposals.is_empty()
    }
}

/// Splits agent text into cleaned prose and the proposals embedded in it.
pub fn parse_change_proposals(raw: &str) -> ParsedMessage {
    let mut content = raw.to_string();
    let mut proposals = Vec::new();
    let mut skipped = Vec::new();

    for caps in PROPOSAL_BLOCK.captures_iter(raw) {
        let Some(full) = caps.get(0) else { continue };
        let start = raw[..full.start()].chars().count();
        let end = start + full.as_str().chars().count();
        let line_attr = &caps[2];

        // The block leaves the visible text whether or not it parses.
        content = content.replacen(full.as_str(), "", 1);

        let Some((start_line, end_line)) = parse_line_range(line_attr) else {
            let skip = ParseSkip::InvalidLineNumbers {
                line_attr: line_attr.to_string(),
                offset: start,
            };
            tracing::warn!(line_attr, offset = start, "{}", skip);
            skipped.push(skip);
            continue;
        };

        proposals.push(ChangeProposal::new(
            caps[1].trim(),
            caps[3].trim(),
            caps[4].trim(),
            Some(ProposalLocation {
                start_line,
                end_line: Some(end_line),
                start,
                end,
            }),
        ));
    }

    tracing::debug!(
        proposals = proposals.len(),
        skipped = skipped.len(),
        "parsed agent reply"
    );

    ParsedMessage {
        content: content.trim().to_string(),
        proposals,
        skipped,
    }
}

/// Parses `N` or `N-M`. Any non-numeric component rejects the whole value.
fn parse_line_range(value: &str) -> Option<(u32, u32)> {
    let numbers = value
        .split('-')
        .map(|part| part.trim().parse::<u32>().ok())
        .collect::<Option<Vec<u32>>>()?;

    let start = *numbers.first()?;
    let end = numbers.get(1).copied().unwrap_or(start);
    Some((start, end))
}
