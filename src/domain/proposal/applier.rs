//! Turning an accepted proposal into a document mutation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use thiserror::Error;

use super::change_proposal::ChangeProposal;
use crate::domain::foundation::{DomainError, ErrorCode, ProposalId};

/// Why a proposal could not be applied. The document is never modified
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("proposal has no line location")]
    MissingLocation,

    #[error("lines {start_line}-{end_line} are outside a {total_lines}-line document")]
    OutOfBounds {
        start_line: u32,
        end_line: u32,
        total_lines: usize,
    },
}

impl From<ApplyError> for DomainError {
    fn from(err: ApplyError) -> Self {
        match err {
            ApplyError::MissingLocation => {
                DomainError::new(ErrorCode::MissingLocation, err.to_string())
            }
            ApplyError::OutOfBounds {
                start_line,
                end_line,
                total_lines,
            } => DomainError::new(ErrorCode::OutOfBounds, err.to_string())
                .with_detail("start_line", start_line.to_string())
                .with_detail("end_line", end_line.to_string())
                .with_detail("total_lines", total_lines.to_string()),
        }
    }
}

/// Replaces the proposal's inclusive line range with its proposed text.
///
/// The range collapses to a single insertion point: the proposed text takes
/// the place of all replaced lines even if it spans several lines itself.
/// The input is untouched; either the whole replacement is returned or an
/// error is.
///
/// Lines are split on `\n`. If the last replaced line ends in `\r`, the
/// proposed text is written with `\r\n` endings to match.
pub fn apply_proposal(document: &str, proposal: &ChangeProposal) -> Result<String, ApplyError> {
    let (start_line, end_line) = proposal.line_range().ok_or(ApplyError::MissingLocation)?;

    let lines: Vec<&str> = document.split('\n').collect();
    let total_lines = lines.len();

    if start_line < 1 || end_line < start_line || end_line as usize > total_lines {
        return Err(ApplyError::OutOfBounds {
            start_line,
            end_line,
            total_lines,
        });
    }

    let first = start_line as usize - 1;
    let last = end_line as usize;

    let replacement = if lines[last - 1].ends_with('\r') {
        Cow::Owned(with_crlf(&proposal.proposed_text))
    } else {
        Cow::Borrowed(proposal.proposed_text.as_str())
    };

    let mut updated = Vec::with_capacity(total_lines - (last - first) + 1);
    updated.extend_from_slice(&lines[..first]);
    updated.push(replacement.as_ref());
    updated.extend_from_slice(&lines[last..]);

    Ok(updated.join("\n"))
}

/// Rewrites `text` with `\r\n` endings, including a trailing `\r` for the
/// `\n` the caller joins after it.
fn with_crlf(text: &str) -> String {
    let mut out = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect::<Vec<_>>()
        .join("\r\n");
    out.push('\r');
    out
}

/// Maps each line of a `total_lines`-line document that is covered by a
/// pending, locatable proposal to the proposal that covers it. Ranges are
/// clipped to the document. When ranges overlap the later proposal wins.
pub fn pending_line_map(
    proposals: &[ChangeProposal],
    total_lines: usize,
) -> BTreeMap<u32, ProposalId> {
    let last_line = u32::try_from(total_lines).unwrap_or(u32::MAX);
    let mut map = BTreeMap::new();
    for proposal in proposals.iter().filter(|p| p.status().is_pending()) {
        if let Some((start, end)) = proposal.line_range() {
            for line in start.max(1)..=end.min(last_line) {
                map.insert(line, proposal.id.clone());
            }
        }
    }
    map
}
