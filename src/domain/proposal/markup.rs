//! Embedded markup vocabulary shared with agents.
//!
//! Agents emit proposals inline in their replies using a fixed,
//! case-sensitive tag set. Changing any of these names breaks every agent
//! instruction that describes the format.

/// Outer element wrapping one proposal.
pub const PROPOSAL_TAG: &str = "CHANGE-PROPOSAL";

/// Element holding the text being replaced.
pub const ORIGINAL_TAG: &str = "ORIGINAL";

/// Element holding the replacement text.
pub const PROPOSED_TAG: &str = "PROPOSED";

/// Attribute on the outer element carrying the rationale.
pub const REASON_ATTR: &str = "reason";

/// Attribute on the original element carrying `N` or `N-M`.
pub const LINE_ATTR: &str = "line";

/// Instruction text appended to every agent's system instruction so the
/// model emits proposals in the parseable format.
pub fn markup_instructions() -> String {
    format!(
        r#"When suggesting changes to the document, you MUST use the following XML format for each change:

<{p} {r}="Brief explanation of why this change improves the text">
  <{o} {l}="line-number">Original text content</{o}>
  <{n}>Improved text content</{n}>
</{p}>

Important rules for change proposals:
1. Always include the line number(s) where the change should be made
2. For multi-line changes, use a range like {l}="1-3"
3. Include a clear, specific reason for each change
4. Preserve the exact XML structure
5. You can suggest multiple changes in one response
6. Do not propose a markdown block in addition to the change proposal: just use the XML format.

Example of a properly formatted change:
<{p} {r}="Improved clarity and academic tone">
  <{o} {l}="5">Summarize existing research...</{o}>
  <{n}>This section synthesizes key findings from existing literature in the field...</{n}>
</{p}>

**IMPORTANT**: DO NOT USE MARKDOWN OR OTHER FORMATTING TO PROPOSE CHANGES. JUST USE THE DEFINED XML FORMAT!!"#,
        p = PROPOSAL_TAG,
        o = ORIGINAL_TAG,
        n = PROPOSED_TAG,
        r = REASON_ATTR,
        l = LINE_ATTR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::proposal::parse_change_proposals;

    #[test]
    fn instructions_name_every_tag() {
        let text = markup_instructions();
        for tag in [PROPOSAL_TAG, ORIGINAL_TAG, PROPOSED_TAG] {
            assert!(text.contains(&format!("<{}", tag)));
            assert!(text.contains(&format!("</{}>", tag)));
        }
    }

    #[test]
    fn instruction_example_is_itself_parseable() {
        let parsed = parse_change_proposals(&markup_instructions());

        // The template block has a non-numeric line and is skipped; the
        // worked example parses.
        assert_eq!(parsed.proposals.len(), 1);
        assert_eq!(parsed.proposals[0].line_range(), Some((5, 5)));
        assert_eq!(parsed.proposals[0].reason, "Improved clarity and academic tone");
    }
}
