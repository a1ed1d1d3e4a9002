//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

static PROPOSAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identifier for a change proposal extracted from agent output.
///
/// Generated ids combine a process-wide monotonic counter with a random
/// suffix, so they never repeat within one process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(String);

impl ProposalId {
    /// Generates a fresh identifier of the form `proposal-<seq>-<suffix>`.
    pub fn generate() -> Self {
        let seq = PROPOSAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("proposal-{}-{}", seq, &suffix[..12]))
    }

    /// Wraps an existing identifier, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("proposal_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a document owned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("document_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an agent in the agent configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates a new AgentId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("agent_id"));
        }
        Ok(Self(id))
    }

    /// Creates an id for a user-defined agent.
    pub fn generate() -> Self {
        Self(format!("agent-{}", Uuid::new_v4().simple()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn message_id_generates_unique_values() {
        let id1 = MessageId::new();
        let id2 = MessageId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn message_id_parses_from_string() {
        let id = MessageId::new();
        let parsed: MessageId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn proposal_id_has_expected_shape() {
        let id = ProposalId::generate();
        let parts: Vec<&str> = id.as_str().splitn(3, '-').collect();

        assert_eq!(parts[0], "proposal");
        assert!(parts[1].parse::<u64>().is_ok());
        assert_eq!(parts[2].len(), 12);
    }

    #[test]
    fn proposal_ids_never_repeat() {
        let ids: HashSet<ProposalId> = (0..1_000).map(|_| ProposalId::generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn proposal_id_sequence_is_monotonic() {
        let seq = |id: &ProposalId| -> u64 {
            id.as_str().split('-').nth(1).unwrap().parse().unwrap()
        };
        let first = ProposalId::generate();
        let second = ProposalId::generate();
        assert!(seq(&second) > seq(&first));
    }

    #[test]
    fn document_id_rejects_empty() {
        assert!(DocumentId::new("").is_err());
        assert_eq!(DocumentId::new("doc-1").unwrap().as_str(), "doc-1");
    }

    #[test]
    fn agent_id_rejects_empty() {
        assert!(AgentId::new("").is_err());
        assert_eq!(AgentId::new("editor").unwrap().to_string(), "editor");
    }

    #[test]
    fn string_ids_serialize_transparently() {
        let id = AgentId::new("reviewer").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"reviewer\"");
    }
}
