use crate::rules::Side;
use crate::session::SessionId;
use thiserror::Error;

/// Error types for the primeproof engine
///
/// Search outcomes (no proof, verification mismatch, cancellation) are not errors;
/// they are reported through [`crate::ProofStatus`].
#[derive(Debug, Clone, Error)]
pub enum ProofError {
    /// A rule or theorem side was rejected during validation
    #[error("Malformed {rule}: {side} {message}")]
    MalformedRule {
        side: Side,
        rule: String,
        message: String,
    },

    /// A proof step references a rule guid that is not in the rule store
    #[error("Unknown rule: Axiom_{0}")]
    UnknownRule(u64),

    /// Resume was requested for a session that was never suspended
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// A session snapshot could not be written or restored
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// A configured resource limit was exceeded or is unusable
    #[error("Resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value}). {suggestion}")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// Engine error without a more specific category
    #[error("Engine error: {0}")]
    Engine(String),
}

impl ProofError {
    /// Create a malformed-rule error for an empty side
    pub fn empty_side(side: Side, rule: impl Into<String>) -> Self {
        Self::MalformedRule {
            side,
            rule: rule.into(),
            message: "must contain at least one token".to_string(),
        }
    }
}

impl From<serde_json::Error> for ProofError {
    fn from(err: serde_json::Error) -> Self {
        ProofError::Snapshot(err.to_string())
    }
}
