//! # PC request lifecycle
//!
//! One request per candidate, decided at most once. Uniqueness and the
//! compare-and-swap on `PENDING` are enforced by the storage layer in a single
//! statement each; this module only decides whether a submission or a
//! transition is admissible.

use crate::errors::{FundingError, Result};
use crate::types::{CandidateId, ConfirmationStatus, Decision, PcTier, RequestId};

/// Minimum number of characters in the future-project statement.
pub const MIN_FUTURE_PROJECT_LEN: usize = 20;

/// A validated request, ready to be inserted with status `PENDING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPcRequest {
    pub candidate_id: CandidateId,
    pub tier: PcTier,
    pub justification: Option<String>,
    pub future_project: String,
}

impl NewPcRequest {
    /// Check a candidate's submission. `candidate_id` comes from the
    /// authenticated principal, never from the request body.
    pub fn validate(
        candidate_id: CandidateId,
        tier: Option<&str>,
        justification: Option<String>,
        future_project: Option<String>,
    ) -> Result<Self> {
        let tier: PcTier = tier.ok_or(FundingError::MissingField("pcType"))?.parse()?;

        let future_project = future_project.unwrap_or_default();
        let len = future_project.chars().count();
        if len < MIN_FUTURE_PROJECT_LEN {
            return Err(FundingError::TooShort {
                field: "futureProject",
                min: MIN_FUTURE_PROJECT_LEN,
                actual: len,
            });
        }

        Ok(Self {
            candidate_id,
            tier,
            justification,
            future_project,
        })
    }
}

impl ConfirmationStatus {
    /// The status after applying `decision` to request `id`.
    ///
    /// Only `PENDING` accepts a decision; terminal states reject every
    /// transition, including one to the state they are already in.
    pub fn apply(self, id: RequestId, decision: Decision) -> Result<ConfirmationStatus> {
        match self {
            ConfirmationStatus::Pending => Ok(decision.status()),
            status => Err(FundingError::AlreadyProcessed { id, status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(len: usize) -> Option<String> {
        Some("x".repeat(len))
    }

    #[test]
    fn missing_tier_is_rejected() {
        assert_eq!(
            NewPcRequest::validate(1, None, None, project(30)),
            Err(FundingError::MissingField("pcType"))
        );
    }

    #[test]
    fn unknown_tier_is_rejected_before_length() {
        assert_eq!(
            NewPcRequest::validate(1, Some("GAMING"), None, project(3)),
            Err(FundingError::InvalidTier("GAMING".into()))
        );
    }

    #[test]
    fn missing_project_counts_as_empty() {
        assert_eq!(
            NewPcRequest::validate(1, Some("BASIC"), None, None),
            Err(FundingError::TooShort {
                field: "futureProject",
                min: 20,
                actual: 0
            })
        );
    }

    #[test]
    fn length_is_counted_in_characters() {
        // 20 two-byte characters
        let text = "é".repeat(20);
        assert!(NewPcRequest::validate(1, Some("BASIC"), None, Some(text)).is_ok());
    }

    #[test]
    fn pending_accepts_either_decision() {
        assert_eq!(
            ConfirmationStatus::Pending.apply(1, Decision::Accepted),
            Ok(ConfirmationStatus::Accepted)
        );
        assert_eq!(
            ConfirmationStatus::Pending.apply(1, Decision::Rejected),
            Ok(ConfirmationStatus::Rejected)
        );
    }
}
