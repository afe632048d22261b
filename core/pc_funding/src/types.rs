//! # Types
//!
//! Shared data structures used across the ledger and the request lifecycle.
//!
//! ## Design decisions
//!
//! ### Wire form
//!
//! Every enum here travels as an upper-case string (`"BASIC"`, `"PENDING"`,
//! ...) both over HTTP and in the database. [`as_str`](PcTier::as_str) and the
//! [`FromStr`] impls are the only conversions; the storage layer keeps plain
//! `TEXT` columns and parses them back through these.
//!
//! ### Confirmation status as a finite-state machine
//!
//! [`ConfirmationStatus`] enforces a one-shot lifecycle:
//!
//! ```text
//! Pending ──► Accepted
//!     └─────► Rejected
//! ```
//!
//! `Accepted` and `Rejected` are terminal. Transitions are checked by
//! `ConfirmationStatus::apply` in [`lifecycle`](crate::lifecycle).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FundingError;

/// Candidate identity as issued by the identity service.
pub type CandidateId = i64;

/// PC request identifier.
pub type RequestId = i64;

/// One of the three fixed laptop configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PcTier {
    Basic,
    Standard,
    Premium,
}

impl PcTier {
    pub const ALL: [PcTier; 3] = [PcTier::Basic, PcTier::Standard, PcTier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Standard => "STANDARD",
            Self::Premium => "PREMIUM",
        }
    }
}

impl FromStr for PcTier {
    type Err = FundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BASIC" => Ok(Self::Basic),
            "STANDARD" => Ok(Self::Standard),
            "PREMIUM" => Ok(Self::Premium),
            other => Err(FundingError::InvalidTier(other.to_string())),
        }
    }
}

impl fmt::Display for PcTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a donation contributes to the yearly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationKind {
    /// Untargeted money added to the shared balance.
    Pooled,
    /// 60% of one unit of a given tier.
    TargetedPartial,
    /// 100% of one unit of a given tier.
    TargetedFull,
}

impl DonationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pooled => "POOLED",
            Self::TargetedPartial => "TARGETED_PARTIAL",
            Self::TargetedFull => "TARGETED_FULL",
        }
    }

    pub fn is_targeted(&self) -> bool {
        !matches!(self, Self::Pooled)
    }
}

impl FromStr for DonationKind {
    type Err = FundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POOLED" => Ok(Self::Pooled),
            "TARGETED_PARTIAL" => Ok(Self::TargetedPartial),
            "TARGETED_FULL" => Ok(Self::TargetedFull),
            other => Err(FundingError::UnknownValue {
                field: "donation kind",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DonationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment outcome. Payments are simulated, so only success is ever recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    Succeeded,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "SUCCEEDED",
        }
    }
}

/// Lifecycle status of a PC request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Approved; terminal.
    Accepted,
    /// Declined; terminal.
    Rejected,
}

impl ConfirmationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for ConfirmationStatus {
    type Err = FundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(FundingError::UnknownValue {
                field: "confirmation status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The administrator's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        self.status().as_str()
    }

    /// The terminal status this decision moves a request into.
    pub fn status(&self) -> ConfirmationStatus {
        match self {
            Self::Accepted => ConfirmationStatus::Accepted,
            Self::Rejected => ConfirmationStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = FundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(FundingError::InvalidStatus(other.to_string())),
        }
    }
}
