//! Domain error types.

use thiserror::Error;

use crate::types::{CandidateId, ConfirmationStatus, RequestId};

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed, missing or out-of-range input.
    Validation,
    /// The write would create a second row for a unique key.
    Duplicate,
    /// The referenced entity does not exist.
    NotFound,
    /// The request has already left `PENDING`.
    AlreadyProcessed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FundingError {
    #[error("invalid PC type: {0:?}")]
    InvalidTier(String),

    #[error("percentage must be 60 or 100, got {0}")]
    InvalidPercentage(i64),

    #[error("amount must be a positive integer, got {0}")]
    InvalidAmount(i64),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} is too short: {actual} characters, at least {min} required")]
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("status must be ACCEPTED or REJECTED, got {0:?}")]
    InvalidStatus(String),

    #[error("unrecognised {field}: {value:?}")]
    UnknownValue { field: &'static str, value: String },

    #[error("yearly target must be at least one PC")]
    ZeroYearlyTarget,

    #[error("candidate {0} already submitted a request")]
    DuplicateRequest(CandidateId),

    #[error("transaction {0:?} was already recorded")]
    DuplicateTransaction(String),

    #[error("request {0} not found")]
    NotFound(RequestId),

    #[error("request {id} already processed ({status})")]
    AlreadyProcessed {
        id: RequestId,
        status: ConfirmationStatus,
    },
}

impl FundingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateRequest(_) | Self::DuplicateTransaction(_) => ErrorKind::Duplicate,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyProcessed { .. } => ErrorKind::AlreadyProcessed,
            _ => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, FundingError>;
