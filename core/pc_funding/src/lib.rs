//! # PC Funding
//!
//! Business rules of the laptop-funding programme: donors finance PCs for
//! graduates, candidates ask for one, administrators decide.
//!
//! | Concern        | Entry point(s)                                            |
//! |----------------|-----------------------------------------------------------|
//! | Catalog        | [`PcTier::base_price`], [`BASIC_PC_PRICE`]                |
//! | Donations      | [`TargetedDonation::into_record`], [`PooledDonation::into_record`] |
//! | Reporting      | [`FundingSnapshot::compute`]                              |
//! | Requests       | [`NewPcRequest::validate`]                                |
//! | Decisions      | [`ConfirmationStatus::apply`]                             |
//!
//! ## Architecture
//!
//! Everything here is synchronous and storage-free. The service crate owns
//! persistence and is responsible for executing the uniqueness check and the
//! `PENDING` guard atomically; this crate only says what is admissible.

mod catalog;
mod errors;
mod ledger;
mod lifecycle;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_ledger;
#[cfg(test)]
mod test_lifecycle;

pub use catalog::{BASIC_PC_PRICE, DEFAULT_CURRENCY, PREMIUM_PC_PRICE, STANDARD_PC_PRICE};
pub use errors::{ErrorKind, FundingError, Result};
pub use ledger::{
    targeted_amount, Contributor, FundingSnapshot, LedgerEntry, NewDonation, PooledDonation,
    TargetedDonation, YearlyTarget, FULL_PERCENTAGE, MAX_POOLED_AMOUNT, PARTIAL_PERCENTAGE,
};
pub use lifecycle::{NewPcRequest, MIN_FUTURE_PROJECT_LEN};
pub use types::{
    CandidateId, ConfirmationStatus, Decision, DonationKind, DonationStatus, PcTier, RequestId,
};
