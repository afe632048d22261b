//! # Donation ledger
//!
//! The ledger is append-only: a donation is validated once, persisted once and
//! never edited. This module owns the two halves that need no storage:
//!
//! - turning raw submissions into a validated [`NewDonation`], and
//! - folding every recorded donation into a [`FundingSnapshot`].
//!
//! ## PC-equivalents
//!
//! Targeted gifts count fractionally (a 60% gift is 0.6 PC) while pooled money
//! only counts in whole basic-tier units. Both are accumulated in tenths of a
//! PC so that the totals stay exact integers until the final conversion.

use std::num::NonZeroU32;

use serde::Serialize;

use crate::catalog::DEFAULT_CURRENCY;
use crate::errors::{FundingError, Result};
use crate::types::{DonationKind, DonationStatus, PcTier};

/// Share of one unit covered by a partial targeted gift.
pub const PARTIAL_PERCENTAGE: i64 = 60;
/// Share of one unit covered by a full targeted gift.
pub const FULL_PERCENTAGE: i64 = 100;

/// Largest single pooled gift the ledger accepts.
pub const MAX_POOLED_AMOUNT: i64 = 1_000_000_000_000;

const TENTHS_PER_PC: u64 = 10;

/// Optional donor identity attached to any gift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contributor {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// A gift earmarked for 60% or 100% of one PC of a given tier, as submitted.
#[derive(Debug, Clone, Default)]
pub struct TargetedDonation {
    pub contributor: Contributor,
    pub tier: Option<String>,
    pub percentage: Option<i64>,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
}

/// An untargeted gift to the shared pool, as submitted.
#[derive(Debug, Clone, Default)]
pub struct PooledDonation {
    pub contributor: Contributor,
    pub amount: Option<i64>,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
}

/// A validated donation, ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub contributor: Contributor,
    pub amount: i64,
    pub currency: String,
    pub kind: DonationKind,
    pub tier: Option<PcTier>,
    pub percentage: Option<i64>,
    pub transaction_id: String,
    pub payment_method: Option<String>,
    pub status: DonationStatus,
}

/// `base_price * percentage / 100`, rounded half-up.
pub fn targeted_amount(tier: PcTier, percentage: i64) -> i64 {
    (tier.base_price() * percentage + 50) / 100
}

impl TargetedDonation {
    /// Validate the submission and price it from the tier catalog.
    ///
    /// Presence is checked before range, so a body missing several fields
    /// reports the first missing one.
    pub fn into_record(self) -> Result<NewDonation> {
        let tier = self.tier.ok_or(FundingError::MissingField("pcType"))?;
        let percentage = self
            .percentage
            .ok_or(FundingError::MissingField("percentage"))?;
        let transaction_id = required_transaction_id(self.transaction_id)?;

        let kind = match percentage {
            FULL_PERCENTAGE => DonationKind::TargetedFull,
            PARTIAL_PERCENTAGE => DonationKind::TargetedPartial,
            other => return Err(FundingError::InvalidPercentage(other)),
        };
        let tier: PcTier = tier.parse()?;

        Ok(NewDonation {
            contributor: self.contributor,
            amount: targeted_amount(tier, percentage),
            currency: currency_or_default(self.currency),
            kind,
            tier: Some(tier),
            percentage: Some(percentage),
            transaction_id,
            payment_method: self.payment_method,
            status: DonationStatus::Succeeded,
        })
    }
}

impl PooledDonation {
    /// Validate the submission. The caller chooses the amount, up to
    /// [`MAX_POOLED_AMOUNT`].
    pub fn into_record(self) -> Result<NewDonation> {
        let amount = self.amount.ok_or(FundingError::MissingField("amount"))?;
        let transaction_id = required_transaction_id(self.transaction_id)?;
        if amount <= 0 || amount > MAX_POOLED_AMOUNT {
            return Err(FundingError::InvalidAmount(amount));
        }

        Ok(NewDonation {
            contributor: self.contributor,
            amount,
            currency: currency_or_default(self.currency),
            kind: DonationKind::Pooled,
            tier: None,
            percentage: None,
            transaction_id,
            payment_method: self.payment_method,
            status: DonationStatus::Succeeded,
        })
    }
}

fn required_transaction_id(raw: Option<String>) -> Result<String> {
    match raw {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(FundingError::MissingField("transactionId")),
    }
}

fn currency_or_default(raw: Option<String>) -> String {
    raw.filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

// ─────────────────────────────────────────────────────────
// Funding snapshot
// ─────────────────────────────────────────────────────────

/// Number of PCs the programme aims to finance per year. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyTarget(NonZeroU32);

impl YearlyTarget {
    pub fn new(pcs: u32) -> Result<Self> {
        NonZeroU32::new(pcs)
            .map(Self)
            .ok_or(FundingError::ZeroYearlyTarget)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

/// The two facts about a recorded donation that the snapshot needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub kind: DonationKind,
    pub amount: i64,
}

impl LedgerEntry {
    fn targeted_tenths(&self) -> u64 {
        match self.kind {
            DonationKind::TargetedFull => TENTHS_PER_PC,
            DonationKind::TargetedPartial => (PARTIAL_PERCENTAGE as u64 * TENTHS_PER_PC) / 100,
            DonationKind::Pooled => 0,
        }
    }
}

/// Derived funding metrics. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSnapshot {
    pub total_raised: i64,
    pub total_pc_financed: f64,
    pub yearly_target: u32,
    pub progress_percentage: f64,
    #[serde(skip)]
    pub pc_from_targeted: f64,
    #[serde(skip)]
    pub pc_from_pooled: u64,
}

impl FundingSnapshot {
    /// Fold every recorded donation into the funding metrics.
    ///
    /// Pure: the same entries, target and price always give the same result.
    pub fn compute<'a, I>(entries: I, target: YearlyTarget, basic_price: i64) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        // Wide accumulators: the sum of valid rows may exceed i64.
        let mut total_raised: i128 = 0;
        let mut pooled_total: i128 = 0;
        let mut targeted_tenths: u128 = 0;

        for entry in entries {
            let amount = i128::from(entry.amount);
            total_raised += amount;
            if entry.kind.is_targeted() {
                targeted_tenths += u128::from(entry.targeted_tenths());
            } else {
                pooled_total += amount;
            }
        }

        // Whole PCs only: leftover pooled money earns no fractional credit.
        let pc_from_pooled: u128 = if basic_price > 0 && pooled_total > 0 {
            (pooled_total / i128::from(basic_price)).unsigned_abs()
        } else {
            0
        };

        let total_tenths = targeted_tenths + pc_from_pooled * u128::from(TENTHS_PER_PC);
        let target_pcs = u128::from(target.get());
        // progress in hundredths of a percent, rounded half-up:
        // tenths / 10 / target * 100 * 100 == tenths * 1000 / target
        let progress_hundredths = (total_tenths * 1000 * 2 + target_pcs) / (2 * target_pcs);

        Self {
            total_raised: i64::try_from(total_raised).unwrap_or(i64::MAX),
            total_pc_financed: total_tenths as f64 / TENTHS_PER_PC as f64,
            yearly_target: target.get(),
            progress_percentage: progress_hundredths as f64 / 100.0,
            pc_from_targeted: targeted_tenths as f64 / TENTHS_PER_PC as f64,
            pc_from_pooled: u64::try_from(pc_from_pooled).unwrap_or(u64::MAX),
        }
    }
}
