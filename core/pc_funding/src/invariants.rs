#![allow(dead_code)]

use crate::catalog::BASIC_PC_PRICE;
use crate::ledger::{FundingSnapshot, LedgerEntry, NewDonation, FULL_PERCENTAGE, PARTIAL_PERCENTAGE};
use crate::types::{ConfirmationStatus, DonationKind, DonationStatus};

/// INV-1: A targeted donation costs exactly its share of the tier price.
pub fn assert_targeted_amount_matches_tier(donation: &NewDonation) {
    let (Some(tier), Some(percentage)) = (donation.tier, donation.percentage) else {
        panic!(
            "INV-1 violated: targeted donation {} is missing tier or percentage",
            donation.transaction_id
        );
    };
    assert_eq!(
        donation.amount,
        tier.base_price() * percentage / 100,
        "INV-1 violated: {} at {}% priced at {}",
        tier,
        percentage,
        donation.amount
    );
}

/// INV-2: Tier and percentage are present iff the donation is targeted, and
/// the kind agrees with the percentage.
pub fn assert_kind_consistent(donation: &NewDonation) {
    match donation.kind {
        DonationKind::Pooled => {
            assert!(
                donation.tier.is_none() && donation.percentage.is_none(),
                "INV-2 violated: pooled donation carries a target"
            );
        }
        DonationKind::TargetedFull => {
            assert_eq!(donation.percentage, Some(FULL_PERCENTAGE), "INV-2 violated");
            assert_targeted_amount_matches_tier(donation);
        }
        DonationKind::TargetedPartial => {
            assert_eq!(donation.percentage, Some(PARTIAL_PERCENTAGE), "INV-2 violated");
            assert_targeted_amount_matches_tier(donation);
        }
    }
}

/// INV-3: Every recorded donation has a positive amount and succeeded.
pub fn assert_recordable(donation: &NewDonation) {
    assert!(
        donation.amount > 0,
        "INV-3 violated: non-positive amount {}",
        donation.amount
    );
    assert_eq!(donation.status, DonationStatus::Succeeded, "INV-3 violated");
    assert!(!donation.transaction_id.trim().is_empty(), "INV-3 violated");
}

/// INV-4: The financed total is the targeted part plus the pooled part, and
/// total raised is the plain sum of amounts.
pub fn assert_snapshot_consistent(snapshot: &FundingSnapshot, entries: &[LedgerEntry]) {
    let raised: i64 = entries.iter().map(|e| e.amount).sum();
    assert_eq!(snapshot.total_raised, raised, "INV-4 violated: total raised");

    let pooled: i64 = entries
        .iter()
        .filter(|e| e.kind == DonationKind::Pooled)
        .map(|e| e.amount)
        .sum();
    assert_eq!(
        snapshot.pc_from_pooled,
        (pooled / BASIC_PC_PRICE) as u64,
        "INV-4 violated: pooled PCs"
    );

    let recombined = snapshot.pc_from_targeted + snapshot.pc_from_pooled as f64;
    assert!(
        (snapshot.total_pc_financed - recombined).abs() < 1e-9,
        "INV-4 violated: {} != {}",
        snapshot.total_pc_financed,
        recombined
    );
}

/// INV-5: Status only moves forward out of PENDING.
pub fn assert_valid_status_transition(from: &ConfirmationStatus, to: &ConfirmationStatus) {
    let valid = matches!(
        (from, to),
        (ConfirmationStatus::Pending, ConfirmationStatus::Accepted)
            | (ConfirmationStatus::Pending, ConfirmationStatus::Rejected)
    );

    assert!(
        valid,
        "INV-5 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// Run all stateless donation invariants.
pub fn assert_all_donation_invariants(donation: &NewDonation) {
    assert_recordable(donation);
    assert_kind_consistent(donation);
}
