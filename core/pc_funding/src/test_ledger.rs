use crate::invariants::{assert_all_donation_invariants, assert_snapshot_consistent};
use crate::{
    Contributor, DonationKind, FundingError, FundingSnapshot, LedgerEntry, PcTier,
    PooledDonation, TargetedDonation, YearlyTarget, BASIC_PC_PRICE,
};

fn targeted(tier: &str, percentage: i64) -> TargetedDonation {
    TargetedDonation {
        contributor: Contributor {
            full_name: Some("Awa Diop".into()),
            email: Some("awa@example.com".into()),
        },
        tier: Some(tier.into()),
        percentage: Some(percentage),
        transaction_id: Some(format!("tx-{tier}-{percentage}")),
        payment_method: Some("WAVE".into()),
        currency: None,
    }
}

fn pooled(amount: i64) -> PooledDonation {
    PooledDonation {
        amount: Some(amount),
        transaction_id: Some(format!("pool-{amount}")),
        ..Default::default()
    }
}

fn entry(kind: DonationKind, amount: i64) -> LedgerEntry {
    LedgerEntry { kind, amount }
}

fn target(pcs: u32) -> YearlyTarget {
    YearlyTarget::new(pcs).unwrap()
}

#[test]
fn test_targeted_amount_for_every_tier_and_percentage() {
    for tier in PcTier::ALL {
        for percentage in [60, 100] {
            let record = targeted(tier.as_str(), percentage).into_record().unwrap();
            assert_eq!(record.amount, tier.base_price() * percentage / 100);
            assert_all_donation_invariants(&record);
        }
    }
}

#[test]
fn test_percentage_selects_kind() {
    let full = targeted("STANDARD", 100).into_record().unwrap();
    assert_eq!(full.kind, DonationKind::TargetedFull);
    let partial = targeted("STANDARD", 60).into_record().unwrap();
    assert_eq!(partial.kind, DonationKind::TargetedPartial);
}

#[test]
fn test_other_percentages_are_rejected() {
    for percentage in [0, 1, 50, 59, 61, 99, 101, -60] {
        assert_eq!(
            targeted("BASIC", percentage).into_record(),
            Err(FundingError::InvalidPercentage(percentage))
        );
    }
}

#[test]
fn test_unknown_tier_is_rejected() {
    assert_eq!(
        targeted("ULTRA", 100).into_record(),
        Err(FundingError::InvalidTier("ULTRA".into()))
    );
}

#[test]
fn test_targeted_requires_transaction_id() {
    let mut donation = targeted("BASIC", 60);
    donation.transaction_id = None;
    assert_eq!(
        donation.into_record(),
        Err(FundingError::MissingField("transactionId"))
    );

    let mut blank = targeted("BASIC", 60);
    blank.transaction_id = Some("   ".into());
    assert_eq!(
        blank.into_record(),
        Err(FundingError::MissingField("transactionId"))
    );
}

#[test]
fn test_targeted_defaults_currency_and_keeps_contributor() {
    let record = targeted("PREMIUM", 100).into_record().unwrap();
    assert_eq!(record.currency, "XOF");
    assert_eq!(record.contributor.full_name.as_deref(), Some("Awa Diop"));
    assert_eq!(record.payment_method.as_deref(), Some("WAVE"));
}

#[test]
fn test_pooled_accepts_arbitrary_positive_amount() {
    let record = pooled(12_345).into_record().unwrap();
    assert_eq!(record.kind, DonationKind::Pooled);
    assert_eq!(record.amount, 12_345);
    assert_all_donation_invariants(&record);
}

#[test]
fn test_pooled_rejects_missing_or_non_positive_amount() {
    let missing = PooledDonation {
        transaction_id: Some("t".into()),
        ..Default::default()
    };
    assert_eq!(
        missing.into_record(),
        Err(FundingError::MissingField("amount"))
    );
    assert_eq!(pooled(0).into_record(), Err(FundingError::InvalidAmount(0)));
    assert_eq!(
        pooled(-500).into_record(),
        Err(FundingError::InvalidAmount(-500))
    );
}

#[test]
fn test_snapshot_reference_scenario() {
    let entries = vec![
        entry(DonationKind::TargetedFull, PcTier::Basic.base_price()),
        entry(DonationKind::TargetedPartial, PcTier::Standard.base_price() * 60 / 100),
        entry(DonationKind::Pooled, 300_000),
    ];
    let snapshot = FundingSnapshot::compute(&entries, target(1000), BASIC_PC_PRICE);

    assert_eq!(snapshot.pc_from_targeted, 1.6);
    assert_eq!(snapshot.pc_from_pooled, 2);
    assert_eq!(snapshot.total_pc_financed, 3.6);
    assert_eq!(snapshot.total_raised, 150_000 + 150_000 + 300_000);
    assert_eq!(snapshot.progress_percentage, 0.36);
    assert_snapshot_consistent(&snapshot, &entries);
}

#[test]
fn test_pooled_remainder_earns_no_fraction() {
    let entries = vec![
        entry(DonationKind::Pooled, 100_000),
        entry(DonationKind::Pooled, 100_000),
    ];
    let snapshot = FundingSnapshot::compute(&entries, target(10), BASIC_PC_PRICE);
    assert_eq!(snapshot.pc_from_pooled, 1);
    assert_eq!(snapshot.total_pc_financed, 1.0);
    assert_eq!(snapshot.progress_percentage, 10.0);
}

#[test]
fn test_many_partials_do_not_drift() {
    let entries = vec![entry(DonationKind::TargetedPartial, 90_000); 3];
    let snapshot = FundingSnapshot::compute(&entries, target(1000), BASIC_PC_PRICE);
    assert_eq!(snapshot.total_pc_financed, 1.8);
}

#[test]
fn test_progress_rounds_half_up_to_two_decimals() {
    // 1 PC of 3 → 33.333…%
    let one = vec![entry(DonationKind::TargetedFull, 150_000)];
    let snapshot = FundingSnapshot::compute(&one, target(3), BASIC_PC_PRICE);
    assert_eq!(snapshot.progress_percentage, 33.33);

    // 2 PCs of 3 → 66.666…%
    let two = vec![entry(DonationKind::TargetedFull, 150_000); 2];
    let snapshot = FundingSnapshot::compute(&two, target(3), BASIC_PC_PRICE);
    assert_eq!(snapshot.progress_percentage, 66.67);
}

#[test]
fn test_progress_may_exceed_one_hundred() {
    let entries = vec![entry(DonationKind::TargetedFull, 150_000); 3];
    let snapshot = FundingSnapshot::compute(&entries, target(2), BASIC_PC_PRICE);
    assert_eq!(snapshot.progress_percentage, 150.0);
}

#[test]
fn test_snapshot_is_idempotent() {
    let entries = vec![
        entry(DonationKind::TargetedPartial, 210_000),
        entry(DonationKind::Pooled, 475_000),
    ];
    let first = FundingSnapshot::compute(&entries, target(1000), BASIC_PC_PRICE);
    let second = FundingSnapshot::compute(&entries, target(1000), BASIC_PC_PRICE);
    assert_eq!(first, second);
}
