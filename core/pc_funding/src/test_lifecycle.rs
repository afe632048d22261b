use crate::invariants::assert_valid_status_transition;
use crate::{ConfirmationStatus, Decision, FundingError, NewPcRequest, MIN_FUTURE_PROJECT_LEN};

fn submit(future_project: &str) -> Result<NewPcRequest, FundingError> {
    NewPcRequest::validate(
        7,
        Some("STANDARD"),
        Some("I study computer science".into()),
        Some(future_project.into()),
    )
}

#[test]
fn test_future_project_boundary() {
    let nineteen = "a".repeat(MIN_FUTURE_PROJECT_LEN - 1);
    assert_eq!(
        submit(&nineteen),
        Err(FundingError::TooShort {
            field: "futureProject",
            min: 20,
            actual: 19
        })
    );

    let twenty = "a".repeat(MIN_FUTURE_PROJECT_LEN);
    let request = submit(&twenty).unwrap();
    assert_eq!(request.future_project.len(), 20);
}

#[test]
fn test_valid_submission_keeps_fields() {
    let request = submit("Build a mobile clinic booking app").unwrap();
    assert_eq!(request.candidate_id, 7);
    assert_eq!(request.tier.as_str(), "STANDARD");
    assert_eq!(
        request.justification.as_deref(),
        Some("I study computer science")
    );
}

#[test]
fn test_every_decision_from_pending_is_valid() {
    for decision in [Decision::Accepted, Decision::Rejected] {
        let next = ConfirmationStatus::Pending.apply(1, decision).unwrap();
        assert_valid_status_transition(&ConfirmationStatus::Pending, &next);
        assert!(next.is_terminal());
    }
}

#[test]
fn test_terminal_states_reject_every_decision() {
    for status in [ConfirmationStatus::Accepted, ConfirmationStatus::Rejected] {
        for decision in [Decision::Accepted, Decision::Rejected] {
            assert_eq!(
                status.apply(3, decision),
                Err(FundingError::AlreadyProcessed { id: 3, status })
            );
        }
    }
}

#[test]
fn test_second_decision_leaves_first_in_place() {
    let status = ConfirmationStatus::Pending
        .apply(5, Decision::Accepted)
        .unwrap();
    assert!(status.apply(5, Decision::Rejected).is_err());
    assert_eq!(status, ConfirmationStatus::Accepted);
}
