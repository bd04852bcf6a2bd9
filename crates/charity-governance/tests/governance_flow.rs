//! End-to-end governance flows: donate, propose, vote, execute.

use charity_governance::{
    GovernanceConfig, GovernanceEngine, GovernanceError, GovernanceEvent, ProposalStatus,
    TransactionKind,
};
use charity_types::Address;

fn addr(n: u8) -> Address {
    Address::from_bytes([n; 20])
}

fn engine() -> GovernanceEngine {
    GovernanceEngine::new(GovernanceConfig::default()).unwrap()
}

#[test_log::test]
fn test_weighted_vote_passes_and_executes() {
    let (donor_a, donor_b, beneficiary) = (addr(1), addr(2), addr(9));
    let mut gov = engine();

    gov.donate(donor_a, 1_000).unwrap();
    gov.donate(donor_b, 500).unwrap();

    let id = gov.propose(beneficiary, 500, "desc", 100, 100).unwrap();
    assert_eq!(id, 1);
    assert_eq!(gov.proposal(id).unwrap().end_height, 200);

    gov.vote(donor_a, id, true, 150).unwrap();
    assert_eq!(gov.proposal(id).unwrap().votes_for, 1_000);
    gov.vote(donor_b, id, false, 150).unwrap();
    assert_eq!(gov.proposal(id).unwrap().votes_against, 500);

    gov.execute(id, 201).unwrap();
    assert_eq!(gov.treasury_balance(), 1_000);
    assert_eq!(gov.payments().balance(&beneficiary), 500);

    let proposal = gov.proposal(id).unwrap();
    assert!(proposal.is_executed);
    assert!(!proposal.is_active);
}

#[test_log::test]
fn test_proposal_exceeding_treasury_refused() {
    let mut gov = engine();
    gov.donate(addr(1), 1_000).unwrap();

    let err = gov.propose(addr(9), 1_500, "d", 100, 100).unwrap_err();
    assert_eq!(
        err,
        GovernanceError::InsufficientTreasuryFunds { requested: 1_500, available: 1_000 }
    );
    assert_eq!(gov.proposals().count(), 0);
}

#[test_log::test]
fn test_drained_treasury_fails_passed_proposal() {
    let mut gov = engine();
    gov.donate(addr(1), 1_000).unwrap();

    // Both fit the treasury when created; nothing is reserved.
    let first = gov.propose(addr(8), 800, "Food bank", 100, 100).unwrap();
    let second = gov.propose(addr(9), 700, "Shelter", 50, 100).unwrap();

    gov.vote(addr(1), first, true, 120).unwrap();
    gov.vote(addr(1), second, true, 120).unwrap();

    // Second window closes first and drains most of the treasury.
    gov.execute(second, 151).unwrap();
    assert_eq!(gov.treasury_balance(), 300);

    assert_eq!(gov.proposal_status(first, 201), Some(ProposalStatus::Passed));
    assert_eq!(
        gov.execute(first, 201),
        Err(GovernanceError::InsufficientTreasuryFunds { requested: 800, available: 300 })
    );
    assert!(!gov.proposal(first).unwrap().is_executed);
    assert_eq!(gov.treasury_balance(), 300);

    // A later donation makes the passed proposal executable again.
    gov.donate(addr(2), 500).unwrap();
    gov.execute(first, 300).unwrap();
    assert_eq!(gov.treasury_balance(), 0);
}

#[test_log::test]
fn test_both_proposals_fail_after_drain() {
    let mut gov = engine();
    gov.donate(addr(1), 1_000).unwrap();

    let drain = gov.propose(addr(7), 1_000, "Emergency relief", 10, 0).unwrap();
    let a = gov.propose(addr(8), 600, "Books", 20, 0).unwrap();
    let b = gov.propose(addr(9), 600, "Meals", 20, 0).unwrap();
    for id in [drain, a, b] {
        gov.vote(addr(1), id, true, 5).unwrap();
    }

    gov.execute(drain, 11).unwrap();
    for id in [a, b] {
        assert!(matches!(
            gov.execute(id, 21),
            Err(GovernanceError::InsufficientTreasuryFunds { .. })
        ));
    }
}

#[test_log::test]
fn test_execute_before_window_closes_regardless_of_tally() {
    let mut gov = engine();
    gov.donate(addr(1), 1_000).unwrap();
    let id = gov.propose(addr(9), 100, "Clinic", 100, 100).unwrap();
    gov.vote(addr(1), id, true, 100).unwrap();

    for height in [100, 150, 200] {
        assert_eq!(
            gov.execute(id, height),
            Err(GovernanceError::VotingStillOpen { proposal_id: id, end_height: 200 })
        );
    }
    gov.execute(id, 201).unwrap();
}

#[test_log::test]
fn test_tie_rejects_and_stays_inert() {
    let mut gov = engine();
    gov.donate(addr(1), 500).unwrap();
    gov.donate(addr(2), 500).unwrap();
    let id = gov.propose(addr(9), 100, "Library", 10, 0).unwrap();

    gov.vote(addr(1), id, true, 1).unwrap();
    gov.vote(addr(2), id, false, 1).unwrap();

    assert_eq!(
        gov.execute(id, 11),
        Err(GovernanceError::ProposalRejected { votes_for: 500, votes_against: 500 })
    );
    assert_eq!(gov.proposal_status(id, 11), Some(ProposalStatus::Rejected));
    assert_eq!(gov.vote(addr(3), id, true, 11), Err(GovernanceError::VotingClosed(id)));

    // Nothing changes however late it is tried
    gov.donate(addr(3), 10_000).unwrap();
    assert!(matches!(gov.execute(id, 10_000), Err(GovernanceError::ProposalRejected { .. })));
}

#[test_log::test]
fn test_unvoted_proposal_is_rejected() {
    let mut gov = engine();
    gov.donate(addr(1), 500).unwrap();
    let id = gov.propose(addr(9), 100, "Library", 10, 0).unwrap();

    assert_eq!(
        gov.execute(id, 11),
        Err(GovernanceError::ProposalRejected { votes_for: 0, votes_against: 0 })
    );
}

#[test_log::test]
fn test_double_vote_rejected() {
    let mut gov = engine();
    gov.donate(addr(1), 1_000).unwrap();
    let id = gov.propose(addr(9), 500, "Help children", 100, 100).unwrap();

    gov.vote(addr(1), id, true, 100).unwrap();
    for in_favor in [false, true] {
        assert_eq!(
            gov.vote(addr(1), id, in_favor, 110),
            Err(GovernanceError::DuplicateVote { proposal_id: id, voter: addr(1) })
        );
    }
    assert!(gov.has_voted(id, &addr(1)));
    assert_eq!(gov.votes_on(id).count(), 1);
}

#[test_log::test]
fn test_reads_do_not_mutate() {
    let mut gov = engine();
    gov.donate(addr(1), 1_000).unwrap();
    let id = gov.propose(addr(9), 500, "Help children", 100, 100).unwrap();
    gov.vote(addr(1), id, true, 100).unwrap();

    let before = gov.proposal(id).cloned();
    let stats = gov.stats();
    for _ in 0..5 {
        assert_eq!(gov.proposal(id).cloned(), before);
        let _ = gov.proposal_status(id, 500);
        let _ = gov.voting_power_of(&addr(1));
    }
    assert_eq!(gov.stats(), stats);
}

#[test_log::test]
fn test_audit_trail() {
    let mut gov = engine();
    gov.donate(addr(1), 1_000).unwrap();
    let id = gov.propose(addr(9), 250, "Blankets", 5, 10).unwrap();
    gov.vote(addr(1), id, true, 12).unwrap();
    gov.execute(id, 16).unwrap();

    let kinds: Vec<TransactionKind> = gov.treasury_transactions().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TransactionKind::Deposit, TransactionKind::Disbursement]);

    let events = gov.drain_events();
    assert_eq!(events.iter().filter(|e| e.proposal_id() == Some(id)).count(), 3);
    assert!(matches!(
        events.last(),
        Some(GovernanceEvent::ProposalExecuted { amount: 250, height: 16, .. })
    ));

    let json = serde_json::to_string(&events).unwrap();
    assert!(json.contains("\"type\":\"proposal_executed\""));
}
