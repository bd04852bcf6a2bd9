//! Vote ledger.
//!
//! One write-once vote per (proposal, voter). Votes are kept in an ordered
//! map keyed by proposal first, so all votes on a proposal form one range.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use charity_types::{Address, Amount, BlockHeight, ProposalId};
use serde::Serialize;

use crate::error::VoteError;

const ADDRESS_MAX: Address = Address::from_bytes([0xff; 20]);

/// Composite vote identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VoteKey(pub ProposalId, pub Address);

/// A cast vote. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Vote {
    /// Voter's power at the time the vote was cast
    pub weight: Amount,
    pub in_favor: bool,
    pub cast_height: BlockHeight,
}

#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    votes: BTreeMap<VoteKey, Vote>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote unless the voter already voted on this proposal.
    pub fn cast_vote(
        &mut self,
        proposal_id: ProposalId,
        voter: Address,
        weight: Amount,
        in_favor: bool,
        height: BlockHeight,
    ) -> Result<(), VoteError> {
        match self.votes.entry(VoteKey(proposal_id, voter)) {
            Entry::Occupied(_) => Err(VoteError::DuplicateVote { proposal_id, voter }),
            Entry::Vacant(slot) => {
                slot.insert(Vote {
                    weight,
                    in_favor,
                    cast_height: height,
                });
                Ok(())
            }
        }
    }

    /// Drop a vote whose tally update could not be applied.
    pub(crate) fn retract(&mut self, proposal_id: ProposalId, voter: Address) {
        self.votes.remove(&VoteKey(proposal_id, voter));
    }

    pub fn has_voted(&self, proposal_id: ProposalId, voter: &Address) -> bool {
        self.votes.contains_key(&VoteKey(proposal_id, *voter))
    }

    pub fn get(&self, proposal_id: ProposalId, voter: &Address) -> Option<&Vote> {
        self.votes.get(&VoteKey(proposal_id, *voter))
    }

    /// Votes on one proposal, ordered by voter address.
    pub fn votes_on(&self, proposal_id: ProposalId) -> impl Iterator<Item = (&Address, &Vote)> {
        self.votes
            .range(VoteKey(proposal_id, Address::ZERO)..=VoteKey(proposal_id, ADDRESS_MAX))
            .map(|(VoteKey(_, voter), vote)| (voter, vote))
    }

    /// Weighted (for, against) totals recomputed from the recorded votes.
    pub fn tally(&self, proposal_id: ProposalId) -> (Amount, Amount) {
        self.votes_on(proposal_id)
            .fold((0, 0), |(yes, no), (_, vote)| {
                if vote.in_favor {
                    (yes.saturating_add(vote.weight), no)
                } else {
                    (yes, no.saturating_add(vote.weight))
                }
            })
    }

    /// Total number of votes across all proposals.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn test_cast_vote() {
        let mut ledger = VoteLedger::new();
        ledger.cast_vote(1, voter(1), 1_000, true, 150).unwrap();

        assert!(ledger.has_voted(1, &voter(1)));
        assert!(!ledger.has_voted(2, &voter(1)));
        assert!(!ledger.has_voted(1, &voter(2)));

        let vote = ledger.get(1, &voter(1)).unwrap();
        assert_eq!(vote.weight, 1_000);
        assert!(vote.in_favor);
        assert_eq!(vote.cast_height, 150);
    }

    #[test]
    fn test_duplicate_vote_rejected() {
        let mut ledger = VoteLedger::new();
        ledger.cast_vote(1, voter(1), 1_000, true, 150).unwrap();

        let err = ledger.cast_vote(1, voter(1), 1_000, false, 151).unwrap_err();
        assert_eq!(err, VoteError::DuplicateVote { proposal_id: 1, voter: voter(1) });

        // Original vote untouched
        let vote = ledger.get(1, &voter(1)).unwrap();
        assert!(vote.in_favor);
        assert_eq!(vote.cast_height, 150);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_same_voter_different_proposals() {
        let mut ledger = VoteLedger::new();
        ledger.cast_vote(1, voter(1), 10, true, 0).unwrap();
        ledger.cast_vote(2, voter(1), 10, false, 0).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_votes_on_is_scoped_to_proposal() {
        let mut ledger = VoteLedger::new();
        ledger.cast_vote(1, voter(3), 30, true, 0).unwrap();
        ledger.cast_vote(1, voter(0xff), 10, false, 0).unwrap();
        ledger.cast_vote(2, voter(1), 99, true, 0).unwrap();
        ledger.cast_vote(1, Address::ZERO, 5, true, 0).unwrap();

        let voters: Vec<Address> = ledger.votes_on(1).map(|(v, _)| *v).collect();
        assert_eq!(voters, vec![Address::ZERO, voter(3), voter(0xff)]);
        assert_eq!(ledger.votes_on(3).count(), 0);
    }

    #[test]
    fn test_tally() {
        let mut ledger = VoteLedger::new();
        ledger.cast_vote(1, voter(1), 1_000, true, 0).unwrap();
        ledger.cast_vote(1, voter(2), 500, false, 0).unwrap();
        ledger.cast_vote(1, voter(3), 200, true, 0).unwrap();

        assert_eq!(ledger.tally(1), (1_200, 500));
        assert_eq!(ledger.tally(2), (0, 0));
    }

    #[test]
    fn test_retract() {
        let mut ledger = VoteLedger::new();
        ledger.cast_vote(1, voter(1), 10, true, 0).unwrap();
        ledger.retract(1, voter(1));
        assert!(!ledger.has_voted(1, &voter(1)));
        assert!(ledger.is_empty());
    }
}
