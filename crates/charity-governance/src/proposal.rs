//! Proposal lifecycle management.
//!
//! Proposals go through states: Voting -> Passed/Rejected -> Executed.
//! Passed and Rejected are derived from the tallies once the voting window
//! has closed; only execution is recorded on the proposal itself.

use std::collections::BTreeMap;

use charity_types::{Address, Amount, BlockHeight, ProposalId};
use serde::Serialize;

use crate::error::ProposalError;
use crate::treasury::Treasury;

/// Proposal status in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Voting window is open
    Voting,
    /// Window closed with a strict majority in favor, awaiting execution
    Passed,
    /// Window closed without a strict majority; permanently inert
    Rejected,
    /// Funds were disbursed
    Executed,
}

impl ProposalStatus {
    /// Check if votes are still accepted.
    pub fn can_vote(&self) -> bool {
        matches!(self, ProposalStatus::Voting)
    }

    /// Check if proposal can be executed.
    pub fn is_executable(&self) -> bool {
        matches!(self, ProposalStatus::Passed)
    }

    /// Check if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalStatus::Rejected | ProposalStatus::Executed)
    }
}

/// A request to disburse treasury funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// Submitting principal, when the caller identified one
    pub proposer: Option<Address>,
    pub beneficiary: Address,
    pub amount: Amount,
    pub description: String,
    pub votes_for: Amount,
    pub votes_against: Amount,
    pub is_active: bool,
    pub is_executed: bool,
    pub created_height: BlockHeight,
    /// Last height at which votes are accepted
    pub end_height: BlockHeight,
    pub executed_height: Option<BlockHeight>,
}

impl Proposal {
    /// Whether a vote at `height` falls inside the window.
    pub fn is_voting_open(&self, height: BlockHeight) -> bool {
        self.is_active && height <= self.end_height
    }

    /// Strict majority of weighted votes; a tie does not pass.
    pub fn has_majority(&self) -> bool {
        self.votes_for > self.votes_against
    }

    /// Get total votes cast.
    pub fn total_votes(&self) -> Amount {
        self.votes_for.saturating_add(self.votes_against)
    }

    /// Lifecycle status as observed at `height`.
    pub fn status(&self, height: BlockHeight) -> ProposalStatus {
        if self.is_executed {
            ProposalStatus::Executed
        } else if height <= self.end_height {
            ProposalStatus::Voting
        } else if self.has_majority() {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Rejected
        }
    }
}

/// Parameters of a new proposal.
#[derive(Debug, Clone)]
pub struct ProposalRequest {
    pub proposer: Option<Address>,
    pub beneficiary: Address,
    pub amount: Amount,
    pub description: String,
    pub duration_blocks: BlockHeight,
}

/// Proposal store holding every proposal ever created.
#[derive(Debug, Clone)]
pub struct ProposalStore {
    proposals: BTreeMap<ProposalId, Proposal>,
    next_id: ProposalId,
}

impl ProposalStore {
    /// Create an empty store; the first id handed out is 1.
    pub fn new() -> Self {
        Self {
            proposals: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a new proposal.
    ///
    /// The treasury check is a pre-check only: nothing is reserved, so the
    /// funds may be gone by the time the proposal is executed.
    pub fn create(
        &mut self,
        request: ProposalRequest,
        treasury: &Treasury,
        current_height: BlockHeight,
    ) -> Result<ProposalId, ProposalError> {
        let available = treasury.balance();
        if request.amount > available {
            return Err(ProposalError::InsufficientTreasuryFunds {
                requested: request.amount,
                available,
            });
        }

        // Windows past the last representable height stay open to the end
        let end_height = current_height.saturating_add(request.duration_blocks);

        let id = self.next_id;
        self.next_id += 1;

        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer: request.proposer,
                beneficiary: request.beneficiary,
                amount: request.amount,
                description: request.description,
                votes_for: 0,
                votes_against: 0,
                is_active: true,
                is_executed: false,
                created_height: current_height,
                end_height,
                executed_height: None,
            },
        );

        Ok(id)
    }

    /// Get a proposal.
    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    /// Add `weight` to one side of the tally.
    ///
    /// Window and duplicate checks are the caller's job.
    pub fn apply_vote(
        &mut self,
        id: ProposalId,
        weight: Amount,
        in_favor: bool,
    ) -> Result<(), ProposalError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(ProposalError::NotFound(id))?;

        let side = if in_favor {
            &mut proposal.votes_for
        } else {
            &mut proposal.votes_against
        };
        *side = side.checked_add(weight).ok_or(ProposalError::Overflow)?;

        Ok(())
    }

    /// Close the proposal as executed. Irreversible.
    pub fn mark_executed(
        &mut self,
        id: ProposalId,
        height: BlockHeight,
    ) -> Result<(), ProposalError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(ProposalError::NotFound(id))?;

        if proposal.is_executed {
            return Err(ProposalError::AlreadyExecuted(id));
        }

        proposal.is_active = false;
        proposal.is_executed = true;
        proposal.executed_height = Some(height);
        Ok(())
    }

    /// All proposals in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Id of the most recently created proposal, if any.
    pub fn last_id(&self) -> Option<ProposalId> {
        self.proposals.keys().next_back().copied()
    }

    /// Get proposals by status at `height`.
    pub fn by_status(&self, status: ProposalStatus, height: BlockHeight) -> Vec<&Proposal> {
        self.proposals
            .values()
            .filter(|p| p.status(height) == status)
            .collect()
    }
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new()
    }
}
