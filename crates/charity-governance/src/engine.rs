//! Governance engine: orchestrates donate -> propose -> vote -> execute.
//!
//! The engine owns every piece of governance state. Each operation validates
//! fully before it mutates, so a returned error means nothing changed.

use charity_types::{Address, Amount, BlockHeight, ProposalId};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::GovernanceConfig;
use crate::contribution::{ContributionRegistry, Contributor};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::proposal::{Proposal, ProposalRequest, ProposalStatus, ProposalStore};
use crate::transfer::{AccountLedger, PaymentTransfer};
use crate::treasury::{Treasury, TreasuryTransaction};
use crate::voting::{Vote, VoteLedger};

/// Point-in-time governance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GovernanceStats {
    pub balance: Amount,
    pub total_donated: Amount,
    pub total_disbursed: Amount,
    pub contributors: usize,
    pub proposals: usize,
    pub executed_proposals: usize,
    pub votes: usize,
}

/// Treasury governance engine.
#[derive(Debug)]
pub struct GovernanceEngine<P = AccountLedger> {
    config: GovernanceConfig,
    treasury: Treasury,
    contributions: ContributionRegistry,
    proposals: ProposalStore,
    votes: VoteLedger,
    payments: P,
    events: Vec<GovernanceEvent>,
    /// Highest height any operation has reported
    last_seen_height: BlockHeight,
}

impl GovernanceEngine<AccountLedger> {
    /// Create an engine paying out into an in-memory account ledger.
    pub fn new(config: GovernanceConfig) -> Result<Self, GovernanceError> {
        Self::with_payments(config, AccountLedger::new())
    }
}

impl<P: PaymentTransfer> GovernanceEngine<P> {
    /// Create an engine using `payments` to deliver executed disbursements.
    pub fn with_payments(config: GovernanceConfig, payments: P) -> Result<Self, GovernanceError> {
        config.validate()?;

        Ok(Self {
            config,
            treasury: Treasury::new(),
            contributions: ContributionRegistry::new(),
            proposals: ProposalStore::new(),
            votes: VoteLedger::new(),
            payments,
            events: Vec::new(),
            last_seen_height: 0,
        })
    }

    /// Donate `amount` to the treasury, growing the contributor's voting power.
    pub fn donate(&mut self, contributor: Address, amount: Amount) -> Result<(), GovernanceError> {
        let floor = self.config.donation_floor();
        if amount < floor {
            return Err(GovernanceError::InvalidAmount(format!(
                "donation {} is below the minimum of {}",
                amount, floor
            )));
        }

        let record = self.contributions.record_contribution(
            contributor,
            amount,
            &mut self.treasury,
            self.last_seen_height,
        )?;
        let total_contributed = record.total_contributed;

        info!(
            contributor = %contributor,
            amount,
            total_contributed,
            balance = self.treasury.balance(),
            "Donation received"
        );
        self.events.push(GovernanceEvent::Donated {
            contributor,
            amount,
            total_contributed,
        });

        Ok(())
    }

    /// Request `amount` for `beneficiary`, open for votes for `duration_blocks`.
    pub fn propose(
        &mut self,
        beneficiary: Address,
        amount: Amount,
        description: impl Into<String>,
        duration_blocks: BlockHeight,
        current_height: BlockHeight,
    ) -> Result<ProposalId, GovernanceError> {
        self.submit(
            ProposalRequest {
                proposer: None,
                beneficiary,
                amount,
                description: description.into(),
                duration_blocks,
            },
            current_height,
        )
    }

    /// Same as [`propose`](Self::propose), recording who submitted it.
    pub fn propose_from(
        &mut self,
        proposer: Address,
        beneficiary: Address,
        amount: Amount,
        description: impl Into<String>,
        duration_blocks: BlockHeight,
        current_height: BlockHeight,
    ) -> Result<ProposalId, GovernanceError> {
        self.submit(
            ProposalRequest {
                proposer: Some(proposer),
                beneficiary,
                amount,
                description: description.into(),
                duration_blocks,
            },
            current_height,
        )
    }

    /// Validate and store a proposal request.
    pub fn submit(
        &mut self,
        request: ProposalRequest,
        current_height: BlockHeight,
    ) -> Result<ProposalId, GovernanceError> {
        self.validate_request(&request)?;

        let beneficiary = request.beneficiary;
        let amount = request.amount;
        let id = self
            .proposals
            .create(request, &self.treasury, current_height)
            .map_err(|e| {
                debug!(amount, balance = self.treasury.balance(), error = %e, "Proposal refused");
                e
            })?;
        self.observe_height(current_height);

        let end_height = self
            .proposals
            .get(id)
            .map(|p| p.end_height)
            .unwrap_or(current_height);

        info!(proposal_id = id, beneficiary = %beneficiary, amount, end_height, "Proposal created");
        self.events.push(GovernanceEvent::ProposalCreated {
            proposal_id: id,
            beneficiary,
            amount,
            end_height,
        });

        Ok(id)
    }

    fn validate_request(&self, request: &ProposalRequest) -> Result<(), GovernanceError> {
        let config = &self.config;

        if config.reject_zero_amount && request.amount == 0 {
            return Err(GovernanceError::InvalidProposal(
                "requested amount cannot be 0".to_string(),
            ));
        }

        if config.require_description && request.description.trim().is_empty() {
            return Err(GovernanceError::InvalidProposal(
                "description cannot be empty".to_string(),
            ));
        }

        if !config.allows_description_len(request.description.len()) {
            return Err(GovernanceError::InvalidProposal(format!(
                "description is {} bytes, over the configured limit",
                request.description.len()
            )));
        }

        if !config.allows_duration(request.duration_blocks) {
            return Err(GovernanceError::InvalidProposal(format!(
                "voting duration {} outside configured bounds",
                request.duration_blocks
            )));
        }

        Ok(())
    }

    /// Cast `voter`'s full current voting power on a proposal.
    ///
    /// # Errors
    /// Checked in order: `ProposalNotFound`, `VotingClosed`, `NoVotingPower`,
    /// `DuplicateVote`.
    pub fn vote(
        &mut self,
        voter: Address,
        proposal_id: ProposalId,
        in_favor: bool,
        current_height: BlockHeight,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get(proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;

        if !proposal.is_voting_open(current_height) {
            return Err(GovernanceError::VotingClosed(proposal_id));
        }

        // Snapshot at vote time; later donations do not change this vote.
        let weight = self.contributions.voting_power_of(&voter);
        if weight == 0 {
            return Err(GovernanceError::NoVotingPower(voter));
        }

        self.votes
            .cast_vote(proposal_id, voter, weight, in_favor, current_height)?;
        if let Err(e) = self.proposals.apply_vote(proposal_id, weight, in_favor) {
            self.votes.retract(proposal_id, voter);
            return Err(e.into());
        }
        self.observe_height(current_height);

        debug!(proposal_id, voter = %voter, weight, in_favor, "Vote cast");
        self.events.push(GovernanceEvent::VoteCast {
            proposal_id,
            voter,
            weight,
            in_favor,
        });

        Ok(())
    }

    /// Disburse a passed proposal's funds once its window has closed.
    ///
    /// # Errors
    /// Checked in order: `ProposalNotFound`, `AlreadyExecuted`,
    /// `VotingStillOpen`, `ProposalRejected`, `InsufficientTreasuryFunds`,
    /// then `Transfer` if the payment collaborator refuses.
    pub fn execute(
        &mut self,
        proposal_id: ProposalId,
        current_height: BlockHeight,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get(proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;

        if proposal.is_executed {
            return Err(GovernanceError::AlreadyExecuted(proposal_id));
        }

        if current_height <= proposal.end_height {
            return Err(GovernanceError::VotingStillOpen {
                proposal_id,
                end_height: proposal.end_height,
            });
        }

        if !proposal.has_majority() {
            warn!(
                proposal_id,
                votes_for = proposal.votes_for,
                votes_against = proposal.votes_against,
                "Execution refused: no majority"
            );
            return Err(GovernanceError::ProposalRejected {
                votes_for: proposal.votes_for,
                votes_against: proposal.votes_against,
            });
        }

        let (beneficiary, amount) = (proposal.beneficiary, proposal.amount);
        let available = self.treasury.balance();
        if available < amount {
            warn!(proposal_id, amount, available, "Execution refused: treasury drained");
            return Err(GovernanceError::InsufficientTreasuryFunds {
                requested: amount,
                available,
            });
        }

        self.treasury.debit(amount, beneficiary, current_height)?;
        if let Err(e) = self
            .payments
            .transfer(&self.config.treasury_address, &beneficiary, amount)
        {
            let reverted = self.treasury.revert_debit(amount, &beneficiary);
            if !reverted {
                error!(proposal_id, amount, "Failed payout left treasury debit in place");
            }
            debug_assert!(reverted, "debit of proposal {proposal_id} not revertible");
            warn!(proposal_id, beneficiary = %beneficiary, amount, error = %e, "Payout failed");
            return Err(e.into());
        }
        // Cannot fail: existence and execution state were checked above.
        self.proposals.mark_executed(proposal_id, current_height)?;
        self.observe_height(current_height);

        info!(
            proposal_id,
            beneficiary = %beneficiary,
            amount,
            balance = self.treasury.balance(),
            "Proposal executed"
        );
        self.events.push(GovernanceEvent::ProposalExecuted {
            proposal_id,
            beneficiary,
            amount,
            height: current_height,
        });

        Ok(())
    }

    fn observe_height(&mut self, height: BlockHeight) {
        self.last_seen_height = self.last_seen_height.max(height);
    }

    // Reads

    pub fn proposal(&self, proposal_id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(proposal_id)
    }

    pub fn proposal_status(
        &self,
        proposal_id: ProposalId,
        current_height: BlockHeight,
    ) -> Option<ProposalStatus> {
        self.proposals.get(proposal_id).map(|p| p.status(current_height))
    }

    /// All proposals in id order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    pub fn proposals_by_status(
        &self,
        status: ProposalStatus,
        current_height: BlockHeight,
    ) -> Vec<&Proposal> {
        self.proposals.by_status(status, current_height)
    }

    pub fn has_voted(&self, proposal_id: ProposalId, voter: &Address) -> bool {
        self.votes.has_voted(proposal_id, voter)
    }

    pub fn vote_of(&self, proposal_id: ProposalId, voter: &Address) -> Option<&Vote> {
        self.votes.get(proposal_id, voter)
    }

    pub fn votes_on(&self, proposal_id: ProposalId) -> impl Iterator<Item = (&Address, &Vote)> {
        self.votes.votes_on(proposal_id)
    }

    pub fn voting_power_of(&self, contributor: &Address) -> Amount {
        self.contributions.voting_power_of(contributor)
    }

    pub fn contributor(&self, address: &Address) -> Option<&Contributor> {
        self.contributions.get(address)
    }

    pub fn contributors(&self) -> impl Iterator<Item = &Contributor> {
        self.contributions.iter()
    }

    pub fn treasury_balance(&self) -> Amount {
        self.treasury.balance()
    }

    pub fn treasury_transactions(&self) -> &[TreasuryTransaction] {
        self.treasury.transactions()
    }

    pub fn stats(&self) -> GovernanceStats {
        GovernanceStats {
            balance: self.treasury.balance(),
            total_donated: self.treasury.total_deposited(),
            total_disbursed: self.treasury.total_disbursed(),
            contributors: self.contributions.len(),
            proposals: self.proposals.len(),
            executed_proposals: self.proposals.iter().filter(|p| p.is_executed).count(),
            votes: self.votes.len(),
        }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn payments(&self) -> &P {
        &self.payments
    }

    pub fn payments_mut(&mut self) -> &mut P {
        &mut self.payments
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[GovernanceEvent] {
        &self.events
    }

    /// Hand recorded events to the caller and clear the buffer.
    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.events)
    }
}
