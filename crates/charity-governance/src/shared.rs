//! Thread-safe governance handle.
//!
//! One `RwLock` guards the whole engine. Every mutating call holds the write
//! lock from its first check to its last write, so concurrent submissions
//! are applied one at a time. Reads share the lock and see a consistent
//! snapshot.

use std::sync::Arc;

use charity_types::{Address, Amount, BlockHeight, ProposalId};
use parking_lot::RwLock;

use crate::engine::{GovernanceEngine, GovernanceStats};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::proposal::{Proposal, ProposalStatus};
use crate::transfer::{AccountLedger, PaymentTransfer};

/// Cloneable handle to a shared [`GovernanceEngine`].
#[derive(Debug)]
pub struct SharedGovernance<P = AccountLedger> {
    inner: Arc<RwLock<GovernanceEngine<P>>>,
}

impl<P> Clone for SharedGovernance<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: PaymentTransfer> SharedGovernance<P> {
    pub fn new(engine: GovernanceEngine<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn donate(&self, contributor: Address, amount: Amount) -> Result<(), GovernanceError> {
        self.inner.write().donate(contributor, amount)
    }

    pub fn propose(
        &self,
        beneficiary: Address,
        amount: Amount,
        description: impl Into<String>,
        duration_blocks: BlockHeight,
        current_height: BlockHeight,
    ) -> Result<ProposalId, GovernanceError> {
        self.inner
            .write()
            .propose(beneficiary, amount, description, duration_blocks, current_height)
    }

    pub fn propose_from(
        &self,
        proposer: Address,
        beneficiary: Address,
        amount: Amount,
        description: impl Into<String>,
        duration_blocks: BlockHeight,
        current_height: BlockHeight,
    ) -> Result<ProposalId, GovernanceError> {
        self.inner.write().propose_from(
            proposer,
            beneficiary,
            amount,
            description,
            duration_blocks,
            current_height,
        )
    }

    pub fn vote(
        &self,
        voter: Address,
        proposal_id: ProposalId,
        in_favor: bool,
        current_height: BlockHeight,
    ) -> Result<(), GovernanceError> {
        self.inner
            .write()
            .vote(voter, proposal_id, in_favor, current_height)
    }

    pub fn execute(
        &self,
        proposal_id: ProposalId,
        current_height: BlockHeight,
    ) -> Result<(), GovernanceError> {
        self.inner.write().execute(proposal_id, current_height)
    }

    /// Owned copy of a proposal.
    pub fn proposal(&self, proposal_id: ProposalId) -> Option<Proposal> {
        self.inner.read().proposal(proposal_id).cloned()
    }

    pub fn proposal_status(
        &self,
        proposal_id: ProposalId,
        current_height: BlockHeight,
    ) -> Option<ProposalStatus> {
        self.inner.read().proposal_status(proposal_id, current_height)
    }

    pub fn has_voted(&self, proposal_id: ProposalId, voter: &Address) -> bool {
        self.inner.read().has_voted(proposal_id, voter)
    }

    pub fn voting_power_of(&self, contributor: &Address) -> Amount {
        self.inner.read().voting_power_of(contributor)
    }

    pub fn treasury_balance(&self) -> Amount {
        self.inner.read().treasury_balance()
    }

    pub fn stats(&self) -> GovernanceStats {
        self.inner.read().stats()
    }

    pub fn drain_events(&self) -> Vec<GovernanceEvent> {
        self.inner.write().drain_events()
    }

    /// Run `f` against a read-locked engine.
    pub fn read<R>(&self, f: impl FnOnce(&GovernanceEngine<P>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` against a write-locked engine. The lock is held for all of `f`.
    pub fn write<R>(&self, f: impl FnOnce(&mut GovernanceEngine<P>) -> R) -> R {
        f(&mut self.inner.write())
    }
}
