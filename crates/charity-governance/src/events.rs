//! Governance events handed to the hosting runtime.

use charity_types::{Address, Amount, BlockHeight, ProposalId};
use serde::Serialize;

/// Emitted once per successful state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    Donated {
        contributor: Address,
        amount: Amount,
        /// Contributor's cumulative total after this donation
        total_contributed: Amount,
    },
    ProposalCreated {
        proposal_id: ProposalId,
        beneficiary: Address,
        amount: Amount,
        end_height: BlockHeight,
    },
    VoteCast {
        proposal_id: ProposalId,
        voter: Address,
        weight: Amount,
        in_favor: bool,
    },
    ProposalExecuted {
        proposal_id: ProposalId,
        beneficiary: Address,
        amount: Amount,
        height: BlockHeight,
    },
}

impl GovernanceEvent {
    /// Proposal the event refers to, if any.
    pub fn proposal_id(&self) -> Option<ProposalId> {
        match self {
            GovernanceEvent::Donated { .. } => None,
            GovernanceEvent::ProposalCreated { proposal_id, .. }
            | GovernanceEvent::VoteCast { proposal_id, .. }
            | GovernanceEvent::ProposalExecuted { proposal_id, .. } => Some(*proposal_id),
        }
    }
}
