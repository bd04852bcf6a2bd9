use charity_types::{Address, Amount, BlockHeight, ProposalId};
use thiserror::Error;

/// Errors raised by the treasury balance tracker.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreasuryError {
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("Treasury balance overflow")]
    Overflow,
}

/// Errors raised by the proposal store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProposalError {
    #[error("Insufficient treasury funds: requested {requested}, available {available}")]
    InsufficientTreasuryFunds { requested: Amount, available: Amount },

    #[error("Proposal not found: {0}")]
    NotFound(ProposalId),

    #[error("Proposal {0} already executed")]
    AlreadyExecuted(ProposalId),

    #[error("Vote tally overflow")]
    Overflow,
}

/// Errors raised by the vote ledger.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VoteError {
    #[error("{voter} already voted on proposal {proposal_id}")]
    DuplicateVote { proposal_id: ProposalId, voter: Address },
}

/// Errors reported by the payment collaborator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransferError {
    #[error("Recipient {0} cannot receive funds")]
    RecipientRejected(Address),

    #[error("Recipient {0} balance overflow")]
    Overflow(Address),

    /// Host ledger refusal with no dedicated variant. The in-memory
    /// `AccountLedger` never raises it.
    #[error("Transfer failed: {0}")]
    Failed(String),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors returned by governance engine operations.
///
/// Every variant leaves the engine untouched: a failed call commits nothing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("Insufficient treasury funds: requested {requested}, available {available}")]
    InsufficientTreasuryFunds { requested: Amount, available: Amount },

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Voting closed for proposal {0}")]
    VotingClosed(ProposalId),

    #[error("Voting still open for proposal {proposal_id} until height {end_height}")]
    VotingStillOpen { proposal_id: ProposalId, end_height: BlockHeight },

    #[error("No voting power: {0}")]
    NoVotingPower(Address),

    #[error("{voter} already voted on proposal {proposal_id}")]
    DuplicateVote { proposal_id: ProposalId, voter: Address },

    #[error("Proposal {0} already executed")]
    AlreadyExecuted(ProposalId),

    #[error("Proposal rejected: {votes_for} for, {votes_against} against")]
    ProposalRejected { votes_for: Amount, votes_against: Amount },

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Arithmetic overflow")]
    Overflow,
}

impl From<TreasuryError> for GovernanceError {
    fn from(e: TreasuryError) -> Self {
        match e {
            TreasuryError::InsufficientFunds { requested, available } => {
                GovernanceError::InsufficientFunds { requested, available }
            }
            TreasuryError::Overflow => GovernanceError::Overflow,
        }
    }
}

impl From<ProposalError> for GovernanceError {
    fn from(e: ProposalError) -> Self {
        match e {
            ProposalError::InsufficientTreasuryFunds { requested, available } => {
                GovernanceError::InsufficientTreasuryFunds { requested, available }
            }
            ProposalError::NotFound(id) => GovernanceError::ProposalNotFound(id),
            ProposalError::AlreadyExecuted(id) => GovernanceError::AlreadyExecuted(id),
            ProposalError::Overflow => GovernanceError::Overflow,
        }
    }
}

impl From<VoteError> for GovernanceError {
    fn from(e: VoteError) -> Self {
        match e {
            VoteError::DuplicateVote { proposal_id, voter } => {
                GovernanceError::DuplicateVote { proposal_id, voter }
            }
        }
    }
}
