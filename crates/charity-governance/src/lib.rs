//! Charity Governance - contribution-weighted treasury governance.
//!
//! This crate provides:
//! - Treasury balance tracking with transaction history
//! - Contribution registry deriving voting power from lifetime donations
//! - Proposal lifecycle management with height-bounded voting windows
//! - Write-once vote ledger
//! - The governance engine tying them together, plus a thread-safe handle
//!
//! Heights are supplied by the caller and payouts go through a
//! [`PaymentTransfer`] implementation provided by the hosting ledger.

pub mod config;
pub mod contribution;
pub mod engine;
pub mod error;
pub mod events;
pub mod proposal;
pub mod shared;
pub mod transfer;
pub mod treasury;
pub mod voting;

pub use config::GovernanceConfig;
pub use contribution::{ContributionRegistry, Contributor};
pub use engine::{GovernanceEngine, GovernanceStats};
pub use error::{ConfigError, GovernanceError, ProposalError, TransferError, TreasuryError, VoteError};
pub use events::GovernanceEvent;
pub use proposal::{Proposal, ProposalRequest, ProposalStatus, ProposalStore};
pub use shared::SharedGovernance;
pub use transfer::{AccountLedger, PaymentTransfer, TransferRecord};
pub use treasury::{TransactionKind, Treasury, TreasuryTransaction};
pub use voting::{Vote, VoteKey, VoteLedger};
