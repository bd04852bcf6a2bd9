//! Charity Types - Core type definitions shared by the Charity DAO crates.
//!
//! This crate provides:
//! - Addresses (opaque 20-byte principals with Bech32m text form)
//! - Scalar aliases for amounts, block heights and proposal ids

pub mod address;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use error::TypesError;

/// Token amount. Contributions, balances, tallies and voting power all use it.
pub type Amount = u128;

/// Externally supplied block height standing in for elapsed time.
pub type BlockHeight = u64;

/// Sequential proposal identifier, starting at 1.
pub type ProposalId = u64;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Address, Amount, BlockHeight, ProposalId, TypesError};
}
