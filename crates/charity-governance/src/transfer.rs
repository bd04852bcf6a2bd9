//! Payment transfer collaborator.
//!
//! The engine does its own treasury accounting; the collaborator only has to
//! deliver funds to the beneficiary on the hosting ledger.

use std::collections::{HashMap, HashSet};

use charity_types::{Address, Amount};

use crate::error::TransferError;

/// Fund-transfer primitive provided by the hosting ledger.
pub trait PaymentTransfer {
    /// Move `amount` from the treasury account `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TransferError>;
}

/// A completed payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// In-memory account balances receiving treasury payouts.
#[derive(Debug, Clone, Default)]
pub struct AccountLedger {
    balances: HashMap<Address, Amount>,
    frozen: HashSet<Address>,
    transfers: Vec<TransferRecord>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get account balance
    pub fn balance(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Refuse all future payouts to `address`.
    pub fn freeze(&mut self, address: Address) {
        self.frozen.insert(address);
    }

    pub fn unfreeze(&mut self, address: &Address) {
        self.frozen.remove(address);
    }

    /// Completed payouts, oldest first.
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }
}

impl PaymentTransfer for AccountLedger {
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.frozen.contains(to) {
            return Err(TransferError::RecipientRejected(*to));
        }

        let updated = self
            .balance(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow(*to))?;
        self.balances.insert(*to, updated);
        self.transfers.push(TransferRecord {
            from: *from,
            to: *to,
            amount,
        });

        Ok(())
    }
}
