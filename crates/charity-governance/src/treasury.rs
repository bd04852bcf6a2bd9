//! Treasury balance tracking.
//!
//! Holds the pooled balance donations feed and executed proposals draw
//! from, together with an append-only transaction history.

use charity_types::{Address, Amount, BlockHeight};
use serde::Serialize;

use crate::error::TreasuryError;

/// Type of treasury transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Funds donated
    Deposit,
    /// Funds paid out to a proposal beneficiary
    Disbursement,
}

/// Treasury transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreasuryTransaction {
    pub kind: TransactionKind,
    pub amount: Amount,
    /// Donor for deposits, beneficiary for disbursements
    pub counterparty: Address,
    pub height: BlockHeight,
}

/// Treasury balance and history.
///
/// `balance == total_deposited - total_disbursed` holds after every call.
#[derive(Debug, Clone, Default)]
pub struct Treasury {
    balance: Amount,
    total_deposited: Amount,
    total_disbursed: Amount,
    transactions: Vec<TreasuryTransaction>,
}

impl Treasury {
    /// Create an empty treasury.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add donated funds.
    pub fn credit(
        &mut self,
        amount: Amount,
        source: Address,
        height: BlockHeight,
    ) -> Result<(), TreasuryError> {
        let balance = self.balance.checked_add(amount).ok_or(TreasuryError::Overflow)?;
        let total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;

        self.balance = balance;
        self.total_deposited = total_deposited;
        self.transactions.push(TreasuryTransaction {
            kind: TransactionKind::Deposit,
            amount,
            counterparty: source,
            height,
        });

        Ok(())
    }

    /// Withdraw funds for a disbursement.
    ///
    /// # Errors
    /// - `InsufficientFunds` if `amount` exceeds the balance; nothing changes.
    pub fn debit(
        &mut self,
        amount: Amount,
        recipient: Address,
        height: BlockHeight,
    ) -> Result<(), TreasuryError> {
        if amount > self.balance {
            return Err(TreasuryError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        // Bounded by total_deposited since amount <= balance.
        self.total_disbursed += amount;
        self.transactions.push(TreasuryTransaction {
            kind: TransactionKind::Disbursement,
            amount,
            counterparty: recipient,
            height,
        });

        Ok(())
    }

    /// Undo the most recent debit when its payout could not be delivered.
    ///
    /// Only the latest history entry can be undone, and only when it is the
    /// disbursement of `amount` to `recipient`. Returns whether anything was
    /// reverted; on `false` the treasury is untouched.
    #[must_use]
    pub(crate) fn revert_debit(&mut self, amount: Amount, recipient: &Address) -> bool {
        let matches = self.transactions.last().is_some_and(|last| {
            last.kind == TransactionKind::Disbursement
                && last.amount == amount
                && last.counterparty == *recipient
        });
        if !matches {
            return false;
        }

        self.transactions.pop();
        self.balance += amount;
        self.total_disbursed -= amount;
        true
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn total_deposited(&self) -> Amount {
        self.total_deposited
    }

    pub fn total_disbursed(&self) -> Amount {
        self.total_disbursed
    }

    /// Full transaction history, oldest first.
    pub fn transactions(&self) -> &[TreasuryTransaction] {
        &self.transactions
    }
}
