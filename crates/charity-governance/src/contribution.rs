//! Contribution registry.
//!
//! Voting power is the contributor's lifetime contribution: no decay, no
//! delegation, never revoked.

use std::collections::HashMap;

use charity_types::{Address, Amount, BlockHeight};
use serde::Serialize;

use crate::error::TreasuryError;
use crate::treasury::Treasury;

/// A principal that has donated at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub address: Address,
    pub total_contributed: Amount,
    /// Always equal to `total_contributed`
    pub voting_power: Amount,
    pub donation_count: u64,
}

/// Registry of contributors keyed by address.
#[derive(Debug, Clone, Default)]
pub struct ContributionRegistry {
    contributors: HashMap<Address, Contributor>,
}

impl ContributionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a donation and credit the treasury.
    ///
    /// The registry only changes once the treasury credit has succeeded.
    pub fn record_contribution(
        &mut self,
        contributor: Address,
        amount: Amount,
        treasury: &mut Treasury,
        height: BlockHeight,
    ) -> Result<&Contributor, TreasuryError> {
        treasury.credit(amount, contributor, height)?;

        let record = self.contributors.entry(contributor).or_insert(Contributor {
            address: contributor,
            total_contributed: 0,
            voting_power: 0,
            donation_count: 0,
        });
        // A contributor's total never exceeds the treasury's total_deposited,
        // which the credit above already bounds.
        record.total_contributed += amount;
        record.voting_power = record.total_contributed;
        record.donation_count += 1;

        Ok(record)
    }

    /// Voting power of `contributor`, zero when unknown.
    pub fn voting_power_of(&self, contributor: &Address) -> Amount {
        self.contributors
            .get(contributor)
            .map(|c| c.voting_power)
            .unwrap_or(0)
    }

    pub fn get(&self, contributor: &Address) -> Option<&Contributor> {
        self.contributors.get(contributor)
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contributor> {
        self.contributors.values()
    }

    /// Sum of every contributor's voting power.
    pub fn total_voting_power(&self) -> Amount {
        self.contributors.values().map(|c| c.voting_power).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_contribution_creates_record() {
        let mut registry = ContributionRegistry::new();
        let mut treasury = Treasury::new();
        let donor = Address::from_bytes([1u8; 20]);

        let record = registry.record_contribution(donor, 1_000, &mut treasury, 0).unwrap();
        assert_eq!(record.total_contributed, 1_000);
        assert_eq!(record.voting_power, 1_000);
        assert_eq!(record.donation_count, 1);
        assert_eq!(treasury.balance(), 1_000);
    }

    #[test]
    fn test_contributions_accumulate() {
        let mut registry = ContributionRegistry::new();
        let mut treasury = Treasury::new();
        let donor = Address::from_bytes([1u8; 20]);

        registry.record_contribution(donor, 1_000, &mut treasury, 0).unwrap();
        registry.record_contribution(donor, 250, &mut treasury, 5).unwrap();

        let record = registry.get(&donor).unwrap();
        assert_eq!(record.total_contributed, 1_250);
        assert_eq!(record.voting_power, 1_250);
        assert_eq!(record.donation_count, 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(treasury.balance(), 1_250);
    }

    #[test]
    fn test_unknown_contributor_has_zero_power() {
        let registry = ContributionRegistry::new();
        assert_eq!(registry.voting_power_of(&Address::from_bytes([5u8; 20])), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_credit_leaves_registry_untouched() {
        let mut registry = ContributionRegistry::new();
        let mut treasury = Treasury::new();
        let whale = Address::from_bytes([1u8; 20]);
        let donor = Address::from_bytes([2u8; 20]);

        registry.record_contribution(whale, Amount::MAX, &mut treasury, 0).unwrap();
        let err = registry.record_contribution(donor, 1, &mut treasury, 0).unwrap_err();

        assert_eq!(err, TreasuryError::Overflow);
        assert!(registry.get(&donor).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_total_voting_power() {
        let mut registry = ContributionRegistry::new();
        let mut treasury = Treasury::new();

        registry
            .record_contribution(Address::from_bytes([1u8; 20]), 1_000, &mut treasury, 0)
            .unwrap();
        registry
            .record_contribution(Address::from_bytes([2u8; 20]), 500, &mut treasury, 0)
            .unwrap();

        assert_eq!(registry.total_voting_power(), 1_500);
        assert_eq!(registry.iter().count(), 2);
    }
}
