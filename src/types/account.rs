//! Account-related types for the wallet ledger
//!
//! This module defines the Account structure (identity and display metadata)
//! and the amount formatting shared by every output path.

use rust_decimal::Decimal;

/// Account identifier
///
/// Free-form string, unique within a ledger and immutable once registered.
pub type AccountId = String;

/// Registered account metadata
///
/// Holds the identity and display metadata of an account. The balance is
/// deliberately not part of this struct: it lives in the registry next to
/// the account and is only mutated under that account's lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,

    /// Display name of the account holder
    pub name: String,

    /// Contact detail (e-mail, phone, ...)
    pub contact: String,
}

impl Account {
    /// Create a new account record
    ///
    /// # Arguments
    ///
    /// * `id` - The account identifier
    /// * `name` - Display name of the account holder
    /// * `contact` - Contact detail of the account holder
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>, contact: impl Into<String>) -> Self {
        Account {
            id: id.into(),
            name: name.into(),
            contact: contact.into(),
        }
    }
}

/// Format an amount for display
///
/// Whole amounts keep a single fractional digit (`1000.0`), anything else is
/// printed in normalized form with trailing zeros removed (`70.25`, `0.3`).
pub fn format_amount(amount: Decimal) -> String {
    if amount.fract().is_zero() {
        format!("{:.1}", amount.trunc())
    } else {
        amount.normalize().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_account_keeps_metadata() {
        let account = Account::new("alice", "Alice Johnson", "alice@example.com");

        assert_eq!(account.id, "alice");
        assert_eq!(account.name, "Alice Johnson");
        assert_eq!(account.contact, "alice@example.com");
    }

    #[rstest]
    #[case::zero(Decimal::ZERO, "0.0")]
    #[case::whole(Decimal::new(1000, 0), "1000.0")]
    #[case::whole_with_scale(Decimal::new(10000, 2), "100.0")]
    #[case::trailing_zero(Decimal::new(10050, 2), "100.5")]
    #[case::two_places(Decimal::new(7025, 2), "70.25")]
    #[case::small(Decimal::new(3, 1), "0.3")]
    #[case::sub_cent(Decimal::new(10, 3), "0.01")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }
}
