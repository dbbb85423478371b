//! CSV format handling for operation records and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to operation records
//! - Account and history output serialization
//!
//! All functions are pure (no I/O beyond the supplied writer) for easy testing.

use crate::types::{format_amount, Account, OperationRecord, OperationType, Transaction};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns:
/// type, account, counterparty, amount, name, contact, description.
/// Everything after `account` is optional; which fields are required depends
/// on the operation type and is checked in [`convert_csv_record`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub op_type: String,
    pub account: String,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation type (case-insensitive; `withdrawal` is accepted as an alias)
/// - Parses the amount string into a Decimal (if present)
/// - Validates that an amount is present for deposit/withdraw/transfer
/// - Validates that a counterparty is present for transfer and a name for open
///
/// Sign and zero checks are left to the ledger so that they surface as
/// `InvalidAmount` rejections rather than parse errors.
///
/// # Returns
///
/// Result containing either:
/// - Ok(OperationRecord) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, String> {
    let op_type = match csv_record.op_type.to_lowercase().as_str() {
        "open" => OperationType::Open,
        "deposit" => OperationType::Deposit,
        "withdraw" | "withdrawal" => OperationType::Withdraw,
        "transfer" => OperationType::Transfer,
        _ => {
            return Err(format!(
                "Invalid operation type: '{}' for account {}",
                csv_record.op_type, csv_record.account
            ))
        }
    };

    if csv_record.account.trim().is_empty() {
        return Err(format!("{:?} operation requires an account", op_type));
    }

    let amount = match non_empty(csv_record.amount) {
        Some(amount_str) => match Decimal::from_str(&amount_str) {
            Ok(decimal) => Some(decimal),
            Err(_) => {
                return Err(format!(
                    "Invalid amount '{}' for account {}",
                    amount_str, csv_record.account
                ))
            }
        },
        None => None,
    };

    let counterparty = non_empty(csv_record.counterparty);
    let name = non_empty(csv_record.name);

    match op_type {
        OperationType::Open => {
            if name.is_none() {
                return Err(format!(
                    "Open operation for account {} requires a name",
                    csv_record.account
                ));
            }
        }
        OperationType::Deposit | OperationType::Withdraw | OperationType::Transfer => {
            if amount.is_none() {
                return Err(format!(
                    "{:?} operation for account {} requires an amount",
                    op_type, csv_record.account
                ));
            }
        }
    }

    if op_type == OperationType::Transfer && counterparty.is_none() {
        return Err(format!(
            "Transfer operation for account {} requires a counterparty",
            csv_record.account
        ));
    }

    Ok(OperationRecord {
        op_type,
        account: csv_record.account,
        counterparty,
        amount,
        name: name.unwrap_or_default(),
        contact: non_empty(csv_record.contact).unwrap_or_default(),
        description: non_empty(csv_record.description).unwrap_or_default(),
    })
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Write account states to CSV format
///
/// Writes accounts in CSV format with columns: account, name, contact, balance.
/// Accounts are sorted by id for deterministic output.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(
    accounts: &[(Account, Decimal)],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "name", "contact", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|(a, _), (b, _)| a.id.cmp(&b.id));

    for (account, balance) in sorted_accounts {
        writer
            .write_record([
                account.id.as_str(),
                account.name.as_str(),
                account.contact.as_str(),
                format_amount(balance).as_str(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write an account's transaction history to CSV format
///
/// Columns: id, kind, from, to, amount, description. Rows keep the order of
/// the supplied slice (log order).
pub fn write_history_csv(history: &[Transaction], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "kind", "from", "to", "amount", "description"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for tx in history {
        writer
            .write_record([
                tx.id.to_string().as_str(),
                tx.kind.to_string().as_str(),
                tx.from.as_str(),
                tx.to.as_str(),
                format_amount(tx.amount).as_str(),
                tx.description.as_str(),
            ])
            .map_err(|e| format!("Failed to write history record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
