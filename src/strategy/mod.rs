//! Replay strategy module
//!
//! This module defines the Strategy pattern for replaying an operation file
//! against a fresh ledger. Strategies differ in how records are scheduled:
//! sequentially on one thread, or in concurrent batches across worker threads.
//! Both produce a populated ledger which is then rendered as CSV.

use crate::cli::StrategyType;
use crate::core::Ledger;
use crate::io::{write_accounts_csv, write_history_csv};
use crate::types::{AccountId, LedgerError, OperationRecord, OperationType};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod batch_processor;
pub mod sync;

pub use self::r#async::{AsyncReplayStrategy, BatchConfig};
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use sync::SyncReplayStrategy;

/// What to render once replay has finished
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Report {
    /// Every account with its final balance
    #[default]
    Balances,
    /// Transaction history of one account
    History(AccountId),
}

/// Replay strategy trait
///
/// Each strategy reads operation records from a CSV file and applies them to
/// a new ledger. Individual rejected operations are logged and skipped; only
/// fatal errors (unreadable input, runtime failures) abort the replay.
pub trait ReplayStrategy: Send + Sync {
    /// Apply every operation in `input_path` to a new ledger
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Ledger>)` with the final ledger state
    /// * `Err(String)` if a fatal error occurred
    fn replay(&self, input_path: &Path) -> Result<Arc<Ledger>, String>;

    /// Replay `input_path` and write the requested report to `output`
    fn process(&self, input_path: &Path, report: &Report, output: &mut dyn Write) -> Result<(), String> {
        let ledger = self.replay(input_path)?;
        write_report(&ledger, report, output)
    }
}

/// Render `report` for `ledger` as CSV
pub fn write_report(ledger: &Ledger, report: &Report, output: &mut dyn Write) -> Result<(), String> {
    match report {
        Report::Balances => write_accounts_csv(&ledger.balances(), output),
        Report::History(account) => {
            let history = ledger.history_for(account).map_err(|e| e.to_string())?;
            write_history_csv(&history, output)
        }
    }
}

/// Apply one operation record to `ledger`
///
/// Records coming out of the CSV readers always carry the fields their type
/// requires; a hand-built record missing them is rejected like an invalid
/// amount or an unknown counterparty.
pub fn apply_operation(ledger: &Ledger, record: &OperationRecord) -> Result<(), LedgerError> {
    let amount = || {
        record
            .amount
            .ok_or_else(|| LedgerError::invalid_amount("missing"))
    };

    match record.op_type {
        OperationType::Open => ledger.create_account(&record.account, &record.name, &record.contact),
        OperationType::Deposit => ledger.deposit(&record.account, amount()?, &record.description),
        OperationType::Withdraw => ledger.withdraw(&record.account, amount()?, &record.description),
        OperationType::Transfer => {
            let counterparty = record.counterparty.as_deref().unwrap_or_default();
            ledger.transfer(&record.account, counterparty, amount()?, &record.description)
        }
    }
}

/// Create a replay strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of replay strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ReplayStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncReplayStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncReplayStrategy::new(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn record(op_type: OperationType, account: &str, amount: Option<i64>) -> OperationRecord {
        OperationRecord {
            op_type,
            account: account.to_string(),
            counterparty: None,
            amount: amount.map(|a| Decimal::new(a, 0)),
            name: "Name".to_string(),
            contact: String::new(),
            description: "test".to_string(),
        }
    }

    #[test]
    fn test_apply_operation_routes_each_type() {
        let ledger = Ledger::new();

        apply_operation(&ledger, &record(OperationType::Open, "alice", None)).unwrap();
        apply_operation(&ledger, &record(OperationType::Open, "bob", None)).unwrap();
        apply_operation(&ledger, &record(OperationType::Deposit, "alice", Some(10))).unwrap();
        apply_operation(&ledger, &record(OperationType::Withdraw, "alice", Some(3))).unwrap();
        let transfer = OperationRecord {
            counterparty: Some("bob".to_string()),
            ..record(OperationType::Transfer, "alice", Some(2))
        };
        apply_operation(&ledger, &transfer).unwrap();

        assert_eq!(ledger.get_balance("alice").unwrap(), Decimal::new(5, 0));
        assert_eq!(ledger.get_balance("bob").unwrap(), Decimal::new(2, 0));
        assert_eq!(ledger.transaction_count(), 3);
    }

    #[rstest]
    #[case::missing_amount(record(OperationType::Deposit, "alice", None))]
    #[case::missing_counterparty(record(OperationType::Transfer, "alice", Some(1)))]
    fn test_apply_operation_rejects_incomplete_records(#[case] op: OperationRecord) {
        let ledger = Ledger::new();
        ledger.create_account("alice", "Alice", "").unwrap();
        ledger.deposit("alice", Decimal::TEN, "").unwrap();

        assert!(apply_operation(&ledger, &op).is_err());
        assert_eq!(ledger.get_balance("alice").unwrap(), Decimal::TEN);
    }

    #[test]
    fn test_write_report_history_for_unknown_account() {
        let ledger = Ledger::new();
        let mut output = Vec::new();

        let result = write_report(&ledger, &Report::History("ghost".to_string()), &mut output);

        assert_eq!(result, Err("Account ghost not found".to_string()));
    }
}
