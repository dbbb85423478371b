use crate::strategy::{BatchConfig, Report};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay wallet operations against an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger")]
#[command(about = "Replay wallet operations against an in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Replay strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Replay strategy: 'sync' for sequential or 'async' for concurrent batches. \
                'async' opens accounts before other operations of the same batch and runs \
                different accounts in parallel, so its output can differ from 'sync' when \
                operations depend on file order across accounts"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads applying a batch (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Print this account's transaction history instead of all balances
    #[arg(long = "history", value_name = "ACCOUNT")]
    pub history: Option<String>,
}

/// Available replay strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// the defaults inside `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// The report selected by `--history`
    pub fn report(&self) -> Report {
        match &self.history {
            Some(account) => Report::History(account.clone()),
            None => Report::Balances,
        }
    }
}
