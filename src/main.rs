//! Wallet Ledger CLI
//!
//! Replays an operation file against an in-memory ledger and prints the
//! resulting balances (or one account's history) as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --strategy async --batch-size 500 --max-concurrent 8 operations.csv
//! cargo run -- --history alice operations.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug`, `info` or `warn` to control logging verbosity
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing input file, unknown history account, etc.)

use std::process;
use wallet_ledger::cli;
use wallet_ledger::strategy;

fn main() {
    env_logger::init();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &args.report(), &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
